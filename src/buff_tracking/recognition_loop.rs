//! Periodic recognition driver
//!
//! One cycle: capture a frame, recognize every enabled category on the worker
//! pool, debounce alerts, compose and publish the overlay. A failed cycle
//! leaves state and overlay untouched and the next one runs on schedule.

use super::alert::AlertDebouncer;
use super::assets::AssetStore;
use super::compositor::{OverlayCompositor, OverlayFrame};
use super::error::{CycleError, LoopError};
use super::recognizer::StackRecognizer;
use super::types::{BuffCategory, CycleReport, LoopState, Recognition, RecognitionState};
use crate::audio::AlertSink;
use crate::capture::ScreenCapturer;
use crate::config::{Configuration, OverlayPosition};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Overlay plus where it belongs on screen
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedOverlay {
    pub frame: OverlayFrame,
    pub position: OverlayPosition,
    /// Index of the cycle that produced it; 0 is the baseline published at start
    pub cycle: u64,
}

/// Receives the overlay after every completed cycle
pub trait OverlaySink: Send {
    fn publish(&mut self, overlay: &PublishedOverlay);
}

impl OverlaySink for watch::Sender<Option<PublishedOverlay>> {
    fn publish(&mut self, overlay: &PublishedOverlay) {
        self.send_replace(Some(overlay.clone()));
    }
}

pub struct RecognitionLoop {
    config: Configuration,
    recognizer: StackRecognizer,
    debouncer: AlertDebouncer,
    compositor: OverlayCompositor,
    capturer: Box<dyn ScreenCapturer>,
    alert_sink: Box<dyn AlertSink>,
    overlay_sink: Box<dyn OverlaySink>,
    pool: rayon::ThreadPool,
    enabled: Vec<BuffCategory>,
    states: BTreeMap<BuffCategory, RecognitionState>,
    overlay: Option<OverlayFrame>,
    last_report: Option<CycleReport>,
    loop_state: LoopState,
    cycles_completed: u64,
    cycles_skipped: u64,
}

impl RecognitionLoop {
    /// Build the loop around a validated configuration and loaded assets.
    /// The worker pool gets one thread per enabled category.
    pub fn new(
        config: Configuration,
        assets: Arc<AssetStore>,
        capturer: Box<dyn ScreenCapturer>,
        alert_sink: Box<dyn AlertSink>,
        overlay_sink: Box<dyn OverlaySink>,
    ) -> Result<Self, LoopError> {
        let enabled = config.tracking.enabled();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(enabled.len().max(1))
            .thread_name(|i| format!("recognizer-{}", i))
            .build()?;

        let states = BuffCategory::ALL
            .into_iter()
            .map(|c| (c, RecognitionState::baseline(c)))
            .collect();

        log::debug!(
            "🧵 Recognition pool with {} worker(s) for {:?} via '{}'",
            pool.current_num_threads(),
            enabled,
            capturer.name()
        );

        Ok(Self {
            recognizer: StackRecognizer::new(Arc::clone(&assets)),
            debouncer: AlertDebouncer::new(),
            compositor: OverlayCompositor::new(assets, config.scale),
            config,
            capturer,
            alert_sink,
            overlay_sink,
            pool,
            enabled,
            states,
            overlay: None,
            last_report: None,
            loop_state: LoopState::Idle,
            cycles_completed: 0,
            cycles_skipped: 0,
        })
    }

    /// Idle -> Running. Publishes the baseline overlay so something is shown
    /// before the first cycle completes. Calling it again is a no-op.
    pub fn start(&mut self) {
        if self.loop_state == LoopState::Running {
            return;
        }
        self.loop_state = LoopState::Running;
        log::info!(
            "🚀 Recognition loop running every {}ms, tracking {:?}",
            self.config.update_rate_ms,
            self.enabled
        );
        self.publish_overlay(0);
    }

    /// Run one cycle and commit its results. On error nothing is committed.
    pub fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let started = Instant::now();
        let index = self.cycles_completed + self.cycles_skipped + 1;

        let frame = self.capturer.capture(&self.config.capture_region)?;

        let recognizer = &self.recognizer;
        let enabled = &self.enabled;
        let recognitions: Vec<Recognition> = self.pool.install(|| {
            enabled
                .par_iter()
                .map(|&category| recognizer.recognize(category, &frame))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut alerts = Vec::new();
        for recognition in &recognitions {
            let state = self
                .states
                .entry(recognition.category)
                .or_insert_with(|| RecognitionState::baseline(recognition.category));
            let decision = self.debouncer.evaluate(
                recognition.category,
                state.count,
                recognition.count,
                state.alert_latched,
            );
            state.count = recognition.count;
            state.alert_latched = decision.latch;
            if decision.fire {
                alerts.push(recognition.category);
            }
        }

        for &category in &alerts {
            if category.alert_sound_file().is_none() {
                continue;
            }
            if let Err(e) = self.alert_sink.play(category) {
                log::warn!("⚠️ Alert for {} failed: {}", category, e);
            }
        }

        self.publish_overlay(index);
        self.cycles_completed += 1;

        let report = CycleReport {
            index,
            recognitions,
            alerts,
            elapsed: started.elapsed(),
        };
        log::debug!(
            "🔄 Cycle {} in {:?}: {:?}",
            report.index,
            report.elapsed,
            report
                .recognitions
                .iter()
                .map(|r| (r.category.name(), r.count))
                .collect::<Vec<_>>()
        );
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Run one cycle, logging and counting a failure instead of returning it
    pub fn tick(&mut self) -> Option<CycleReport> {
        match self.run_cycle() {
            Ok(report) => Some(report),
            Err(e) => {
                self.cycles_skipped += 1;
                log::warn!("⚠️ Cycle skipped: {}", e);
                None
            }
        }
    }

    /// Drive cycles until `shutdown` turns true (or its sender goes away).
    ///
    /// Each cycle runs on the blocking pool and is awaited before the next
    /// sleep is armed, so cycles never overlap. An in-flight cycle always
    /// finishes. The loop is handed back for inspection.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<Self, LoopError> {
        self.start();
        let interval = self.config.update_interval();
        let mut this = self;

        loop {
            if *shutdown.borrow() {
                break;
            }

            this = tokio::task::spawn_blocking(move || {
                this.tick();
                this
            })
            .await?;

            let sender_gone = tokio::select! {
                _ = tokio::time::sleep(interval) => false,
                changed = shutdown.changed() => changed.is_err(),
            };
            if sender_gone {
                break;
            }
        }

        log::info!(
            "🛑 Recognition loop stopped after {} cycle(s), {} skipped",
            this.cycles_completed,
            this.cycles_skipped
        );
        Ok(this)
    }

    fn publish_overlay(&mut self, cycle: u64) {
        let active: Vec<(BuffCategory, u8)> = self
            .enabled
            .iter()
            .map(|&c| (c, self.state(c).count))
            .collect();
        let frame = self.compositor.compose(&active);

        self.overlay_sink.publish(&PublishedOverlay {
            frame: frame.clone(),
            position: self.config.overlay_position,
            cycle,
        });
        self.overlay = Some(frame);
    }

    pub fn state(&self, category: BuffCategory) -> RecognitionState {
        self.states
            .get(&category)
            .copied()
            .unwrap_or_else(|| RecognitionState::baseline(category))
    }

    pub fn states(&self) -> &BTreeMap<BuffCategory, RecognitionState> {
        &self.states
    }

    /// Most recently published overlay
    pub fn overlay(&self) -> Option<&OverlayFrame> {
        self.overlay.as_ref()
    }

    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn enabled_categories(&self) -> &[BuffCategory] {
        &self.enabled
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn cycles_skipped(&self) -> u64 {
        self.cycles_skipped
    }
}
