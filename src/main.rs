mod args;

use args::Args;
use buff_gauge::audio::AlertSink;
use buff_gauge::buff_tracking::{AssetStore, PublishedOverlay, RecognitionLoop};
use buff_gauge::capture::CaptureBackend;
use buff_gauge::config::Configuration;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("❌ Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(args)) {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Configuration::load(&args.config_path, &args.asset_root)?;
    log::info!(
        "⚙️ Capture region {:?}, profile {}/{}/{}",
        config.capture_region,
        config.asset_profile.resolution,
        config.asset_profile.windows_scaling,
        config.asset_profile.buffbar_size
    );

    let assets = Arc::new(AssetStore::load(&config)?);
    let capturer = CaptureBackend::select(args.replay.as_deref())?;
    let alert_sink = alert_sink(&config);

    let (overlay_tx, overlay_rx) = watch::channel::<Option<PublishedOverlay>>(None);
    let dump_task = args
        .dump_overlay
        .map(|path| tokio::spawn(dump_overlays(overlay_rx, path)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("🛑 Ctrl+C received, finishing current cycle");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                log::warn!("⚠️ Ctrl+C handler unavailable: {}", e);
                // Keep the sender alive so the loop does not read a closed channel as shutdown
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    let recognition = RecognitionLoop::new(
        config,
        assets,
        Box::new(capturer),
        alert_sink,
        Box::new(overlay_tx),
    )?;
    let finished = recognition.run(shutdown_rx).await?;
    drop(finished);

    if let Some(task) = dump_task {
        task.await?;
    }
    Ok(())
}

#[cfg(feature = "audio")]
fn alert_sink(config: &Configuration) -> Box<dyn AlertSink> {
    use buff_gauge::audio::{RodioAlertSink, alert_sound_path};
    use buff_gauge::buff_tracking::BuffCategory;

    for category in BuffCategory::ALL {
        if let Err(e) = alert_sound_path(&config.sound_dir(), category) {
            log::warn!("⚠️ {}", e);
        }
    }
    Box::new(RodioAlertSink::new(config.sound_dir()))
}

#[cfg(not(feature = "audio"))]
fn alert_sink(_config: &Configuration) -> Box<dyn AlertSink> {
    log::info!("🔕 Built without audio, alerts are logged only");
    Box::new(buff_gauge::audio::LogAlertSink)
}

/// Save each newly published overlay until the loop drops its sender
async fn dump_overlays(mut overlays: watch::Receiver<Option<PublishedOverlay>>, path: PathBuf) {
    let mut last_saved = None;
    while overlays.changed().await.is_ok() {
        let Some(published) = overlays.borrow_and_update().clone() else {
            continue;
        };
        if last_saved.as_ref() == Some(&published.frame) {
            continue;
        }

        let frame = published.frame.clone();
        let target = path.clone();
        let saved = tokio::task::spawn_blocking(move || frame.pixels().save(&target)).await;
        match saved {
            Ok(Ok(())) => {
                log::debug!("💾 Overlay from cycle {} saved to {:?}", published.cycle, path);
                last_saved = Some(published.frame);
            }
            Ok(Err(e)) => log::warn!("⚠️ Failed to save overlay to {:?}: {}", path, e),
            Err(e) => log::warn!("⚠️ Overlay save task failed: {}", e),
        }
    }
}
