//! Stack count inference for one buff category

use super::assets::AssetStore;
use super::types::{BuffCategory, Recognition, ScoredMatch};
use crate::capture::CapturedFrame;
use crate::template_matching::{MatchError, TemplateMatcher};
use rayon::prelude::*;
use std::sync::Arc;

/// A template match must score strictly above this to be accepted
pub const CONFIDENCE_THRESHOLD: f32 = 0.9;

#[derive(Clone, Debug)]
pub struct StackRecognizer {
    assets: Arc<AssetStore>,
    matcher: TemplateMatcher,
    threshold: f32,
}

impl StackRecognizer {
    pub fn new(assets: Arc<AssetStore>) -> Self {
        Self {
            assets,
            matcher: TemplateMatcher::new(),
            threshold: CONFIDENCE_THRESHOLD,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score every template of the category, then threshold the global best.
    /// All templates are scanned; there is no early exit on a good match.
    /// Templates are scored in parallel and collected in enumeration order.
    pub fn recognize(
        &self,
        category: BuffCategory,
        frame: &CapturedFrame,
    ) -> Result<Recognition, MatchError> {
        let candidates = self
            .assets
            .templates(category)
            .par_iter()
            .map(|entry| {
                self.matcher
                    .best_match(&entry.template, frame)
                    .map(|result| ScoredMatch {
                        count: entry.count,
                        variant: entry.variant,
                        result,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let recognition = decide(category, &candidates, self.threshold);
        log::trace!(
            "🧮 {}: count={} best={:?}",
            category,
            recognition.count,
            recognition
                .best
                .map(|b| (b.count, b.result.center(), b.confidence()))
        );
        Ok(recognition)
    }
}

/// Pick the best candidate (first one wins on equal confidence) and accept
/// its count only if it beats the threshold; otherwise report baseline.
pub fn decide(category: BuffCategory, candidates: &[ScoredMatch], threshold: f32) -> Recognition {
    let mut best: Option<ScoredMatch> = None;
    for candidate in candidates {
        if candidate.confidence().is_nan() {
            continue;
        }
        if best.is_none_or(|b| candidate.confidence() > b.confidence()) {
            best = Some(*candidate);
        }
    }

    let count = match best {
        Some(b) if b.confidence() > threshold && category.is_valid_count(b.count) => b.count,
        _ => category.baseline(),
    };

    Recognition {
        category,
        count,
        best,
    }
}
