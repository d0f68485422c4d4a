use super::types::BuffCategory;

/// Outcome of one debounce step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertDecision {
    pub fire: bool,
    pub latch: bool,
}

/// Rising-edge latch per category: one alert per arrival at the maximum
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertDebouncer;

impl AlertDebouncer {
    pub fn new() -> Self {
        Self
    }

    /// Fire when the count reaches the category maximum with the latch open.
    /// The latch stays closed while pinned at the maximum and reopens as soon
    /// as the count drops below it.
    pub fn evaluate(
        &self,
        category: BuffCategory,
        old_count: u8,
        new_count: u8,
        latch: bool,
    ) -> AlertDecision {
        let at_max = new_count == category.max_count();
        let decision = AlertDecision {
            fire: at_max && !latch,
            latch: at_max,
        };
        if decision.fire {
            log::debug!(
                "🔔 {} reached {} (was {})",
                category,
                new_count,
                old_count
            );
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(category: BuffCategory, counts: &[u8]) -> Vec<bool> {
        let debouncer = AlertDebouncer::new();
        let mut count = category.baseline();
        let mut latch = false;
        counts
            .iter()
            .map(|&next| {
                let decision = debouncer.evaluate(category, count, next, latch);
                count = next;
                latch = decision.latch;
                decision.fire
            })
            .collect()
    }

    #[test]
    fn test_fires_once_while_pinned() {
        assert_eq!(run(BuffCategory::Souls, &[5, 5, 5]), vec![true, false, false]);
    }

    #[test]
    fn test_rearms_after_drop() {
        assert_eq!(
            run(BuffCategory::Souls, &[3, 5, 5, 4, 5, 0, 5]),
            vec![false, true, false, false, true, false, true]
        );
    }

    #[test]
    fn test_necrosis_maximum_is_twelve() {
        assert_eq!(
            run(BuffCategory::Necrosis, &[10, 12, 12, 10, 12]),
            vec![false, true, false, false, true]
        );
    }

    #[test]
    fn test_latch_tracks_maximum() {
        let debouncer = AlertDebouncer::new();
        let pinned = debouncer.evaluate(BuffCategory::DeathSparks, 5, 5, true);
        assert_eq!(
            pinned,
            AlertDecision {
                fire: false,
                latch: true
            }
        );

        let dropped = debouncer.evaluate(BuffCategory::DeathSparks, 5, 2, true);
        assert!(!dropped.latch);
        assert!(!dropped.fire);
    }

    #[test]
    fn test_never_fires_below_maximum() {
        assert!(run(BuffCategory::Necrosis, &[2, 4, 6, 8, 10, 0]).iter().all(|f| !f));
    }
}
