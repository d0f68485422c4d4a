// Types and enums for buff tracking
use crate::template_matching::MatchResult;
use std::fmt;
use std::time::Duration;

/// Buff indicators recognized on the game's buff bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuffCategory {
    Souls,
    Necrosis,
    DeathSparks,
}

const SOULS_COUNTS: [u8; 6] = [0, 1, 2, 3, 4, 5];
const NECROSIS_COUNTS: [u8; 7] = [0, 2, 4, 6, 8, 10, 12];
const DEATH_SPARKS_COUNTS: [u8; 6] = [0, 1, 2, 3, 4, 5];

impl BuffCategory {
    /// Stable enumeration order used everywhere categories are iterated
    pub const ALL: [BuffCategory; 3] = [
        BuffCategory::Souls,
        BuffCategory::Necrosis,
        BuffCategory::DeathSparks,
    ];

    /// Ordered list of counts this indicator can show, baseline first
    pub fn valid_counts(self) -> &'static [u8] {
        match self {
            BuffCategory::Souls => &SOULS_COUNTS,
            BuffCategory::Necrosis => &NECROSIS_COUNTS,
            BuffCategory::DeathSparks => &DEATH_SPARKS_COUNTS,
        }
    }

    /// Counts that have recognition templates (everything above baseline)
    pub fn template_counts(self) -> &'static [u8] {
        &self.valid_counts()[1..]
    }

    pub fn baseline(self) -> u8 {
        self.valid_counts()[0]
    }

    pub fn max_count(self) -> u8 {
        self.valid_counts()[self.valid_counts().len() - 1]
    }

    pub fn is_valid_count(self, count: u8) -> bool {
        self.valid_counts().contains(&count)
    }

    /// Visual variants shipped per count, in tie-break order
    pub fn variants(self) -> &'static [TemplateVariant] {
        match self {
            BuffCategory::Souls => &[TemplateVariant::Primary, TemplateVariant::Alt],
            BuffCategory::Necrosis | BuffCategory::DeathSparks => &[TemplateVariant::Primary],
        }
    }

    fn template_stem(self) -> &'static str {
        match self {
            BuffCategory::Souls => "soul",
            BuffCategory::Necrosis => "necrosis",
            BuffCategory::DeathSparks => "deathspark",
        }
    }

    fn icon_stem(self) -> &'static str {
        match self {
            BuffCategory::Souls => "s",
            BuffCategory::Necrosis => "n",
            BuffCategory::DeathSparks => "ds",
        }
    }

    /// e.g. `soul_3_alt.png`
    pub fn template_file_name(self, count: u8, variant: TemplateVariant) -> String {
        format!("{}_{}{}.png", self.template_stem(), count, variant.suffix())
    }

    /// e.g. `n12.png`
    pub fn icon_file_name(self, count: u8) -> String {
        format!("{}{}.png", self.icon_stem(), count)
    }

    /// Sound played when the indicator reaches its maximum, if any
    pub fn alert_sound_file(self) -> Option<&'static str> {
        match self {
            BuffCategory::Souls => Some("soul_alert.wav"),
            BuffCategory::Necrosis => Some("necrosis_alert.wav"),
            BuffCategory::DeathSparks => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BuffCategory::Souls => "souls",
            BuffCategory::Necrosis => "necrosis",
            BuffCategory::DeathSparks => "death sparks",
        }
    }
}

impl fmt::Display for BuffCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateVariant {
    Primary,
    Alt,
}

impl TemplateVariant {
    pub fn suffix(self) -> &'static str {
        match self {
            TemplateVariant::Primary => "",
            TemplateVariant::Alt => "_alt",
        }
    }
}

/// Per-category state carried across cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionState {
    pub count: u8,
    pub alert_latched: bool,
}

impl RecognitionState {
    pub fn baseline(category: BuffCategory) -> Self {
        Self {
            count: category.baseline(),
            alert_latched: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Score of one template against one frame, tagged with what it stands for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch {
    pub count: u8,
    pub variant: TemplateVariant,
    pub result: MatchResult,
}

impl ScoredMatch {
    pub fn confidence(&self) -> f32 {
        self.result.confidence
    }
}

/// Outcome of recognizing one category in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recognition {
    pub category: BuffCategory,
    pub count: u8,
    /// Globally best template match, accepted or not
    pub best: Option<ScoredMatch>,
}

/// Summary of one completed cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based attempt number, skipped cycles included
    pub index: u64,
    pub recognitions: Vec<Recognition>,
    pub alerts: Vec<BuffCategory>,
    pub elapsed: Duration,
}

impl CycleReport {
    pub fn count_of(&self, category: BuffCategory) -> Option<u8> {
        self.recognitions
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tables() {
        assert_eq!(BuffCategory::Souls.max_count(), 5);
        assert_eq!(BuffCategory::Necrosis.max_count(), 12);
        assert_eq!(BuffCategory::DeathSparks.max_count(), 5);
        assert_eq!(BuffCategory::Necrosis.template_counts(), &[2, 4, 6, 8, 10, 12]);
        assert!(!BuffCategory::Necrosis.is_valid_count(3));
        for category in BuffCategory::ALL {
            assert_eq!(category.baseline(), 0);
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            BuffCategory::Souls.template_file_name(3, TemplateVariant::Alt),
            "soul_3_alt.png"
        );
        assert_eq!(
            BuffCategory::Necrosis.template_file_name(12, TemplateVariant::Primary),
            "necrosis_12.png"
        );
        assert_eq!(
            BuffCategory::DeathSparks.template_file_name(1, TemplateVariant::Primary),
            "deathspark_1.png"
        );
        assert_eq!(BuffCategory::DeathSparks.icon_file_name(0), "ds0.png");
        assert_eq!(BuffCategory::Souls.icon_file_name(5), "s5.png");
    }

    #[test]
    fn test_alert_sounds() {
        assert_eq!(BuffCategory::Souls.alert_sound_file(), Some("soul_alert.wav"));
        assert_eq!(BuffCategory::DeathSparks.alert_sound_file(), None);
    }
}
