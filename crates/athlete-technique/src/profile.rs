//! Technique feedback value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angles::JointAngleSet;

/// Lowest composite technique score reported
pub const MIN_TECHNIQUE_SCORE: u8 = 40;

/// Highest composite technique score reported
pub const MAX_TECHNIQUE_SCORE: u8 = 98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueTag {
    pub label: String,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechniqueNote {
    pub icon: String,
    pub text: String,
}

/// Classified technique for one analyzed frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub style: String,
    pub tags: Vec<TechniqueTag>,
    pub notes: Vec<TechniqueNote>,
    pub angles: JointAngleSet,
    /// Composite score in `[40, 98]`
    pub score: u8,
}

impl StyleProfile {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    pub fn good_tags(&self) -> impl Iterator<Item = &TechniqueTag> + '_ {
        self.tags.iter().filter(|t| t.verdict == Verdict::Good)
    }
}

/// Coarse grading of a 0–100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    NeedsWork,
    MinorDeviation,
    OnTarget,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreBand::OnTarget,
            60..=79 => ScoreBand::MinorDeviation,
            _ => ScoreBand::NeedsWork,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::OnTarget => "On target",
            ScoreBand::MinorDeviation => "Minor deviation",
            ScoreBand::NeedsWork => "Needs work",
        }
    }

    /// Display color as a CSS hex string
    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::OnTarget => "#00e5a0",
            ScoreBand::MinorDeviation => "#fbbf24",
            ScoreBand::NeedsWork => "#f87171",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
