//! Declarative per-sport technique tables.
//!
//! Every sport is classified by the same evaluator over a static table:
//!
//! - a **style ladder**: first rung whose condition holds names the style
//! - **tag rules**: first matching branch emits a tag; rules without a
//!   fallback are bonuses that emit nothing when unmatched
//! - **note rules**: quote the measured value with a pass or fail remark
//! - **score terms**: each contributes `points × quality` where quality is in
//!   `[0, 1]`; the points left over out of 100 are a flat baseline
//!
//! Supporting a new sport means adding a table, not code.

use athlete_core::{round_half_up, Sport};

use crate::angles::JointAngleSet;
use crate::profile::{StyleProfile, TechniqueNote, TechniqueTag, Verdict, MAX_TECHNIQUE_SCORE, MIN_TECHNIQUE_SCORE};

/// A scalar read off a [`JointAngleSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    RightElbow,
    LeftElbow,
    RightKnee,
    LeftKnee,
    RightShoulder,
    TrunkLean,
    /// Magnitude of the trunk lean, either direction
    TrunkLeanMagnitude,
    /// The more flexed knee
    MinKnee,
}

impl Measure {
    pub fn read(&self, angles: &JointAngleSet) -> i32 {
        match self {
            Measure::RightElbow => angles.r_elbow,
            Measure::LeftElbow => angles.l_elbow,
            Measure::RightKnee => angles.r_knee,
            Measure::LeftKnee => angles.l_knee,
            Measure::RightShoulder => angles.r_shoulder,
            Measure::TrunkLean => angles.trunk_lean,
            Measure::TrunkLeanMagnitude => angles.trunk_lean.abs(),
            Measure::MinKnee => angles.min_knee(),
        }
    }
}

/// Strict threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Above(Measure, i32),
    Below(Measure, i32),
}

impl Cond {
    pub fn holds(&self, angles: &JointAngleSet) -> bool {
        match *self {
            Cond::Above(m, limit) => m.read(angles) > limit,
            Cond::Below(m, limit) => m.read(angles) < limit,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StyleRung {
    pub when: Cond,
    pub style: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct StyleLadder {
    pub rungs: &'static [StyleRung],
    pub fallback: &'static str,
}

impl StyleLadder {
    pub fn style(&self, angles: &JointAngleSet) -> &'static str {
        self.rungs
            .iter()
            .find(|rung| rung.when.holds(angles))
            .map_or(self.fallback, |rung| rung.style)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TagOutcome {
    pub label: &'static str,
    pub verdict: Verdict,
}

impl TagOutcome {
    fn to_tag(self) -> TechniqueTag {
        TechniqueTag {
            label: self.label.to_string(),
            verdict: self.verdict,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TagBranch {
    pub when: Cond,
    pub outcome: TagOutcome,
}

#[derive(Debug, Clone, Copy)]
pub struct TagRule {
    pub branches: &'static [TagBranch],
    /// `None` makes this a bonus tag
    pub otherwise: Option<TagOutcome>,
}

impl TagRule {
    pub fn evaluate(&self, angles: &JointAngleSet) -> Option<TechniqueTag> {
        self.branches
            .iter()
            .find(|branch| branch.when.holds(angles))
            .map(|branch| branch.outcome)
            .or(self.otherwise)
            .map(TagOutcome::to_tag)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NoteRule {
    pub icon: &'static str,
    /// Quoted before the value, e.g. "Front knee"
    pub name: &'static str,
    pub measure: Measure,
    pub when: Cond,
    pub pass: &'static str,
    pub fail: &'static str,
}

impl NoteRule {
    pub fn evaluate(&self, angles: &JointAngleSet) -> TechniqueNote {
        let remark = if self.when.holds(angles) { self.pass } else { self.fail };
        TechniqueNote {
            icon: self.icon.to_string(),
            text: format!("{} {}° — {}", self.name, self.measure.read(angles), remark),
        }
    }
}

/// How well one measure meets its target, in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quality {
    /// `min(value / full, 1)`
    Ratio { measure: Measure, full: f64 },
    /// `1` when the condition holds, `otherwise` when it does not
    Step { when: Cond, otherwise: f64 },
    /// `max(0, 1 − value / limit)`: rewards flexion below `limit`
    Headroom { measure: Measure, limit: f64 },
}

impl Quality {
    pub fn evaluate(&self, angles: &JointAngleSet) -> f64 {
        match *self {
            Quality::Ratio { measure, full } => (f64::from(measure.read(angles)) / full).min(1.0),
            Quality::Step { when, otherwise } => {
                if when.holds(angles) {
                    1.0
                } else {
                    otherwise
                }
            }
            Quality::Headroom { measure, limit } => (1.0 - f64::from(measure.read(angles)) / limit).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTerm {
    /// Share of the 100-point score, e.g. 30.0
    pub points: f64,
    pub quality: Quality,
}

impl ScoreTerm {
    /// Share of the total as a fraction
    pub fn weight(&self) -> f64 {
        self.points / 100.0
    }
}

/// Complete classification rules for one sport
#[derive(Debug, Clone, Copy)]
pub struct TechniqueTable {
    pub sport: Sport,
    pub style: StyleLadder,
    pub tags: &'static [TagRule],
    pub notes: &'static [NoteRule],
    pub score: &'static [ScoreTerm],
}

impl TechniqueTable {
    pub fn for_sport(sport: Sport) -> &'static TechniqueTable {
        match sport {
            Sport::Cricket => &CRICKET,
            Sport::Football => &FOOTBALL,
            Sport::Badminton => &BADMINTON,
        }
    }

    /// Points not allotted to any term
    pub fn baseline(&self) -> f64 {
        (100.0 - self.score.iter().map(|t| t.points).sum::<f64>()).max(0.0)
    }

    /// Composite score, clamped to `[40, 98]`
    pub fn score(&self, angles: &JointAngleSet) -> u8 {
        let earned = self
            .score
            .iter()
            .fold(0.0, |acc, term| acc + term.quality.evaluate(angles) * term.points);
        let raw = round_half_up(earned + self.baseline());
        raw.clamp(f64::from(MIN_TECHNIQUE_SCORE), f64::from(MAX_TECHNIQUE_SCORE)) as u8
    }

    pub fn classify(&self, angles: &JointAngleSet) -> StyleProfile {
        StyleProfile {
            style: self.style.style(angles).to_string(),
            tags: self.tags.iter().filter_map(|rule| rule.evaluate(angles)).collect(),
            notes: self.notes.iter().map(|rule| rule.evaluate(angles)).collect(),
            angles: *angles,
            score: self.score(angles),
        }
    }
}

/// Technique classification for a [`Sport`]
pub trait SportTechnique {
    fn technique(&self) -> &'static TechniqueTable;

    fn classify(&self, angles: &JointAngleSet) -> StyleProfile {
        self.technique().classify(angles)
    }
}

impl SportTechnique for Sport {
    fn technique(&self) -> &'static TechniqueTable {
        TechniqueTable::for_sport(*self)
    }
}

const fn tag(label: &'static str, verdict: Verdict) -> TagOutcome {
    TagOutcome { label, verdict }
}

const fn branch(when: Cond, label: &'static str, verdict: Verdict) -> TagBranch {
    TagBranch {
        when,
        outcome: tag(label, verdict),
    }
}

use Measure::*;
use Verdict::*;

static CRICKET: TechniqueTable = TechniqueTable {
    sport: Sport::Cricket,
    style: StyleLadder {
        rungs: &[
            StyleRung { when: Cond::Above(RightShoulder, 155), style: "High-arm Bowling Action" },
            StyleRung { when: Cond::Above(RightShoulder, 118), style: "Classic Bowling Action" },
        ],
        fallback: "Round-arm Action",
    },
    tags: &[
        TagRule {
            branches: &[
                branch(Cond::Below(TrunkLeanMagnitude, 10), "📐 Side-on Technique", Good),
                branch(Cond::Above(TrunkLean, 20), "🔄 Front-on Technique", Good),
            ],
            otherwise: Some(tag("↔️ Mixed Action", Neutral)),
        },
        TagRule {
            branches: &[branch(Cond::Above(RightElbow, 155), "💪 Legal Arm Extension", Good)],
            otherwise: Some(tag("⚠️ Check Elbow Bend", Bad)),
        },
        TagRule {
            branches: &[branch(Cond::Below(LeftKnee, 145), "🦵 Strong Front-leg Brace", Good)],
            otherwise: Some(tag("🦵 Stiffen Front Leg", Bad)),
        },
        TagRule {
            branches: &[branch(Cond::Above(RightShoulder, 145), "🎯 High Release Point", Good)],
            otherwise: None,
        },
    ],
    notes: &[
        NoteRule {
            icon: "⚡",
            name: "Shoulder",
            measure: RightShoulder,
            when: Cond::Above(RightShoulder, 145),
            pass: "excellent high point",
            fail: "raise arm higher at delivery",
        },
        NoteRule {
            icon: "📐",
            name: "Trunk lean",
            measure: TrunkLean,
            when: Cond::Below(TrunkLeanMagnitude, 12),
            pass: "classic side-on position",
            fail: "rotational drive detected",
        },
        NoteRule {
            icon: "🦵",
            name: "Front knee",
            measure: LeftKnee,
            when: Cond::Below(LeftKnee, 145),
            pass: "good bracing",
            fail: "brace harder for better carry",
        },
    ],
    score: &[
        ScoreTerm { points: 30.0, quality: Quality::Ratio { measure: RightShoulder, full: 165.0 } },
        ScoreTerm { points: 25.0, quality: Quality::Step { when: Cond::Above(RightElbow, 155), otherwise: 0.6 } },
        ScoreTerm { points: 25.0, quality: Quality::Headroom { measure: LeftKnee, limit: 180.0 } },
    ],
};

static FOOTBALL: TechniqueTable = TechniqueTable {
    sport: Sport::Football,
    style: StyleLadder {
        rungs: &[
            StyleRung { when: Cond::Below(RightKnee, 100), style: "Power Strike Technique" },
            StyleRung { when: Cond::Above(TrunkLean, 18), style: "Technical Placement Style" },
        ],
        fallback: "Balanced Kick",
    },
    tags: &[
        TagRule {
            branches: &[branch(Cond::Above(TrunkLean, 18), "📐 Good Forward Lean", Good)],
            otherwise: Some(tag("📐 Stay Over the Ball", Bad)),
        },
        TagRule {
            branches: &[branch(Cond::Below(RightKnee, 115), "🦵 Maximum Knee Lift", Good)],
            otherwise: Some(tag("🦵 Increase Knee Drive", Bad)),
        },
        TagRule {
            branches: &[branch(Cond::Below(RightElbow, 105), "💪 Strong Arm Balance", Good)],
            otherwise: Some(tag("💪 Use Arms More", Neutral)),
        },
        TagRule {
            branches: &[branch(Cond::Below(RightKnee, 90), "⚡ Power Kicker", Good)],
            otherwise: None,
        },
    ],
    notes: &[
        NoteRule {
            icon: "🦵",
            name: "Kicking knee",
            measure: RightKnee,
            when: Cond::Below(RightKnee, 110),
            pass: "max power loaded",
            fail: "pull further back for pace",
        },
        NoteRule {
            icon: "📐",
            name: "Body lean",
            measure: TrunkLean,
            when: Cond::Above(TrunkLean, 18),
            pass: "great forward drive",
            fail: "lean into the kick more",
        },
        NoteRule {
            icon: "💪",
            name: "Arms",
            measure: RightElbow,
            when: Cond::Below(RightElbow, 110),
            pass: "excellent stability",
            fail: "engage arms for balance",
        },
    ],
    score: &[
        ScoreTerm { points: 35.0, quality: Quality::Headroom { measure: RightKnee, limit: 150.0 } },
        ScoreTerm { points: 30.0, quality: Quality::Step { when: Cond::Above(TrunkLean, 15), otherwise: 0.6 } },
        ScoreTerm { points: 20.0, quality: Quality::Step { when: Cond::Below(RightElbow, 110), otherwise: 0.7 } },
    ],
};

static BADMINTON: TechniqueTable = TechniqueTable {
    sport: Sport::Badminton,
    style: StyleLadder {
        rungs: &[
            StyleRung { when: Cond::Above(RightShoulder, 160), style: "Full-Extension Smash" },
            StyleRung { when: Cond::Above(RightShoulder, 130), style: "Controlled Drive Smash" },
        ],
        fallback: "Wrist-Snap Drive",
    },
    tags: &[
        TagRule {
            branches: &[branch(Cond::Above(RightShoulder, 155), "🏸 Full Overhead Extension", Good)],
            otherwise: Some(tag("🏸 Reach Higher", Bad)),
        },
        TagRule {
            branches: &[branch(Cond::Above(RightElbow, 152), "💪 Straight-arm Contact", Good)],
            otherwise: Some(tag("🎯 Wrist-driven Snap", Neutral)),
        },
        TagRule {
            branches: &[branch(Cond::Below(MinKnee, 130), "⬆️ Jump Smash", Good)],
            otherwise: Some(tag("⬆️ Add Jump Power", Bad)),
        },
    ],
    notes: &[
        NoteRule {
            icon: "💥",
            name: "Shoulder",
            measure: RightShoulder,
            when: Cond::Above(RightShoulder, 155),
            pass: "elite arm position",
            fail: "reach higher at contact",
        },
        NoteRule {
            icon: "⚡",
            name: "Elbow",
            measure: RightElbow,
            when: Cond::Above(RightElbow, 155),
            pass: "max racket speed",
            fail: "straighten arm at contact",
        },
        NoteRule {
            icon: "🦵",
            name: "Legs",
            measure: MinKnee,
            when: Cond::Below(MinKnee, 130),
            pass: "explosive base",
            fail: "load legs for jump",
        },
    ],
    score: &[
        ScoreTerm { points: 35.0, quality: Quality::Ratio { measure: RightShoulder, full: 168.0 } },
        ScoreTerm { points: 30.0, quality: Quality::Step { when: Cond::Above(RightElbow, 150), otherwise: 0.7 } },
        ScoreTerm { points: 20.0, quality: Quality::Headroom { measure: MinKnee, limit: 150.0 } },
    ],
};
