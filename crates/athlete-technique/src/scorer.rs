//! Synthetic per-joint accuracy scores for the reference animation.
//!
//! These numbers are deterministic noise seeded from each joint's identifier
//! and modulated over time. They do not measure anything; they give the
//! reference panel plausible, slowly drifting readouts.

use serde::{Deserialize, Serialize};

use athlete_core::{round_half_up, JointName, Sport};

use crate::profile::ScoreBand;

/// Lowest per-joint score
pub const MIN_JOINT_SCORE: u8 = 35;

/// Highest per-joint score
pub const MAX_JOINT_SCORE: u8 = 98;

/// A joint tracked by the scorer, with its share of the overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringJoint {
    pub joint: JointName,
    pub label: &'static str,
    pub weight: f64,
}

/// One scored joint at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointScore {
    pub joint: JointName,
    pub label: String,
    pub weight: f64,
    pub score: u8,
}

impl JointScore {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomechanicalScorer {
    sport: Sport,
    joints: &'static [ScoringJoint],
}

impl BiomechanicalScorer {
    pub fn for_sport(sport: Sport) -> Self {
        let joints: &'static [ScoringJoint] = match sport {
            Sport::Cricket => CRICKET,
            Sport::Football => FOOTBALL,
            Sport::Badminton => BADMINTON,
        };
        Self { sport, joints }
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn joints(&self) -> &'static [ScoringJoint] {
        self.joints
    }

    /// Score of a joint at time `t`, in `[35, 98]`
    /// Non-finite `t` scores as `t = 0`
    pub fn joint_score(joint: JointName, t: f64) -> u8 {
        let t = if t.is_finite() { t } else { 0.0 };
        let id = joint.id();
        let first = id.bytes().next().map_or(0, u32::from);
        let seed = id.len() as u32 * 17 + first * 3;

        let base = 62.0 + f64::from(seed % 28);
        let wave = (t * 2.1 + f64::from(seed) * 0.7).sin() * 12.0;
        round_half_up(base + wave).clamp(f64::from(MIN_JOINT_SCORE), f64::from(MAX_JOINT_SCORE)) as u8
    }

    pub fn scores(&self, t: f64) -> Vec<JointScore> {
        self.joints
            .iter()
            .map(|j| JointScore {
                joint: j.joint,
                label: j.label.to_string(),
                weight: j.weight,
                score: Self::joint_score(j.joint, t),
            })
            .collect()
    }

    /// Weighted mean of a score set, rounded
    pub fn overall_of(scores: &[JointScore]) -> u8 {
        let total_weight: f64 = scores.iter().map(|s| s.weight).sum();
        if total_weight <= 0.0 {
            return 0;
        }
        let weighted: f64 = scores.iter().map(|s| f64::from(s.score) * s.weight).sum();
        round_half_up(weighted / total_weight) as u8
    }

    pub fn overall(&self, t: f64) -> u8 {
        Self::overall_of(&self.scores(t))
    }
}

const fn joint(joint: JointName, label: &'static str, weight: f64) -> ScoringJoint {
    ScoringJoint { joint, label, weight }
}

static CRICKET: &[ScoringJoint] = &[
    joint(JointName::RShoulder, "Bowling Shoulder", 0.22),
    joint(JointName::RElbow, "Elbow Extension", 0.20),
    joint(JointName::RWrist, "Wrist at Release", 0.18),
    joint(JointName::LKnee, "Front Knee Angle", 0.22),
    joint(JointName::Pelvis, "Hip Rotation", 0.18),
];

static FOOTBALL: &[ScoringJoint] = &[
    joint(JointName::RKnee, "Knee Drive", 0.24),
    joint(JointName::RHip, "Hip Flexion", 0.20),
    joint(JointName::RAnkle, "Foot Contact", 0.20),
    joint(JointName::Pelvis, "Body Lean", 0.18),
    joint(JointName::RElbow, "Arm Swing", 0.18),
];

static BADMINTON: &[ScoringJoint] = &[
    joint(JointName::RShoulder, "Shoulder Rotation", 0.22),
    joint(JointName::RElbow, "Elbow Extension", 0.22),
    joint(JointName::RWrist, "Wrist Snap", 0.18),
    joint(JointName::Pelvis, "Jump Height", 0.20),
    joint(JointName::LKnee, "Landing Balance", 0.18),
];
