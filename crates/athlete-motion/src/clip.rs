//! Animation clips and the built-in per-sport reference motions.
//!
//! Reference motions are declarative tables: adding a sport means adding a
//! table, not code. Each authored cycle closes by wrapping from its last
//! keyframe back to the first, so the tables never repeat the opening pose
//! at phase 1.0.

use serde::{Deserialize, Serialize};

use athlete_core::{JointAngles, Point2D, PoseParameters, Result, Sport};

use crate::keyframe::{Keyframe, KeyframeTrack};

/// Phase increment per tick of the compact procedural stickman, radians
pub const PROCEDURAL_SPEED: f64 = 0.032;

/// A complete reference motion: identity, pacing and keyframes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub sport: Sport,
    /// Display name of the motion, e.g. "Bowling Action"
    pub name: String,
    /// CSS-style hex color used for the skeleton
    pub color: String,
    /// Phase advanced per animation tick
    pub speed: f64,
    pub track: KeyframeTrack,
}

impl AnimationClip {
    /// Built-in reference motion for `sport`
    pub fn for_sport(sport: Sport) -> Result<Self> {
        let table = ClipTable::for_sport(sport);
        let keyframes = table.keyframes.iter().map(KeyframeRow::to_keyframe).collect();

        Ok(Self {
            sport,
            name: table.name.to_string(),
            color: table.color.to_string(),
            speed: table.speed,
            track: KeyframeTrack::new(keyframes)?,
        })
    }

    /// Load an authored clip from JSON; the track is validated while parsing
    pub fn from_json(json: &str) -> Result<Self> {
        let clip: AnimationClip = serde_json::from_str(json)?;
        if !(clip.speed.is_finite() && clip.speed > 0.0) {
            return Err(athlete_core::Error::Config(format!(
                "clip `{}` has non-positive speed {}",
                clip.name, clip.speed
            )));
        }
        tracing::debug!(sport = %clip.sport, keyframes = clip.track.len(), "loaded clip `{}`", clip.name);
        Ok(clip)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One authored keyframe: phase, label, pelvis, trunk, `[rS, rE, lS, lE, rH, rK, lH, lK]`
struct KeyframeRow {
    t: f64,
    label: &'static str,
    pelvis: (f64, f64),
    trunk: f64,
    angles: [f64; 8],
}

impl KeyframeRow {
    fn to_keyframe(&self) -> Keyframe {
        Keyframe::new(
            self.t,
            self.label,
            PoseParameters::new(
                Point2D::new(self.pelvis.0, self.pelvis.1),
                self.trunk,
                JointAngles::from_array(self.angles),
            ),
        )
    }
}

struct ClipTable {
    name: &'static str,
    color: &'static str,
    speed: f64,
    keyframes: &'static [KeyframeRow],
}

impl ClipTable {
    fn for_sport(sport: Sport) -> &'static ClipTable {
        match sport {
            Sport::Cricket => &CRICKET,
            Sport::Football => &FOOTBALL,
            Sport::Badminton => &BADMINTON,
        }
    }
}

macro_rules! kf {
    ($t:expr, $label:expr, ($px:expr, $py:expr), $trunk:expr, [$($a:expr),* $(,)?]) => {
        KeyframeRow { t: $t, label: $label, pelvis: ($px, $py), trunk: $trunk, angles: [$($a),*] }
    };
}

/// Right-arm fast-bowling action, side view
static CRICKET: ClipTable = ClipTable {
    name: "Bowling Action",
    color: "#00e5a0",
    speed: 0.0055,
    keyframes: &[
        kf!(0.00, "Run-up", (108.0, 224.0), -0.22, [2.05, 0.50, -0.80, 0.70, 1.10, 0.45, 2.00, 0.55]),
        kf!(0.14, "Bound", (122.0, 210.0), -0.05, [2.45, 0.30, -1.40, 0.20, 1.55, 0.90, 1.60, 0.80]),
        kf!(0.28, "Back foot", (138.0, 225.0), 0.28, [2.80, 0.85, -2.00, 0.15, 1.55, 0.20, 1.20, 0.55]),
        kf!(0.42, "Front drive", (150.0, 225.0), 0.12, [-0.25, 0.60, -1.10, 0.45, 1.57, 0.20, 1.70, 0.65]),
        kf!(0.57, "Rotation", (158.0, 228.0), -0.10, [-0.10, 0.20, 0.80, 0.50, 1.50, 0.25, 1.85, 0.18]),
        kf!(0.72, "Release", (162.0, 229.0), -0.38, [-1.30, 0.08, 1.40, 0.38, 1.38, 0.35, 1.90, 0.10]),
        kf!(0.87, "Follow-through", (165.0, 232.0), -0.50, [0.35, 0.35, 2.30, 0.50, 1.68, 0.50, 1.92, 0.35]),
    ],
};

/// Right-foot penalty kick, side view
static FOOTBALL: ClipTable = ClipTable {
    name: "Sprint & Kick",
    color: "#a78bfa",
    speed: 0.0060,
    keyframes: &[
        kf!(0.00, "Approach", (110.0, 222.0), -0.18, [2.00, 0.50, -0.80, 0.40, 1.10, 0.40, 2.00, 0.50]),
        kf!(0.14, "Plant foot", (130.0, 222.0), -0.14, [0.18, 0.40, -0.22, 0.35, 1.57, 0.22, 1.57, 0.18]),
        kf!(0.28, "Backswing", (140.0, 222.0), -0.08, [0.24, 0.30, -0.12, 0.30, 1.05, 1.05, 1.57, 0.22]),
        kf!(0.43, "Knee drive", (148.0, 222.0), -0.20, [-0.18, 0.40, 0.12, 0.30, 2.20, 0.32, 1.52, 0.28]),
        kf!(0.57, "Contact", (155.0, 225.0), -0.30, [-0.32, 0.40, 0.22, 0.35, 2.05, 0.08, 1.52, 0.28]),
        kf!(0.72, "Follow-through", (158.0, 225.0), -0.40, [-0.45, 0.35, 0.32, 0.38, 2.50, 0.05, 1.45, 0.38]),
        kf!(0.87, "Landing", (162.0, 226.0), -0.18, [0.02, 0.40, 0.06, 0.35, 2.15, 0.32, 1.50, 0.20]),
    ],
};

/// Right-handed overhead smash, profile
static BADMINTON: ClipTable = ClipTable {
    name: "Overhead Smash",
    color: "#fbbf24",
    speed: 0.0048,
    keyframes: &[
        kf!(0.00, "Ready", (140.0, 228.0), 0.00, [1.45, 0.80, -0.14, 0.50, 1.62, 0.20, 1.52, 0.22]),
        kf!(0.14, "Racket prep", (140.0, 220.0), 0.15, [-0.22, 1.25, -0.32, 0.40, 1.58, 0.35, 1.55, 0.28]),
        kf!(0.28, "Jump", (140.0, 200.0), -0.10, [-0.38, 1.05, -1.57, 0.28, 1.25, 0.90, 2.00, 0.18]),
        kf!(0.43, "Airborne", (140.0, 172.0), -0.30, [-0.62, 1.35, -1.50, 0.38, 1.18, 0.70, 2.05, 0.65]),
        kf!(0.57, "Contact", (140.0, 178.0), -0.35, [-1.55, 0.05, -0.32, 0.48, 1.28, 0.52, 1.85, 0.60]),
        kf!(0.72, "Follow-through", (140.0, 200.0), -0.08, [0.08, 0.42, 0.22, 0.45, 1.62, 0.22, 1.55, 0.28]),
        kf!(0.87, "Landing", (140.0, 220.0), 0.10, [0.22, 0.50, 0.18, 0.42, 1.57, 0.52, 1.57, 0.55]),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_clips_validate() {
        for sport in Sport::ALL {
            let clip = AnimationClip::for_sport(sport).unwrap();
            assert_eq!(clip.sport, sport);
            assert_eq!(clip.track.len(), 7);
            assert!(clip.speed > 0.0);
        }
    }

    #[test]
    fn test_cricket_release_is_authored_pose() {
        let clip = AnimationClip::for_sport(Sport::Cricket).unwrap();
        let pose = clip.track.pose_at(0.72);

        assert_eq!(clip.track.label_at(0.72), "Release");
        assert_eq!(
            pose.angles,
            JointAngles {
                r_shoulder: -1.30,
                r_elbow: 0.08,
                l_shoulder: 1.40,
                l_elbow: 0.38,
                r_hip: 1.38,
                r_knee: 0.35,
                l_hip: 1.90,
                l_knee: 0.10,
            }
        );
        assert_eq!(pose.pelvis, Point2D::new(162.0, 229.0));
        assert_eq!(pose.trunk_angle, -0.38);
    }

    #[test]
    fn test_wrap_returns_to_opening_pose() {
        let clip = AnimationClip::for_sport(Sport::Badminton).unwrap();
        let opening = clip.track.keyframes()[0].pose;
        let almost = clip.track.pose_at(0.999_999);
        assert!((almost.pelvis.y - opening.pelvis.y).abs() < 1e-6);
        assert_eq!(clip.track.label_at(0.95), "Landing");
    }

    #[test]
    fn test_json_roundtrip_and_validation() {
        let clip = AnimationClip::for_sport(Sport::Football).unwrap();
        let json = clip.to_json().unwrap();
        let parsed = AnimationClip::from_json(&json).unwrap();
        assert_eq!(parsed, clip);

        let broken = json.replace("\"speed\": 0.006", "\"speed\": -1.0");
        assert!(AnimationClip::from_json(&broken).is_err());
    }
}
