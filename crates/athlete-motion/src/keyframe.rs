//! Cyclic keyframe interpolation.
//!
//! A track is an ordered list of authored poses anchored at phases in
//! `[0, 1)`. Sampling a global phase wraps it into one cycle, finds the
//! bounding pair of keyframes, eases the local fraction with [`smoothstep`]
//! and blends every pose channel linearly. The segment after the last
//! keyframe wraps back to the first across the 1.0 → 0.0 boundary.
//!
//! Angles are blended in raw radians without shortest-path correction, so a
//! pair of keyframes on either side of ±π sweeps the long way round.

use serde::{Deserialize, Serialize};

use athlete_core::{Error, PoseParameters, Result};

/// Cubic ease-in/ease-out, `f²(3 − 2f)`
pub fn smoothstep(f: f64) -> f64 {
    f * f * (3.0 - 2.0 * f)
}

/// Wrap a global phase into `[0, 1)`; non-finite phases map to 0
pub fn cycle_phase(global_phase: f64) -> f64 {
    if !global_phase.is_finite() {
        return 0.0;
    }
    let cycle = global_phase.rem_euclid(1.0);
    // rem_euclid rounds tiny negative inputs up to exactly 1.0
    if cycle >= 1.0 {
        0.0
    } else {
        cycle
    }
}

/// An authored pose anchored at a normalized phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    #[serde(rename = "t")]
    pub phase: f64,
    pub label: String,
    #[serde(flatten)]
    pub pose: PoseParameters,
}

impl Keyframe {
    pub fn new(phase: f64, label: impl Into<String>, pose: PoseParameters) -> Self {
        Self {
            phase,
            label: label.into(),
            pose,
        }
    }
}

/// Where a phase falls within a track
#[derive(Debug, Clone, Copy, PartialEq)]
struct Location {
    /// Keyframe the segment starts at
    from: usize,
    /// Keyframe the segment ends at
    to: usize,
    /// Un-eased progress through the segment, `None` for a zero-length wrap
    fraction: Option<f64>,
}

/// Validated, immutable list of keyframes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyframeTrack {
    keyframes: Vec<Keyframe>,
}

impl KeyframeTrack {
    /// Build a track, rejecting empty lists, phases outside `[0, 1)`,
    /// non-increasing phases and non-finite pose channels
    pub fn new(keyframes: Vec<Keyframe>) -> Result<Self> {
        if keyframes.is_empty() {
            return Err(Error::InvalidTrack("track has no keyframes".into()));
        }

        for (i, kf) in keyframes.iter().enumerate() {
            if !kf.phase.is_finite() || !(0.0..1.0).contains(&kf.phase) {
                return Err(Error::InvalidTrack(format!(
                    "keyframe {} (`{}`) has phase {} outside [0, 1)",
                    i, kf.label, kf.phase
                )));
            }
            if !kf.pose.is_finite() {
                return Err(Error::InvalidTrack(format!(
                    "keyframe {} (`{}`) has a non-finite pose channel",
                    i, kf.label
                )));
            }
        }

        if let Some(i) = keyframes.windows(2).position(|w| w[1].phase <= w[0].phase) {
            return Err(Error::InvalidTrack(format!(
                "phases must strictly increase: keyframe {} at {} follows {}",
                i + 1,
                keyframes[i + 1].phase,
                keyframes[i].phase
            )));
        }

        Ok(Self { keyframes })
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    fn first(&self) -> &Keyframe {
        &self.keyframes[0]
    }

    fn last(&self) -> &Keyframe {
        &self.keyframes[self.keyframes.len() - 1]
    }

    fn locate(&self, global_phase: f64) -> Location {
        let cycle = cycle_phase(global_phase);

        if let Some(i) = self
            .keyframes
            .windows(2)
            .position(|w| w[0].phase <= cycle && cycle < w[1].phase)
        {
            let (a, b) = (&self.keyframes[i], &self.keyframes[i + 1]);
            return Location {
                from: i,
                to: i + 1,
                fraction: Some((cycle - a.phase) / (b.phase - a.phase)),
            };
        }

        // Wrap segment: last keyframe → first keyframe of the next cycle
        let from = self.keyframes.len() - 1;
        let (last, first) = (self.last(), self.first());
        let segment_length = (1.0 - last.phase) + first.phase;
        if segment_length <= 0.0 {
            return Location {
                from,
                to: 0,
                fraction: None,
            };
        }

        let distance = if cycle >= last.phase {
            cycle - last.phase
        } else {
            cycle + (1.0 - last.phase)
        };

        Location {
            from,
            to: 0,
            fraction: Some((distance / segment_length).clamp(0.0, 1.0)),
        }
    }

    /// Interpolated pose at `global_phase`
    pub fn pose_at(&self, global_phase: f64) -> PoseParameters {
        let location = self.locate(global_phase);
        let from = &self.keyframes[location.from].pose;

        match location.fraction {
            Some(fraction) => from.lerp(&self.keyframes[location.to].pose, smoothstep(fraction)),
            None => *from,
        }
    }

    /// Label of the keyframe the current segment starts at
    pub fn label_at(&self, global_phase: f64) -> &str {
        &self.keyframes[self.locate(global_phase).from].label
    }
}

impl<'de> Deserialize<'de> for KeyframeTrack {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let keyframes = Vec::<Keyframe>::deserialize(deserializer)?;
        KeyframeTrack::new(keyframes).map_err(serde::de::Error::custom)
    }
}
