//! Closed-form motion for the compact thumbnail stickman.
//!
//! Instead of keyframes, each sport is a set of sine-driven curves over a
//! swing parameter `t` (radians). `sw = sin t` runs backswing → follow-through
//! and `swc = (sw + 1) / 2` remaps it to `[0, 1]` for blending between
//! extreme poses. One full cycle spans `2π`.

use std::f64::consts::PI;

use athlete_core::{JointAngles, Point2D, PoseParameters, Sport};

use crate::clock::PoseSource;

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Sine-driven pose generator for one sport, laid out on a 160×240 canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProceduralMotion {
    pub sport: Sport,
}

impl ProceduralMotion {
    pub fn new(sport: Sport) -> Self {
        Self { sport }
    }

    /// Front-foot drive
    fn cricket(t: f64) -> PoseParameters {
        let sw = t.sin();
        let swc = (sw + 1.0) / 2.0;

        PoseParameters::new(
            Point2D::new(80.0 + 5.0 * sw, 148.0),
            0.12 + 0.08 * swc,
            JointAngles {
                // Top hand sweeps from back-high to front-high
                r_shoulder: lerp(-PI * 0.9, -PI * 0.3, swc),
                r_elbow: lerp(PI * 0.2, -PI * 0.3, swc),
                l_shoulder: lerp(-PI * 0.85, -PI * 0.35, swc),
                l_elbow: lerp(-PI * 0.1, PI * 0.1, swc),
                r_hip: PI * 0.5 + 0.1,
                r_knee: 0.18,
                // Front foot lunges out
                l_hip: PI * 0.5 + 0.35 * swc,
                l_knee: -0.2 * swc,
            },
        )
    }

    /// Penalty kick: left leg planted, right leg swings through
    fn football(t: f64) -> PoseParameters {
        let swc = (t.sin() + 1.0) / 2.0;

        PoseParameters::new(
            Point2D::new(80.0 - 8.0 * swc + 5.0 * (1.0 - swc), 148.0),
            -0.2 * swc + 0.1,
            JointAngles {
                r_shoulder: lerp(-PI * 0.5, -PI * 0.8, swc),
                r_elbow: lerp(0.3, -0.1, swc),
                l_shoulder: lerp(-PI * 0.9, -PI * 0.3, swc),
                l_elbow: lerp(-0.2, 0.3, swc),
                r_hip: PI * 0.5 + lerp(0.55, -0.6, swc),
                r_knee: lerp(-0.6, 0.55, swc),
                l_hip: PI * 0.5 + 0.15,
                l_knee: 0.2,
            },
        )
    }

    /// Jump smash: the pelvis rises and falls over half a swing
    fn badminton(t: f64) -> PoseParameters {
        let swc = (t.sin() + 1.0) / 2.0;
        let lift = (swc * PI).sin();
        let hip = PI * 0.5 + 0.4 - 0.3 * lift;
        let knee = -0.45 + 0.2 * lift;

        PoseParameters::new(
            Point2D::new(80.0, 148.0 - 22.0 * lift),
            lerp(-0.35, 0.25, swc),
            JointAngles {
                r_shoulder: lerp(-PI * 1.1, -PI * 0.05, swc),
                r_elbow: lerp(PI * 0.35, PI * 0.15, swc),
                l_shoulder: lerp(-PI * 0.55, -PI * 0.75, swc),
                l_elbow: lerp(0.4, 0.2, swc),
                r_hip: hip,
                r_knee: knee,
                l_hip: hip,
                l_knee: knee,
            },
        )
    }
}

impl PoseSource for ProceduralMotion {
    fn pose_at(&self, phase: f64) -> PoseParameters {
        match self.sport {
            Sport::Cricket => Self::cricket(phase),
            Sport::Football => Self::football(phase),
            Sport::Badminton => Self::badminton(phase),
        }
    }
}
