//! Fundamental types for the athlete motion engine.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// 2D position in drawing-surface or source-frame pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }

    /// Vector from `self` to `other`
    pub fn vector_to(&self, other: &Self) -> Vector2<f64> {
        other.to_nalgebra() - self.to_nalgebra()
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        self.vector_to(other).norm()
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Offset by `length` along the direction `(dx, dy)`
    pub fn offset(&self, dx: f64, dy: f64, length: f64) -> Self {
        Self::new(self.x + dx * length, self.y + dy * length)
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Sports with an authored reference motion and technique table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    #[default]
    Cricket,
    Football,
    Badminton,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Cricket, Sport::Football, Sport::Badminton];

    pub fn id(&self) -> &'static str {
        match self {
            Sport::Cricket => "cricket",
            Sport::Football => "football",
            Sport::Badminton => "badminton",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Sport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownSport(s.to_string()))
    }
}

/// The 16 joints of the reference stickman
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum JointName {
    Head = 0,
    Neck = 1,
    Chest = 2,
    Pelvis = 3,
    RShoulder = 4,
    LShoulder = 5,
    RElbow = 6,
    LElbow = 7,
    RWrist = 8,
    LWrist = 9,
    RHip = 10,
    LHip = 11,
    RKnee = 12,
    LKnee = 13,
    RAnkle = 14,
    LAnkle = 15,
}

impl JointName {
    pub const COUNT: usize = 16;

    pub const ALL: [JointName; Self::COUNT] = [
        JointName::Head,
        JointName::Neck,
        JointName::Chest,
        JointName::Pelvis,
        JointName::RShoulder,
        JointName::LShoulder,
        JointName::RElbow,
        JointName::LElbow,
        JointName::RWrist,
        JointName::LWrist,
        JointName::RHip,
        JointName::LHip,
        JointName::RKnee,
        JointName::LKnee,
        JointName::RAnkle,
        JointName::LAnkle,
    ];

    /// Stable camelCase identifier, e.g. `rShoulder`
    pub fn id(&self) -> &'static str {
        match self {
            JointName::Head => "head",
            JointName::Neck => "neck",
            JointName::Chest => "chest",
            JointName::Pelvis => "pelvis",
            JointName::RShoulder => "rShoulder",
            JointName::LShoulder => "lShoulder",
            JointName::RElbow => "rElbow",
            JointName::LElbow => "lElbow",
            JointName::RWrist => "rWrist",
            JointName::LWrist => "lWrist",
            JointName::RHip => "rHip",
            JointName::LHip => "lHip",
            JointName::RKnee => "rKnee",
            JointName::LKnee => "lKnee",
            JointName::RAnkle => "rAnkle",
            JointName::LAnkle => "lAnkle",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// World position of every stickman joint, indexed by [`JointName`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointMap {
    positions: [Point2D; JointName::COUNT],
}

impl JointMap {
    pub fn from_fn(mut f: impl FnMut(JointName) -> Point2D) -> Self {
        let mut positions = [Point2D::origin(); JointName::COUNT];
        for joint in JointName::ALL {
            positions[joint.index()] = f(joint);
        }
        Self { positions }
    }

    pub fn get(&self, joint: JointName) -> Point2D {
        self.positions[joint.index()]
    }

    pub fn set(&mut self, joint: JointName, position: Point2D) {
        self.positions[joint.index()] = position;
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, Point2D)> + '_ {
        JointName::ALL.into_iter().map(|j| (j, self.positions[j.index()]))
    }

    /// Map into destination drawing-surface coordinates
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::from_fn(|j| self.get(j).scaled(sx, sy))
    }

    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(Point2D::is_finite)
    }
}

impl std::ops::Index<JointName> for JointMap {
    type Output = Point2D;

    fn index(&self, joint: JointName) -> &Point2D {
        &self.positions[joint.index()]
    }
}

/// 17-joint skeletal keypoint definition (COCO format)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Keypoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl Keypoint {
    pub const COUNT: usize = 17;

    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Bones drawn over the source video (the face is reduced to nose→shoulders)
    pub fn overlay_pairs() -> &'static [(Keypoint, Keypoint)] {
        &[
            (Keypoint::Nose, Keypoint::LeftShoulder),
            (Keypoint::Nose, Keypoint::RightShoulder),
            (Keypoint::LeftShoulder, Keypoint::RightShoulder),
            (Keypoint::LeftShoulder, Keypoint::LeftElbow),
            (Keypoint::LeftElbow, Keypoint::LeftWrist),
            (Keypoint::RightShoulder, Keypoint::RightElbow),
            (Keypoint::RightElbow, Keypoint::RightWrist),
            (Keypoint::LeftShoulder, Keypoint::LeftHip),
            (Keypoint::RightShoulder, Keypoint::RightHip),
            (Keypoint::LeftHip, Keypoint::RightHip),
            (Keypoint::LeftHip, Keypoint::LeftKnee),
            (Keypoint::LeftKnee, Keypoint::LeftAnkle),
            (Keypoint::RightHip, Keypoint::RightKnee),
            (Keypoint::RightKnee, Keypoint::RightAnkle),
        ]
    }
}

/// Keypoint detection with confidence score, in source-frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedKeypoint {
    pub position: Point2D,
    pub confidence: f32,
}

impl DetectedKeypoint {
    pub fn new(x: f64, y: f64, confidence: f32) -> Self {
        Self {
            position: Point2D::new(x, y),
            confidence,
        }
    }
}

/// Size of the frame the detector ran on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

impl FrameSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}

/// One detection cycle's worth of keypoints, indexed by [`Keypoint`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeypointFrame {
    pub keypoints: Vec<DetectedKeypoint>,
    pub source: FrameSize,
}

impl KeypointFrame {
    pub fn new(keypoints: Vec<DetectedKeypoint>, source: FrameSize) -> Self {
        Self { keypoints, source }
    }

    /// Whether the frame carries the full 17-point layout
    pub fn is_complete(&self) -> bool {
        self.keypoints.len() >= Keypoint::COUNT
    }

    pub fn get(&self, keypoint: Keypoint) -> Option<&DetectedKeypoint> {
        self.keypoints.get(keypoint.index())
    }

    /// Position of `keypoint` if it was detected with at least `min_confidence`
    pub fn usable(&self, keypoint: Keypoint, min_confidence: f32) -> Option<Point2D> {
        self.get(keypoint)
            .filter(|kp| kp.confidence >= min_confidence)
            .map(|kp| kp.position)
    }

    pub fn usable_count(&self, min_confidence: f32) -> usize {
        self.keypoints
            .iter()
            .filter(|kp| kp.confidence >= min_confidence)
            .count()
    }

    fn scale_to(&self, target: FrameSize) -> Option<(f64, f64)> {
        if self.source.width <= 0.0 || self.source.height <= 0.0 {
            return None;
        }
        Some((target.width / self.source.width, target.height / self.source.height))
    }

    /// Confident keypoints mapped from source pixels onto a `target` surface
    pub fn overlay_points(&self, target: FrameSize, min_confidence: f32) -> Vec<Point2D> {
        let Some((sx, sy)) = self.scale_to(target) else {
            return Vec::new();
        };

        self.keypoints
            .iter()
            .take(Keypoint::COUNT)
            .filter(|kp| kp.confidence >= min_confidence)
            .map(|kp| kp.position.scaled(sx, sy))
            .collect()
    }

    /// Overlay bones mapped from source pixels onto a `target` surface
    pub fn overlay_segments(&self, target: FrameSize, min_confidence: f32) -> Vec<(Point2D, Point2D)> {
        let Some((sx, sy)) = self.scale_to(target) else {
            return Vec::new();
        };

        Keypoint::overlay_pairs()
            .iter()
            .filter_map(|&(a, b)| {
                let a = self.usable(a, min_confidence)?;
                let b = self.usable(b, min_confidence)?;
                Some((a.scaled(sx, sy), b.scaled(sx, sy)))
            })
            .collect()
    }
}
