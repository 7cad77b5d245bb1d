//! Joints - Skeleton landmarks as delivered by the depth sensor
//!
//! Positions are in sensor world units (metres), Y pointing up,
//! Z pointing away from the sensor.

/// Joint identifier for the sensor skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Joint {
    // Torso
    HipCenter,
    Spine,
    ShoulderCenter,
    Head,

    // Left arm
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHand,

    // Right arm
    RightShoulder,
    RightElbow,
    RightWrist,
    RightHand,

    // Left leg
    LeftHip,
    LeftKnee,
    LeftAnkle,
    LeftFoot,

    // Right leg
    RightHip,
    RightKnee,
    RightAnkle,
    RightFoot,
}

impl Joint {
    pub const COUNT: usize = 20;

    /// All joints in order
    pub fn all() -> &'static [Joint] {
        &[
            Joint::HipCenter,
            Joint::Spine,
            Joint::ShoulderCenter,
            Joint::Head,
            Joint::LeftShoulder,
            Joint::LeftElbow,
            Joint::LeftWrist,
            Joint::LeftHand,
            Joint::RightShoulder,
            Joint::RightElbow,
            Joint::RightWrist,
            Joint::RightHand,
            Joint::LeftHip,
            Joint::LeftKnee,
            Joint::LeftAnkle,
            Joint::LeftFoot,
            Joint::RightHip,
            Joint::RightKnee,
            Joint::RightAnkle,
            Joint::RightFoot,
        ]
    }

    /// Number of joints
    pub fn count() -> usize {
        Self::COUNT
    }

    /// Body side, `None` for the center line
    pub fn side(self) -> Option<Side> {
        match self {
            Joint::HipCenter | Joint::Spine | Joint::ShoulderCenter | Joint::Head => None,
            Joint::LeftShoulder
            | Joint::LeftElbow
            | Joint::LeftWrist
            | Joint::LeftHand
            | Joint::LeftHip
            | Joint::LeftKnee
            | Joint::LeftAnkle
            | Joint::LeftFoot => Some(Side::Left),
            _ => Some(Side::Right),
        }
    }
}

/// Left or right half of the body, from the user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first
    pub fn both() -> [Side; 2] {
        [Side::Left, Side::Right]
    }

    pub fn shoulder(self) -> Joint {
        match self {
            Side::Left => Joint::LeftShoulder,
            Side::Right => Joint::RightShoulder,
        }
    }

    pub fn elbow(self) -> Joint {
        match self {
            Side::Left => Joint::LeftElbow,
            Side::Right => Joint::RightElbow,
        }
    }

    pub fn wrist(self) -> Joint {
        match self {
            Side::Left => Joint::LeftWrist,
            Side::Right => Joint::RightWrist,
        }
    }

    /// Shoulder, elbow and wrist of this side
    pub fn arm(self) -> [Joint; 3] {
        [self.shoulder(), self.elbow(), self.wrist()]
    }
}

/// How confident the sensor is about a joint position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TrackingConfidence {
    /// No position available; the sensor reports a placeholder
    #[default]
    NotTracked,
    /// Position estimated from neighbouring joints
    Inferred,
    /// Position directly observed
    Tracked,
}

/// 3D position in sensor world units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position3D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Same position moved along the vertical axis
    pub fn raised(&self, dy: f32) -> Position3D {
        Position3D {
            x: self.x,
            y: self.y + dy,
            z: self.z,
        }
    }

    /// Componentwise offset
    pub fn offset(&self, dx: f32, dy: f32, dz: f32) -> Position3D {
        Position3D {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One joint observation within a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSample {
    pub joint: Joint,
    pub position: Position3D,
    pub confidence: TrackingConfidence,
}

impl JointSample {
    pub fn new(joint: Joint, position: Position3D, confidence: TrackingConfidence) -> Self {
        Self {
            joint,
            position,
            confidence,
        }
    }

    /// Fully tracked sample
    pub fn tracked(joint: Joint, position: Position3D) -> Self {
        Self::new(joint, position, TrackingConfidence::Tracked)
    }

    pub fn is_tracked(&self) -> bool {
        self.confidence == TrackingConfidence::Tracked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_count() {
        assert_eq!(Joint::all().len(), Joint::count());
    }

    #[test]
    fn test_side_arm_joints() {
        assert_eq!(
            Side::Left.arm(),
            [Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist]
        );
        for side in Side::both() {
            for joint in side.arm() {
                assert_eq!(joint.side(), Some(side));
            }
        }
        assert_eq!(Joint::Head.side(), None);
    }

    #[test]
    fn test_position_distance() {
        let a = Position3D::new(0.0, 0.0, 0.0);
        let b = Position3D::new(3.0, 4.0, 12.0);

        assert!((a.distance(&b) - 13.0).abs() < 1e-5);
        assert!((b.distance(&a) - 13.0).abs() < 1e-5);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_position_raised() {
        let p = Position3D::new(0.2, 1.4, 2.0).raised(0.45);
        assert!((p.y - 1.85).abs() < 1e-5);
        assert_eq!(p.x, 0.2);
        assert_eq!(p.z, 2.0);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(TrackingConfidence::Tracked > TrackingConfidence::Inferred);
        assert!(TrackingConfidence::Inferred > TrackingConfidence::NotTracked);
        assert!(!JointSample::new(
            Joint::Head,
            Position3D::zero(),
            TrackingConfidence::Inferred
        )
        .is_tracked());
    }

    proptest::proptest! {
        #[test]
        fn prop_distance_is_symmetric(
            ax in -3.0f32..3.0, ay in -3.0f32..3.0, az in 0.5f32..4.0,
            bx in -3.0f32..3.0, by in -3.0f32..3.0, bz in 0.5f32..4.0,
        ) {
            let a = Position3D::new(ax, ay, az);
            let b = Position3D::new(bx, by, bz);
            proptest::prop_assert!((a.distance(&b) - b.distance(&a)).abs() < 1e-6);
            proptest::prop_assert!(a.distance(&b) >= 0.0);
        }
    }
}
