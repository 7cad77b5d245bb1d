//! Synthetic skeletons
//!
//! Builds full 20-joint frames for a small vocabulary of poses so scenarios
//! can be scripted without a sensor.

use std::collections::HashMap;

use stance_core::{FrameIndex, FrameSnapshot, Joint, Position3D, Side, TrackingConfidence};

/// Body measurements of the simulated user (metres)
#[derive(Clone, Debug, PartialEq)]
pub struct BodyProportions {
    /// Head height when standing upright
    pub head_height: f32,
    /// Shoulder height when standing upright
    pub shoulder_height: f32,
    /// Half the distance between the shoulders
    pub shoulder_half_width: f32,
    /// Shoulder to elbow
    pub shoulder_elbow: f32,
    /// Shoulder to wrist
    pub shoulder_wrist: f32,
    pub hip_height: f32,
    pub knee_height: f32,
    pub ankle_height: f32,
    /// Distance from the sensor
    pub depth: f32,
}

impl Default for BodyProportions {
    fn default() -> Self {
        BodyProportions {
            head_height: 1.70,
            shoulder_height: 1.40,
            shoulder_half_width: 0.20,
            shoulder_elbow: 0.25,
            shoulder_wrist: 0.45,
            hip_height: 0.95,
            knee_height: 0.50,
            ankle_height: 0.08,
            depth: 2.20,
        }
    }
}

impl BodyProportions {
    /// A shorter user with shorter arms
    pub fn child() -> Self {
        BodyProportions {
            head_height: 1.30,
            shoulder_height: 1.05,
            shoulder_half_width: 0.15,
            shoulder_elbow: 0.18,
            shoulder_wrist: 0.33,
            hip_height: 0.70,
            knee_height: 0.38,
            ankle_height: 0.06,
            depth: 1.90,
        }
    }
}

/// Arm configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArmPose {
    /// Hanging straight down
    Hanging,
    /// Straight up above the shoulders
    Overhead,
    /// Straight up, wrists tilted towards the sensor by the given amount
    OverheadLeaning { left: f32, right: f32 },
    /// Pointing at the sensor
    Forward,
    /// Horizontal, out to the sides
    Sideways,
}

/// Whole-body pose
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// How far the head is below its standing height
    pub head_drop: f32,
    pub arms: ArmPose,
}

impl Pose {
    pub fn new(head_drop: f32, arms: ArmPose) -> Self {
        Self { head_drop, arms }
    }

    pub fn standing() -> Self {
        Self::new(0.0, ArmPose::Hanging)
    }

    pub fn crouched(head_drop: f32) -> Self {
        Self::new(head_drop, ArmPose::Hanging)
    }

    pub fn arms_overhead(head_drop: f32) -> Self {
        Self::new(head_drop, ArmPose::Overhead)
    }
}

/// Builds frames for a given body
#[derive(Clone, Debug, Default)]
pub struct SkeletonBuilder {
    body: BodyProportions,
}

impl SkeletonBuilder {
    pub fn new(body: BodyProportions) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &BodyProportions {
        &self.body
    }

    /// Every joint, tracked, for the given pose
    pub fn build(&self, index: FrameIndex, pose: Pose) -> FrameSnapshot {
        FrameSnapshot::from_joint_map(index, &self.joints(pose))
    }

    /// Joint map for the given pose
    pub fn joints(&self, pose: Pose) -> HashMap<Joint, (Position3D, TrackingConfidence)> {
        let b = &self.body;
        let drop = pose.head_drop;
        let z = b.depth;
        // Hips sink by most of the drop, knees come forward
        let hip_y = b.hip_height - drop * 0.9;
        let knee_z = z - drop * 0.6;

        let mut joints = HashMap::with_capacity(Joint::COUNT);
        let mut put = |joint: Joint, position: Position3D| {
            joints.insert(joint, (position, TrackingConfidence::Tracked));
        };

        put(Joint::Head, Position3D::new(0.0, b.head_height - drop, z));
        put(
            Joint::ShoulderCenter,
            Position3D::new(0.0, b.shoulder_height - drop, z),
        );
        put(
            Joint::Spine,
            Position3D::new(0.0, (b.shoulder_height + b.hip_height) / 2.0 - drop, z),
        );
        put(Joint::HipCenter, Position3D::new(0.0, hip_y, z));

        for side in Side::both() {
            let sign = match side {
                Side::Left => -1.0,
                Side::Right => 1.0,
            };
            let shoulder_y = b.shoulder_height - drop;
            let shoulder = Position3D::new(sign * b.shoulder_half_width, shoulder_y, z);
            let (elbow, wrist, hand) = self.arm(side, sign, shoulder, pose.arms);

            put(side.shoulder(), shoulder);
            put(side.elbow(), elbow);
            put(side.wrist(), wrist);
            put(hand_of(side), hand);

            let x = sign * b.shoulder_half_width * 0.6;
            let (hip, knee, ankle, foot) = leg_joints(side);
            put(hip, Position3D::new(x, hip_y, z));
            put(knee, Position3D::new(x, b.knee_height, knee_z));
            put(ankle, Position3D::new(x, b.ankle_height, z));
            put(foot, Position3D::new(x, 0.0, z - 0.1));
        }

        joints
    }

    fn arm(
        &self,
        side: Side,
        sign: f32,
        shoulder: Position3D,
        arms: ArmPose,
    ) -> (Position3D, Position3D, Position3D) {
        let (se, sw) = (self.body.shoulder_elbow, self.body.shoulder_wrist);
        let hand = sw + 0.08;

        match arms {
            ArmPose::Hanging => (
                shoulder.raised(-se),
                shoulder.raised(-sw),
                shoulder.raised(-hand),
            ),
            ArmPose::Overhead => (
                shoulder.raised(se),
                shoulder.raised(sw),
                shoulder.raised(hand),
            ),
            ArmPose::OverheadLeaning { left, right } => {
                let lean = match side {
                    Side::Left => left,
                    Side::Right => right,
                };
                (
                    shoulder.raised(se),
                    shoulder.offset(0.0, sw, -lean),
                    shoulder.offset(0.0, hand, -lean),
                )
            }
            ArmPose::Forward => (
                shoulder.offset(0.0, 0.0, -se),
                shoulder.offset(0.0, 0.0, -sw),
                shoulder.offset(0.0, 0.0, -hand),
            ),
            ArmPose::Sideways => (
                shoulder.offset(sign * se, 0.0, 0.0),
                shoulder.offset(sign * sw, 0.0, 0.0),
                shoulder.offset(sign * hand, 0.0, 0.0),
            ),
        }
    }
}

fn hand_of(side: Side) -> Joint {
    match side {
        Side::Left => Joint::LeftHand,
        Side::Right => Joint::RightHand,
    }
}

fn leg_joints(side: Side) -> (Joint, Joint, Joint, Joint) {
    match side {
        Side::Left => (
            Joint::LeftHip,
            Joint::LeftKnee,
            Joint::LeftAnkle,
            Joint::LeftFoot,
        ),
        Side::Right => (
            Joint::RightHip,
            Joint::RightKnee,
            Joint::RightAnkle,
            Joint::RightFoot,
        ),
    }
}
