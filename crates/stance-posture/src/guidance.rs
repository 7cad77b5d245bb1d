//! Guidance targets for the renderer
//!
//! Targets are 3D points in sensor space; projecting them to the screen is
//! the renderer's job. A target whose anchor joint is missing or unusable
//! is left out, the same way the renderer skips joints it cannot draw.

use stance_core::{FrameSnapshot, Joint, Position3D, Side};

use crate::CalibrationProfile;

/// Body part a guidance marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuidanceTarget {
    Head,
    LeftElbow,
    LeftWrist,
    RightElbow,
    RightWrist,
}

impl GuidanceTarget {
    fn elbow(side: Side) -> Self {
        match side {
            Side::Left => GuidanceTarget::LeftElbow,
            Side::Right => GuidanceTarget::RightElbow,
        }
    }

    fn wrist(side: Side) -> Self {
        match side {
            Side::Left => GuidanceTarget::LeftWrist,
            Side::Right => GuidanceTarget::RightWrist,
        }
    }
}

/// Whether the user is currently holding the pose this marker asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuidanceStatus {
    /// Pose not reached yet
    Provisional,
    /// Pose reached; waiting for confirmation
    Confirmed,
}

impl GuidanceStatus {
    pub fn from_armed(armed: bool) -> Self {
        if armed {
            GuidanceStatus::Confirmed
        } else {
            GuidanceStatus::Provisional
        }
    }
}

/// One marker to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidancePoint {
    pub target: GuidanceTarget,
    pub position: Position3D,
    pub status: GuidanceStatus,
}

/// Where the head should go: below the starting height, at the live X/Z
pub fn crouch_guidance(
    frame: &FrameSnapshot,
    head_at_start: f32,
    drop_distance: f32,
    status: GuidanceStatus,
) -> Option<GuidancePoint> {
    let head = frame.get(Joint::Head)?.position;
    let position = Position3D::new(head.x, head_at_start - drop_distance, head.z);

    position.is_finite().then_some(GuidancePoint {
        target: GuidanceTarget::Head,
        position,
        status,
    })
}

/// Where elbows and wrists should go: straight above each shoulder at the
/// calibrated reach
pub fn arms_guidance(
    frame: &FrameSnapshot,
    profile: &CalibrationProfile,
    status: GuidanceStatus,
) -> Vec<GuidancePoint> {
    let mut points = Vec::with_capacity(4);

    for side in Side::both() {
        let Some(shoulder) = frame.get(side.shoulder()) else {
            continue;
        };
        if !shoulder.position.is_finite() {
            continue;
        }

        let reach = profile.side(side);
        points.push(GuidancePoint {
            target: GuidanceTarget::elbow(side),
            position: shoulder.position.raised(reach.shoulder_elbow),
            status,
        });
        points.push(GuidancePoint {
            target: GuidanceTarget::wrist(side),
            position: shoulder.position.raised(reach.shoulder_wrist),
            status,
        });
    }

    points
}
