//! Threshold predicates evaluated against a single frame
//!
//! Predicates are pure: they read joint positions and return whether the
//! condition holds on this frame. Temporal confirmation lives in
//! [`crate::Debounce`].

use stance_core::{FrameSnapshot, Joint, JointSample, Side, StanceResult};

use crate::{PostureConfig, SideDepth};

/// Head has dropped far enough below its starting height
pub fn crouch_reached(head_at_start: f32, head_y: f32, threshold: f32) -> bool {
    head_at_start - head_y > threshold
}

/// Head has come back up too far while the crouch must be held
pub fn rose_early(head_at_crouch: f32, head_y: f32, tolerance: f32) -> bool {
    head_y > head_at_crouch + tolerance
}

/// Breakdown of the arms-raised checks for one arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmAlignment {
    /// wrist above elbow above shoulder
    pub ordered: bool,
    /// wrist and shoulder horizontally in line with the elbow
    pub plumb: bool,
    /// wrist and shoulder in line with the elbow in depth
    pub level_in_depth: bool,
    /// every joint involved carried tracked confidence
    pub tracked: bool,
}

impl ArmAlignment {
    /// Evaluate one arm
    pub fn evaluate(
        shoulder: &JointSample,
        elbow: &JointSample,
        wrist: &JointSample,
        tolerance: f32,
        depth: SideDepth,
    ) -> Self {
        let (s, e, w) = (shoulder.position, elbow.position, wrist.position);

        ArmAlignment {
            ordered: w.y > e.y && e.y > s.y,
            plumb: (w.x - e.x).abs() < tolerance && (s.x - e.x).abs() < tolerance,
            level_in_depth: (w.z - e.z).abs() < tolerance * depth.wrist_elbow
                && (s.z - e.z).abs() < tolerance * depth.elbow_shoulder,
            tracked: shoulder.is_tracked() && elbow.is_tracked() && wrist.is_tracked(),
        }
    }

    /// Whether this arm counts as raised
    pub fn is_raised(&self, require_tracked: bool) -> bool {
        self.ordered && self.plumb && self.level_in_depth && (self.tracked || !require_tracked)
    }
}

/// Evaluate one arm of a frame
pub fn arm_alignment(
    frame: &FrameSnapshot,
    side: Side,
    config: &PostureConfig,
) -> StanceResult<ArmAlignment> {
    Ok(ArmAlignment::evaluate(
        frame.require(side.shoulder())?,
        frame.require(side.elbow())?,
        frame.require(side.wrist())?,
        config.alignment_tolerance,
        config.depth.side(side),
    ))
}

/// Both arms raised straight overhead on this frame
pub fn arms_raised(frame: &FrameSnapshot, config: &PostureConfig) -> StanceResult<bool> {
    let left = arm_alignment(frame, Side::Left, config)?;
    let right = arm_alignment(frame, Side::Right, config)?;

    Ok(left.is_raised(config.require_tracked) && right.is_raised(config.require_tracked))
}

/// Head sample gated by the confidence requirement
pub(crate) fn head(frame: &FrameSnapshot, config: &PostureConfig) -> StanceResult<(f32, bool)> {
    let head = frame.require(Joint::Head)?;
    Ok((head.position.y, head.is_tracked() || !config.require_tracked))
}
