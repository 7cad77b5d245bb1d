//! Posture configuration
//!
//! All distances are in sensor world units (metres), all windows in frames.

use stance_core::{Side, StanceError, StanceResult};

/// Depth tolerance multipliers for one arm
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SideDepth {
    /// Multiplier for |wrist.z - elbow.z|
    pub wrist_elbow: f32,
    /// Multiplier for |shoulder.z - elbow.z|
    pub elbow_shoulder: f32,
}

impl SideDepth {
    pub fn new(wrist_elbow: f32, elbow_shoulder: f32) -> Self {
        Self {
            wrist_elbow,
            elbow_shoulder,
        }
    }
}

/// Depth tolerance multipliers for both arms
///
/// The default is asymmetric: the right arm allows 3x the tolerance
/// between wrist and elbow, the left arm between elbow and shoulder.
/// `symmetric()` gives both arms the right arm's multipliers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmDepthMultipliers {
    pub left: SideDepth,
    pub right: SideDepth,
}

impl Default for ArmDepthMultipliers {
    fn default() -> Self {
        Self::asymmetric()
    }
}

impl ArmDepthMultipliers {
    /// Default multipliers
    pub fn asymmetric() -> Self {
        ArmDepthMultipliers {
            left: SideDepth::new(1.0, 3.0),
            right: SideDepth::new(3.0, 1.0),
        }
    }

    /// Both arms use the right arm's multipliers
    pub fn symmetric() -> Self {
        ArmDepthMultipliers {
            left: SideDepth::new(3.0, 1.0),
            right: SideDepth::new(3.0, 1.0),
        }
    }

    pub fn side(&self, side: Side) -> SideDepth {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Posture session configuration
#[derive(Clone, Debug, PartialEq)]
pub struct PostureConfig {
    /// Frames spent measuring arm reach
    pub calibration_window: u64,
    /// Frames a predicate must keep holding past its anchor
    pub confirm_frames: u64,
    /// Head drop that counts as crouched
    pub crouch_drop_threshold: f32,
    /// Head drop shown by the guidance marker
    pub guidance_drop_distance: f32,
    /// Head rise above the crouch height that voids the attempt
    pub rise_tolerance: f32,
    /// Base tolerance for the arms-raised alignment checks
    pub alignment_tolerance: f32,
    /// Depth multipliers applied to `alignment_tolerance`
    pub depth: ArmDepthMultipliers,
    /// Only tracked (not inferred) joints may satisfy a predicate
    pub require_tracked: bool,
}

impl Default for PostureConfig {
    fn default() -> Self {
        PostureConfig {
            calibration_window: 240,
            confirm_frames: 30,
            crouch_drop_threshold: 0.30,
            guidance_drop_distance: 0.30,
            rise_tolerance: 0.10,
            alignment_tolerance: 0.125,
            depth: ArmDepthMultipliers::asymmetric(),
            require_tracked: false,
        }
    }
}

impl PostureConfig {
    /// Confidence-gated, symmetric configuration
    pub fn strict() -> Self {
        PostureConfig {
            depth: ArmDepthMultipliers::symmetric(),
            require_tracked: true,
            ..Self::default()
        }
    }

    /// Short windows for demos (about one second of calibration at 30fps)
    pub fn quick() -> Self {
        PostureConfig {
            calibration_window: 30,
            confirm_frames: 8,
            ..Self::default()
        }
    }

    pub fn with_calibration_window(mut self, frames: u64) -> Self {
        self.calibration_window = frames;
        self
    }

    pub fn with_confirm_frames(mut self, frames: u64) -> Self {
        self.confirm_frames = frames;
        self
    }

    pub fn with_alignment_tolerance(mut self, tolerance: f32) -> Self {
        self.alignment_tolerance = tolerance;
        self
    }

    pub fn with_guidance_drop_distance(mut self, distance: f32) -> Self {
        self.guidance_drop_distance = distance;
        self
    }

    pub fn with_depth(mut self, depth: ArmDepthMultipliers) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_require_tracked(mut self, require: bool) -> Self {
        self.require_tracked = require;
        self
    }

    /// Check that windows are non-empty and distances positive
    pub fn validate(&self) -> StanceResult<()> {
        if self.calibration_window == 0 {
            return Err(StanceError::InvalidConfig(
                "calibration_window must be at least one frame".into(),
            ));
        }

        let distances = [
            ("crouch_drop_threshold", self.crouch_drop_threshold),
            ("guidance_drop_distance", self.guidance_drop_distance),
            ("rise_tolerance", self.rise_tolerance),
            ("alignment_tolerance", self.alignment_tolerance),
            ("depth.left.wrist_elbow", self.depth.left.wrist_elbow),
            ("depth.left.elbow_shoulder", self.depth.left.elbow_shoulder),
            ("depth.right.wrist_elbow", self.depth.right.wrist_elbow),
            ("depth.right.elbow_shoulder", self.depth.right.elbow_shoulder),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(StanceError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        Ok(())
    }
}
