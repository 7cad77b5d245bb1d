//! Frames - one synchronized skeleton sample per sensor tick
//!
//! The sensor stamps every frame with a monotonically increasing index.
//! All temporal windows in STANCE count frames, never wall-clock time.

use std::collections::HashMap;
use std::fmt;
use std::ops::Add;

use crate::{Joint, JointSample, Position3D, StanceError, StanceResult, TrackingConfidence};

/// Sensor frame index
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    pub const ZERO: FrameIndex = FrameIndex(0);

    #[inline]
    pub fn new(index: u64) -> Self {
        FrameIndex(index)
    }

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Frames elapsed since `earlier` (zero if `earlier` is in the future)
    #[inline]
    pub fn since(self, earlier: FrameIndex) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<u64> for FrameIndex {
    type Output = FrameIndex;

    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        FrameIndex(self.0.saturating_add(rhs))
    }
}

impl fmt::Debug for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// All joint samples of a single frame, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    index: FrameIndex,
    samples: Vec<JointSample>,
}

impl FrameSnapshot {
    /// Build a snapshot, rejecting joints listed more than once
    pub fn new(index: FrameIndex, samples: Vec<JointSample>) -> StanceResult<Self> {
        let mut seen = [false; Joint::COUNT];
        for sample in &samples {
            let slot = &mut seen[sample.joint as usize];
            if *slot {
                return Err(StanceError::DuplicateJoint {
                    joint: sample.joint,
                    frame: index,
                });
            }
            *slot = true;
        }

        Ok(Self { index, samples })
    }

    /// Build a snapshot from a joint map, ordered by joint
    pub fn from_joint_map(
        index: FrameIndex,
        joints: &HashMap<Joint, (Position3D, TrackingConfidence)>,
    ) -> Self {
        let mut samples: Vec<JointSample> = joints
            .iter()
            .map(|(&joint, &(position, confidence))| JointSample::new(joint, position, confidence))
            .collect();
        samples.sort_by_key(|s| s.joint);

        Self { index, samples }
    }

    pub fn index(&self) -> FrameIndex {
        self.index
    }

    pub fn samples(&self) -> &[JointSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Look up a joint sample
    pub fn get(&self, joint: Joint) -> Option<&JointSample> {
        self.samples.iter().find(|s| s.joint == joint)
    }

    /// Look up a joint that must be present with a finite position
    pub fn require(&self, joint: Joint) -> StanceResult<&JointSample> {
        let sample = self.get(joint).ok_or(StanceError::MissingJoint {
            joint,
            frame: self.index,
        })?;

        if !sample.position.is_finite() {
            return Err(StanceError::NonFinitePosition {
                joint,
                frame: self.index,
            });
        }

        Ok(sample)
    }

    /// Position of a required joint
    pub fn position(&self, joint: Joint) -> StanceResult<Position3D> {
        self.require(joint).map(|s| s.position)
    }
}
