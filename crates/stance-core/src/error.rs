//! Error types for STANCE

use thiserror::Error;

use crate::{FrameIndex, Joint};

/// Core STANCE errors
///
/// These describe malformed input only. A user breaking the exercise
/// sequence is a posture outcome, not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StanceError {
    // Frame errors
    #[error("Joint {joint:?} missing from frame {frame}")]
    MissingJoint { joint: Joint, frame: FrameIndex },

    #[error("Joint {joint:?} has a non-finite position in frame {frame}")]
    NonFinitePosition { joint: Joint, frame: FrameIndex },

    #[error("Joint {joint:?} listed twice in frame {frame}")]
    DuplicateJoint { joint: Joint, frame: FrameIndex },

    #[error("Frame index went backwards: previous {previous}, got {current}")]
    FrameRegressed {
        previous: FrameIndex,
        current: FrameIndex,
    },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for STANCE operations
pub type StanceResult<T> = Result<T, StanceError>;
