//! STANCE Core - Fundamental skeleton types
//!
//! This crate defines the types shared by the posture pipeline:
//! - Joints, sides and tracking confidence
//! - 3D positions and joint samples
//! - Frame indices and per-frame snapshots
//! - Error types

pub mod error;
pub mod frame;
pub mod joint;

pub use error::*;
pub use frame::*;
pub use joint::*;
