//! STANCE Test Harness - Synthetic sensors and exercise scenarios
//!
//! This crate provides:
//! - Synthetic 20-joint skeletons for scripted poses
//! - Seeded sensor jitter (noise, inferred joints, spikes, dropped frames)
//! - Exercise scripts and a runner that records every transition
//! - End-to-end runs over many cycles

pub mod skeleton;
pub mod jitter;
pub mod scenario;
pub mod integration;

pub use skeleton::*;
pub use jitter::*;
pub use scenario::*;
pub use integration::*;
