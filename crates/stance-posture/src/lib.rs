//! STANCE Posture - Exercise posture classification
//!
//! Turns a stream of skeleton frames into a stable sequence of exercise
//! phases: calibrate arm reach, crouch, raise both arms.
//!
//! # Pipeline
//!
//! Frame → Calibrator (reach window) → predicates → Debounce → transition table
//!
//! A transition only happens after its predicate has held on every frame
//! for longer than the confirmation window, so single-frame sensor jitter
//! cannot move the exercise forward. Rising out of the crouch is the one
//! exception: it voids the attempt on the frame it is seen.

pub mod calibration;
pub mod config;
pub mod debounce;
pub mod guidance;
pub mod predicates;
pub mod session;
pub mod transition;

pub use calibration::*;
pub use config::*;
pub use debounce::*;
pub use guidance::*;
pub use predicates::{arm_alignment, arms_raised, crouch_reached, rose_early, ArmAlignment};
pub use session::*;
pub use transition::*;
