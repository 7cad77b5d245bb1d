//! End-to-end exercise runs
//!
//! Helpers that drive a full session over many cycles, plus the
//! cross-module tests that need skeletons, jitter and the session together.

use stance_core::StanceResult;
use stance_posture::{PostureConfig, PostureSession, PostureState, Transition};

use crate::jitter::JitterConfig;
use crate::scenario::{ExerciseScript, ScenarioReport, ScenarioRunner};
use crate::skeleton::Pose;

/// Head drop for noisy runs, well clear of the crouch threshold
pub const DEEP_CROUCH: f32 = 0.45;

/// Calibrate, then crouch and raise with generous hold times
pub fn relaxed_script(config: &PostureConfig) -> ExerciseScript {
    let hold = config.confirm_frames * 2 + 10;
    ExerciseScript::new()
        .hold("calibrate", config.calibration_window + 1, Pose::standing())
        .hold("crouch", hold, Pose::crouched(DEEP_CROUCH))
        .hold("raise", hold, Pose::arms_overhead(DEEP_CROUCH))
        .hold("stand", 1, Pose::standing())
}

/// Run `cycles` back-to-back exercises through one session
///
/// Each cycle after the first starts with a manual reset, so frames left
/// over from the previous cycle never leak into the next calibration.
pub fn run_cycles(
    config: PostureConfig,
    jitter: Option<(JitterConfig, u64)>,
    cycles: usize,
) -> StanceResult<ScenarioReport> {
    let mut session = PostureSession::with_config(config.clone())?;
    let mut runner = match jitter {
        Some((jitter, seed)) => ScenarioRunner::new().with_jitter(jitter, seed),
        None => ScenarioRunner::new(),
    };

    let mut merged = ScenarioReport::default();
    let mut start = 0;
    for cycle in 0..cycles {
        if cycle > 0 {
            session.reset();
        }
        let script = relaxed_script(&config).starting_at(start);
        start += script.total_frames();

        let report = runner.run(&mut session, &script)?;
        merged.transitions.extend(report.transitions);
        merged.frames_evaluated += report.frames_evaluated;
        merged.frames_dropped += report.frames_dropped;
        merged.final_state = report.final_state;
        merged.jitter = report.jitter;
    }

    Ok(merged)
}

/// Every transition is a table edge and picks up where the last one left off
pub fn transitions_are_consistent(transitions: &[Transition]) -> bool {
    let mut state = PostureState::Calibrating;
    let mut last_frame = None;

    for t in transitions {
        if t.from != state || !t.from.can_reach(t.to) {
            return false;
        }
        if last_frame.is_some_and(|f| t.frame < f) {
            return false;
        }
        state = t.to;
        last_frame = Some(t.frame);
    }
    true
}
