//! Scripted exercise scenarios
//!
//! A script is a list of poses held for a number of frames. The runner
//! renders each frame through a [`SkeletonBuilder`], optionally passes it
//! through [`SensorJitter`], feeds it to a [`PostureSession`] and records
//! every transition.

use stance_core::{FrameIndex, FrameSnapshot, StanceResult};
use stance_posture::{PostureConfig, PostureSession, PostureState, Transition};
use tracing::debug;

use crate::jitter::{JitterConfig, JitterStats, SensorJitter};
use crate::skeleton::{BodyProportions, Pose, SkeletonBuilder};

/// Head drop used by the canned scripts; clears the default crouch threshold
pub const SCRIPTED_CROUCH: f32 = 0.35;

/// One pose held for a number of frames
#[derive(Clone, Debug, PartialEq)]
pub struct Phase {
    pub name: &'static str,
    pub frames: u64,
    pub pose: Pose,
}

/// Ordered list of phases
#[derive(Clone, Debug, Default)]
pub struct ExerciseScript {
    start: u64,
    phases: Vec<Phase>,
}

impl ExerciseScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// First frame index of the script
    pub fn starting_at(mut self, frame: u64) -> Self {
        self.start = frame;
        self
    }

    /// Append a phase
    pub fn hold(mut self, name: &'static str, frames: u64, pose: Pose) -> Self {
        self.phases.push(Phase { name, frames, pose });
        self
    }

    /// Stand through calibration, crouch, raise both arms, stand up
    pub fn standard(config: &PostureConfig) -> Self {
        let settle = config.confirm_frames + 3;
        Self::new()
            .hold("calibrate", config.calibration_window + 1, Pose::standing())
            .hold("crouch", settle, Pose::crouched(SCRIPTED_CROUCH))
            .hold("raise", settle, Pose::arms_overhead(SCRIPTED_CROUCH))
            .hold("stand", 1, Pose::standing())
    }

    /// Crouch long enough to confirm, then stand straight back up
    pub fn rise_early(config: &PostureConfig) -> Self {
        Self::new()
            .hold("calibrate", config.calibration_window + 1, Pose::standing())
            .hold("crouch", config.confirm_frames + 3, Pose::crouched(SCRIPTED_CROUCH))
            .hold("stand", 2, Pose::standing())
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn start(&self) -> FrameIndex {
        FrameIndex::new(self.start)
    }

    pub fn total_frames(&self) -> u64 {
        self.phases.iter().map(|p| p.frames).sum()
    }

    /// Clean frames in order, one per scripted frame
    pub fn frames<'a>(
        &'a self,
        builder: &'a SkeletonBuilder,
    ) -> impl Iterator<Item = FrameSnapshot> + 'a {
        self.phases
            .iter()
            .flat_map(|phase| std::iter::repeat(phase.pose).take(phase.frames as usize))
            .enumerate()
            .map(move |(offset, pose)| builder.build(self.start() + offset as u64, pose))
    }
}

/// What a scenario run produced
#[derive(Clone, Debug, Default)]
pub struct ScenarioReport {
    pub transitions: Vec<Transition>,
    pub final_state: PostureState,
    /// Frames the session actually saw
    pub frames_evaluated: u64,
    /// Frames lost by the sensor
    pub frames_dropped: u64,
    pub jitter: Option<JitterStats>,
}

impl ScenarioReport {
    /// Target state of every transition, in order
    pub fn states(&self) -> Vec<PostureState> {
        self.transitions.iter().map(|t| t.to).collect()
    }

    pub fn completed(&self) -> usize {
        self.count(PostureState::Complete)
    }

    pub fn invalidated(&self) -> usize {
        self.count(PostureState::Invalid)
    }

    fn count(&self, state: PostureState) -> usize {
        self.transitions.iter().filter(|t| t.to == state).count()
    }

    /// Frame of the first transition into `state`
    pub fn first_entry(&self, state: PostureState) -> Option<FrameIndex> {
        self.transitions
            .iter()
            .find(|t| t.to == state)
            .map(|t| t.frame)
    }
}

/// Drives a session through a script
pub struct ScenarioRunner {
    builder: SkeletonBuilder,
    jitter: Option<SensorJitter>,
}

impl ScenarioRunner {
    /// Clean sensor, default body
    pub fn new() -> Self {
        ScenarioRunner {
            builder: SkeletonBuilder::default(),
            jitter: None,
        }
    }

    pub fn with_body(mut self, body: BodyProportions) -> Self {
        self.builder = SkeletonBuilder::new(body);
        self
    }

    pub fn with_jitter(mut self, config: JitterConfig, seed: u64) -> Self {
        self.jitter = Some(SensorJitter::new(config, seed));
        self
    }

    pub fn builder(&self) -> &SkeletonBuilder {
        &self.builder
    }

    /// Run a script against a session, continuing from its current state
    pub fn run(
        &mut self,
        session: &mut PostureSession,
        script: &ExerciseScript,
    ) -> StanceResult<ScenarioReport> {
        let mut report = ScenarioReport::default();
        if let Some(jitter) = self.jitter.as_mut() {
            jitter.reset_stats();
        }

        for clean in script.frames(&self.builder) {
            let frame = match self.jitter.as_mut() {
                Some(jitter) => match jitter.apply(&clean) {
                    Some(frame) => frame,
                    None => {
                        report.frames_dropped += 1;
                        continue;
                    }
                },
                None => clean,
            };

            let outcome = session.on_frame(&frame)?;
            report.frames_evaluated += 1;
            if let Some(transition) = outcome.transition {
                debug!(frame = %transition.frame, to = %transition.to, "scenario transition");
                report.transitions.push(transition);
            }
        }

        report.final_state = session.state();
        report.jitter = self.jitter.as_ref().map(|j| j.stats().clone());
        Ok(report)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
