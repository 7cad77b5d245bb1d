//! Posture session - one user, one exercise, frame by frame
//!
//! The session owns every piece of per-cycle state: the calibrator, both
//! debounces, the reference head heights and the current posture. Each
//! frame evaluates exactly one state, turns the result into a [`Signal`]
//! and applies it through the transition table.

use stance_core::{FrameIndex, FrameSnapshot, StanceError, StanceResult};
use tracing::{info, trace};

use crate::guidance::{arms_guidance, crouch_guidance};
use crate::predicates::{self, crouch_reached, rose_early};
use crate::{
    CalibrationProfile, CalibrationStep, Calibrator, Debounce, DebounceStep, GuidancePoint,
    GuidanceStatus, PostureConfig, PostureState, Signal, Transition,
};

/// Everything produced by one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub frame: FrameIndex,
    /// Posture after this frame
    pub state: PostureState,
    /// State change made on this frame, if any
    pub transition: Option<Transition>,
    /// Markers for the renderer
    pub guidance: Vec<GuidancePoint>,
}

impl FrameOutcome {
    pub fn prompt(&self) -> &'static str {
        self.state.prompt()
    }
}

/// Exercise session state
#[derive(Debug, Clone)]
pub struct PostureSession {
    config: PostureConfig,
    state: PostureState,
    calibrator: Calibrator,
    crouch: Debounce,
    arms: Debounce,
    /// Head height on the first calibration frame
    head_at_start: Option<f32>,
    /// Head height when the confirmed crouch run began
    head_at_crouch: Option<f32>,
    last_frame: Option<FrameIndex>,
}

impl PostureSession {
    /// Create a session with the default configuration
    pub fn new() -> Self {
        Self::build(PostureConfig::default())
    }

    /// Create a session with a custom configuration
    pub fn with_config(config: PostureConfig) -> StanceResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PostureConfig) -> Self {
        PostureSession {
            state: PostureState::Calibrating,
            calibrator: Calibrator::new(config.calibration_window, config.require_tracked),
            crouch: Debounce::new(config.confirm_frames),
            arms: Debounce::new(config.confirm_frames),
            head_at_start: None,
            head_at_crouch: None,
            last_frame: None,
            config,
        }
    }

    /// Evaluate one frame
    ///
    /// Malformed input is rejected before any state is touched.
    pub fn on_frame(&mut self, frame: &FrameSnapshot) -> StanceResult<FrameOutcome> {
        let index = frame.index();
        if let Some(previous) = self.last_frame {
            if index < previous {
                return Err(StanceError::FrameRegressed {
                    previous,
                    current: index,
                });
            }
        }
        for &joint in self.state.required_joints() {
            frame.require(joint)?;
        }
        self.last_frame = Some(index);

        let signal = match self.state {
            PostureState::Calibrating => self.calibrate(frame)?,
            PostureState::Descending => self.descend(frame)?,
            PostureState::Crouched => self.hold_crouch(frame)?,
            PostureState::Complete | PostureState::Invalid => Signal::Acknowledged,
        };
        let transition = self.apply(signal, index);

        trace!(frame = %index, state = %self.state, ?signal, "frame evaluated");

        Ok(FrameOutcome {
            frame: index,
            state: self.state,
            transition,
            guidance: self.guidance(frame),
        })
    }

    fn calibrate(&mut self, frame: &FrameSnapshot) -> StanceResult<Signal> {
        let (head_y, _) = predicates::head(frame, &self.config)?;
        let step = self.calibrator.observe(frame)?;
        self.head_at_start.get_or_insert(head_y);

        Ok(match step {
            CalibrationStep::Measuring => Signal::Hold,
            CalibrationStep::Complete => Signal::CalibrationComplete,
        })
    }

    fn descend(&mut self, frame: &FrameSnapshot) -> StanceResult<Signal> {
        let (head_y, usable) = predicates::head(frame, &self.config)?;
        let Some(head_at_start) = self.head_at_start else {
            return Ok(Signal::Hold);
        };

        let holds =
            usable && crouch_reached(head_at_start, head_y, self.config.crouch_drop_threshold);

        Ok(match self.crouch.observe(frame.index(), holds) {
            DebounceStep::Armed => {
                self.head_at_crouch = Some(head_y);
                Signal::Hold
            }
            DebounceStep::Confirmed => Signal::CrouchConfirmed,
            DebounceStep::Idle | DebounceStep::Holding | DebounceStep::Reset => Signal::Hold,
        })
    }

    fn hold_crouch(&mut self, frame: &FrameSnapshot) -> StanceResult<Signal> {
        let (head_y, usable) = predicates::head(frame, &self.config)?;
        let raised = predicates::arms_raised(frame, &self.config)?;

        if let Some(head_at_crouch) = self.head_at_crouch {
            if usable && rose_early(head_at_crouch, head_y, self.config.rise_tolerance) {
                return Ok(Signal::RoseEarly);
            }
        }

        Ok(match self.arms.observe(frame.index(), raised) {
            DebounceStep::Confirmed => Signal::ArmsConfirmed,
            _ => Signal::Hold,
        })
    }

    fn apply(&mut self, signal: Signal, frame: FrameIndex) -> Option<Transition> {
        let to = self.state.next(signal)?;
        let from = self.state;

        match to {
            PostureState::Descending => {
                let profile = self.calibrator.profile();
                info!(
                    %frame,
                    window = self.calibrator.window(),
                    left_elbow = profile.left.shoulder_elbow,
                    left_wrist = profile.left.shoulder_wrist,
                    right_elbow = profile.right.shoulder_elbow,
                    right_wrist = profile.right.shoulder_wrist,
                    "calibration complete"
                );
            }
            PostureState::Calibrating => self.reset_cycle(),
            _ => {}
        }

        info!(%frame, %from, %to, "posture transition");
        self.state = to;

        Some(Transition { frame, from, to })
    }

    fn guidance(&self, frame: &FrameSnapshot) -> Vec<GuidancePoint> {
        match self.state {
            PostureState::Descending => self
                .head_at_start
                .and_then(|head_at_start| {
                    crouch_guidance(
                        frame,
                        head_at_start,
                        self.config.guidance_drop_distance,
                        GuidanceStatus::from_armed(self.crouch.is_armed()),
                    )
                })
                .into_iter()
                .collect(),
            PostureState::Crouched => arms_guidance(
                frame,
                self.calibrator.profile(),
                GuidanceStatus::from_armed(self.arms.is_armed()),
            ),
            _ => Vec::new(),
        }
    }

    fn reset_cycle(&mut self) {
        self.calibrator.reset();
        self.crouch.clear();
        self.arms.clear();
        self.head_at_start = None;
        self.head_at_crouch = None;
    }

    /// Abandon the current cycle and start calibrating again
    pub fn reset(&mut self) {
        if self.state != PostureState::Calibrating {
            info!(from = %self.state, "session reset");
        }
        self.reset_cycle();
        self.state = PostureState::Calibrating;
    }

    pub fn state(&self) -> PostureState {
        self.state
    }

    pub fn profile(&self) -> &CalibrationProfile {
        self.calibrator.profile()
    }

    pub fn calibration_start(&self) -> Option<FrameIndex> {
        self.calibrator.start()
    }

    pub fn head_at_start(&self) -> Option<f32> {
        self.head_at_start
    }

    pub fn head_at_crouch(&self) -> Option<f32> {
        self.head_at_crouch
    }

    pub fn config(&self) -> &PostureConfig {
        &self.config
    }

    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.last_frame
    }
}

impl Default for PostureSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stance_core::{Joint, JointSample, Position3D, Side, TrackingConfidence};

    const STANDING_HEAD: f32 = 1.70;
    const SHOULDER_Y: f32 = 1.40;

    #[derive(Clone, Copy)]
    enum Arms {
        Down,
        Up,
    }

    /// Minimal skeleton: head plus both arms at reach 0.25 / 0.45
    fn frame(index: u64, head_drop: f32, arms: Arms) -> FrameSnapshot {
        let shoulder_y = SHOULDER_Y - head_drop;
        let mut samples = vec![JointSample::tracked(
            Joint::Head,
            Position3D::new(0.0, STANDING_HEAD - head_drop, 2.0),
        )];
        for (side, x) in [(Side::Left, -0.2f32), (Side::Right, 0.2)] {
            let (elbow_dy, wrist_dy) = match arms {
                Arms::Down => (-0.25, -0.45),
                Arms::Up => (0.25, 0.45),
            };
            samples.push(JointSample::tracked(
                side.shoulder(),
                Position3D::new(x, shoulder_y, 2.0),
            ));
            samples.push(JointSample::tracked(
                side.elbow(),
                Position3D::new(x, shoulder_y + elbow_dy, 2.0),
            ));
            samples.push(JointSample::tracked(
                side.wrist(),
                Position3D::new(x, shoulder_y + wrist_dy, 2.0),
            ));
        }
        FrameSnapshot::new(FrameIndex::new(index), samples).unwrap()
    }

    /// Session calibrated over frames [0, 240) and moved to Descending at 240
    fn descending_session() -> PostureSession {
        let mut session = PostureSession::new();
        for i in 0..=240 {
            session.on_frame(&frame(i, 0.0, Arms::Down)).unwrap();
        }
        assert_eq!(session.state(), PostureState::Descending);
        session
    }

    /// Session crouched with the crouch run anchored at 241, confirmed at 272
    fn crouched_session() -> PostureSession {
        let mut session = descending_session();
        for i in 241..=272 {
            session.on_frame(&frame(i, 0.35, Arms::Down)).unwrap();
        }
        assert_eq!(session.state(), PostureState::Crouched);
        session
    }

    #[test]
    fn test_window_boundary() {
        let mut session = PostureSession::new();

        for i in 100..340 {
            let outcome = session.on_frame(&frame(i, 0.0, Arms::Down)).unwrap();
            assert_eq!(outcome.state, PostureState::Calibrating, "frame {i}");
            assert!(outcome.transition.is_none());
        }

        let outcome = session.on_frame(&frame(340, 0.0, Arms::Down)).unwrap();
        assert_eq!(outcome.state, PostureState::Descending);
        assert_eq!(
            outcome.transition,
            Some(Transition {
                frame: FrameIndex::new(340),
                from: PostureState::Calibrating,
                to: PostureState::Descending,
            })
        );
        assert_eq!(session.calibration_start(), Some(FrameIndex::new(100)));
    }

    #[test]
    fn test_head_at_start_is_write_once() {
        let mut session = PostureSession::new();
        session.on_frame(&frame(0, 0.0, Arms::Down)).unwrap();
        session.on_frame(&frame(1, 0.1, Arms::Down)).unwrap();

        assert_eq!(session.head_at_start(), Some(STANDING_HEAD));
    }

    #[test]
    fn test_calibration_measures_both_sides() {
        let session = descending_session();
        let profile = session.profile();

        for side in Side::both() {
            assert!((profile.side(side).shoulder_elbow - 0.25).abs() < 1e-5);
            assert!((profile.side(side).shoulder_wrist - 0.45).abs() < 1e-5);
        }
    }

    #[test]
    fn test_crouch_run_broken_before_confirmation() {
        let mut session = descending_session();

        for i in 500..=529 {
            session.on_frame(&frame(i, 0.35, Arms::Down)).unwrap();
        }
        let outcome = session.on_frame(&frame(530, 0.0, Arms::Down)).unwrap();

        assert_eq!(outcome.state, PostureState::Descending);
        assert!(outcome.transition.is_none());
    }

    #[test]
    fn test_crouch_confirms_exactly_once() {
        let mut session = descending_session();
        let mut transitions = Vec::new();

        for i in 500..=531 {
            let outcome = session.on_frame(&frame(i, 0.35, Arms::Down)).unwrap();
            transitions.extend(outcome.transition);
        }

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].frame, FrameIndex::new(531));
        assert_eq!(transitions[0].to, PostureState::Crouched);
        assert!((session.head_at_crouch().unwrap() - (STANDING_HEAD - 0.35)).abs() < 1e-5);
    }

    #[test]
    fn test_rise_violation_is_immediate() {
        let mut session = crouched_session();

        // Arms already on their way up: the rise still wins
        for i in 273..=280 {
            session.on_frame(&frame(i, 0.35, Arms::Up)).unwrap();
        }
        let outcome = session.on_frame(&frame(281, 0.20, Arms::Up)).unwrap();

        assert_eq!(outcome.state, PostureState::Invalid);
        assert_eq!(outcome.prompt(), "ERROR: start again");
        assert!(outcome.guidance.is_empty());

        let outcome = session.on_frame(&frame(282, 0.0, Arms::Down)).unwrap();
        assert_eq!(outcome.state, PostureState::Calibrating);
        assert!(session.profile().is_empty());
        assert_eq!(session.head_at_start(), None);
    }

    #[test]
    fn test_small_rise_is_tolerated() {
        let mut session = crouched_session();
        let outcome = session.on_frame(&frame(273, 0.27, Arms::Down)).unwrap();
        assert_eq!(outcome.state, PostureState::Crouched);
    }

    #[test]
    fn test_full_cycle() {
        let mut session = PostureSession::new();
        let mut index = 0u64;
        let mut next = |session: &mut PostureSession, drop: f32, arms: Arms| {
            let outcome = session.on_frame(&frame(index, drop, arms)).unwrap();
            index += 1;
            outcome
        };

        for _ in 0..240 {
            assert_eq!(
                next(&mut session, 0.0, Arms::Down).state,
                PostureState::Calibrating
            );
        }

        // First dropped frame closes the window, the second arms the crouch.
        // Confirmation needs `frame > anchor + 30`, i.e. the 31st frame after
        // the anchor, so the crouch lands on the 33rd dropped frame.
        let mut crouched_at = None;
        for n in 1..=35 {
            if next(&mut session, 0.35, Arms::Down).transition.is_some()
                && session.state() == PostureState::Crouched
            {
                crouched_at = Some(n);
            }
        }
        assert_eq!(crouched_at, Some(33));

        let mut complete_at = None;
        for n in 1..=35 {
            let outcome = next(&mut session, 0.35, Arms::Up);
            if outcome.state == PostureState::Complete {
                complete_at = Some(n);
                break;
            }
        }
        // Armed on the first raised frame, confirmed 31 frames later, which
        // is the 32nd raised frame
        assert_eq!(complete_at, Some(32));
        assert_eq!(session.state().prompt(), "Exercise complete");

        let outcome = next(&mut session, 0.0, Arms::Down);
        assert_eq!(outcome.state, PostureState::Calibrating);
    }

    #[test]
    fn test_same_frame_twice_in_calibration() {
        let mut session = PostureSession::new();
        let snapshot = frame(10, 0.0, Arms::Down);

        session.on_frame(&snapshot).unwrap();
        let profile = *session.profile();
        session.on_frame(&snapshot).unwrap();

        assert_eq!(*session.profile(), profile);
    }

    #[test]
    fn test_guidance_per_state() {
        let mut session = PostureSession::new();
        let outcome = session.on_frame(&frame(0, 0.0, Arms::Down)).unwrap();
        assert!(outcome.guidance.is_empty());

        let mut session = descending_session();
        let outcome = session.on_frame(&frame(241, 0.1, Arms::Down)).unwrap();
        assert_eq!(outcome.guidance.len(), 1);
        assert_eq!(outcome.guidance[0].status, GuidanceStatus::Provisional);
        assert!((outcome.guidance[0].position.y - (STANDING_HEAD - 0.30)).abs() < 1e-5);

        let outcome = session.on_frame(&frame(242, 0.35, Arms::Down)).unwrap();
        assert_eq!(outcome.guidance[0].status, GuidanceStatus::Confirmed);

        let mut session = crouched_session();
        let outcome = session.on_frame(&frame(273, 0.35, Arms::Down)).unwrap();
        assert_eq!(outcome.guidance.len(), 4);
        assert!(outcome
            .guidance
            .iter()
            .all(|p| p.status == GuidanceStatus::Provisional));

        let outcome = session.on_frame(&frame(274, 0.35, Arms::Up)).unwrap();
        assert!(outcome
            .guidance
            .iter()
            .all(|p| p.status == GuidanceStatus::Confirmed));
    }

    #[test]
    fn test_guidance_drop_is_independent_of_crouch_threshold() {
        let config = PostureConfig::default().with_guidance_drop_distance(0.6);
        let mut session = PostureSession::with_config(config).unwrap();
        for i in 0..=240 {
            session.on_frame(&frame(i, 0.0, Arms::Down)).unwrap();
        }
        assert_eq!(session.state(), PostureState::Descending);

        let outcome = session.on_frame(&frame(241, 0.35, Arms::Down)).unwrap();
        assert_eq!(outcome.guidance.len(), 1);
        assert!((outcome.guidance[0].position.y - (STANDING_HEAD - 0.6)).abs() < 1e-5);

        // 0.35 is short of the marker but past the 0.30 crouch threshold
        for i in 242..=272 {
            session.on_frame(&frame(i, 0.35, Arms::Down)).unwrap();
        }
        assert_eq!(session.state(), PostureState::Crouched);
    }

    #[test]
    fn test_frame_regression_rejected() {
        let mut session = PostureSession::new();
        session.on_frame(&frame(10, 0.0, Arms::Down)).unwrap();

        let err = session.on_frame(&frame(9, 0.0, Arms::Down)).unwrap_err();
        assert_eq!(
            err,
            StanceError::FrameRegressed {
                previous: FrameIndex::new(10),
                current: FrameIndex::new(9),
            }
        );
        assert_eq!(session.last_frame(), Some(FrameIndex::new(10)));
    }

    #[test]
    fn test_missing_joint_rejected_without_side_effects() {
        let mut session = PostureSession::new();
        let partial = FrameSnapshot::new(
            FrameIndex::new(0),
            vec![JointSample::tracked(
                Joint::Head,
                Position3D::new(0.0, STANDING_HEAD, 2.0),
            )],
        )
        .unwrap();

        assert!(matches!(
            session.on_frame(&partial),
            Err(StanceError::MissingJoint { .. })
        ));
        assert_eq!(session.head_at_start(), None);
        assert_eq!(session.last_frame(), None);
    }

    #[test]
    fn test_inferred_head_cannot_arm_crouch_when_strict() {
        let config = PostureConfig::default().with_require_tracked(true);
        let mut session = PostureSession::with_config(config).unwrap();
        for i in 0..=240 {
            session.on_frame(&frame(i, 0.0, Arms::Down)).unwrap();
        }

        for i in 241..=300 {
            let snapshot = frame(i, 0.35, Arms::Down);
            let samples = snapshot
                .samples()
                .iter()
                .map(|s| match s.joint {
                    Joint::Head => {
                        JointSample::new(s.joint, s.position, TrackingConfidence::Inferred)
                    }
                    _ => *s,
                })
                .collect();
            let snapshot = FrameSnapshot::new(snapshot.index(), samples).unwrap();
            session.on_frame(&snapshot).unwrap();
        }

        assert_eq!(session.state(), PostureState::Descending);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PostureConfig::default().with_calibration_window(0);
        assert!(PostureSession::with_config(config).is_err());
    }

    #[test]
    fn test_manual_reset() {
        let mut session = crouched_session();
        session.reset();

        assert_eq!(session.state(), PostureState::Calibrating);
        assert!(session.profile().is_empty());
        assert_eq!(session.head_at_crouch(), None);

        // Calibration restarts on the next frame
        session.on_frame(&frame(300, 0.0, Arms::Down)).unwrap();
        assert_eq!(session.calibration_start(), Some(FrameIndex::new(300)));
    }
}
