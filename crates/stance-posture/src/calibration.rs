//! Arm reach calibration
//!
//! For a fixed number of frames after calibration begins, the longest
//! shoulder-elbow and shoulder-wrist distances seen on each side are kept.
//! Once the window has elapsed the profile is frozen as-is; a user who never
//! stretched an arm during the window simply gets a short reach.

use stance_core::{FrameIndex, FrameSnapshot, Side, StanceResult};

/// Measured reach of one arm
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideReach {
    pub shoulder_elbow: f32,
    pub shoulder_wrist: f32,
}

impl SideReach {
    pub fn new(shoulder_elbow: f32, shoulder_wrist: f32) -> Self {
        Self {
            shoulder_elbow,
            shoulder_wrist,
        }
    }

    /// Keep the larger of the stored and observed distances
    fn absorb(&mut self, shoulder_elbow: Option<f32>, shoulder_wrist: Option<f32>) {
        if let Some(d) = shoulder_elbow {
            self.shoulder_elbow = self.shoulder_elbow.max(d);
        }
        if let Some(d) = shoulder_wrist {
            self.shoulder_wrist = self.shoulder_wrist.max(d);
        }
    }
}

/// Calibrated reach of both arms
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationProfile {
    pub left: SideReach,
    pub right: SideReach,
}

impl CalibrationProfile {
    pub fn side(&self, side: Side) -> SideReach {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideReach {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// True until at least one distance has been recorded
    pub fn is_empty(&self) -> bool {
        *self == CalibrationProfile::default()
    }
}

/// Result of feeding one frame to the calibrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStep {
    /// Frame was inside the window and has been measured
    Measuring,
    /// Window has elapsed; the profile is final
    Complete,
}

/// Windowed running-maximum reach measurement
#[derive(Debug, Clone)]
pub struct Calibrator {
    /// Window length in frames
    window: u64,
    /// Ignore segments whose joints are only inferred
    require_tracked: bool,
    /// Frame calibration began on
    start: Option<FrameIndex>,
    profile: CalibrationProfile,
}

impl Calibrator {
    pub fn new(window: u64, require_tracked: bool) -> Self {
        Calibrator {
            window,
            require_tracked,
            start: None,
            profile: CalibrationProfile::default(),
        }
    }

    /// Measure one frame. The first frame fed starts the window.
    ///
    /// Nothing is modified if a required arm joint is missing.
    pub fn observe(&mut self, frame: &FrameSnapshot) -> StanceResult<CalibrationStep> {
        let start = self.start.unwrap_or(frame.index());
        if frame.index() >= start + self.window {
            return Ok(CalibrationStep::Complete);
        }

        let mut measured = [(None, None); 2];
        for (slot, side) in measured.iter_mut().zip(Side::both()) {
            *slot = self.measure(frame, side)?;
        }

        self.start = Some(start);
        for ((shoulder_elbow, shoulder_wrist), side) in measured.into_iter().zip(Side::both()) {
            self.profile
                .side_mut(side)
                .absorb(shoulder_elbow, shoulder_wrist);
        }

        Ok(CalibrationStep::Measuring)
    }

    fn measure(
        &self,
        frame: &FrameSnapshot,
        side: Side,
    ) -> StanceResult<(Option<f32>, Option<f32>)> {
        let shoulder = frame.require(side.shoulder())?;
        let elbow = frame.require(side.elbow())?;
        let wrist = frame.require(side.wrist())?;

        let usable = |a: bool, b: bool| !self.require_tracked || (a && b);

        let shoulder_elbow = usable(shoulder.is_tracked(), elbow.is_tracked())
            .then(|| elbow.position.distance(&shoulder.position));
        let shoulder_wrist = usable(shoulder.is_tracked(), wrist.is_tracked())
            .then(|| wrist.position.distance(&shoulder.position));

        Ok((shoulder_elbow, shoulder_wrist))
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Frame the window started on, once measuring has begun
    pub fn start(&self) -> Option<FrameIndex> {
        self.start
    }

    pub fn window(&self) -> u64 {
        self.window
    }

    /// Forget the window and all measurements
    pub fn reset(&mut self) {
        self.start = None;
        self.profile = CalibrationProfile::default();
    }
}
