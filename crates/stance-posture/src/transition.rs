//! Posture states and the transition table
//!
//! Per-state evaluation only ever produces a [`Signal`]; the table below is
//! the single place where a state changes.

use std::fmt;

use stance_core::{FrameIndex, Joint};

/// Discrete exercise phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostureState {
    /// Measuring arm reach
    #[default]
    Calibrating,
    /// Waiting for the crouch to be reached and held
    Descending,
    /// Crouch held; waiting for both arms to be raised
    Crouched,
    /// Sequence finished
    Complete,
    /// User rose before raising the arms
    Invalid,
}

/// Outcome of evaluating the current state on one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Nothing to act on this frame
    Hold,
    /// Calibration window elapsed
    CalibrationComplete,
    /// Crouch predicate confirmed by debounce
    CrouchConfirmed,
    /// Head rose above the crouch tolerance
    RoseEarly,
    /// Arms-raised predicate confirmed by debounce
    ArmsConfirmed,
    /// Terminal state shown for one frame
    Acknowledged,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::Hold,
        Signal::CalibrationComplete,
        Signal::CrouchConfirmed,
        Signal::RoseEarly,
        Signal::ArmsConfirmed,
        Signal::Acknowledged,
    ];
}

/// A state change observed on a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub frame: FrameIndex,
    pub from: PostureState,
    pub to: PostureState,
}

const ARM_AND_HEAD: &[Joint] = &[
    Joint::Head,
    Joint::LeftShoulder,
    Joint::LeftElbow,
    Joint::LeftWrist,
    Joint::RightShoulder,
    Joint::RightElbow,
    Joint::RightWrist,
];

impl PostureState {
    /// Transition table: `None` means stay
    pub fn next(self, signal: Signal) -> Option<PostureState> {
        use PostureState::*;

        match (self, signal) {
            (Calibrating, Signal::CalibrationComplete) => Some(Descending),
            (Descending, Signal::CrouchConfirmed) => Some(Crouched),
            (Crouched, Signal::RoseEarly) => Some(Invalid),
            (Crouched, Signal::ArmsConfirmed) => Some(Complete),
            (Complete, Signal::Acknowledged) => Some(Calibrating),
            (Invalid, Signal::Acknowledged) => Some(Calibrating),
            _ => None,
        }
    }

    /// Whether some signal moves this state straight to `to`
    pub fn can_reach(self, to: PostureState) -> bool {
        Signal::ALL.iter().any(|&signal| self.next(signal) == Some(to))
    }

    /// Joints that must be present to evaluate this state
    pub fn required_joints(self) -> &'static [Joint] {
        match self {
            PostureState::Calibrating | PostureState::Crouched => ARM_AND_HEAD,
            PostureState::Descending => &[Joint::Head],
            PostureState::Complete | PostureState::Invalid => &[],
        }
    }

    /// Message shown to the user while in this state
    pub fn prompt(self) -> &'static str {
        match self {
            PostureState::Calibrating => "Capturing your reach. Please wait",
            PostureState::Descending => "Crouch down to the marked position",
            PostureState::Crouched => "Raise both arms straight up",
            PostureState::Complete => "Exercise complete",
            PostureState::Invalid => "ERROR: start again",
        }
    }

    /// End of a cycle; the next evaluation restarts calibration
    pub fn is_terminal(self) -> bool {
        matches!(self, PostureState::Complete | PostureState::Invalid)
    }
}

impl fmt::Display for PostureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PostureState::Calibrating => "calibrating",
            PostureState::Descending => "descending",
            PostureState::Crouched => "crouched",
            PostureState::Complete => "complete",
            PostureState::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const STATES: [PostureState; 5] = [
        PostureState::Calibrating,
        PostureState::Descending,
        PostureState::Crouched,
        PostureState::Complete,
        PostureState::Invalid,
    ];

    const SIGNALS: [Signal; 6] = Signal::ALL;

    #[test]
    fn test_transition_table() {
        let mut edges = Vec::new();
        for state in STATES {
            for signal in SIGNALS {
                if let Some(to) = state.next(signal) {
                    edges.push((state, signal, to));
                }
            }
        }

        assert_eq!(
            edges,
            vec![
                (
                    PostureState::Calibrating,
                    Signal::CalibrationComplete,
                    PostureState::Descending
                ),
                (
                    PostureState::Descending,
                    Signal::CrouchConfirmed,
                    PostureState::Crouched
                ),
                (
                    PostureState::Crouched,
                    Signal::RoseEarly,
                    PostureState::Invalid
                ),
                (
                    PostureState::Crouched,
                    Signal::ArmsConfirmed,
                    PostureState::Complete
                ),
                (
                    PostureState::Complete,
                    Signal::Acknowledged,
                    PostureState::Calibrating
                ),
                (
                    PostureState::Invalid,
                    Signal::Acknowledged,
                    PostureState::Calibrating
                ),
            ]
        );
    }

    #[test]
    fn test_can_reach() {
        assert!(PostureState::Crouched.can_reach(PostureState::Invalid));
        assert!(PostureState::Invalid.can_reach(PostureState::Calibrating));
        assert!(!PostureState::Calibrating.can_reach(PostureState::Crouched));
        assert!(!PostureState::Descending.can_reach(PostureState::Descending));
    }

    #[test]
    fn test_hold_never_moves() {
        for state in STATES {
            assert_eq!(state.next(Signal::Hold), None);
        }
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(PostureState::default(), PostureState::Calibrating);
        assert!(!PostureState::Calibrating.is_terminal());
        assert!(PostureState::Invalid.is_terminal());
    }

    #[test]
    fn test_required_joints() {
        assert!(PostureState::Complete.required_joints().is_empty());
        assert_eq!(PostureState::Descending.required_joints(), &[Joint::Head]);
        assert!(PostureState::Crouched
            .required_joints()
            .contains(&Joint::RightWrist));
    }

    #[test]
    fn test_prompts_are_distinct() {
        let prompts: HashSet<&str> = STATES.iter().map(|s| s.prompt()).collect();
        assert_eq!(prompts.len(), STATES.len());
    }
}
