//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing step transitions
//! inside the conversational flows (reply generation, configuration).

use super::ValidationError;

/// Flow steps with a fixed set of legal moves.
///
/// ```ignore
/// let next = state.step.transition_to(ReplyStep::AwaitingTweetText)?;
/// // ...side effects...
/// state.step = next;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns `target` if the move is legal. Nothing is mutated, so callers
    /// assign the result once their side effects have succeeded.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lamp {
        Off,
        On,
        Broken,
    }

    impl StateMachine for Lamp {
        fn can_transition_to(&self, target: &Self) -> bool {
            use Lamp::*;
            matches!((self, target), (Off, On) | (On, Off) | (On, Broken))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use Lamp::*;
            match self {
                Off => vec![On],
                On => vec![Off, Broken],
                Broken => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(Lamp::Off.transition_to(Lamp::On), Ok(Lamp::On));
    }

    #[test]
    fn transition_to_reports_both_states_on_failure() {
        let err = Lamp::Off.transition_to(Lamp::Broken).unwrap_err();
        assert_eq!(err.field(), "state_transition");
        assert!(err.to_string().contains("Off"));
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn broken_is_terminal() {
        assert!(Lamp::Broken.is_terminal());
        assert!(!Lamp::On.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in [Lamp::Off, Lamp::On, Lamp::Broken] {
            for target in state.valid_transitions() {
                assert!(state.can_transition_to(&target), "{state:?} -> {target:?}");
            }
        }
    }
}
