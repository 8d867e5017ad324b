//! Step cursor of the reply dialogue.

use crate::domain::foundation::StateMachine;

/// Where the reply dialogue currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyStep {
    #[default]
    AwaitingInvocation,
    AwaitingTweetLink,
    AwaitingTweetText,
    Complete,
}

impl StateMachine for ReplyStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ReplyStep::*;
        matches!(
            (self, target),
            (AwaitingInvocation, AwaitingTweetLink)
                | (AwaitingTweetLink, AwaitingTweetText)
                | (AwaitingTweetText, Complete)
                | (AwaitingTweetLink, AwaitingInvocation)
                | (AwaitingTweetText, AwaitingInvocation)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReplyStep::*;
        match self {
            AwaitingInvocation => vec![AwaitingTweetLink],
            AwaitingTweetLink => vec![AwaitingTweetText, AwaitingInvocation],
            AwaitingTweetText => vec![Complete, AwaitingInvocation],
            Complete => vec![],
        }
    }
}
