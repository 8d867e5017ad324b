//! Step cursor of the configuration dialogue.

use super::ConfigField;
use crate::domain::foundation::StateMachine;

/// Where the configuration dialogue currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStep {
    /// Not yet invoked.
    Start,
    /// Menu shown, waiting for a button press.
    Menu,
    /// Field prompt shown, waiting for a value.
    Awaiting(ConfigField),
    /// Done pressed or cancelled.
    Closed,
}

impl ConfigStep {
    /// The field being edited, if any.
    pub fn field(&self) -> Option<ConfigField> {
        match self {
            ConfigStep::Awaiting(field) => Some(*field),
            _ => None,
        }
    }
}

impl StateMachine for ConfigStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConfigStep::*;
        match (self, target) {
            (Start, Menu) => true,
            (Menu, Awaiting(_)) | (Menu, Closed) | (Menu, Menu) => true,
            (Awaiting(_), Menu) | (Awaiting(_), Closed) => true,
            (Start, Closed) => true,
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConfigStep::*;
        let fields = [
            ConfigField::TokenName,
            ConfigField::Hashtags,
            ConfigField::Cashtags,
            ConfigField::Community,
        ];
        match self {
            Start => vec![Menu, Closed],
            Menu => {
                let mut targets: Vec<Self> = fields.into_iter().map(Awaiting).collect();
                targets.push(Menu);
                targets.push(Closed);
                targets
            }
            Awaiting(_) => vec![Menu, Closed],
            Closed => vec![],
        }
    }
}
