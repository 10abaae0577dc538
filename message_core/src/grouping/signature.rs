//! Group signatures - what events must share to be merged.

use message_rules::{Category, Event};
use serde::{Deserialize, Serialize};

/// Actor-independent key identifying a group within a step.
///
/// Events with an effect key never share a group with events lacking one, even
/// for the same action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub category: Category,
    pub action_key: String,
    pub has_effect: bool,
}

impl GroupKey {
    /// The key an event belongs to.
    pub fn of(event: &Event) -> Self {
        Self {
            category: event.category,
            action_key: event.action_key.clone(),
            has_effect: event.effect_key.is_some(),
        }
    }

    /// Seed parts for random draws tied to this group.
    pub fn seed_parts(&self) -> [&str; 3] {
        [
            self.category.as_str(),
            &self.action_key,
            if self.has_effect { "effect" } else { "plain" },
        ]
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.action_key)?;
        if self.has_effect {
            f.write_str("+effect")?;
        }
        Ok(())
    }
}
