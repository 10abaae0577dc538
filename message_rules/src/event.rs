//! Per-step actor events.

use serde::{Deserialize, Serialize};

use crate::ids::ActorId;
use crate::category::{Category, Priority};

/// Monotonic turn counter.
pub type Step = u64;

/// Pre-rendered predicate text for an action, with a pluralization hint.
///
/// The text never includes the subject: `"plants a Carrot Seed"` rather than
/// `"Jack plants a Carrot Seed"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Used when exactly one actor performed the action.
    pub singular: String,
    /// Used for two or more actors. Falls back to `singular` when absent.
    #[serde(default)]
    pub plural: Option<String>,
}

impl Description {
    /// Create a description with only a singular form.
    pub fn new(singular: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: None,
        }
    }

    /// Set the plural form.
    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    /// Pick the form agreeing with `count` subjects.
    pub fn for_count(&self, count: usize) -> &str {
        if count > 1 {
            self.plural.as_deref().unwrap_or(&self.singular)
        } else {
            &self.singular
        }
    }
}

impl From<&str> for Description {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Description {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// One actor's action for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub actor_id: ActorId,
    pub actor_name: String,
    pub category: Category,
    /// Kind of action, e.g. `"idle.stand"` or `"gift.give"`.
    pub action_key: String,
    pub description: Description,
    /// Sub-variant of the action, e.g. a specific hallucination.
    pub effect_key: Option<String>,
    /// Ranks the event's notification; defaults from the category.
    #[serde(default)]
    pub priority: Priority,
    pub step: Step,
}

impl Event {
    /// Create a new event without an effect key.
    pub fn new(
        actor_id: ActorId,
        actor_name: impl Into<String>,
        category: Category,
        action_key: impl Into<String>,
        description: impl Into<Description>,
        step: Step,
    ) -> Self {
        Self {
            actor_id,
            actor_name: actor_name.into(),
            category,
            action_key: action_key.into(),
            description: description.into(),
            effect_key: None,
            priority: category.default_priority(),
            step,
        }
    }

    /// Set the effect key.
    pub fn with_effect(mut self, effect_key: impl Into<String>) -> Self {
        self.effect_key = Some(effect_key.into());
        self
    }

    /// Override the category's default priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Render the event as a standalone sentence for its single actor.
    pub fn sentence(&self) -> String {
        format!("{} {}", self.actor_name, self.description.singular)
    }
}
