//! Cooldown tracking: when each category last reached the screen.

use message_rules::{Category, Step};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last displayed step per category. Absent means never shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownTracker {
    last_shown: BTreeMap<Category, Step>,
}

impl CooldownTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Step at which the category was last displayed.
    pub fn last_shown(&self, category: Category) -> Option<Step> {
        self.last_shown.get(&category).copied()
    }

    /// Steps left before the category may be displayed again at `step`.
    pub fn remaining(&self, category: Category, cooldown: u32, step: Step) -> u64 {
        match self.last_shown(category) {
            Some(last) if cooldown > 0 => {
                let elapsed = step.saturating_sub(last);
                u64::from(cooldown).saturating_sub(elapsed)
            }
            _ => 0,
        }
    }

    /// Check if the category may be displayed at `step`.
    pub fn is_ready(&self, category: Category, cooldown: u32, step: Step) -> bool {
        self.remaining(category, cooldown, step) == 0
    }

    /// Record that a group of the category was displayed.
    pub fn record_shown(&mut self, category: Category, step: Step) {
        self.last_shown.insert(category, step);
    }

    /// Forget the history of one category.
    pub fn reset(&mut self, category: Category) {
        self.last_shown.remove(&category);
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.last_shown.clear();
    }
}
