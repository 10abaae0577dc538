//! Message categories: the closed set of tags classifying every event.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigurationError;

/// All message categories in the system.
///
/// Variants are declared in display-priority order; the derived `Ord` is the
/// order in which lines for a step are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    // Always shown
    Critical,
    PlayerAction,
    Combat,

    // NPC behaviour
    NpcGift,
    NpcGardening,
    NpcHazard,
    NpcGroupAction,
    NpcReaction,
    NpcItemUse,
    NpcInteraction,
    NpcTalk,
    NpcMovement,
    NpcMinor,
    NpcIdle,

    // Environment
    HazardEffect,
    EnvironmentChange,
    Ambient,
    Trivial,

    Debug,
}

/// Broad classes of categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryClass {
    /// Bypasses rate and cooldown, never user-editable.
    AlwaysShown,
    Npc,
    Environmental,
    Debug,
}

/// How much an event matters to the player, independent of display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Minimal,
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Notification importance on a 1 to 5 scale.
    pub fn importance(&self) -> u8 {
        match self {
            Priority::High => 5,
            Priority::Medium => 3,
            Priority::Low => 2,
            Priority::Minimal => 1,
        }
    }
}

impl Category {
    /// Every category, in display-priority order.
    pub const ALL: [Category; 19] = [
        Category::Critical,
        Category::PlayerAction,
        Category::Combat,
        Category::NpcGift,
        Category::NpcGardening,
        Category::NpcHazard,
        Category::NpcGroupAction,
        Category::NpcReaction,
        Category::NpcItemUse,
        Category::NpcInteraction,
        Category::NpcTalk,
        Category::NpcMovement,
        Category::NpcMinor,
        Category::NpcIdle,
        Category::HazardEffect,
        Category::EnvironmentChange,
        Category::Ambient,
        Category::Trivial,
        Category::Debug,
    ];

    /// Categories that may produce notifications. Only code changes extend this list.
    pub const NOTIFIABLE: [Category; 3] = [
        Category::NpcGift,
        Category::NpcGardening,
        Category::NpcHazard,
    ];

    /// Get the class of this category.
    pub fn class(&self) -> CategoryClass {
        match self {
            Category::Critical | Category::PlayerAction | Category::Combat => {
                CategoryClass::AlwaysShown
            }
            Category::NpcGift
            | Category::NpcGardening
            | Category::NpcHazard
            | Category::NpcGroupAction
            | Category::NpcReaction
            | Category::NpcItemUse
            | Category::NpcInteraction
            | Category::NpcTalk
            | Category::NpcMovement
            | Category::NpcMinor
            | Category::NpcIdle => CategoryClass::Npc,
            Category::HazardEffect
            | Category::EnvironmentChange
            | Category::Ambient
            | Category::Trivial => CategoryClass::Environmental,
            Category::Debug => CategoryClass::Debug,
        }
    }

    /// Check if this category bypasses throttling entirely.
    pub fn is_always_shown(&self) -> bool {
        self.class() == CategoryClass::AlwaysShown
    }

    /// Check if this category is on the notification allow-list.
    pub fn is_notifiable(&self) -> bool {
        Self::NOTIFIABLE.contains(self)
    }

    /// Priority an event of this category carries unless the producer overrides it.
    pub fn default_priority(&self) -> Priority {
        match self {
            Category::Critical
            | Category::Combat
            | Category::NpcGift
            | Category::NpcGardening
            | Category::NpcHazard => Priority::High,
            Category::NpcTalk | Category::NpcMovement | Category::Ambient => Priority::Low,
            Category::NpcIdle | Category::Trivial | Category::Debug => Priority::Minimal,
            _ => Priority::Medium,
        }
    }

    /// Position in the display order (0 is emitted first).
    pub fn priority_rank(&self) -> usize {
        *self as usize
    }

    /// The snake_case tag used in configuration files and commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Critical => "critical",
            Category::PlayerAction => "player_action",
            Category::Combat => "combat",
            Category::NpcGift => "npc_gift",
            Category::NpcGardening => "npc_gardening",
            Category::NpcHazard => "npc_hazard",
            Category::NpcGroupAction => "npc_group_action",
            Category::NpcReaction => "npc_reaction",
            Category::NpcItemUse => "npc_item_use",
            Category::NpcInteraction => "npc_interaction",
            Category::NpcTalk => "npc_talk",
            Category::NpcMovement => "npc_movement",
            Category::NpcMinor => "npc_minor",
            Category::NpcIdle => "npc_idle",
            Category::HazardEffect => "hazard_effect",
            Category::EnvironmentChange => "environment_change",
            Category::Ambient => "ambient",
            Category::Trivial => "trivial",
            Category::Debug => "debug",
        }
    }
}

impl FromStr for Category {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .iter()
            .find(|c| c.as_str() == tag)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
