//! Named bundles of category settings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::CategorySetting;
use crate::category::{Category, CategoryClass};
use crate::error::ConfigurationError;

/// Fixed presets selectable from the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Only the highlights, rarely.
    Quiet,
    /// Most NPC chatter, lightly spaced.
    Chatty,
    /// Everything except debug output, every step.
    Verbose,
    /// Default tuning.
    Balanced,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Quiet, Preset::Chatty, Preset::Verbose, Preset::Balanced];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Quiet => "quiet",
            Preset::Chatty => "chatty",
            Preset::Verbose => "verbose",
            Preset::Balanced => "balanced",
        }
    }

    /// The preset's setting for a category, or `None` for always-shown categories,
    /// which presets never touch.
    pub fn setting_for(&self, category: Category) -> Option<CategorySetting> {
        let notify = category.is_notifiable();
        let bundle = |rate, cooldown| Some(CategorySetting::new(true, notify, rate, cooldown));
        let hidden = |rate, cooldown| Some(CategorySetting::new(false, notify, rate, cooldown));

        match (self, category.class()) {
            (_, CategoryClass::AlwaysShown) => None,
            (_, CategoryClass::Debug) => hidden(0, 0),

            (Preset::Verbose, _) => bundle(100, 0),

            (Preset::Quiet, _) if category == Category::Trivial => hidden(0, 10),
            (Preset::Quiet, _) if notify => bundle(30, 3),
            (Preset::Quiet, _) => bundle(10, 5),

            (Preset::Chatty, _) if category == Category::Trivial => bundle(20, 5),
            (Preset::Chatty, _) if notify => bundle(90, 1),
            (Preset::Chatty, CategoryClass::Environmental) => bundle(50, 2),
            (Preset::Chatty, _) => bundle(70, 1),

            (Preset::Balanced, _) => Self::balanced(category, notify),
        }
    }

    fn balanced(category: Category, notify: bool) -> Option<CategorySetting> {
        let (show, rate, cooldown) = match category {
            Category::NpcGift => (true, 80, 1),
            Category::NpcGardening => (true, 80, 1),
            Category::NpcHazard => (true, 70, 2),
            Category::NpcGroupAction => (true, 70, 3),
            Category::NpcReaction => (true, 70, 1),
            Category::NpcItemUse => (true, 60, 2),
            Category::NpcInteraction => (true, 40, 3),
            Category::NpcTalk => (true, 50, 2),
            Category::NpcMovement => (true, 20, 4),
            Category::NpcMinor => (true, 30, 3),
            Category::NpcIdle => (true, 10, 5),
            Category::HazardEffect => (true, 10, 5),
            Category::EnvironmentChange => (true, 90, 1),
            Category::Ambient => (true, 20, 4),
            Category::Trivial => (false, 5, 10),
            Category::Debug => (false, 0, 0),
            Category::Critical | Category::PlayerAction | Category::Combat => return None,
        };
        Some(CategorySetting::new(show, notify, rate, cooldown))
    }
}

impl FromStr for Preset {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Preset::ALL
            .iter()
            .find(|p| p.name() == name)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownPreset(s.to_string()))
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
