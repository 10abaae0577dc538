//! Category settings and the registry that owns them.

mod presets;

pub use presets::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{info, warn};

use crate::category::Category;
use crate::error::ConfigurationError;

/// Display and notification settings for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySetting {
    pub show: bool,
    pub notify: bool,
    /// Percentage chance (0-100) that a group is displayed.
    pub rate: u8,
    /// Minimum steps between two displayed groups of the category.
    pub cooldown: u32,
}

impl CategorySetting {
    /// Create a setting. Values are not validated here.
    pub const fn new(show: bool, notify: bool, rate: u8, cooldown: u32) -> Self {
        Self {
            show,
            notify,
            rate,
            cooldown,
        }
    }

    /// The fixed setting of always-shown categories.
    pub const fn always_shown() -> Self {
        Self::new(true, false, 100, 0)
    }
}

/// Editable fields of a [`CategorySetting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingField {
    Show,
    Notify,
    Rate,
    Cooldown,
}

impl SettingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingField::Show => "show",
            SettingField::Notify => "notify",
            SettingField::Rate => "rate",
            SettingField::Cooldown => "cooldown",
        }
    }
}

impl FromStr for SettingField {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "show" => Ok(SettingField::Show),
            "notify" => Ok(SettingField::Notify),
            "rate" => Ok(SettingField::Rate),
            "cooldown" => Ok(SettingField::Cooldown),
            _ => Err(ConfigurationError::UnknownField(s.to_string())),
        }
    }
}

impl std::fmt::Display for SettingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw value written to a setting field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
}

impl SettingValue {
    /// Parse a value typed at the command surface.
    ///
    /// Booleans accept `on/off`, `true/false` and `yes/no`; anything else must be
    /// an integer.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" => Some(SettingValue::Bool(true)),
            "off" | "false" | "no" => Some(SettingValue::Bool(false)),
            other => other.parse::<i64>().ok().map(SettingValue::Int),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(value.into())
    }
}

/// Owned store of every category's settings.
///
/// The only ways to mutate settings are [`set`](Self::set) and
/// [`apply_preset`](Self::apply_preset); both validate before writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRegistry {
    settings: BTreeMap<Category, CategorySetting>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl CategoryRegistry {
    /// Create a registry with the balanced preset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry populated from a preset.
    pub fn from_preset(preset: Preset) -> Self {
        let settings = Category::ALL
            .iter()
            .map(|category| {
                let setting = preset
                    .setting_for(*category)
                    .unwrap_or_else(CategorySetting::always_shown);
                (*category, setting)
            })
            .collect();
        Self { settings }
    }

    /// Get the setting of a category.
    pub fn get(&self, category: Category) -> Result<CategorySetting, ConfigurationError> {
        if category.is_always_shown() {
            return Ok(CategorySetting::always_shown());
        }
        self.settings
            .get(&category)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownCategory(category.to_string()))
    }

    /// Update one field of a category's setting.
    pub fn set(
        &mut self,
        category: Category,
        field: SettingField,
        value: impl Into<SettingValue>,
    ) -> Result<(), ConfigurationError> {
        let value = value.into();
        let current = self.get(category)?;
        let updated = match Self::apply_field(category, current, field, value) {
            Ok(updated) => updated,
            Err(err) => {
                warn!(%category, %field, ?value, error = %err, "rejected setting change");
                return Err(err);
            }
        };
        self.settings.insert(category, updated);
        Ok(())
    }

    /// Replace the settings of every non-critical category with a preset bundle.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), ConfigurationError> {
        let preset: Preset = name.parse()?;
        let mut next = self.settings.clone();
        for category in Category::ALL {
            if let Some(setting) = preset.setting_for(category) {
                next.insert(category, setting);
            }
        }
        self.settings = next;
        info!(preset = preset.name(), "applied message preset");
        Ok(())
    }

    /// Names of every available preset.
    pub fn list_presets() -> Vec<&'static str> {
        Preset::ALL.iter().map(|p| p.name()).collect()
    }

    /// Iterate over all registered settings in display-priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, CategorySetting)> + '_ {
        self.settings.iter().map(|(category, setting)| {
            if category.is_always_shown() {
                (*category, CategorySetting::always_shown())
            } else {
                (*category, *setting)
            }
        })
    }

    fn apply_field(
        category: Category,
        mut setting: CategorySetting,
        field: SettingField,
        value: SettingValue,
    ) -> Result<CategorySetting, ConfigurationError> {
        if category.is_always_shown() {
            return Err(ConfigurationError::CategoryLocked(category));
        }
        let invalid = |reason: String| ConfigurationError::InvalidSetting {
            category,
            field: field.as_str(),
            reason,
        };

        match (field, value) {
            (SettingField::Show, SettingValue::Bool(show)) => setting.show = show,
            (SettingField::Notify, SettingValue::Bool(notify)) => {
                if notify && !category.is_notifiable() {
                    return Err(invalid("category is not on the notification allow-list".into()));
                }
                setting.notify = notify;
            }
            (SettingField::Rate, SettingValue::Int(rate)) => {
                if !(0..=100).contains(&rate) {
                    return Err(invalid(format!("rate {} is outside 0-100", rate)));
                }
                setting.rate = rate as u8;
            }
            (SettingField::Cooldown, SettingValue::Int(cooldown)) => {
                if cooldown < 0 {
                    return Err(invalid(format!("cooldown {} is negative", cooldown)));
                }
                setting.cooldown = u32::try_from(cooldown)
                    .map_err(|_| invalid(format!("cooldown {} is too large", cooldown)))?;
            }
            (SettingField::Show | SettingField::Notify, SettingValue::Int(_)) => {
                return Err(invalid("expected on/off".into()));
            }
            (SettingField::Rate | SettingField::Cooldown, SettingValue::Bool(_)) => {
                return Err(invalid("expected a number".into()));
            }
        }

        Ok(setting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_balanced() {
        let registry = CategoryRegistry::new();
        assert_eq!(registry, CategoryRegistry::from_preset(Preset::Balanced));

        let idle = registry.get(Category::NpcIdle).unwrap();
        assert!(idle.show);
        assert_eq!(idle.rate, 10);
        assert_eq!(idle.cooldown, 5);
    }

    #[test]
    fn test_critical_categories_are_locked() {
        let mut registry = CategoryRegistry::new();
        assert_eq!(
            registry.get(Category::Combat).unwrap(),
            CategorySetting::always_shown()
        );

        let result = registry.set(Category::Combat, SettingField::Show, false);
        assert!(matches!(result, Err(ConfigurationError::CategoryLocked(Category::Combat))));
        assert!(registry.get(Category::Combat).unwrap().show);
    }

    #[test]
    fn test_set_validates_rate_and_cooldown() {
        let mut registry = CategoryRegistry::new();
        let before = registry.get(Category::NpcTalk).unwrap();

        assert!(matches!(
            registry.set(Category::NpcTalk, SettingField::Rate, 101),
            Err(ConfigurationError::InvalidSetting { field: "rate", .. })
        ));
        assert!(matches!(
            registry.set(Category::NpcTalk, SettingField::Rate, -1),
            Err(ConfigurationError::InvalidSetting { .. })
        ));
        assert!(matches!(
            registry.set(Category::NpcTalk, SettingField::Cooldown, -3),
            Err(ConfigurationError::InvalidSetting { field: "cooldown", .. })
        ));
        assert!(matches!(
            registry.set(Category::NpcTalk, SettingField::Show, 1),
            Err(ConfigurationError::InvalidSetting { .. })
        ));
        assert_eq!(registry.get(Category::NpcTalk).unwrap(), before);

        registry.set(Category::NpcTalk, SettingField::Rate, 100).unwrap();
        registry.set(Category::NpcTalk, SettingField::Cooldown, 0).unwrap();
        let after = registry.get(Category::NpcTalk).unwrap();
        assert_eq!(after.rate, 100);
        assert_eq!(after.cooldown, 0);
    }

    #[test]
    fn test_notify_restricted_to_allow_list() {
        let mut registry = CategoryRegistry::new();
        assert!(registry.set(Category::NpcIdle, SettingField::Notify, true).is_err());

        registry.set(Category::NpcGift, SettingField::Notify, false).unwrap();
        assert!(!registry.get(Category::NpcGift).unwrap().notify);
        registry.set(Category::NpcGift, SettingField::Notify, true).unwrap();
        assert!(registry.get(Category::NpcGift).unwrap().notify);
    }

    #[test]
    fn test_apply_preset() {
        let mut registry = CategoryRegistry::new();
        registry.apply_preset("verbose").unwrap();
        for category in [Category::NpcIdle, Category::Ambient, Category::Trivial] {
            let setting = registry.get(category).unwrap();
            assert!(setting.show);
            assert_eq!(setting.rate, 100);
            assert_eq!(setting.cooldown, 0);
        }

        let snapshot = registry.clone();
        assert!(matches!(
            registry.apply_preset("loud"),
            Err(ConfigurationError::UnknownPreset(_))
        ));
        assert_eq!(registry, snapshot);
    }

    #[test]
    fn test_unknown_category_in_snapshot() {
        let json = r#"{"settings":{"npc_talk":{"show":true,"notify":false,"rate":50,"cooldown":2}}}"#;
        let registry: CategoryRegistry = serde_json::from_str(json).unwrap();

        assert_eq!(registry.get(Category::NpcTalk).unwrap().rate, 50);
        assert!(matches!(
            registry.get(Category::NpcIdle),
            Err(ConfigurationError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_parse_setting_values() {
        assert_eq!(SettingValue::parse("on"), Some(SettingValue::Bool(true)));
        assert_eq!(SettingValue::parse("No"), Some(SettingValue::Bool(false)));
        assert_eq!(SettingValue::parse("42"), Some(SettingValue::Int(42)));
        assert_eq!(SettingValue::parse("-2"), Some(SettingValue::Int(-2)));
        assert_eq!(SettingValue::parse("lots"), None);
        assert_eq!("Rate".parse::<SettingField>().unwrap(), SettingField::Rate);
        assert!("volume".parse::<SettingField>().is_err());
    }

    #[test]
    fn test_list_presets() {
        assert_eq!(
            CategoryRegistry::list_presets(),
            vec!["quiet", "chatty", "verbose", "balanced"]
        );
    }
}
