//! Aggregator configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::category::Category;
use crate::error::ConfigurationError;
use crate::settings::{CategoryRegistry, Preset, SettingField};

/// Per-category overrides applied on top of the chosen preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingOverride {
    pub show: Option<bool>,
    pub notify: Option<bool>,
    pub rate: Option<i64>,
    pub cooldown: Option<i64>,
}

/// Configuration for a turn aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Names listed before collapsing the rest into "N others".
    pub list_limit: usize,

    /// Maximum entries kept in the notification queue.
    pub notification_capacity: usize,

    /// Steps between unread-notification reminders (0 disables them).
    pub reminder_frequency: u64,

    /// Cap on non-critical display lines per step.
    pub max_lines_per_step: Option<usize>,

    /// Number of finalized step outputs retained for lookup.
    pub output_history: usize,

    /// Preset applied before overrides. Defaults to `balanced`.
    pub preset: Option<String>,

    /// Category overrides keyed by category tag.
    pub categories: BTreeMap<Category, SettingOverride>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            list_limit: 3,
            notification_capacity: 50,
            reminder_frequency: 5,
            max_lines_per_step: None,
            output_history: 16,
            preset: None,
            categories: BTreeMap::new(),
        }
    }
}

impl AggregatorConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check the structural limits.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.list_limit == 0 {
            return Err(ConfigurationError::InvalidConfig("list_limit must be positive"));
        }
        if self.notification_capacity == 0 {
            return Err(ConfigurationError::InvalidConfig(
                "notification_capacity must be positive",
            ));
        }
        if self.output_history == 0 {
            return Err(ConfigurationError::InvalidConfig(
                "output_history must be positive",
            ));
        }
        Ok(())
    }

    /// Build the category registry: preset first, then every override.
    ///
    /// Nothing is returned unless every override is valid.
    pub fn build_registry(&self) -> Result<CategoryRegistry, ConfigurationError> {
        let mut registry = CategoryRegistry::new();
        if let Some(name) = &self.preset {
            registry.apply_preset(name)?;
        } else {
            registry.apply_preset(Preset::Balanced.name())?;
        }

        for (category, change) in &self.categories {
            if let Some(show) = change.show {
                registry.set(*category, SettingField::Show, show)?;
            }
            if let Some(notify) = change.notify {
                registry.set(*category, SettingField::Notify, notify)?;
            }
            if let Some(rate) = change.rate {
                registry.set(*category, SettingField::Rate, rate)?;
            }
            if let Some(cooldown) = change.cooldown {
                registry.set(*category, SettingField::Cooldown, cooldown)?;
            }
        }

        Ok(registry)
    }
}
