//! Configuration errors raised by the settings surface.

use thiserror::Error;

use crate::category::Category;

/// Rejected configuration requests. Prior settings are left untouched.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid value for {category}.{field}: {reason}")]
    InvalidSetting {
        category: Category,
        field: &'static str,
        reason: String,
    },

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("unknown setting field: {0}")]
    UnknownField(String),

    #[error("category {0} is always shown and cannot be edited")]
    CategoryLocked(Category),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
