//! Notification entries.

use message_rules::{Category, Priority, Step};
use serde::{Deserialize, Serialize};

message_rules::uuid_id!(NotificationId);

/// A significant event recorded for the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub id: NotificationId,
    pub category: Category,
    pub text: String,
    pub step_created: Step,
    /// 1 to 5, higher is read first.
    pub importance: u8,
    /// The only field that changes after creation.
    pub read: bool,
}

impl NotificationEntry {
    pub(crate) fn new(
        category: Category,
        text: impl Into<String>,
        step_created: Step,
        priority: Priority,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            category,
            text: text.into(),
            step_created,
            importance: priority.importance(),
            read: false,
        }
    }
}

impl std::fmt::Display for NotificationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.category, self.text)
    }
}
