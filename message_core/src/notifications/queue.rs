//! Notification Queue - bounded, append-only until read or cleared.

use message_rules::{Category, Priority, Step};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::VecDeque;
use tracing::debug;

use super::NotificationEntry;
use crate::error::ProtocolError;

/// Bounded log of notifications.
///
/// Entries are only reachable through queue operations. When full, pushing evicts
/// the oldest entry first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationQueue {
    entries: VecDeque<NotificationEntry>,
    capacity: usize,
    /// Steps between reminders; 0 disables them.
    reminder_frequency: u64,
    last_reminder: Step,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(50)
    }
}

impl NotificationQueue {
    /// Create a queue holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            reminder_frequency: 5,
            last_reminder: 0,
        }
    }

    /// Set how often unread reminders are produced.
    pub fn with_reminder_frequency(mut self, steps: u64) -> Self {
        self.reminder_frequency = steps;
        self
    }

    /// Append a notification ranked by the category's default priority.
    pub fn push(
        &mut self,
        category: Category,
        text: impl Into<String>,
        step: Step,
    ) -> Result<NotificationEntry, ProtocolError> {
        self.push_with_priority(category, text, step, category.default_priority())
    }

    /// Append a notification, evicting the oldest entry if full.
    pub fn push_with_priority(
        &mut self,
        category: Category,
        text: impl Into<String>,
        step: Step,
        priority: Priority,
    ) -> Result<NotificationEntry, ProtocolError> {
        if !category.is_notifiable() {
            return Err(ProtocolError::CategoryNotNotifiable(category));
        }

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let entry = NotificationEntry::new(category, text, step, priority);
        self.entries.push_back(entry.clone());
        Ok(entry)
    }

    /// Number of unread entries.
    pub fn peek_unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.read).count()
    }

    /// Mark every unread entry read and return them. Entries stay in the queue.
    pub fn drain_unread(&mut self) -> Vec<NotificationEntry> {
        self.entries
            .iter_mut()
            .filter(|e| !e.read)
            .map(|e| {
                e.read = true;
                e.clone()
            })
            .collect()
    }

    /// Read up to `count` entries (all when `None`), optionally of one category.
    ///
    /// Entries come most important first, then newest first. Read entries are
    /// included; only the returned entries are marked read.
    pub fn read(&mut self, count: Option<usize>, category: Option<Category>) -> Vec<NotificationEntry> {
        let mut picked: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| category.map_or(true, |c| e.category == c))
            .map(|(index, _)| index)
            .collect();
        picked.sort_by_key(|&index| {
            let e = &self.entries[index];
            (Reverse(e.importance), Reverse(e.step_created), Reverse(index))
        });
        if let Some(count) = count {
            picked.truncate(count);
        }

        picked
            .into_iter()
            .filter_map(|index| {
                let entry = self.entries.get_mut(index)?;
                entry.read = true;
                Some(entry.clone())
            })
            .collect()
    }

    /// All entries in chronological order.
    pub fn list_all(&self) -> Vec<NotificationEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Entries of one category in chronological order.
    pub fn list_by_category(&self, category: Category) -> Vec<NotificationEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reminder text when unread entries exist and enough steps have passed since
    /// the last reminder.
    pub fn reminder(&mut self, step: Step) -> Option<String> {
        if self.reminder_frequency == 0 {
            return None;
        }
        let unread = self.peek_unread_count();
        if unread == 0 || step.saturating_sub(self.last_reminder) < self.reminder_frequency {
            return None;
        }

        self.last_reminder = step;
        Some(match unread {
            1 => "You have 1 unread notification. Type 'notifications' to view it.".to_string(),
            2..=5 => format!(
                "You have {} unread notifications. Type 'notifications' to view them.",
                unread
            ),
            _ => format!(
                "You have {} unread notifications! Type 'notifications' to view them.",
                unread
            ),
        })
    }

    /// Drop the entry with the smallest creation step, earliest inserted on ties.
    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(index, e)| (e.step_created, *index))
            .map(|(index, _)| index);

        if let Some(evicted) = oldest.and_then(|index| self.entries.remove(index)) {
            debug!(id = %evicted.id, step = evicted.step_created, "evicted notification");
        }
    }
}
