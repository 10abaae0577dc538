//! Turn Aggregation Pipeline - the per-step state machine.
//!
//! Each step goes through the same phases:
//! 1. **Collecting**: Accept events for the current step only
//! 2. **Grouping**: Seal the step and merge its events into groups
//! 3. **Filtering**: Apply show flags, rate draws and cooldowns per group
//! 4. **Formatting**: Render surviving groups as lines
//! 5. **Notifying**: Record every allow-listed event, displayed or not
//! 6. **Idle**: Store the output, then start collecting the next step
//!
//! Cooldowns and the notification queue only change after every fallible phase
//! has succeeded.

mod step;

pub use step::*;

use message_rules::{
    AggregatorConfig, Category, CategoryRegistry, CategorySetting, ConfigurationError, Event,
    Priority, SettingField, SettingValue, Step,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use crate::cooldown::CooldownTracker;
use crate::error::{AggregatorError, InvariantViolation, ProtocolError};
use crate::format::LineFormatter;
use crate::grouping::group_events;
use crate::notifications::{NotificationEntry, NotificationQueue};
use crate::throttle::ThrottleFilter;

/// Everything produced for one finalized step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutput {
    pub step: Step,
    /// Display lines in category-priority order.
    pub lines: Vec<String>,
    /// Notifications appended during this step.
    pub notifications_added: usize,
    /// Unread-notification reminder, if one was due.
    pub reminder: Option<String>,
}

/// Owns the settings, cooldowns and notification log, and runs one step at a time.
#[derive(Debug)]
pub struct TurnAggregator {
    config: AggregatorConfig,
    registry: CategoryRegistry,
    cooldowns: CooldownTracker,
    notifications: NotificationQueue,
    formatter: LineFormatter,
    open: OpenStep,
    phase: Phase,
    first_step: Step,
    history: BTreeMap<Step, StepOutput>,
}

impl TurnAggregator {
    /// Create an aggregator starting at `first_step`.
    pub fn new(config: AggregatorConfig, first_step: Step) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let registry = config.build_registry()?;
        let notifications = NotificationQueue::new(config.notification_capacity)
            .with_reminder_frequency(config.reminder_frequency);

        Ok(Self {
            formatter: LineFormatter::new(config.list_limit),
            registry,
            cooldowns: CooldownTracker::new(),
            notifications,
            open: OpenStep::new(first_step),
            phase: Phase::Collecting,
            first_step,
            history: BTreeMap::new(),
            config,
        })
    }

    /// Create an aggregator with default configuration, starting at step 0.
    pub fn with_defaults() -> Self {
        Self {
            formatter: LineFormatter::default(),
            registry: CategoryRegistry::new(),
            cooldowns: CooldownTracker::new(),
            notifications: NotificationQueue::default(),
            open: OpenStep::new(0),
            phase: Phase::Collecting,
            first_step: 0,
            history: BTreeMap::new(),
            config: AggregatorConfig::default(),
        }
    }

    /// The step currently collecting events.
    pub fn current_step(&self) -> Step {
        self.open.step()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    // --- Producer interface ---

    /// Submit one actor's event for the current step.
    pub fn submit(&mut self, event: Event) -> Result<(), ProtocolError> {
        let actor = event.actor_id;
        self.open.accept(event).map_err(|err| {
            warn!(%actor, error = %err, "rejected event");
            err
        })
    }

    /// Close the current step and produce its output.
    ///
    /// On failure the step's events are kept and the step can be ended again;
    /// cooldowns and notifications are unchanged.
    #[instrument(skip(self), fields(events = self.open.len()))]
    pub fn end_step(&mut self, step: Step) -> Result<StepOutput, AggregatorError> {
        let current = self.current_step();
        if step != current {
            return Err(ProtocolError::StepMismatch {
                requested: step,
                current,
            }
            .into());
        }

        let sealed = std::mem::replace(&mut self.open, OpenStep::new(step)).seal();
        match self.process(&sealed) {
            Ok(output) => Ok(output),
            Err(err) => {
                warn!(step, error = %err, "step processing failed, events restored");
                self.open = sealed.reopen();
                self.phase = Phase::Collecting;
                Err(err)
            }
        }
    }

    fn process(&mut self, sealed: &SealedStep) -> Result<StepOutput, AggregatorError> {
        let step = sealed.step();
        let next = step
            .checked_add(1)
            .ok_or(InvariantViolation::StepExhausted { step })?;

        self.transition(Phase::Grouping)?;
        let groups = group_events(sealed);

        self.transition(Phase::Filtering)?;
        let outcome = ThrottleFilter::new(&self.registry, &self.cooldowns)
            .with_line_budget(self.config.max_lines_per_step)
            .filter(step, groups)?;

        self.transition(Phase::Formatting)?;
        let lines = self.formatter.format_all(&outcome.shown);
        let pending = self.pending_notifications(sealed)?;

        self.transition(Phase::Notifying)?;
        for category in &outcome.cooldown_updates {
            self.cooldowns.record_shown(*category, step);
        }
        let mut notifications_added = 0;
        for (category, text, priority) in pending {
            self.notifications
                .push_with_priority(category, text, step, priority)?;
            notifications_added += 1;
        }
        let reminder = self.notifications.reminder(step);

        self.transition(Phase::Idle)?;
        let output = StepOutput {
            step,
            lines,
            notifications_added,
            reminder,
        };
        self.remember(output.clone());
        info!(
            step,
            groups = outcome.verdicts.len(),
            lines = output.lines.len(),
            notifications = notifications_added,
            "step finalized"
        );

        self.open = OpenStep::new(next);
        self.transition(Phase::Collecting)?;
        Ok(output)
    }

    /// Notifications owed by a step: every allow-listed event with `notify` on,
    /// regardless of what was displayed.
    fn pending_notifications(
        &self,
        sealed: &SealedStep,
    ) -> Result<Vec<(Category, String, Priority)>, ConfigurationError> {
        let mut pending = Vec::new();
        for event in sealed.events() {
            if !event.category.is_notifiable() {
                continue;
            }
            if self.registry.get(event.category)?.notify {
                pending.push((event.category, event.sentence(), event.priority));
            }
        }
        Ok(pending)
    }

    fn transition(&mut self, next: Phase) -> Result<(), InvariantViolation> {
        if self.phase.next() != next {
            return Err(InvariantViolation::IllegalTransition {
                from: self.phase,
                to: next,
            });
        }
        debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
        Ok(())
    }

    fn remember(&mut self, output: StepOutput) {
        self.history.insert(output.step, output);
        while self.history.len() > self.config.output_history {
            self.history.pop_first();
        }
    }

    // --- Output consumption interface ---

    /// Output of a finalized step.
    ///
    /// Steps before the first one this aggregator ran were never finalized here.
    pub fn get_step_output(&self, step: Step) -> Result<&StepOutput, InvariantViolation> {
        if step < self.first_step || step >= self.current_step() {
            return Err(InvariantViolation::StepNotFinalized { step });
        }
        self.history
            .get(&step)
            .ok_or(InvariantViolation::OutputNotRetained { step })
    }

    /// Unread notifications, marked read by this call.
    pub fn get_unread_notifications(&mut self) -> Vec<NotificationEntry> {
        self.notifications.drain_unread()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.peek_unread_count()
    }

    /// Up to `count` notifications, most important and newest first, optionally of
    /// one category. Only the returned entries are marked read.
    pub fn read_notifications(
        &mut self,
        count: Option<usize>,
        category: Option<Category>,
    ) -> Vec<NotificationEntry> {
        self.notifications.read(count, category)
    }

    pub fn list_notifications(&self) -> Vec<NotificationEntry> {
        self.notifications.list_all()
    }

    pub fn list_notifications_by_category(&self, category: Category) -> Vec<NotificationEntry> {
        self.notifications.list_by_category(category)
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    // --- Settings surface ---

    pub fn get_settings(&self, category: Category) -> Result<CategorySetting, ConfigurationError> {
        self.registry.get(category)
    }

    pub fn set_setting(
        &mut self,
        category: Category,
        field: SettingField,
        value: impl Into<SettingValue>,
    ) -> Result<(), ConfigurationError> {
        self.registry.set(category, field, value)
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<(), ConfigurationError> {
        self.registry.apply_preset(name)
    }

    pub fn list_presets(&self) -> Vec<&'static str> {
        CategoryRegistry::list_presets()
    }

    /// Let a category display immediately again.
    pub fn reset_cooldown(&mut self, category: Category) {
        self.cooldowns.reset(category);
    }

    /// Forget every category's cooldown.
    pub fn reset_all_cooldowns(&mut self) {
        self.cooldowns.clear();
    }
}
