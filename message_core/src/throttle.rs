//! Throttle Filter - decides which groups reach the screen.

use message_rules::{Category, CategoryRegistry, ConfigurationError, Step};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::trace;

use crate::cooldown::CooldownTracker;
use crate::grouping::Group;
use crate::seed;

/// Why a group was or was not displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Shown,
    /// The category has `show` turned off.
    Hidden,
    /// The draw `roll` was not below the category rate.
    RateLimited { roll: u8 },
    /// The category was displayed too recently.
    CoolingDown { remaining: u64 },
    /// The per-step line budget was already spent.
    OverBudget,
}

/// Result of filtering one step's groups.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Surviving groups, still in display order.
    pub shown: Vec<Group>,
    /// One entry per input group, in evaluation order.
    pub verdicts: Vec<(Group, Verdict)>,
    /// Categories whose cooldown clock restarts at this step.
    pub cooldown_updates: BTreeSet<Category>,
}

/// Applies show flags, rate sampling, cooldowns and the line budget.
///
/// Filtering never mutates the tracker; the caller commits
/// [`FilterOutcome::cooldown_updates`] once the step succeeds.
pub struct ThrottleFilter<'a> {
    registry: &'a CategoryRegistry,
    cooldowns: &'a CooldownTracker,
    max_lines: Option<usize>,
}

impl<'a> ThrottleFilter<'a> {
    pub fn new(registry: &'a CategoryRegistry, cooldowns: &'a CooldownTracker) -> Self {
        Self {
            registry,
            cooldowns,
            max_lines: None,
        }
    }

    /// Cap the number of non-critical groups shown per step.
    pub fn with_line_budget(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Filter a step's groups. Groups must already be in display order.
    pub fn filter(&self, step: Step, groups: Vec<Group>) -> Result<FilterOutcome, ConfigurationError> {
        let mut outcome = FilterOutcome::default();
        let mut budget_used = 0usize;

        for group in groups {
            let verdict = self.judge(step, &group, &outcome.cooldown_updates, budget_used)?;
            trace!(step, group = %group.key, ?verdict, "throttle verdict");

            if verdict == Verdict::Shown {
                let category = group.category();
                if !category.is_always_shown() {
                    budget_used += 1;
                    outcome.cooldown_updates.insert(category);
                }
                outcome.shown.push(group.clone());
            }
            outcome.verdicts.push((group, verdict));
        }

        Ok(outcome)
    }

    fn judge(
        &self,
        step: Step,
        group: &Group,
        shown_this_step: &BTreeSet<Category>,
        budget_used: usize,
    ) -> Result<Verdict, ConfigurationError> {
        let category = group.category();
        if category.is_always_shown() {
            return Ok(Verdict::Shown);
        }

        let setting = self.registry.get(category)?;
        if !setting.show {
            return Ok(Verdict::Hidden);
        }

        let roll = Self::roll(step, group);
        if roll >= setting.rate {
            return Ok(Verdict::RateLimited { roll });
        }

        let remaining = if shown_this_step.contains(&category) {
            u64::from(setting.cooldown)
        } else {
            self.cooldowns.remaining(category, setting.cooldown, step)
        };
        if remaining > 0 {
            return Ok(Verdict::CoolingDown { remaining });
        }

        if self.max_lines.is_some_and(|max| budget_used >= max) {
            return Ok(Verdict::OverBudget);
        }

        Ok(Verdict::Shown)
    }

    /// One uniform draw in `[0, 100)` per group per step.
    fn roll(step: Step, group: &Group) -> u8 {
        let [category, action, kind] = group.key.seed_parts();
        let mut rng = StdRng::seed_from_u64(seed::derive(step, &[category, action, kind, "throttle"]));
        rng.gen_range(0..100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_events;
    use crate::pipeline::OpenStep;
    use message_rules::{ActorId, Event, SettingField};

    fn groups_for(step: Step, category: Category, names: &[&str]) -> Vec<Group> {
        let mut open = OpenStep::new(step);
        for name in names {
            open.accept(Event::new(ActorId::new(), *name, category, "act", "acts.", step))
                .unwrap();
        }
        group_events(&open.seal())
    }

    fn registry_with(category: Category, show: bool, rate: i64, cooldown: i64) -> CategoryRegistry {
        let mut registry = CategoryRegistry::new();
        registry.set(category, SettingField::Show, show).unwrap();
        registry.set(category, SettingField::Rate, rate).unwrap();
        registry.set(category, SettingField::Cooldown, cooldown).unwrap();
        registry
    }

    #[test]
    fn test_hidden_category() {
        let registry = registry_with(Category::NpcTalk, false, 100, 0);
        let tracker = CooldownTracker::new();
        let outcome = ThrottleFilter::new(&registry, &tracker)
            .filter(1, groups_for(1, Category::NpcTalk, &["Bubbles"]))
            .unwrap();

        assert!(outcome.shown.is_empty());
        assert_eq!(outcome.verdicts[0].1, Verdict::Hidden);
        assert!(outcome.cooldown_updates.is_empty());
    }

    #[test]
    fn test_rate_extremes() {
        let tracker = CooldownTracker::new();
        for step in 0..50 {
            let always = registry_with(Category::NpcTalk, true, 100, 0);
            let outcome = ThrottleFilter::new(&always, &tracker)
                .filter(step, groups_for(step, Category::NpcTalk, &["Bubbles", "Jack"]))
                .unwrap();
            assert_eq!(outcome.shown.len(), 1);

            let never = registry_with(Category::NpcTalk, true, 0, 0);
            let outcome = ThrottleFilter::new(&never, &tracker)
                .filter(step, groups_for(step, Category::NpcTalk, &["Bubbles", "Jack"]))
                .unwrap();
            assert!(outcome.shown.is_empty());
            assert!(matches!(outcome.verdicts[0].1, Verdict::RateLimited { .. }));
        }
    }

    #[test]
    fn test_cooldown_blocks_until_elapsed() {
        let registry = registry_with(Category::NpcTalk, true, 100, 3);
        let mut tracker = CooldownTracker::new();
        tracker.record_shown(Category::NpcTalk, 10);

        let outcome = ThrottleFilter::new(&registry, &tracker)
            .filter(12, groups_for(12, Category::NpcTalk, &["Bubbles"]))
            .unwrap();
        assert_eq!(outcome.verdicts[0].1, Verdict::CoolingDown { remaining: 1 });

        let outcome = ThrottleFilter::new(&registry, &tracker)
            .filter(13, groups_for(13, Category::NpcTalk, &["Bubbles"]))
            .unwrap();
        assert_eq!(outcome.shown.len(), 1);
        assert!(outcome.cooldown_updates.contains(&Category::NpcTalk));
    }

    #[test]
    fn test_second_group_in_same_step_respects_cooldown() {
        let registry = registry_with(Category::NpcTalk, true, 100, 2);
        let tracker = CooldownTracker::new();

        let mut open = OpenStep::new(1);
        open.accept(Event::new(ActorId::new(), "Bubbles", Category::NpcTalk, "chat", "chats.", 1))
            .unwrap();
        open.accept(Event::new(ActorId::new(), "Jack", Category::NpcTalk, "sing", "sings.", 1))
            .unwrap();
        let outcome = ThrottleFilter::new(&registry, &tracker)
            .filter(1, group_events(&open.seal()))
            .unwrap();

        assert_eq!(outcome.shown.len(), 1);
        assert_eq!(outcome.shown[0].action_key(), "chat");
        assert_eq!(outcome.verdicts[1].1, Verdict::CoolingDown { remaining: 2 });
    }

    #[test]
    fn test_critical_bypasses_everything() {
        let registry = CategoryRegistry::new();
        let mut tracker = CooldownTracker::new();
        tracker.record_shown(Category::Combat, 5);

        let outcome = ThrottleFilter::new(&registry, &tracker)
            .with_line_budget(Some(0))
            .filter(5, groups_for(5, Category::Combat, &["Player"]))
            .unwrap();
        assert_eq!(outcome.shown.len(), 1);
        assert!(outcome.cooldown_updates.is_empty());
    }

    #[test]
    fn test_line_budget() {
        let mut registry = CategoryRegistry::new();
        registry.apply_preset("verbose").unwrap();
        let tracker = CooldownTracker::new();

        let mut open = OpenStep::new(1);
        for (name, category) in [
            ("Bubbles", Category::NpcTalk),
            ("Jack", Category::NpcIdle),
            ("Gus-Gus", Category::Ambient),
        ] {
            open.accept(Event::new(ActorId::new(), name, category, "act", "acts.", 1))
                .unwrap();
        }
        let outcome = ThrottleFilter::new(&registry, &tracker)
            .with_line_budget(Some(2))
            .filter(1, group_events(&open.seal()))
            .unwrap();

        assert_eq!(outcome.shown.len(), 2);
        assert_eq!(outcome.verdicts[2].1, Verdict::OverBudget);
        assert!(!outcome.cooldown_updates.contains(&Category::Ambient));
    }

    #[test]
    fn test_draws_are_reproducible() {
        let registry = registry_with(Category::NpcMovement, true, 50, 0);
        let tracker = CooldownTracker::new();
        let run = |step| {
            ThrottleFilter::new(&registry, &tracker)
                .filter(step, groups_for(step, Category::NpcMovement, &["Bubbles"]))
                .unwrap()
                .verdicts[0]
                .1
        };
        for step in 0..20 {
            assert_eq!(run(step), run(step));
        }
    }
}
