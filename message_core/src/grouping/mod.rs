//! Event Grouper - merges a sealed step's events into output candidates.
//!
//! Events sharing a [`GroupKey`] become one [`Group`]. When the members of an
//! effect-keyed group disagree on the effect, the most frequent effect wins and
//! supplies the group's description, so one sentence covers every member instead
//! of one sentence per distinct effect.

mod signature;

pub use signature::*;

use message_rules::{Category, Description, Event, Step};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::pipeline::SealedStep;
use crate::seed;

/// Same-step events merged into one output candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub key: GroupKey,
    pub chosen_effect_key: Option<String>,
    /// Actor names in the order their events were received.
    pub actor_names: Vec<String>,
    pub representative: Description,
    pub member_count: usize,
}

impl Group {
    pub fn category(&self) -> Category {
        self.key.category
    }

    pub fn action_key(&self) -> &str {
        &self.key.action_key
    }
}

/// Group every event of a sealed step.
///
/// Groups come back in display order: category priority first, then the order in
/// which each group's first event was received.
pub fn group_events(sealed: &SealedStep) -> Vec<Group> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut members: HashMap<GroupKey, Vec<&Event>> = HashMap::new();

    for event in sealed.events() {
        let key = GroupKey::of(event);
        if !members.contains_key(&key) {
            order.push(key.clone());
        }
        members.entry(key).or_default().push(event);
    }

    let mut groups: Vec<Group> = order
        .into_iter()
        .filter_map(|key| {
            let events = members.remove(&key)?;
            Some(build_group(sealed.step(), key, &events))
        })
        .collect();

    // stable sort keeps first-seen order within a category
    groups.sort_by_key(|g| g.category().priority_rank());
    groups
}

fn build_group(step: Step, key: GroupKey, events: &[&Event]) -> Group {
    let chosen_effect_key = if key.has_effect {
        choose_effect(step, &key, events)
    } else {
        None
    };

    let representative = events
        .iter()
        .find(|e| e.effect_key == chosen_effect_key)
        .or_else(|| events.first())
        .map(|e| e.description.clone())
        .unwrap_or_else(|| Description::new(String::new()));

    Group {
        chosen_effect_key,
        actor_names: events.iter().map(|e| e.actor_name.clone()).collect(),
        representative,
        member_count: events.len(),
        key,
    }
}

/// Pick the most frequent effect key, breaking ties with a seeded draw.
fn choose_effect(step: Step, key: &GroupKey, events: &[&Event]) -> Option<String> {
    // (effect, count) in order of first appearance
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for effect in events.iter().filter_map(|e| e.effect_key.as_deref()) {
        match tally.iter_mut().find(|(seen, _)| *seen == effect) {
            Some((_, count)) => *count += 1,
            None => tally.push((effect, 1)),
        }
    }

    let best = tally.iter().map(|(_, count)| *count).max()?;
    let tied: Vec<&str> = tally
        .iter()
        .filter(|(_, count)| *count == best)
        .map(|(effect, _)| *effect)
        .collect();

    let pick = if tied.len() == 1 {
        0
    } else {
        let mut rng = StdRng::seed_from_u64(seed::derive(step, &key.seed_parts()));
        rng.gen_range(0..tied.len())
    };
    Some(tied[pick].to_string())
}
