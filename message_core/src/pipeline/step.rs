//! Step lifecycle: an open step collects events until it is sealed.

use message_rules::{ActorId, Event, Step};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ProtocolError;

/// Phases a step moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Collecting,
    Grouping,
    Filtering,
    Formatting,
    Notifying,
    Idle,
}

impl Phase {
    /// The only phase that may follow this one.
    pub fn next(&self) -> Phase {
        match self {
            Phase::Collecting => Phase::Grouping,
            Phase::Grouping => Phase::Filtering,
            Phase::Filtering => Phase::Formatting,
            Phase::Formatting => Phase::Notifying,
            Phase::Notifying => Phase::Idle,
            Phase::Idle => Phase::Collecting,
        }
    }
}

/// Events collected so far for a step.
#[derive(Debug, Clone)]
pub struct OpenStep {
    step: Step,
    events: Vec<Event>,
    actors: HashSet<ActorId>,
}

impl OpenStep {
    /// Start collecting for a step.
    pub fn new(step: Step) -> Self {
        Self {
            step,
            events: Vec::new(),
            actors: HashSet::new(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Accept an event for this step.
    pub fn accept(&mut self, event: Event) -> Result<(), ProtocolError> {
        if event.step < self.step {
            return Err(ProtocolError::StaleEvent {
                event_step: event.step,
                current: self.step,
            });
        }
        if event.step > self.step {
            return Err(ProtocolError::FutureEvent {
                event_step: event.step,
                current: self.step,
            });
        }
        if !self.actors.insert(event.actor_id) {
            return Err(ProtocolError::DuplicateActor {
                actor: event.actor_id,
                step: self.step,
            });
        }
        self.events.push(event);
        Ok(())
    }

    /// Close the step. No further events can be added.
    pub fn seal(self) -> SealedStep {
        SealedStep {
            step: self.step,
            events: self.events,
        }
    }
}

/// The closed, complete event set of a step.
#[derive(Debug, Clone)]
pub struct SealedStep {
    step: Step,
    events: Vec<Event>,
}

impl SealedStep {
    pub fn step(&self) -> Step {
        self.step
    }

    /// Events in the order they were received.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Reopen the step, keeping its events.
    pub(crate) fn reopen(self) -> OpenStep {
        let actors = self.events.iter().map(|e| e.actor_id).collect();
        OpenStep {
            step: self.step,
            events: self.events,
            actors,
        }
    }
}
