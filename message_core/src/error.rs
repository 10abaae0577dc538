//! Errors raised by the aggregation engine.

use message_rules::{ActorId, Category, ConfigurationError, Step};
use thiserror::Error;

use crate::pipeline::Phase;

/// Producer mistakes, rejected at submission without touching pipeline state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("actor {actor} already submitted an event for step {step}")]
    DuplicateActor { actor: ActorId, step: Step },

    #[error("event for step {event_step} arrived after step {current} began collecting")]
    StaleEvent { event_step: Step, current: Step },

    #[error("event for step {event_step} arrived while step {current} is collecting")]
    FutureEvent { event_step: Step, current: Step },

    #[error("cannot end step {requested} while step {current} is collecting")]
    StepMismatch { requested: Step, current: Step },

    #[error("category {0} is not on the notification allow-list")]
    CategoryNotNotifiable(Category),
}

/// Operations attempted out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("step {step} has not been finalized")]
    StepNotFinalized { step: Step },

    #[error("output for step {step} is no longer retained")]
    OutputNotRetained { step: Step },

    #[error("step {step} is the last representable step")]
    StepExhausted { step: Step },

    #[error("illegal phase transition from {from:?} to {to:?}")]
    IllegalTransition { from: Phase, to: Phase },
}

/// Any failure of an aggregator operation.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}
