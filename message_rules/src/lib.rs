//! # Message Rules
//!
//! The rulebook for turn message aggregation - the closed category table, actor
//! identifiers, per-step events, and the user-facing display settings.
//! This crate is the single source of truth for *what* may be shown and does not
//! contain any aggregation logic.

pub mod category;
pub mod config;
pub mod error;
pub mod event;
pub mod ids;
pub mod settings;

pub use category::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::ActorId;
pub use settings::*;
