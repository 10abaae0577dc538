//! # Message Core
//!
//! The turn aggregation engine. It collects every actor event for a step, and only
//! once the step is closed decides what the player sees.
//!
//! ## Core Components
//!
//! - **grouping**: Merges same-step events into groups with one representative description
//! - **throttle**: Rate sampling and cooldown suppression per group
//! - **format**: Renders a group as one line ("A, B, C, and 2 others ...")
//! - **notifications**: Bounded log of allow-listed events, read separately
//! - **pipeline**: The per-step state machine tying the above together
//!
//! ## Design Philosophy
//!
//! - **Collect, then decide**: No output decision is made before a step is sealed
//! - **All or nothing**: A group is shown or suppressed as a whole
//! - **Reproducible**: Every random draw is seeded from the step and the group signature

pub mod cooldown;
pub mod error;
pub mod format;
pub mod grouping;
pub mod notifications;
pub mod pipeline;
pub mod seed;
pub mod throttle;

pub use cooldown::*;
pub use error::*;
pub use format::*;
pub use grouping::*;
pub use notifications::*;
pub use pipeline::*;
pub use throttle::*;
