//! # Menagerie Core
//!
//! Deterministic behavior simulation for a collection of desktop companions.
//!
//! Each entity runs a finite state machine (idling, strolling, climbing,
//! chasing) over a 2D playfield. A [`Collection`] owns the population and a
//! seeded RNG; one [`Collection::tick`] call advances every entity by a
//! fixed step and yields the side effects (speech bubbles, despawns, ball
//! capture) the host should render. Rendering, timers, and input belong to
//! the host; this crate only decides what happens.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use menagerie_core::{Collection, Playfield, SpawnRequest, Theme};
//!
//! let mut collection = Collection::new(Playfield::new(1280.0, 720.0), Theme::Forest, 42);
//! let name = collection.spawn(SpawnRequest::new("pikachu"))?;
//! let effects = collection.tick(None)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ball;
pub mod collection;
pub mod entity;
pub mod names;
pub mod output;
pub mod session;
pub mod species;
pub mod state;
pub mod transitions;

pub use ball::BallState;
pub use collection::{Collection, Playfield, SpawnError, SpawnRequest};
pub use entity::Entity;
pub use output::{BubbleKind, Effect, SpriteUpdate};
pub use session::{EntityRecord, SessionState};
pub use species::{ColorVariant, Generation, SizeClass, Theme, NORMAL_SPEED};
pub use state::{Direction, StateTag};
pub use transitions::{SequenceProfile, TransitionError};

#[cfg(test)]
mod tests;
