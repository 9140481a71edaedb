//! Host-visible outputs of the simulation.
//!
//! The core never touches the renderer. Instead each tick (and each
//! externally triggered action) yields [`Effect`] values the host maps onto
//! its own resources, and [`Collection::sprite_updates`] snapshots the visual
//! properties of every live entity.
//!
//! [`Collection::sprite_updates`]: crate::collection::Collection::sprite_updates

use serde::{Deserialize, Serialize};

use crate::state::Direction;

/// Sprite shown in a timed acknowledgment bubble.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleKind {
    /// Shown when an entity acknowledges a swipe.
    Happy,
    /// Shown on both parties of a new pairing.
    Heart,
}

/// One host-visible side effect of the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Show a timed acknowledgment bubble above the named entity.
    SpeechBubble {
        /// Entity to decorate.
        name: String,
        /// Which bubble sprite to show.
        kind: BubbleKind,
        /// How long the host keeps the bubble visible.
        duration_ms: u32,
    },
    /// An entity captured the ball; the host hides it.
    HideBall,
    /// The named entity left the collection; the host releases its visual
    /// resources.
    Despawn {
        /// Entity that was removed.
        name: String,
    },
    /// Informational notification for the host's message channel.
    Info(String),
}

/// Per-entity visual properties for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteUpdate {
    /// Entity name.
    pub name: String,
    /// Horizontal position of the sprite's left edge.
    pub left: f32,
    /// Vertical position above the arena bottom.
    pub bottom: f32,
    /// Which way the sprite faces.
    pub facing: Direction,
    /// Sprite sheet label for the current state.
    pub sprite: String,
}
