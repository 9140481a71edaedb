//! Per-species transition tables.
//!
//! A [`TransitionTable`] is a starting state plus an adjacency list mapping a
//! *completing* state to the states it may transition into. Successors are
//! drawn uniformly at random. A lookup miss is a data inconsistency and is
//! reported as [`TransitionError`] rather than recovered locally.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::StateTag;

/// Raised when a completing state has no row in its species' table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid state {from} for species {species}")]
pub struct TransitionError {
    /// The completing state that had no registered successors.
    pub from: StateTag,
    /// Species whose table was consulted.
    pub species: String,
}

/// Behavioral repertoire of a species; selects its transition table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceProfile {
    /// Idle and walk only.
    Docile,
    /// Adds run states and lying down, making joint play reachable.
    Playful,
    /// Adds the wall-hang / climb / jump-down / land chain.
    Climber,
}

/// Starting state plus allowed-successor rows for one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTable {
    starting: StateTag,
    rows: Vec<(StateTag, Vec<StateTag>)>,
}

impl TransitionTable {
    /// Builds a table from explicit rows. Mostly useful in tests; production
    /// tables come from [`TransitionTable::for_profile`].
    #[must_use]
    pub fn new(starting: StateTag, rows: Vec<(StateTag, Vec<StateTag>)>) -> Self {
        Self { starting, rows }
    }

    /// Builds the table for a sequence profile.
    ///
    /// Every profile registers `chase -> [idle-with-ball]` and an
    /// `idle-with-ball` row: chase completion flows through the former, and
    /// pursuit cancellation resolves through the latter.
    #[must_use]
    pub fn for_profile(profile: SequenceProfile) -> Self {
        use StateTag::{
            Chase, ClimbWallLeft, IdleWithBall, JumpDownLeft, Land, Lie, RunLeft, RunRight,
            SitIdle, StandLeft, StandRight, WalkLeft, WalkRight, WallHangLeft,
        };
        let rows = match profile {
            SequenceProfile::Docile => vec![
                (SitIdle, vec![WalkLeft, WalkRight]),
                (WalkLeft, vec![SitIdle, WalkRight]),
                (WalkRight, vec![SitIdle, WalkLeft]),
                (Chase, vec![IdleWithBall]),
                (IdleWithBall, vec![SitIdle, WalkLeft, WalkRight]),
            ],
            SequenceProfile::Playful => vec![
                (SitIdle, vec![WalkLeft, WalkRight, RunLeft, RunRight, Lie]),
                (WalkLeft, vec![SitIdle, WalkRight, RunRight]),
                (WalkRight, vec![SitIdle, WalkLeft, RunLeft]),
                (RunLeft, vec![SitIdle, RunRight, WalkRight, Lie]),
                (RunRight, vec![SitIdle, RunLeft, WalkLeft, Lie]),
                (Lie, vec![WalkLeft, WalkRight, RunLeft, RunRight]),
                (Chase, vec![IdleWithBall]),
                (
                    IdleWithBall,
                    vec![SitIdle, WalkLeft, WalkRight, RunLeft, RunRight],
                ),
            ],
            SequenceProfile::Climber => vec![
                (SitIdle, vec![WalkLeft, WalkRight, StandLeft, StandRight]),
                (WalkLeft, vec![SitIdle, WalkRight, WallHangLeft]),
                (WalkRight, vec![SitIdle, WalkLeft, RunRight]),
                (RunRight, vec![SitIdle, WalkLeft]),
                (StandLeft, vec![SitIdle, WalkLeft]),
                (StandRight, vec![SitIdle, WalkRight]),
                (WallHangLeft, vec![ClimbWallLeft, JumpDownLeft]),
                (ClimbWallLeft, vec![JumpDownLeft, WallHangLeft]),
                (JumpDownLeft, vec![Land]),
                (Land, vec![SitIdle, WalkLeft, WalkRight]),
                (Chase, vec![IdleWithBall]),
                (IdleWithBall, vec![SitIdle, WalkLeft, WalkRight]),
            ],
        };
        Self {
            starting: StateTag::SitIdle,
            rows,
        }
    }

    /// The state a fresh entity starts in.
    #[must_use]
    pub const fn starting_state(&self) -> StateTag {
        self.starting
    }

    /// Allowed successors of a completing state, if registered.
    #[must_use]
    pub fn successors(&self, from: StateTag) -> Option<&[StateTag]> {
        self.rows
            .iter()
            .find(|(state, _)| *state == from)
            .map(|(_, next)| next.as_slice())
    }

    /// Draws a successor uniformly at random, or `None` on a lookup miss.
    #[must_use]
    pub fn next_state(&self, from: StateTag, rng: &mut ChaCha8Rng) -> Option<StateTag> {
        self.successors(from)?.choose(rng).copied()
    }
}
