//! Session persistence: snapshotting a live collection and rebuilding one
//! from a snapshot.
//!
//! The record format keeps positions as decimal strings and the behavior
//! state as its kebab-case tag, so snapshots stay readable and tolerant of
//! hand edits. Recovery is deliberately forgiving where direct spawn is
//! strict: unknown species are dropped with a warning, colors are silently
//! normalized, and an unparseable state tag falls back to sitting idle.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::collection::{Collection, Playfield, SpawnRequest};
use crate::species::{ColorVariant, Generation, SizeClass, Theme};
use crate::state::StateTag;

/// One persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Species kind (registry key).
    pub species: String,
    /// Display name.
    pub name: String,
    /// Color variant, normalized on recovery if no longer valid.
    pub color: ColorVariant,
    /// Species generation, recorded for the host's asset lookup.
    pub generation: Generation,
    /// Native sprite size in pixels.
    pub sprite_size: u32,
    /// Behavior state tag at snapshot time (held state wins over a
    /// transient preemption).
    pub state: String,
    /// Friend link by name, if any.
    pub friend: Option<String>,
    /// Left position as a decimal string.
    pub left: String,
    /// Bottom position as a decimal string.
    pub bottom: String,
}

/// A full session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Per-entity records, in collection order.
    pub records: Vec<EntityRecord>,
    /// Spawn counter at snapshot time.
    pub counter: u64,
}

impl SessionState {
    /// Serializes the snapshot to JSON.
    ///
    /// # Errors
    ///
    /// Fails only if serialization itself fails, which the record types do
    /// not allow in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or records missing required fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Collection {
    /// Snapshots the collection for persistence.
    #[must_use]
    pub fn save_session(&self) -> SessionState {
        let records = self
            .entities()
            .map(|entity| EntityRecord {
                species: entity.species().to_owned(),
                name: entity.name().to_owned(),
                color: entity.color(),
                generation: entity.generation(),
                sprite_size: entity.sprite_size(),
                state: entity.capture_state().as_str().to_owned(),
                friend: entity.friend_name().map(str::to_owned),
                left: format!("{}", entity.left()),
                bottom: format!("{}", entity.bottom()),
            })
            .collect();
        SessionState {
            records,
            counter: self.counter(),
        }
    }

    /// Rebuilds a collection from a snapshot.
    ///
    /// Recovery never aborts on a bad record: unknown species and duplicate
    /// names drop the record, invalid colors are normalized, unparseable
    /// positions land at zero, and an unknown state tag recovers as sitting
    /// idle. A mid-swipe snapshot also recovers as sitting idle, since the
    /// hold slot is not persisted and a bare swipe has no successors. A
    /// friend name that no longer resolves is silently dropped, so the
    /// entity re-enters pairing.
    #[must_use]
    pub fn recover(
        playfield: Playfield,
        theme: Theme,
        size: SizeClass,
        seed: u64,
        state: &SessionState,
    ) -> Self {
        let mut collection = Self::new(playfield, theme, seed);
        let mut restored: Vec<(String, StateTag, Option<String>)> = Vec::new();
        for record in &state.records {
            let left = parse_position(&record.left);
            let bottom = parse_position(&record.bottom);
            let request = SpawnRequest {
                species: record.species.clone(),
                color: record.color,
                size,
                name: Some(record.name.clone()),
                left: Some(left),
                base_speed: None,
            };
            match collection.insert_recovered(request, bottom) {
                Ok(name) => {
                    // Swipe only exists to resume a held state, and the hold
                    // is not persisted; a bare swipe has no table row.
                    let tag = StateTag::parse(&record.state)
                        .filter(|tag| *tag != StateTag::Swipe)
                        .unwrap_or(StateTag::SitIdle);
                    restored.push((name, tag, record.friend.clone()));
                }
                Err(error) => {
                    warn!(name = %record.name, species = %record.species, %error,
                        "dropping unrecoverable session record");
                }
            }
        }
        collection.set_counter(state.counter);
        // States and friend links go in after the whole population exists,
        // so links between surviving records resolve regardless of order.
        for (name, tag, friend) in restored {
            let friend = friend.filter(|peer| collection.locate(peer).is_some());
            if let Some(entity) = collection.locate_mut(&name) {
                entity.restore_state(tag, &playfield);
                if let Some(friend) = friend {
                    entity.set_friend(friend);
                }
            }
        }
        collection
    }
}

fn parse_position(text: &str) -> f32 {
    text.parse().unwrap_or(0.0)
}
