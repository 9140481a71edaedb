//! The live population: spawning, lookup, pairing, and the tick loop.
//!
//! A [`Collection`] owns every entity plus the seeded RNG that drives all
//! randomness (spawn positions, instance speeds, transition draws). One call
//! to [`Collection::tick`] runs the pairing heuristic across the whole
//! population, then advances entities in collection order. The order is
//! observable: earlier entities get first pick of pairing partners.
//!
//! Removal and reset emit [`Effect::Despawn`] so the host can release the
//! visual resources it owns. Friend links are never force-cleared; a link to
//! a removed entity simply stops resolving (lazy invalidation).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ball::BallState;
use crate::entity::{Entity, EntityInit, FriendSnapshot, StepContext};
use crate::names;
use crate::output::{BubbleKind, Effect, SpriteUpdate};
use crate::species::{
    self, floor_for, ColorVariant, SizeClass, Theme, NORMAL_SPEED,
};
use crate::transitions::TransitionError;

/// Duration of the pairing acknowledgment bubble.
const FRIEND_BUBBLE_MS: u32 = 2000;
/// Fraction of the arena width random spawn positions are drawn from.
const SPAWN_SPAN: f32 = 0.7;

/// Arena dimensions, in the host's pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    /// Arena width.
    pub width: f32,
    /// Arena height.
    pub height: f32,
}

impl Playfield {
    /// Creates a playfield with the given dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Why a spawn request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The species kind is not in the registry. The caller must not register
    /// the entity and should release any pre-allocated visual resources.
    #[error("invalid species kind {0:?}")]
    UnknownSpecies(String),
    /// The requested color is not valid for the species. Direct spawn aborts
    /// instead of normalizing.
    #[error("invalid color {color} for species {species}")]
    InvalidColor {
        /// Species the color was checked against.
        species: String,
        /// The rejected variant.
        color: ColorVariant,
    },
    /// An entity with this name already lives in the collection.
    #[error("an entity named {0:?} already exists")]
    DuplicateName(String),
}

/// A request to spawn one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    /// Species kind (registry key).
    pub species: String,
    /// Color variant; must be valid for the species.
    pub color: ColorVariant,
    /// Rendered size class.
    pub size: SizeClass,
    /// Display name; a default name is drawn when `None`.
    pub name: Option<String>,
    /// Starting left position; random within the spawn span when `None`.
    pub left: Option<f32>,
    /// Base speed before per-instance randomization; [`NORMAL_SPEED`] when
    /// `None`.
    pub base_speed: Option<f32>,
}

impl SpawnRequest {
    /// A request with default color, medium size, and random name/position.
    #[must_use]
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            color: ColorVariant::Default,
            size: SizeClass::Medium,
            name: None,
            left: None,
            base_speed: None,
        }
    }
}

/// The live population of one arena.
#[derive(Debug)]
pub struct Collection {
    playfield: Playfield,
    theme: Theme,
    entities: Vec<Entity>,
    counter: u64,
    rng: ChaCha8Rng,
}

impl Collection {
    /// Creates an empty collection. The seed fixes every random draw the
    /// simulation makes, so runs are reproducible.
    #[must_use]
    pub fn new(playfield: Playfield, theme: Theme, seed: u64) -> Self {
        Self {
            playfield,
            theme,
            entities: Vec::new(),
            counter: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Arena dimensions.
    #[must_use]
    pub const fn playfield(&self) -> Playfield {
        self.playfield
    }

    /// Arena theme; fixes entity floors at spawn.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the collection holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Monotonic spawn counter, persisted to disambiguate default names
    /// across restarts.
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    pub(crate) fn set_counter(&mut self, counter: u64) {
        self.counter = counter;
    }

    /// Iterates live entities in collection order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Finds an entity by name.
    #[must_use]
    pub fn locate(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    pub(crate) fn locate_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.name() == name)
    }

    /// Spawns a new entity and returns its name.
    ///
    /// # Errors
    ///
    /// Fails on an unknown species, a color invalid for the species (direct
    /// spawn never normalizes), or a duplicate name.
    pub fn spawn(&mut self, request: SpawnRequest) -> Result<String, SpawnError> {
        let config = species::species_config(&request.species)
            .ok_or_else(|| SpawnError::UnknownSpecies(request.species.clone()))?;
        if !config.colors.contains(&request.color) {
            return Err(SpawnError::InvalidColor {
                species: request.species,
                color: request.color,
            });
        }
        let name = self.resolve_name(request.name)?;
        let floor = floor_for(self.theme, request.size);
        let left = request
            .left
            .unwrap_or_else(|| self.rng.gen::<f32>() * self.playfield.width * SPAWN_SPAN);
        let init = EntityInit {
            name: name.clone(),
            species: request.species,
            color: request.color,
            size: request.size,
            generation: config.generation,
            sprite_size: config.sprite_size,
            left,
            bottom: floor,
            floor,
            base_speed: request.base_speed.unwrap_or(NORMAL_SPEED),
            profile: config.profile,
        };
        let entity = Entity::new(init, &self.playfield, &mut self.rng);
        debug!(name = %entity.name(), species = %entity.species(), "spawned entity");
        self.entities.push(entity);
        self.counter += 1;
        Ok(name)
    }

    /// Inserts a recovered entity at a recorded position, without touching
    /// the spawn counter. Colors are normalized rather than rejected on this
    /// path.
    pub(crate) fn insert_recovered(
        &mut self,
        request: SpawnRequest,
        bottom: f32,
    ) -> Result<String, SpawnError> {
        let config = species::species_config(&request.species)
            .ok_or_else(|| SpawnError::UnknownSpecies(request.species.clone()))?;
        let color = species::normalize_color(request.color, &request.species);
        let name = self.resolve_name(request.name)?;
        let floor = floor_for(self.theme, request.size);
        let init = EntityInit {
            name: name.clone(),
            species: request.species,
            color,
            size: request.size,
            generation: config.generation,
            sprite_size: config.sprite_size,
            left: request.left.unwrap_or(0.0),
            bottom,
            floor,
            base_speed: request.base_speed.unwrap_or(NORMAL_SPEED),
            profile: config.profile,
        };
        let entity = Entity::new(init, &self.playfield, &mut self.rng);
        self.entities.push(entity);
        Ok(name)
    }

    fn resolve_name(&mut self, requested: Option<String>) -> Result<String, SpawnError> {
        match requested {
            Some(name) if !name.is_empty() => {
                if self.locate(&name).is_some() {
                    return Err(SpawnError::DuplicateName(name));
                }
                Ok(name)
            }
            _ => {
                let mut name = names::random_name(&mut self.rng).to_owned();
                if self.locate(&name).is_some() {
                    name = format!("{name} {}", self.counter + 1);
                }
                if self.locate(&name).is_some() {
                    return Err(SpawnError::DuplicateName(name));
                }
                Ok(name)
            }
        }
    }

    /// Removes an entity by name, yielding the despawn effect for the host's
    /// teardown. Peers keep their now-stale friend link; it stops resolving
    /// on their next check.
    pub fn remove(&mut self, name: &str) -> Option<Effect> {
        let index = self
            .entities
            .iter()
            .position(|entity| entity.name() == name)?;
        self.entities.remove(index);
        info!(%name, "removed entity");
        Some(Effect::Despawn {
            name: name.to_owned(),
        })
    }

    /// Removes every entity and resets the spawn counter, yielding one
    /// despawn effect per former entity.
    pub fn reset(&mut self) -> Vec<Effect> {
        let effects = self
            .entities
            .drain(..)
            .map(|entity| Effect::Despawn {
                name: entity.name().to_owned(),
            })
            .collect();
        self.counter = 0;
        effects
    }

    /// Preempts the named entity with a swipe, if eligible.
    pub fn swipe(&mut self, name: &str) -> Option<Effect> {
        let playfield = self.playfield;
        self.locate_mut(name)
            .and_then(|entity| entity.trigger_swipe(&playfield))
    }

    /// Sends the named entity after the ball, if chase-eligible.
    pub fn chase(&mut self, name: &str) -> bool {
        let playfield = self.playfield;
        self.locate_mut(name)
            .is_some_and(|entity| entity.trigger_chase(&playfield))
    }

    /// Runs one simulation tick: pairing first, then per-entity advancement
    /// in collection order.
    ///
    /// # Errors
    ///
    /// Propagates [`TransitionError`] when an entity's completing state has
    /// no row in its species' table; this is a data inconsistency, not a
    /// runtime condition to recover from.
    pub fn tick(
        &mut self,
        mut ball: Option<&mut BallState>,
    ) -> Result<Vec<Effect>, TransitionError> {
        let mut effects = self.seek_new_friends();
        for index in 0..self.entities.len() {
            let friend = self.friend_snapshot(index);
            let entity = &mut self.entities[index];
            let mut ctx = StepContext {
                playfield: &self.playfield,
                ball: ball.as_deref_mut(),
                friend,
                rng: &mut self.rng,
                effects: &mut effects,
            };
            entity.tick(&mut ctx)?;
        }
        Ok(effects)
    }

    /// Pairs up friend-less entities. Greedy and order-dependent by design:
    /// candidate A accepts the first chase-eligible, friend-less B whose left
    /// edge falls within `[A.left, A.left + A.width)`. Pairs are mutual and
    /// both parties emit a timed heart bubble.
    pub fn seek_new_friends(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.entities.len() <= 1 {
            // You can't be friends with yourself.
            return effects;
        }
        for a in 0..self.entities.len() {
            if self.entities[a].has_friend() {
                continue;
            }
            let (a_left, a_width) = (self.entities[a].left(), self.entities[a].width());
            for b in 0..self.entities.len() {
                if b == a {
                    continue;
                }
                if self.entities[b].has_friend() || !self.entities[b].can_chase() {
                    continue;
                }
                let b_left = self.entities[b].left();
                if b_left >= a_left && b_left < a_left + a_width {
                    let a_name = self.entities[a].name().to_owned();
                    let b_name = self.entities[b].name().to_owned();
                    self.entities[a].set_friend(b_name.clone());
                    self.entities[b].set_friend(a_name.clone());
                    info!(%a_name, %b_name, "new friendship");
                    for name in [&a_name, &b_name] {
                        effects.push(Effect::SpeechBubble {
                            name: name.clone(),
                            kind: BubbleKind::Heart,
                            duration_ms: FRIEND_BUBBLE_MS,
                        });
                    }
                    effects.push(Effect::Info(format!(
                        "{a_name} is now friends with {b_name}"
                    )));
                    break;
                }
            }
        }
        effects
    }

    /// Calls the roll: one info line per entity, in collection order, using
    /// the species' cry.
    #[must_use]
    pub fn roll_call(&self) -> Vec<Effect> {
        self.entities
            .iter()
            .map(|entity| {
                let cry = species::species_config(entity.species())
                    .map_or("...", |config| config.cry);
                Effect::Info(format!("{}: {cry}", entity.name()))
            })
            .collect()
    }

    /// Snapshots the visual properties of every live entity for the host
    /// renderer.
    #[must_use]
    pub fn sprite_updates(&self) -> Vec<SpriteUpdate> {
        self.entities
            .iter()
            .map(|entity| SpriteUpdate {
                name: entity.name().to_owned(),
                left: entity.left(),
                bottom: entity.bottom(),
                facing: entity.facing(),
                sprite: entity.sprite_label().to_owned(),
            })
            .collect()
    }

    /// Resolves the friend link of the entity at `index` against the current
    /// population. A stale name yields `None`, so the entity acts
    /// friend-less without any cleanup pass.
    fn friend_snapshot(&self, index: usize) -> Option<FriendSnapshot> {
        let friend_name = self.entities[index].friend_name()?;
        let friend = self.entities.iter().find(|e| e.name() == friend_name);
        if friend.is_none() {
            warn!(
                name = %self.entities[index].name(),
                friend = %friend_name,
                "friend no longer resolves"
            );
        }
        friend.map(|friend| FriendSnapshot {
            left: friend.left(),
            playing: friend.is_playing(),
        })
    }
}
