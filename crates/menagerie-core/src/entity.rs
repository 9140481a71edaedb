//! One simulated pet: identity, placement, speed, and its state machine.
//!
//! An [`Entity`] owns its current [`ActiveState`] plus an optional one-slot
//! held state (the swipe preemption mechanic). Each tick it either
//! auto-preempts into chase-friend, or advances its current state and handles
//! the complete/cancel outcome:
//!
//! - **Complete**: a held state is restored if present (hold always wins);
//!   otherwise the species transition table picks a successor at random.
//! - **Cancel**: only the pursuit states cancel; they resolve their successor
//!   from the `idle-with-ball` row instead of their own.
//!
//! The friend link is a weak, name-keyed relation. The collection resolves it
//! to a [`FriendSnapshot`] before each tick; a name that no longer resolves
//! simply yields no snapshot and the entity behaves friend-less.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::ball::BallState;
use crate::collection::Playfield;
use crate::output::Effect;
use crate::species::{ColorVariant, Generation, SizeClass};
use crate::state::{is_above_ground, ActiveState, Direction, Facing, FrameResult, StateTag};
use crate::transitions::{SequenceProfile, TransitionError, TransitionTable};

/// Duration of the swipe acknowledgment bubble.
const SWIPE_BUBBLE_MS: u32 = 3000;

/// Positional footprint of an entity, mutated by its states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Horizontal position of the left edge.
    pub left: f32,
    /// Vertical position above the arena bottom.
    pub bottom: f32,
    /// Resting baseline; theme- and size-dependent.
    pub floor: f32,
    /// Bounding width (scaled sprite dimension).
    pub width: f32,
}

/// What an entity can observe about its friend this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriendSnapshot {
    /// The friend's current left edge.
    pub left: f32,
    /// Whether the friend is in a run state (and able to move).
    pub playing: bool,
}

/// Everything a state may touch while advancing one tick.
pub struct StepContext<'a> {
    /// Arena dimensions.
    pub playfield: &'a Playfield,
    /// The thrown ball, if one is in flight.
    pub ball: Option<&'a mut BallState>,
    /// Resolved view of this entity's friend, if the link resolves.
    pub friend: Option<FriendSnapshot>,
    /// Collection-owned RNG.
    pub rng: &'a mut ChaCha8Rng,
    /// Sink for host-visible effects raised mid-tick.
    pub effects: &'a mut Vec<Effect>,
}

/// Validated construction data for an entity. Built by the collection after
/// species/color/name checks.
pub(crate) struct EntityInit {
    pub name: String,
    pub species: String,
    pub color: ColorVariant,
    pub size: SizeClass,
    pub generation: Generation,
    pub sprite_size: u32,
    pub left: f32,
    pub bottom: f32,
    pub floor: f32,
    pub base_speed: f32,
    pub profile: SequenceProfile,
}

/// One simulated pet.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    species: String,
    color: ColorVariant,
    size: SizeClass,
    generation: Generation,
    sprite_size: u32,
    body: Placement,
    speed: f32,
    facing: Direction,
    state: ActiveState,
    held: Option<ActiveState>,
    friend: Option<String>,
    table: TransitionTable,
}

impl Entity {
    /// Builds an entity in its species' starting state, randomizing the
    /// instance speed into `[0.7 x base, 1.3 x base]`.
    pub(crate) fn new(init: EntityInit, playfield: &Playfield, rng: &mut ChaCha8Rng) -> Self {
        let table = TransitionTable::for_profile(init.profile);
        let state = ActiveState::resolve(table.starting_state(), playfield);
        #[allow(clippy::cast_precision_loss)]
        let width = init.sprite_size as f32 * init.size.scale();
        let speed = randomize_speed(init.base_speed, rng);
        Self {
            name: init.name,
            species: init.species,
            color: init.color,
            size: init.size,
            generation: init.generation,
            sprite_size: init.sprite_size,
            body: Placement {
                left: init.left,
                bottom: init.bottom,
                floor: init.floor,
                width,
            },
            speed,
            facing: Direction::Right,
            state,
            held: None,
            friend: None,
            table,
        }
    }

    /// Unique display name within the collection.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Species kind (registry key).
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Color variant chosen at spawn.
    #[must_use]
    pub const fn color(&self) -> ColorVariant {
        self.color
    }

    /// Size class chosen at spawn.
    #[must_use]
    pub const fn size(&self) -> SizeClass {
        self.size
    }

    /// Generation tag carried for the host's asset paths.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Base sprite dimension before size-class scaling.
    #[must_use]
    pub const fn sprite_size(&self) -> u32 {
        self.sprite_size
    }

    /// Horizontal position of the left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.body.left
    }

    /// Vertical position above the arena bottom.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.body.bottom
    }

    /// Resting baseline.
    #[must_use]
    pub const fn floor(&self) -> f32 {
        self.body.floor
    }

    /// Bounding width used by pairing and pursuit arithmetic.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.body.width
    }

    /// Instance speed, fixed at creation.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Persistent facing for the renderer.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Tag of the current state.
    #[must_use]
    pub const fn state_tag(&self) -> StateTag {
        self.state.tag()
    }

    /// Tag of the held (preempted) state, if any.
    #[must_use]
    pub fn held_tag(&self) -> Option<StateTag> {
        self.held.as_ref().map(ActiveState::tag)
    }

    /// Sprite sheet label of the current state.
    #[must_use]
    pub const fn sprite_label(&self) -> &'static str {
        self.state.tag().sprite_label()
    }

    /// Name of the entity's friend, if a link is set. The link is weak: the
    /// named peer may no longer exist.
    #[must_use]
    pub fn friend_name(&self) -> Option<&str> {
        self.friend.as_deref()
    }

    /// Whether a friend link is set (resolved or stale).
    #[must_use]
    pub const fn has_friend(&self) -> bool {
        self.friend.is_some()
    }

    pub(crate) fn set_friend(&mut self, name: impl Into<String>) {
        self.friend = Some(name.into());
    }

    /// Whether the instance speed is non-zero.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.speed.abs() > f32::EPSILON
    }

    /// Whether the entity is in a run state; friends only give chase while
    /// their partner is playing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_moving()
            && matches!(self.state.tag(), StateTag::RunRight | StateTag::RunLeft)
    }

    /// Whether a swipe may preempt the current state.
    #[must_use]
    pub fn can_swipe(&self) -> bool {
        !is_above_ground(self.state.tag())
    }

    /// Whether the entity may pursue a target or be chosen as a pairing
    /// partner.
    #[must_use]
    pub fn can_chase(&self) -> bool {
        !is_above_ground(self.state.tag()) && self.is_moving()
    }

    /// Preempts the current state with a swipe acknowledgment, saving it in
    /// the one-slot hold. Returns the bubble effect, or `None` when the
    /// entity is ineligible or already swiping (the hold slot is never
    /// clobbered).
    pub fn trigger_swipe(&mut self, playfield: &Playfield) -> Option<Effect> {
        if !self.can_swipe() || self.state.tag() == StateTag::Swipe {
            return None;
        }
        let held = std::mem::replace(
            &mut self.state,
            ActiveState::resolve(StateTag::Swipe, playfield),
        );
        self.held = Some(held);
        Some(Effect::SpeechBubble {
            name: self.name.clone(),
            kind: crate::output::BubbleKind::Happy,
            duration_ms: SWIPE_BUBBLE_MS,
        })
    }

    /// Switches into ball pursuit. Returns `false` (without touching the
    /// current state) when the entity is not chase-eligible.
    pub fn trigger_chase(&mut self, playfield: &Playfield) -> bool {
        if !self.can_chase() {
            return false;
        }
        self.state = ActiveState::resolve(StateTag::Chase, playfield);
        true
    }

    /// Exposes the current state tag for the session codec. Held state and
    /// state-local counters are deliberately not captured.
    #[must_use]
    pub const fn capture_state(&self) -> StateTag {
        self.state_tag()
    }

    /// Restores a persisted state tag, discarding any held state. If the
    /// restored state is on the ground the entity is repositioned to its
    /// floor, which may have shifted across sessions with the theme.
    pub fn restore_state(&mut self, tag: StateTag, playfield: &Playfield) {
        self.state = ActiveState::resolve(tag, playfield);
        self.held = None;
        if !is_above_ground(tag) {
            self.body.bottom = self.body.floor;
        }
    }

    /// Advances the entity one tick. See the module docs for the
    /// complete/cancel handling and the auto-preemption rule.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when a completing state has no row in the
    /// species' transition table.
    pub fn tick(&mut self, ctx: &mut StepContext<'_>) -> Result<(), TransitionError> {
        match self.state.facing() {
            Facing::Left => self.facing = Direction::Left,
            Facing::Right => self.facing = Direction::Right,
            Facing::Natural => {}
        }

        // What's my buddy doing? Preempt into chase-friend before evaluating
        // the current state.
        if self.state.tag() != StateTag::ChaseFriend
            && self.is_moving()
            && !is_above_ground(self.state.tag())
        {
            if let Some(friend) = ctx.friend {
                if friend.playing {
                    debug!(name = %self.name, "joining friend's chase");
                    self.state = ActiveState::resolve(StateTag::ChaseFriend, ctx.playfield);
                    return Ok(());
                }
            }
        }

        match self.state.next_frame(&mut self.body, self.speed, ctx) {
            FrameResult::Continue => {}
            FrameResult::Complete => {
                if let Some(held) = self.held.take() {
                    // Resume from a swipe preemption; bypasses the table.
                    self.state = held;
                    return Ok(());
                }
                let from = self.state.tag();
                let next = self.next_state(from, ctx.rng)?;
                debug!(name = %self.name, %from, to = %next, "state transition");
                self.state = ActiveState::resolve(next, ctx.playfield);
            }
            FrameResult::Cancel => {
                if matches!(self.state.tag(), StateTag::Chase | StateTag::ChaseFriend) {
                    let next = self.next_state(StateTag::IdleWithBall, ctx.rng)?;
                    self.state = ActiveState::resolve(next, ctx.playfield);
                }
            }
        }
        Ok(())
    }

    fn next_state(
        &self,
        from: StateTag,
        rng: &mut ChaCha8Rng,
    ) -> Result<StateTag, TransitionError> {
        self.table.next_state(from, rng).ok_or_else(|| TransitionError {
            from,
            species: self.species.clone(),
        })
    }
}

/// Draws an instance speed uniformly from `[0.7 x base, 1.3 x base]`.
fn randomize_speed(base: f32, rng: &mut ChaCha8Rng) -> f32 {
    if base.abs() <= f32::EPSILON {
        return 0.0;
    }
    rng.gen_range(base * 0.7..=base * 1.3)
}
