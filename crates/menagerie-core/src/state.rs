//! Behavioral states for the per-entity finite state machine.
//!
//! Each entity is always in exactly one [`ActiveState`]: a [`StateTag`]
//! identifying the behavior plus the per-kind working data ([`StateData`]).
//! States fall into a few categories:
//!
//! - **Static** (sit-idle, lie, wall-hang, land, swipe, idle-with-ball,
//!   stand): no movement, complete after a fixed number of ticks.
//! - **Directional** (walk/run left/right): horizontal movement that ends at
//!   an arena boundary or by a small per-tick spontaneous-stop chance.
//! - **Vertical** (climb-wall, jump-down): fixed step per tick, ending at a
//!   height threshold or the floor.
//! - **Pursuit** (chase, chase-friend): horizontal homing on a moving target,
//!   which may cancel itself when the target goes away.
//!
//! All per-tick behavior is dispatched through one exhaustive match in
//! [`ActiveState::next_frame`]; there is no state-class hierarchy.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::collection::Playfield;
use crate::entity::{Placement, StepContext};
use crate::output::Effect;

/// Ticks a walk state waits before completing when the entity cannot move.
const WALK_HOLD_TICKS: u32 = 60;
/// Ticks a run state waits before completing when the entity cannot move.
const RUN_HOLD_TICKS: u32 = 130;
/// Per-tick probability that a moving entity stops mid-stroll.
const SPONTANEOUS_STOP_CHANCE: f32 = 0.01;
/// Fraction of the arena width a rightward stroll may reach.
const ARENA_MARGIN: f32 = 0.95;
/// Height at which a wall climb completes.
const CLIMB_TOP: f32 = 100.0;
/// Vertical step per tick while climbing.
const CLIMB_STEP: f32 = 1.0;
/// Vertical step per tick while falling.
const FALL_STEP: f32 = 5.0;
/// Horizontal window ahead of the ball in which a chase captures it.
const CATCH_WINDOW: f32 = 15.0;

/// Speed multiplier applied by the run states.
pub const RUN_MULTIPLIER: f32 = 1.6;

/// Discrete behavior tags. Serialized in kebab-case; these strings are the
/// session-codec state tags and must stay stable across releases.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateTag {
    /// Sitting still, facing right.
    SitIdle,
    /// Walking toward the right arena edge.
    WalkRight,
    /// Walking toward the left arena edge.
    WalkLeft,
    /// Running right (walk with a speed multiplier).
    RunRight,
    /// Running left.
    RunLeft,
    /// Lying down.
    Lie,
    /// Hanging from the left wall.
    WallHangLeft,
    /// Climbing the left wall upward.
    ClimbWallLeft,
    /// Falling back down from the wall.
    JumpDownLeft,
    /// Landing after a fall.
    Land,
    /// Acknowledging a swipe; preempts and later restores the held state.
    Swipe,
    /// Resting next to a captured ball.
    IdleWithBall,
    /// Pursuing the thrown ball.
    Chase,
    /// Running after the entity's friend while the friend plays.
    ChaseFriend,
    /// Standing, facing right.
    StandRight,
    /// Standing, facing left.
    StandLeft,
}

impl StateTag {
    /// Stable kebab-case name used by the session codec.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SitIdle => "sit-idle",
            Self::WalkRight => "walk-right",
            Self::WalkLeft => "walk-left",
            Self::RunRight => "run-right",
            Self::RunLeft => "run-left",
            Self::Lie => "lie",
            Self::WallHangLeft => "wall-hang-left",
            Self::ClimbWallLeft => "climb-wall-left",
            Self::JumpDownLeft => "jump-down-left",
            Self::Land => "land",
            Self::Swipe => "swipe",
            Self::IdleWithBall => "idle-with-ball",
            Self::Chase => "chase",
            Self::ChaseFriend => "chase-friend",
            Self::StandRight => "stand-right",
            Self::StandLeft => "stand-left",
        }
    }

    /// Parses a session tag string. Returns `None` for unknown tags; callers
    /// on the recovery path fall back to [`StateTag::SitIdle`].
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "sit-idle" => Self::SitIdle,
            "walk-right" => Self::WalkRight,
            "walk-left" => Self::WalkLeft,
            "run-right" => Self::RunRight,
            "run-left" => Self::RunLeft,
            "lie" => Self::Lie,
            "wall-hang-left" => Self::WallHangLeft,
            "climb-wall-left" => Self::ClimbWallLeft,
            "jump-down-left" => Self::JumpDownLeft,
            "land" => Self::Land,
            "swipe" => Self::Swipe,
            "idle-with-ball" => Self::IdleWithBall,
            "chase" => Self::Chase,
            "chase-friend" => Self::ChaseFriend,
            "stand-right" => Self::StandRight,
            "stand-left" => Self::StandLeft,
            _ => return None,
        })
    }

    /// Sprite sheet label the host should display for this state.
    #[must_use]
    pub const fn sprite_label(self) -> &'static str {
        match self {
            // swipe reuses the base idle sprite
            Self::SitIdle | Self::Swipe => "idle",
            Self::WalkRight | Self::WalkLeft => "walk",
            Self::RunRight | Self::RunLeft => "walk_fast",
            Self::Lie => "lie",
            Self::WallHangLeft => "wallgrab",
            Self::ClimbWallLeft => "wallclimb",
            Self::JumpDownLeft => "fall_from_grab",
            Self::Land => "land",
            Self::IdleWithBall => "with_ball",
            Self::Chase | Self::ChaseFriend => "run",
            Self::StandRight | Self::StandLeft => "stand",
        }
    }

    /// Ticks a static state holds before completing. Directional states use
    /// this only when the entity's speed is effectively zero.
    #[must_use]
    pub const fn hold_time(self) -> u32 {
        match self {
            Self::SitIdle | Self::Lie | Self::WallHangLeft => 50,
            Self::Land => 10,
            Self::Swipe => 15,
            Self::IdleWithBall => 30,
            Self::StandRight | Self::StandLeft => 60,
            Self::WalkRight | Self::WalkLeft => WALK_HOLD_TICKS,
            Self::RunRight | Self::RunLeft => RUN_HOLD_TICKS,
            // pursuit/vertical states never hold-complete
            _ => 0,
        }
    }

    /// Speed multiplier for directional movement.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::RunRight | Self::RunLeft => RUN_MULTIPLIER,
            _ => 1.0,
        }
    }

    /// Facing the state assumes on entry. Pursuit states update it per tick.
    #[must_use]
    pub const fn initial_facing(self) -> Facing {
        match self {
            Self::SitIdle | Self::Lie | Self::WalkRight | Self::RunRight | Self::JumpDownLeft
            | Self::StandRight => Facing::Right,
            Self::Swipe => Facing::Natural,
            _ => Facing::Left,
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` for states in which the entity is off its floor. Such
/// states block swiping, chasing, and the recovery floor reset.
#[must_use]
pub const fn is_above_ground(tag: StateTag) -> bool {
    matches!(
        tag,
        StateTag::ClimbWallLeft | StateTag::JumpDownLeft | StateTag::Land | StateTag::WallHangLeft
    )
}

/// Per-tick facing requested by a state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Face the left arena edge.
    Left,
    /// Face the right arena edge.
    Right,
    /// Keep whatever facing the entity already has.
    Natural,
}

/// Persistent facing of an entity, reported to the host renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Facing the left arena edge.
    Left,
    /// Facing the right arena edge.
    Right,
}

/// Outcome of advancing a state by one tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameResult {
    /// The state continues next tick.
    Continue,
    /// The state finished; the entity picks a successor.
    Complete,
    /// The state's preconditions vanished; handled outside the normal
    /// transition table.
    Cancel,
}

/// Working data carried by a state while it runs. Discarded on completion.
#[derive(Debug, Clone, PartialEq)]
enum StateData {
    /// Static states: elapsed tick counter against the tag's hold time.
    Hold { elapsed: u32 },
    /// Directional movement. `right_edge` is the arena boundary captured at
    /// state creation for rightward strolls; `None` means leftward.
    Stroll { elapsed: u32, right_edge: Option<f32> },
    /// Climbing up the wall.
    Climb,
    /// Falling back to the floor.
    Fall,
    /// Pursuing the ball.
    ChaseBall,
    /// Pursuing the entity's friend.
    ChaseFriend,
}

/// A live state instance: tag, current facing, and per-kind data.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveState {
    tag: StateTag,
    facing: Facing,
    data: StateData,
}

impl ActiveState {
    /// Resolves a tag into a fresh state instance. This is the state
    /// resolver: every tag maps to exactly one state kind.
    #[must_use]
    pub fn resolve(tag: StateTag, playfield: &Playfield) -> Self {
        let data = match tag {
            StateTag::WalkRight | StateTag::RunRight => StateData::Stroll {
                elapsed: 0,
                right_edge: Some((playfield.width * ARENA_MARGIN).floor()),
            },
            StateTag::WalkLeft | StateTag::RunLeft => StateData::Stroll {
                elapsed: 0,
                right_edge: None,
            },
            StateTag::ClimbWallLeft => StateData::Climb,
            StateTag::JumpDownLeft => StateData::Fall,
            StateTag::Chase => StateData::ChaseBall,
            StateTag::ChaseFriend => StateData::ChaseFriend,
            _ => StateData::Hold { elapsed: 0 },
        };
        Self {
            tag,
            facing: tag.initial_facing(),
            data,
        }
    }

    /// The state's behavior tag.
    #[must_use]
    pub const fn tag(&self) -> StateTag {
        self.tag
    }

    /// The facing currently requested by the state.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Advances the state by one tick, mutating the entity's placement.
    ///
    /// `speed` is the entity's fixed instance speed; a speed of zero turns
    /// directional states into pure hold states.
    pub(crate) fn next_frame(
        &mut self,
        body: &mut Placement,
        speed: f32,
        ctx: &mut StepContext<'_>,
    ) -> FrameResult {
        let moving = speed.abs() > f32::EPSILON;
        match &mut self.data {
            StateData::Hold { elapsed } => {
                *elapsed += 1;
                if *elapsed > self.tag.hold_time() {
                    FrameResult::Complete
                } else {
                    FrameResult::Continue
                }
            }
            StateData::Stroll {
                elapsed,
                right_edge,
            } => {
                *elapsed += 1;
                let step = speed * self.tag.speed_multiplier();
                let limit = ctx.playfield.width - body.width;
                match *right_edge {
                    Some(edge) => {
                        body.left = (body.left + step).clamp(0.0, limit);
                        if moving && ctx.rng.gen::<f32>() < SPONTANEOUS_STOP_CHANCE {
                            return FrameResult::Complete;
                        }
                        if moving && body.left >= edge - body.width {
                            body.left = body.left.min((edge - body.width).max(0.0));
                            return FrameResult::Complete;
                        }
                    }
                    None => {
                        body.left = (body.left - step).clamp(0.0, limit);
                        if moving && ctx.rng.gen::<f32>() < SPONTANEOUS_STOP_CHANCE {
                            return FrameResult::Complete;
                        }
                        if moving && body.left <= 0.0 {
                            body.left = 0.0;
                            return FrameResult::Complete;
                        }
                    }
                }
                if !moving && *elapsed > self.tag.hold_time() {
                    FrameResult::Complete
                } else {
                    FrameResult::Continue
                }
            }
            StateData::Climb => {
                body.bottom += CLIMB_STEP;
                if body.bottom >= CLIMB_TOP {
                    FrameResult::Complete
                } else {
                    FrameResult::Continue
                }
            }
            StateData::Fall => {
                body.bottom -= FALL_STEP;
                if body.bottom <= body.floor {
                    body.bottom = body.floor;
                    FrameResult::Complete
                } else {
                    FrameResult::Continue
                }
            }
            StateData::ChaseBall => {
                let Some(ball) = ctx.ball.as_deref_mut() else {
                    return FrameResult::Cancel;
                };
                if ball.paused {
                    // Someone else caught it first.
                    return FrameResult::Cancel;
                }
                if body.left > ball.position.x {
                    self.facing = Facing::Left;
                    body.left -= speed;
                } else {
                    self.facing = Facing::Right;
                    body.left += speed;
                }
                let clearance = ctx.playfield.height - ball.position.y;
                if clearance < body.width + body.floor
                    && ball.position.x < body.left
                    && body.left < ball.position.x + CATCH_WINDOW
                {
                    ball.paused = true;
                    ctx.effects.push(Effect::HideBall);
                    return FrameResult::Complete;
                }
                FrameResult::Continue
            }
            StateData::ChaseFriend => {
                let Some(friend) = ctx.friend else {
                    return FrameResult::Cancel;
                };
                if !friend.playing {
                    // Friend stopped playing (or left the collection).
                    return FrameResult::Cancel;
                }
                if body.left > friend.left {
                    self.facing = Facing::Left;
                    body.left -= speed;
                } else {
                    self.facing = Facing::Right;
                    body.left += speed;
                }
                FrameResult::Continue
            }
        }
    }
}
