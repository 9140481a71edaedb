//! Pursuit-target state shared with the host's input driver.
//!
//! The host owns the ball: it spawns it from a pointer gesture and integrates
//! its position and velocity between ticks. The core only reads the position
//! and velocity, and sets `paused` exactly once when an entity captures it.
//! Under the single-threaded tick model these writes never interleave; a
//! concurrent port must keep the ball on one owning thread.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The thrown ball entities may chase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    /// Center position, in arena coordinates (y measured from the top, like
    /// the host canvas).
    pub position: Vec2,
    /// Velocity, integrated by the host between ticks.
    pub velocity: Vec2,
    /// Set by the core when an entity captures the ball; a paused ball
    /// cancels any other in-flight chase.
    pub paused: bool,
}

impl BallState {
    /// Creates an un-paused ball.
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            paused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ball_is_live() {
        let ball = BallState::new(Vec2::new(10.0, 20.0), Vec2::new(-1.0, 0.5));
        assert!(!ball.paused);
        assert!((ball.position.x - 10.0).abs() < f32::EPSILON);
    }
}
