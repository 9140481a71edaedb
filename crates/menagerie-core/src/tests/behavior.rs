use glam::Vec2;

use super::helpers::{collection, spawn_at, ARENA};
use crate::ball::BallState;
use crate::output::Effect;
use crate::state::StateTag;

#[test]
fn idle_completes_into_a_walk_after_its_hold_time() {
    let mut c = collection(42);
    let name = spawn_at(&mut c, "bulbasaur", "Bella", 400.0, 3.0);

    for _ in 0..50 {
        c.tick(None).unwrap();
        assert_eq!(c.locate(&name).unwrap().state_tag(), StateTag::SitIdle);
    }
    c.tick(None).unwrap();
    let tag = c.locate(&name).unwrap().state_tag();
    assert!(matches!(tag, StateTag::WalkLeft | StateTag::WalkRight));
}

#[test]
fn swipe_preempts_then_resumes_the_held_state() {
    let mut c = collection(42);
    let name = spawn_at(&mut c, "bulbasaur", "Bella", 400.0, 3.0);

    let effect = c.swipe(&name).unwrap();
    assert!(matches!(
        effect,
        Effect::SpeechBubble { duration_ms: 3000, .. }
    ));
    assert_eq!(c.locate(&name).unwrap().state_tag(), StateTag::Swipe);
    assert_eq!(c.locate(&name).unwrap().held_tag(), Some(StateTag::SitIdle));

    // Swipe holds for 15 ticks, completing on the 16th.
    for _ in 0..16 {
        c.tick(None).unwrap();
    }
    let entity = c.locate(&name).unwrap();
    assert_eq!(entity.state_tag(), StateTag::SitIdle);
    assert!(entity.held_tag().is_none());
}

#[test]
fn chase_captures_the_ball_and_settles_beside_it() {
    let mut c = collection(42);
    // Base speed 10 draws an instance speed in [7, 13], always below the
    // 15-unit catch window, so the approach cannot step over the ball.
    let name = spawn_at(&mut c, "bulbasaur", "Bella", 500.0, 10.0);
    let mut ball = BallState::new(Vec2::new(100.0, 590.0), Vec2::ZERO);

    assert!(c.chase(&name));
    assert_eq!(c.locate(&name).unwrap().state_tag(), StateTag::Chase);

    let mut captured = false;
    for _ in 0..80 {
        let effects = c.tick(Some(&mut ball)).unwrap();
        if effects.iter().any(|e| matches!(e, Effect::HideBall)) {
            captured = true;
            break;
        }
    }
    assert!(captured, "chase never reached the ball");
    assert!(ball.paused);
    assert_eq!(c.locate(&name).unwrap().state_tag(), StateTag::IdleWithBall);
}

#[test]
fn chase_cancels_when_the_ball_is_already_caught() {
    let mut c = collection(42);
    let name = spawn_at(&mut c, "bulbasaur", "Bella", 500.0, 10.0);
    let mut ball = BallState::new(Vec2::new(100.0, 590.0), Vec2::ZERO);
    ball.paused = true;

    assert!(c.chase(&name));
    c.tick(Some(&mut ball)).unwrap();
    let tag = c.locate(&name).unwrap().state_tag();
    assert_ne!(tag, StateTag::Chase);
    assert!(matches!(
        tag,
        StateTag::SitIdle | StateTag::WalkLeft | StateTag::WalkRight
    ));
}

#[test]
fn chase_cancels_when_the_ball_disappears() {
    let mut c = collection(7);
    let name = spawn_at(&mut c, "bulbasaur", "Bella", 500.0, 10.0);

    assert!(c.chase(&name));
    c.tick(None).unwrap();
    assert_ne!(c.locate(&name).unwrap().state_tag(), StateTag::Chase);
}

#[test]
fn zero_speed_entity_refuses_to_chase() {
    let mut c = collection(42);
    let name = spawn_at(&mut c, "bulbasaur", "Statue", 500.0, 0.0);
    assert!(!c.chase(&name));
    assert_eq!(c.locate(&name).unwrap().state_tag(), StateTag::SitIdle);
}

#[test]
fn climb_ascends_to_the_top_threshold() {
    let mut c = collection(42);
    let name = spawn_at(&mut c, "caterpie", "Inch", 10.0, 3.0);
    c.locate_mut(&name)
        .unwrap()
        .restore_state(StateTag::ClimbWallLeft, &ARENA);

    // One unit of height per tick, completing at 100.
    for _ in 0..99 {
        c.tick(None).unwrap();
        assert_eq!(c.locate(&name).unwrap().state_tag(), StateTag::ClimbWallLeft);
    }
    c.tick(None).unwrap();
    let entity = c.locate(&name).unwrap();
    assert!(entity.bottom() >= 100.0);
    assert!(matches!(
        entity.state_tag(),
        StateTag::JumpDownLeft | StateTag::WallHangLeft
    ));
}

#[test]
fn jump_down_clamps_to_the_floor_and_lands() {
    let mut c = collection(42);
    let name = spawn_at(&mut c, "caterpie", "Inch", 10.0, 3.0);
    c.locate_mut(&name)
        .unwrap()
        .restore_state(StateTag::JumpDownLeft, &ARENA);

    c.tick(None).unwrap();
    let entity = c.locate(&name).unwrap();
    assert!((entity.bottom() - entity.floor()).abs() < f32::EPSILON);
    assert_eq!(entity.state_tag(), StateTag::Land);
}

#[test]
fn entity_joins_its_friend_mid_play() {
    let mut c = collection(42);
    let a = spawn_at(&mut c, "pikachu", "Zippy", 100.0, 3.0);
    let b = spawn_at(&mut c, "eevee", "Maple", 800.0, 3.0);
    c.locate_mut(&a).unwrap().set_friend(b.clone());
    c.locate_mut(&b).unwrap().set_friend(a.clone());

    // The friend starts playing; the entity preempts into chase-friend on
    // its next tick.
    c.locate_mut(&b)
        .unwrap()
        .restore_state(StateTag::RunLeft, &ARENA);
    c.tick(None).unwrap();
    assert_eq!(c.locate(&a).unwrap().state_tag(), StateTag::ChaseFriend);

    // Chasing a friend drags the entity toward them.
    let before = c.locate(&a).unwrap().left();
    c.tick(None).unwrap();
    let after = c.locate(&a).unwrap().left();
    assert!(after > before);
}

#[test]
fn friend_chase_cancels_when_the_friend_leaves() {
    let mut c = collection(42);
    let a = spawn_at(&mut c, "pikachu", "Zippy", 100.0, 3.0);
    let b = spawn_at(&mut c, "eevee", "Maple", 800.0, 3.0);
    c.locate_mut(&a).unwrap().set_friend(b.clone());
    c.locate_mut(&b).unwrap().set_friend(a.clone());
    c.locate_mut(&b)
        .unwrap()
        .restore_state(StateTag::RunLeft, &ARENA);
    c.tick(None).unwrap();
    assert_eq!(c.locate(&a).unwrap().state_tag(), StateTag::ChaseFriend);

    c.remove(&b).unwrap();
    c.tick(None).unwrap();
    let entity = c.locate(&a).unwrap();
    assert_ne!(entity.state_tag(), StateTag::ChaseFriend);
    // The stale link stays; it just stops resolving.
    assert_eq!(entity.friend_name(), Some(b.as_str()));
}

#[test]
fn strolls_stay_within_the_arena() {
    let mut c = collection(9);
    let name = spawn_at(&mut c, "bulbasaur", "Bella", 5.0, 10.0);
    c.locate_mut(&name)
        .unwrap()
        .restore_state(StateTag::WalkLeft, &ARENA);

    for _ in 0..300 {
        c.tick(None).unwrap();
        let entity = c.locate(&name).unwrap();
        assert!(entity.left() >= 0.0);
        assert!(entity.left() <= ARENA.width - entity.width());
    }
}
