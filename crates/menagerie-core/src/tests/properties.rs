use proptest::prelude::*;

use super::helpers::ARENA;
use crate::collection::{Collection, SpawnRequest};
use crate::species::Theme;
use crate::state::StateTag;

proptest! {
    #[test]
    fn instance_speed_stays_within_the_randomization_band(
        base in 0.1f32..50.0,
        seed in any::<u64>(),
    ) {
        let mut c = Collection::new(ARENA, Theme::None, seed);
        let mut request = SpawnRequest::new("bulbasaur");
        request.base_speed = Some(base);
        let name = c.spawn(request).unwrap();
        let speed = c.locate(&name).unwrap().speed();
        prop_assert!(speed >= base * 0.7);
        prop_assert!(speed <= base * 1.3);
    }

    #[test]
    fn strolling_never_escapes_the_arena(
        left in 0.0f32..900.0,
        base in 0.1f32..20.0,
        walk_right in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut c = Collection::new(ARENA, Theme::None, seed);
        let mut request = SpawnRequest::new("bulbasaur");
        request.left = Some(left);
        request.base_speed = Some(base);
        let name = c.spawn(request).unwrap();
        let tag = if walk_right { StateTag::WalkRight } else { StateTag::WalkLeft };
        c.locate_mut(&name).unwrap().restore_state(tag, &ARENA);

        for _ in 0..200 {
            c.tick(None).unwrap();
            let entity = c.locate(&name).unwrap();
            prop_assert!(entity.left() >= 0.0);
            prop_assert!(entity.left() <= ARENA.width - entity.width());
        }
    }

    #[test]
    fn pairing_links_are_always_mutual(
        positions in prop::collection::vec(0.0f32..900.0, 2..8),
        seed in any::<u64>(),
    ) {
        let mut c = Collection::new(ARENA, Theme::None, seed);
        for (i, left) in positions.iter().enumerate() {
            let mut request = SpawnRequest::new("bulbasaur");
            request.name = Some(format!("entity-{i}"));
            request.left = Some(*left);
            c.spawn(request).unwrap();
        }
        c.seek_new_friends();

        let links: Vec<(String, Option<String>)> = c
            .entities()
            .map(|e| (e.name().to_owned(), e.friend_name().map(str::to_owned)))
            .collect();
        for (name, friend) in &links {
            if let Some(friend) = friend {
                let back = c.locate(friend).unwrap().friend_name();
                prop_assert_eq!(back, Some(name.as_str()));
            }
        }
    }

    #[test]
    fn session_round_trip_is_lossless_for_tags_and_positions(
        ticks in 0usize..120,
        seed in any::<u64>(),
    ) {
        let mut c = Collection::new(ARENA, Theme::None, seed);
        c.spawn(SpawnRequest::new("bulbasaur")).unwrap();
        c.spawn(SpawnRequest::new("pikachu")).unwrap();
        for _ in 0..ticks {
            c.tick(None).unwrap();
        }

        let saved = c.save_session();
        let json = saved.to_json().unwrap();
        let reloaded = crate::session::SessionState::from_json(&json).unwrap();
        prop_assert_eq!(&reloaded, &saved);

        for (record, entity) in reloaded.records.iter().zip(c.entities()) {
            prop_assert_eq!(record.name.as_str(), entity.name());
            prop_assert_eq!(record.state.as_str(), entity.capture_state().as_str());
            let left: f32 = record.left.parse().unwrap();
            prop_assert!((left - entity.left()).abs() < 1e-3);
        }
    }
}
