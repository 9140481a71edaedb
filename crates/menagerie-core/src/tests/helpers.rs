use crate::collection::{Collection, Playfield, SpawnRequest};
use crate::species::Theme;

pub const ARENA: Playfield = Playfield::new(1000.0, 600.0);

pub fn collection(seed: u64) -> Collection {
    Collection::new(ARENA, Theme::None, seed)
}

/// Spawns a named entity at a fixed position, so tests control the layout.
pub fn spawn_at(
    collection: &mut Collection,
    species: &str,
    name: &str,
    left: f32,
    base_speed: f32,
) -> String {
    let mut request = SpawnRequest::new(species);
    request.name = Some(name.to_owned());
    request.left = Some(left);
    request.base_speed = Some(base_speed);
    collection.spawn(request).expect("spawn failed")
}
