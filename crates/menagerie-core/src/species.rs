//! Species registry and arena presentation data.
//!
//! A species fixes an entity's identity for its lifetime: pokedex id, display
//! name, generation, allowed color variants, base sprite dimension, and the
//! sequence profile that selects its transition table. The registry ships a
//! representative subset of the full dex; entries are keyed by the lowercase
//! species kind used in spawn requests and session records.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transitions::SequenceProfile;

/// Base movement speed assigned to spawned entities before per-instance
/// randomization.
pub const NORMAL_SPEED: f32 = 3.0;

/// Color variant of a species' sprite set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorVariant {
    /// The standard palette, available for every species.
    Default,
    /// Shiny palette, available for a handful of species.
    Shiny,
}

impl fmt::Display for ColorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Shiny => f.write_str("shiny"),
        }
    }
}

/// Dex generation a species belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// Generation I.
    Gen1,
    /// Generation II.
    Gen2,
    /// Generation III.
    Gen3,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gen1 => f.write_str("gen1"),
            Self::Gen2 => f.write_str("gen2"),
            Self::Gen3 => f.write_str("gen3"),
        }
    }
}

/// Rendered size class; scales the base sprite dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// Original sprite dimension.
    Nano,
    /// 1.5x scale.
    Small,
    /// 2x scale.
    Medium,
    /// 2.5x scale.
    Large,
}

impl SizeClass {
    /// Scale factor applied to the species' base sprite dimension.
    #[must_use]
    pub const fn scale(self) -> f32 {
        match self {
            Self::Nano => 1.0,
            Self::Small => 1.5,
            Self::Medium => 2.0,
            Self::Large => 2.5,
        }
    }
}

/// Background theme of the arena; fixes the resting baseline per size class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// No background; entities rest at the arena bottom.
    None,
    /// Forest background.
    Forest,
    /// Castle background.
    Castle,
    /// Beach background.
    Beach,
}

/// Vertical resting baseline for a size class under a theme.
#[must_use]
pub fn floor_for(theme: Theme, size: SizeClass) -> f32 {
    match theme {
        Theme::None => 0.0,
        Theme::Forest => match size {
            SizeClass::Small => 30.0,
            SizeClass::Medium => 40.0,
            SizeClass::Large => 65.0,
            SizeClass::Nano => 23.0,
        },
        Theme::Castle | Theme::Beach => match size {
            SizeClass::Small => 60.0,
            SizeClass::Medium => 80.0,
            SizeClass::Large => 120.0,
            SizeClass::Nano => 45.0,
        },
    }
}

/// Immutable configuration of one species.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesConfig {
    /// Pokedex number.
    pub id: u16,
    /// Capitalized display name.
    pub display_name: &'static str,
    /// Dex generation.
    pub generation: Generation,
    /// What the species says on a roll call.
    pub cry: &'static str,
    /// Allowed color variants; the first entry is the normalization fallback.
    pub colors: &'static [ColorVariant],
    /// Base sprite dimension in pixels, before size-class scaling.
    pub sprite_size: u32,
    /// Transition-table profile.
    pub profile: SequenceProfile,
}

const DEFAULT_ONLY: &[ColorVariant] = &[ColorVariant::Default];
const WITH_SHINY: &[ColorVariant] = &[ColorVariant::Default, ColorVariant::Shiny];

macro_rules! species {
    ($key:literal, $id:literal, $name:literal, $gen:ident, $colors:expr, $size:literal, $profile:ident) => {
        (
            $key,
            SpeciesConfig {
                id: $id,
                display_name: $name,
                generation: Generation::$gen,
                cry: concat!($name, "!"),
                colors: $colors,
                sprite_size: $size,
                profile: SequenceProfile::$profile,
            },
        )
    };
}

/// The shipped registry, keyed by lowercase species kind.
static SPECIES: &[(&str, SpeciesConfig)] = &[
    species!("bulbasaur", 1, "Bulbasaur", Gen1, DEFAULT_ONLY, 32, Docile),
    species!("ivysaur", 2, "Ivysaur", Gen1, DEFAULT_ONLY, 32, Docile),
    species!("venusaur", 3, "Venusaur", Gen1, DEFAULT_ONLY, 64, Docile),
    species!("charmander", 4, "Charmander", Gen1, DEFAULT_ONLY, 32, Playful),
    species!("charmeleon", 5, "Charmeleon", Gen1, DEFAULT_ONLY, 32, Playful),
    species!("charizard", 6, "Charizard", Gen1, WITH_SHINY, 64, Playful),
    species!("squirtle", 7, "Squirtle", Gen1, DEFAULT_ONLY, 32, Docile),
    species!("wartortle", 8, "Wartortle", Gen1, DEFAULT_ONLY, 32, Docile),
    species!("blastoise", 9, "Blastoise", Gen1, DEFAULT_ONLY, 64, Docile),
    species!("caterpie", 10, "Caterpie", Gen1, DEFAULT_ONLY, 32, Climber),
    species!("pikachu", 25, "Pikachu", Gen1, WITH_SHINY, 32, Playful),
    species!("meowth", 52, "Meowth", Gen1, DEFAULT_ONLY, 32, Playful),
    species!("psyduck", 54, "Psyduck", Gen1, DEFAULT_ONLY, 32, Docile),
    species!("machop", 66, "Machop", Gen1, DEFAULT_ONLY, 32, Climber),
    species!("geodude", 74, "Geodude", Gen1, DEFAULT_ONLY, 32, Climber),
    species!("eevee", 133, "Eevee", Gen1, WITH_SHINY, 32, Playful),
    species!("snorlax", 143, "Snorlax", Gen1, DEFAULT_ONLY, 64, Docile),
    species!("chikorita", 152, "Chikorita", Gen2, DEFAULT_ONLY, 32, Docile),
    species!("cyndaquil", 155, "Cyndaquil", Gen2, DEFAULT_ONLY, 32, Playful),
    species!("totodile", 158, "Totodile", Gen2, DEFAULT_ONLY, 32, Playful),
    species!("togepi", 175, "Togepi", Gen2, DEFAULT_ONLY, 32, Docile),
    species!("steelix", 208, "Steelix", Gen2, DEFAULT_ONLY, 64, Climber),
    species!("treecko", 252, "Treecko", Gen3, DEFAULT_ONLY, 32, Climber),
    species!("torchic", 255, "Torchic", Gen3, DEFAULT_ONLY, 32, Playful),
    species!("mudkip", 258, "Mudkip", Gen3, DEFAULT_ONLY, 32, Docile),
    species!("ralts", 280, "Ralts", Gen3, DEFAULT_ONLY, 32, Docile),
];

/// Looks up a species by kind.
#[must_use]
pub fn species_config(kind: &str) -> Option<&'static SpeciesConfig> {
    SPECIES
        .iter()
        .find(|(key, _)| *key == kind)
        .map(|(_, config)| config)
}

/// The species used when none is specified.
#[must_use]
pub const fn default_species() -> &'static str {
    "bulbasaur"
}

/// Picks a registered species kind uniformly at random.
#[must_use]
pub fn random_species(rng: &mut ChaCha8Rng) -> &'static str {
    SPECIES
        .choose(rng)
        .map_or_else(default_species, |(key, _)| key)
}

/// Color variants a species may spawn with. Unknown species get the default
/// variant only, matching the import path's permissiveness.
#[must_use]
pub fn available_colors(kind: &str) -> &'static [ColorVariant] {
    species_config(kind).map_or(DEFAULT_ONLY, |config| config.colors)
}

/// Normalizes a color against a species' allowed variants, silently
/// substituting the first valid variant. Import/recovery path only; direct
/// spawn rejects invalid colors instead.
#[must_use]
pub fn normalize_color(color: ColorVariant, kind: &str) -> ColorVariant {
    let colors = available_colors(kind);
    if colors.contains(&color) {
        color
    } else {
        colors[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn registry_lookup() {
        let bulbasaur = species_config("bulbasaur").unwrap();
        assert_eq!(bulbasaur.id, 1);
        assert_eq!(bulbasaur.generation, Generation::Gen1);
        assert_eq!(bulbasaur.cry, "Bulbasaur!");
        assert!(species_config("missingno").is_none());
    }

    #[test]
    fn normalize_keeps_valid_colors() {
        assert_eq!(
            normalize_color(ColorVariant::Shiny, "pikachu"),
            ColorVariant::Shiny
        );
    }

    #[test]
    fn normalize_substitutes_invalid_colors() {
        assert_eq!(
            normalize_color(ColorVariant::Shiny, "bulbasaur"),
            ColorVariant::Default
        );
        assert_eq!(
            normalize_color(ColorVariant::Shiny, "missingno"),
            ColorVariant::Default
        );
    }

    #[test]
    fn floors_depend_on_theme_and_size() {
        assert!((floor_for(Theme::None, SizeClass::Large) - 0.0).abs() < f32::EPSILON);
        assert!((floor_for(Theme::Forest, SizeClass::Nano) - 23.0).abs() < f32::EPSILON);
        assert!((floor_for(Theme::Castle, SizeClass::Large) - 120.0).abs() < f32::EPSILON);
        assert!(
            (floor_for(Theme::Beach, SizeClass::Medium) - floor_for(Theme::Castle, SizeClass::Medium))
                .abs()
                < f32::EPSILON
        );
    }

    #[test]
    fn random_species_is_registered() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..20 {
            let kind = random_species(&mut rng);
            assert!(species_config(kind).is_some());
        }
    }

    #[test]
    fn size_scales_are_monotonic() {
        assert!(SizeClass::Nano.scale() < SizeClass::Small.scale());
        assert!(SizeClass::Small.scale() < SizeClass::Medium.scale());
        assert!(SizeClass::Medium.scale() < SizeClass::Large.scale());
    }
}
