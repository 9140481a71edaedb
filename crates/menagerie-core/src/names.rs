//! Default display-name pool for spawned entities.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Names drawn for entities spawned without an explicit name.
pub const DEFAULT_NAMES: [&str; 80] = [
    "Bella", "Charlie", "Molly", "Coco", "Ruby", "Oscar", "Lucy", "Bailey", "Milo", "Daisy",
    "Archie", "Ollie", "Rosie", "Lola", "Frankie", "Roxy", "Poppy", "Luna", "Jack", "Millie",
    "Teddy", "Cooper", "Bear", "Rocky", "Alfie", "Hugo", "Bonnie", "Pepper", "Lily", "Tilly",
    "Leo", "Maggie", "George", "Mia", "Marley", "Harley", "Chloe", "Lulu", "Missy", "Jasper",
    "Billy", "Nala", "Monty", "Ziggy", "Winston", "Zeus", "Zoe", "Stella", "Sasha", "Rusty",
    "Gus", "Baxter", "Dexter", "Willow", "Barney", "Bruno", "Penny", "Honey", "Milly", "Murphy",
    "Simba", "Holly", "Benji", "Henry", "Lilly", "Pippa", "Shadow", "Sam", "Lucky", "Ellie",
    "Duke", "Jessie", "Cookie", "Harvey", "Bruce", "Jax", "Rex", "Louie", "Jet", "Banjo",
];

/// Draws a random default name.
#[must_use]
pub fn random_name(rng: &mut ChaCha8Rng) -> &'static str {
    DEFAULT_NAMES.choose(rng).copied().unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn draws_from_the_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..10 {
            let name = random_name(&mut rng);
            assert!(DEFAULT_NAMES.contains(&name));
        }
    }
}
