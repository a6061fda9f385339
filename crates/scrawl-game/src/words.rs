//! The word bank: static categorized vocabulary.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Every category with its words. Static configuration data — the bank is
/// read-only shared state.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "animals",
        &[
            "cat", "dog", "elephant", "giraffe", "lion", "tiger", "bear",
            "penguin", "dolphin", "butterfly", "owl", "rabbit", "fox",
            "wolf", "deer", "squirrel", "mouse", "rat", "hamster",
            "guinea pig",
        ],
    ),
    (
        "objects",
        &[
            "house", "car", "tree", "sun", "moon", "star", "book", "phone",
            "computer", "chair", "table", "bed", "lamp", "clock", "mirror",
            "window", "door", "key", "lock", "umbrella",
        ],
    ),
    (
        "food",
        &[
            "pizza", "hamburger", "apple", "banana", "orange", "strawberry",
            "cake", "ice cream", "bread", "cheese", "milk", "coffee", "tea",
            "water", "juice", "soup", "salad", "rice", "pasta", "chicken",
        ],
    ),
    (
        "nature",
        &[
            "flower", "grass", "mountain", "ocean", "river", "lake",
            "forest", "beach", "cloud", "rain", "snow", "wind", "fire",
            "earth", "sky", "rainbow", "thunder", "lightning", "storm",
            "sunset",
        ],
    ),
    (
        "activities",
        &[
            "swimming", "running", "jumping", "dancing", "singing",
            "reading", "writing", "painting", "cooking", "cleaning",
            "shopping", "driving", "flying", "walking", "sleeping",
            "eating", "drinking", "playing", "working", "studying",
        ],
    ),
];

/// The flattened pool, category boundaries erased.
pub fn all_words() -> Vec<&'static str> {
    CATEGORIES
        .iter()
        .flat_map(|(_, words)| words.iter().copied())
        .collect()
}

/// Picks `n` distinct words uniformly at random from the flattened pool.
pub fn pick_words<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<String> {
    all_words()
        .choose_multiple(rng, n)
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pool_has_no_duplicates() {
        let mut words = all_words();
        let total = words.len();
        words.sort_unstable();
        words.dedup();
        assert_eq!(words.len(), total);
    }

    #[test]
    fn test_pick_words_returns_distinct_words() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = pick_words(&mut rng, 3);
            assert_eq!(picked.len(), 3);
            assert_ne!(picked[0], picked[1]);
            assert_ne!(picked[0], picked[2]);
            assert_ne!(picked[1], picked[2]);
        }
    }

    #[test]
    fn test_pick_words_draws_from_the_pool() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = all_words();
        for word in pick_words(&mut rng, 10) {
            assert!(pool.contains(&word.as_str()), "{word} not in pool");
        }
    }
}
