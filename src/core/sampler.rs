//! Weighted random selection
//!
//! One sampler for every weighted choice in the simulation: stat
//! allocation, perk selection, exploration jitter. Always fed the
//! attempt's injected RNG so outcomes reproduce under a fixed seed.

use rand::Rng;

/// Pick an item from a weighted list
///
/// Returns `None` for an empty list or when no weight is positive.
/// Non-positive weights are treated as unselectable rather than an error.
pub fn weighted_choice<'a, T, R: Rng>(items: &'a [(T, f32)], rng: &mut R) -> Option<&'a T> {
    let total: f32 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let mut roll = rng.gen_range(0.0..total);
    for (item, weight) in items {
        let weight = weight.max(0.0);
        if roll < weight {
            return Some(item);
        }
        roll -= weight;
    }

    // Floating-point edge: the roll landed exactly on the total
    items.iter().rev().find(|(_, w)| *w > 0.0).map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_list_yields_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let items: Vec<(u32, f32)> = vec![];
        assert!(weighted_choice(&items, &mut rng).is_none());
    }

    #[test]
    fn test_zero_weights_yield_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let items = vec![("a", 0.0), ("b", 0.0)];
        assert!(weighted_choice(&items, &mut rng).is_none());
    }

    #[test]
    fn test_single_positive_weight_always_wins() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let items = vec![("never", 0.0), ("always", 1.0), ("negative", -3.0)];
        for _ in 0..50 {
            assert_eq!(weighted_choice(&items, &mut rng), Some(&"always"));
        }
    }

    #[test]
    fn test_heavy_weight_dominates() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let items = vec![("rare", 1.0), ("common", 99.0)];
        let mut common = 0;
        for _ in 0..1000 {
            if weighted_choice(&items, &mut rng) == Some(&"common") {
                common += 1;
            }
        }
        assert!(common > 900, "expected ~990 common picks, got {common}");
    }

    #[test]
    fn test_fixed_seed_reproduces_sequence() {
        let items = vec![("a", 1.0), ("b", 2.0), ("c", 3.0)];
        let picks = |seed: u64| -> Vec<&str> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..20)
                .map(|_| *weighted_choice(&items, &mut rng).unwrap())
                .collect()
        };
        assert_eq!(picks(9), picks(9));
    }
}
