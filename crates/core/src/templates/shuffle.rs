use rand::Rng;
use rand::seq::SliceRandom;

/// Uniformly permute options into display order.
///
/// Called once per instance; the result is stored on the instance and never
/// recomputed when the same index is shown again.
#[must_use]
pub fn shuffle_options<R: Rng + ?Sized>(mut options: Vec<String>, rng: &mut R) -> Vec<String> {
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn options() -> Vec<String> {
        ["a", "b", "c", "d"].iter().map(ToString::to_string).collect()
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut shuffled = shuffle_options(options(), &mut rng);
        shuffled.sort();
        assert_eq!(shuffled, options());
    }

    #[test]
    fn same_seed_same_order() {
        let a = shuffle_options(options(), &mut StdRng::seed_from_u64(5));
        let b = shuffle_options(options(), &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn first_option_reaches_every_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = [0_u32; 4];
        for _ in 0..400 {
            let shuffled = shuffle_options(options(), &mut rng);
            let pos = shuffled.iter().position(|o| o == "a").unwrap();
            hits[pos] += 1;
        }
        assert!(hits.iter().all(|&h| h > 50), "skewed: {hits:?}");
    }
}
