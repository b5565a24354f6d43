//! Random question generation.

use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::model::{FactorPair, MAX_FACTOR, MIN_FACTOR};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("no numbers selected")]
    EmptySelection,

    #[error("selected number {0} is outside 1..=10")]
    OutOfRange(u8),
}

/// Draw a factor pair: the first factor uniformly from `selected`, the second
/// uniformly from `MIN_FACTOR..=MAX_FACTOR`.
///
/// # Errors
///
/// Returns `GeneratorError::EmptySelection` if `selected` is empty, or
/// `GeneratorError::OutOfRange` if the drawn number is not a valid factor.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    selected: &[u8],
) -> Result<FactorPair, GeneratorError> {
    let num1 = *selected.choose(rng).ok_or(GeneratorError::EmptySelection)?;
    let num2 = rng.random_range(MIN_FACTOR..=MAX_FACTOR);
    FactorPair::new(num1, num2).map_err(|_| GeneratorError::OutOfRange(num1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn single_selection_always_fixes_first_factor() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let pair = generate(&mut rng, &[3]).unwrap();
            assert_eq!(pair.num1(), 3);
            assert!((1..=10).contains(&pair.num2()));
        }
    }

    #[test]
    fn draws_cover_selection_and_second_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut firsts = HashSet::new();
        let mut seconds = HashSet::new();
        for _ in 0..2_000 {
            let pair = generate(&mut rng, &[2, 5, 9]).unwrap();
            firsts.insert(pair.num1());
            seconds.insert(pair.num2());
        }
        assert_eq!(firsts, HashSet::from([2, 5, 9]));
        assert_eq!(seconds, (1..=10).collect::<HashSet<u8>>());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(&mut rng, &[]).unwrap_err(),
            GeneratorError::EmptySelection
        );
    }

    #[test]
    fn invalid_selection_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(&mut rng, &[12]).unwrap_err(),
            GeneratorError::OutOfRange(12)
        );
    }
}
