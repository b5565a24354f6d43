//! Candidate answers for multiple-choice questions.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::FactorPair;

/// Number of buttons shown per question.
pub const CHOICE_COUNT: usize = 4;

/// Upper bound for random top-up candidates.
const FILLER_MAX: i64 = 100;

/// Plausible wrong answers: a neighbouring row or column of the table, or the
/// product nudged by 2 or 10. Non-positive values and the product itself are dropped.
fn distractors(pair: FactorPair) -> Vec<i64> {
    let a = i64::from(pair.num1());
    let b = i64::from(pair.num2());
    let correct = pair.product();

    [
        a * (b + 1),
        a * (b - 1),
        (a + 1) * b,
        (a - 1) * b,
        correct + 2,
        correct - 2,
        correct + 10,
        correct - 10,
    ]
    .into_iter()
    .filter(|v| *v > 0 && *v != correct)
    .collect()
}

/// Build `CHOICE_COUNT` distinct positive candidates, one of which is the
/// product, in uniformly random order.
pub fn build_choices<R: Rng + ?Sized>(rng: &mut R, pair: FactorPair) -> Vec<i64> {
    let mut options = Vec::with_capacity(CHOICE_COUNT);
    options.push(pair.product());

    let mut pool = distractors(pair);
    pool.shuffle(rng);
    for candidate in pool {
        if options.len() == CHOICE_COUNT {
            break;
        }
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }

    while options.len() < CHOICE_COUNT {
        let filler = rng.random_range(1..=FILLER_MAX);
        if !options.contains(&filler) {
            options.push(filler);
        }
    }

    options.shuffle(rng);
    options
}
