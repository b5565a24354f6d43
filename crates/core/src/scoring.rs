//! Per-question scoring: a fixed base for correct answers plus a speed bonus.

/// Points for any correct answer before the speed bonus.
pub const CORRECT_BASE: i32 = 100;

/// Points for a wrong answer, regardless of timing. Also the lowest possible
/// per-question score.
pub const WRONG_PENALTY: i32 = -50;

/// `(exclusive upper bound in ms, bonus)` pairs, fastest tier first.
pub const SPEED_BONUS_TIERS: [(u64, i32); 3] = [(2_000, 50), (4_000, 20), (7_000, 5)];

/// Score one answer.
#[must_use]
pub fn score(is_correct: bool, time_taken_ms: u64) -> i32 {
    if !is_correct {
        return WRONG_PENALTY;
    }
    CORRECT_BASE + speed_bonus(time_taken_ms)
}

/// Bonus for a correct answer given in `time_taken_ms`.
#[must_use]
pub fn speed_bonus(time_taken_ms: u64) -> i32 {
    SPEED_BONUS_TIERS
        .iter()
        .find(|(upper, _)| time_taken_ms < *upper)
        .map_or(0, |(_, bonus)| *bonus)
}
