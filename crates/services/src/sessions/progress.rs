/// Live numbers shown on the quiz screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgress {
    pub answered: usize,
    pub correct: usize,
    pub wrong: usize,
    /// Raw sum of record scores; may be negative mid-run.
    pub running_score: i64,
    /// Seconds to display: remaining in timed mode, elapsed in count mode.
    pub clock_secs: u32,
    /// 0.0 ..= 100.0
    pub percent: f64,
}
