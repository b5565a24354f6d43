/// `mm:ss`, minutes keep growing past an hour.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes:02}:{remainder:02}")
}

/// Seconds with one decimal, e.g. `2.3`.
#[must_use]
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.1}")
}
