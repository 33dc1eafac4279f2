/// Formats remaining session time as `MM:SS`, or `H:MM:SS` from one hour up.
///
/// Seconds are rounded up, so the label only reads `00:00` once the session
/// has actually arrived.
pub fn format_countdown(remaining_s: f64) -> String {
    let total = if remaining_s.is_finite() && remaining_s > 0.0 {
        remaining_s.ceil() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
