const MILLIS_PER_SECOND: u64 = 1_000;
const SECONDS_PER_MINUTE: u64 = 60;

/// Render a capture length as `M:SS`.
///
/// Seconds are rounded half-up; a rounded value of 60 carries into the
/// minutes, so `599_999` renders as `10:00` rather than `9:60`.
pub fn format_duration(millis: u64) -> String {
    let total_seconds = millis.saturating_add(MILLIS_PER_SECOND / 2) / MILLIS_PER_SECOND;
    let minutes = total_seconds / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;

    format!("{minutes}:{seconds:02}")
}
