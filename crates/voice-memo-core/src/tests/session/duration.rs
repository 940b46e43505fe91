use crate::format_duration;

/// WHAT: Zero-length capture renders as 0:00
/// WHY: Empty recordings must still display a valid duration
#[test]
fn given_zero_millis_when_formatting_then_zero_duration() {
    assert_eq!(format_duration(0), "0:00");
}

/// WHAT: Seconds are zero-padded to two digits
/// WHY: Durations are displayed as M:SS
#[test]
fn given_sixty_five_seconds_when_formatting_then_padded_seconds() {
    assert_eq!(format_duration(65_000), "1:05");
}

/// WHAT: A rounded value of 60 seconds carries into the minutes
/// WHY: "9:60" is not a valid M:SS rendering
#[test]
fn given_seconds_rounding_to_sixty_when_formatting_then_minute_carried() {
    assert_eq!(format_duration(599_999), "10:00");
    assert_eq!(format_duration(59_500), "1:00");
}

/// WHAT: Seconds round half-up at the 500 ms boundary
/// WHY: Matches the rounding used when the duration was first displayed
#[test]
fn given_half_second_boundaries_when_formatting_then_rounded_half_up() {
    assert_eq!(format_duration(59_499), "0:59");
    assert_eq!(format_duration(1_500), "0:02");
    assert_eq!(format_duration(1_499), "0:01");
}

/// WHAT: Minutes are not capped at 59
/// WHY: Long captures render total minutes, not hours
#[test]
fn given_one_hour_when_formatting_then_sixty_minutes() {
    assert_eq!(format_duration(3_600_000), "60:00");
}
