use crate::session::next_recording_id;

/// WHAT: Consecutive ids are strictly increasing numbers
/// WHY: Ids are time-derived and must stay unique within one millisecond
#[test]
#[allow(clippy::unwrap_used)]
fn given_rapid_calls_when_generating_ids_then_strictly_increasing() {
    // Given/When: Many ids generated back to back
    let ids: Vec<u64> = (0..1_000)
        .map(|_| next_recording_id().parse::<u64>().unwrap())
        .collect();

    // Then: Each id is greater than the previous one
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

/// WHAT: Ids are epoch milliseconds
/// WHY: Ids double as creation timestamps
#[test]
#[allow(clippy::unwrap_used)]
fn given_current_time_when_generating_id_then_id_not_before_now() {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis();

    let id: u128 = next_recording_id().parse().unwrap();

    assert!(id >= now);
}
