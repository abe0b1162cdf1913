use serde::Serialize;
use time::{Duration, OffsetDateTime};

use super::overlap::intervals_overlap;

/// A candidate, fixed-duration booking window. Wire form is a pair of
/// RFC 3339 UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

impl Slot {
    pub fn overlaps(&self, other_start: OffsetDateTime, other_end: OffsetDateTime) -> bool {
        intervals_overlap(self.start_time, self.end_time, other_start, other_end)
    }
}

/// Walk forward from `window_start` in increments of `duration`, emitting
/// contiguous back-to-back candidates `[cursor, cursor + duration)`. A slot
/// must fit entirely inside the window; there is no partial trailing slot.
/// Output is ascending by construction. An empty or inverted window yields
/// nothing.
pub fn generate_slots(
    window_start: OffsetDateTime,
    window_end: OffsetDateTime,
    duration: Duration,
) -> Vec<Slot> {
    let mut slots = Vec::new();
    if duration <= Duration::ZERO {
        return slots;
    }

    let mut cursor = window_start;
    while cursor + duration <= window_end {
        slots.push(Slot {
            start_time: cursor,
            end_time: cursor + duration,
        });
        cursor += duration;
    }
    slots
}
