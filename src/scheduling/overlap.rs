use time::OffsetDateTime;

/// Half-open interval intersection: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && b_start < a_end`. Strict inequalities mean
/// a reservation ending exactly when another begins does not overlap, so
/// back-to-back bookings are legal.
///
/// Every caller that touches the no-double-booking invariant must go through
/// this function rather than re-deriving the comparison.
pub fn intervals_overlap(
    a_start: OffsetDateTime,
    a_end: OffsetDateTime,
    b_start: OffsetDateTime,
    b_end: OffsetDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}
