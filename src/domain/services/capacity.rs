use crate::domain::models::booking::Booking;

/// Occupancy, remaining capacity and fullness are always re-derived from the
/// booking set. Nothing here is ever cached on the session row; persisted
/// counters drift the moment any delete path forgets to maintain them.

pub fn occupancy(bookings: &[Booking]) -> i64 {
    bookings.iter().map(|b| b.number_of_people as i64).sum()
}

/// Seats left given the assigned activity's capacity. A session without an
/// activity has no capacity to offer.
pub fn remaining(max_number: Option<i32>, occupancy: i64) -> i64 {
    match max_number {
        Some(max) => max as i64 - occupancy,
        None => 0,
    }
}

pub fn is_full(max_number: Option<i32>, occupancy: i64) -> bool {
    remaining(max_number, occupancy) <= 0
}
