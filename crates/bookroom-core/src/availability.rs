//! Availability engine: one-hour slot generation from availability blocks.
//!
//! Pure function of its inputs; no store access. The presentation layer
//! calls this when a client opens an availability block, and again whenever
//! a fresh snapshot arrives.

use crate::calendar::{CalendarEntry, ClockTime, TimeSlot};

/// Generate the bookable one-hour slots inside `block`, excluding hours
/// already covered by a booked entry on the same date.
///
/// Slots are hour-aligned: the block's minutes are ignored and candidates
/// run over `[start_hour, end_hour)` in ascending order. A candidate is
/// excluded when a booked entry on the block's `start_date` either matches
/// its boundaries exactly or spans the candidate hour (multi-hour
/// bookings).
///
/// Multi-day blocks generate slots for `start_date` only; booking lookups
/// use `start_date` as well. This is a known limitation carried over from
/// the original behavior, not decomposition-per-day.
///
/// A block whose `start_hour >= end_hour`, or an entry that is not an
/// availability block, yields no slots.
pub fn generate_slots(block: &CalendarEntry, entries: &[CalendarEntry]) -> Vec<TimeSlot> {
    if !block.is_available_block() {
        return Vec::new();
    }

    let start_hour = block.start_time.hour();
    let end_hour = block.end_time.hour();

    let booked: Vec<&CalendarEntry> = entries
        .iter()
        .filter(|e| e.is_booked() && e.start_date == block.start_date)
        .collect();

    let mut slots = Vec::new();
    for hour in start_hour..end_hour {
        let start_time = ClockTime::on_hour(hour);
        let end_time = ClockTime::on_hour(hour + 1);

        let taken = booked.iter().any(|b| {
            (b.start_time == start_time && b.end_time == end_time)
                || (b.start_time.hour() <= hour && b.end_time.hour() > hour)
        });

        if !taken {
            slots.push(TimeSlot {
                start_time,
                end_time,
                start_date: block.start_date,
                end_date: block.end_date,
                parent_id: block.id.clone(),
            });
        }
    }

    slots
}
