//! Local-day queries over review snapshots.
//!
//! # Responsibility
//! - Filter a collection snapshot down to one local day for the list view.
//! - Stamp reviews added while a given day is on screen.
//!
//! # Invariants
//! - Functions are pure over the snapshot they receive; storage is never
//!   read here.
//! - Local dates are computed in the caller-supplied UTC offset.

use crate::model::review::Review;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const MS_PER_SECOND: i64 = 1_000;

/// Local calendar date of an epoch-millisecond timestamp.
pub fn local_date(epoch_ms: i64, offset: FixedOffset) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(epoch_ms).map(|utc| utc.with_timezone(&offset).date_naive())
}

/// Reviews created on `day`, in collection order.
pub fn reviews_on_day(reviews: &[Review], day: NaiveDate, offset: FixedOffset) -> Vec<Review> {
    reviews
        .iter()
        .filter(|review| local_date(review.create_time, offset) == Some(day))
        .cloned()
        .collect()
}

/// Creation timestamp for a review added while `day` is on screen.
///
/// Combines `day` with the current local time of day (whole seconds), so
/// entries added to the same day keep their insertion order.
pub fn day_timestamp(day: NaiveDate, now_ms: i64, offset: FixedOffset) -> i64 {
    let time = DateTime::from_timestamp_millis(now_ms)
        .map(|utc| utc.with_timezone(&offset).time())
        .and_then(|time| NaiveTime::from_hms_opt(time.hour(), time.minute(), time.second()))
        .unwrap_or(NaiveTime::MIN);
    local_ms(day.and_time(time), offset)
}

fn local_ms(local: NaiveDateTime, offset: FixedOffset) -> i64 {
    local.and_utc().timestamp_millis() - i64::from(offset.local_minus_utc()) * MS_PER_SECOND
}
