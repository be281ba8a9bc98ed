use chrono::{FixedOffset, NaiveDate, TimeZone};
use daylog_core::{day_timestamp, local_date, reviews_on_day, Review, ReviewId};

fn utc8() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> i64 {
    utc8()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
        .timestamp_millis()
}

fn review(title: &str, create_time: i64) -> Review {
    Review {
        id: ReviewId::from(title),
        title: title.to_string(),
        content: String::new(),
        priority: Default::default(),
        status: None,
        create_time,
        extra: Default::default(),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn day_filter_uses_local_calendar_day() {
    let reviews = vec![
        // 07:00 local is still the previous day in UTC.
        review("early", at(2026, 1, 18, 7)),
        review("other", at(2026, 1, 19, 0)),
        review("late", at(2026, 1, 18, 23)),
    ];

    let day = reviews_on_day(&reviews, date(2026, 1, 18), utc8());

    let titles: Vec<&str> = day.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["early", "late"]);
}

#[test]
fn day_filter_depends_on_offset() {
    let reviews = vec![review("edge", at(2026, 1, 18, 7))];
    let utc = FixedOffset::east_opt(0).unwrap();

    assert!(reviews_on_day(&reviews, date(2026, 1, 18), utc).is_empty());
    assert_eq!(reviews_on_day(&reviews, date(2026, 1, 17), utc).len(), 1);
}

#[test]
fn day_timestamp_keeps_time_of_day() {
    let now = at(2026, 1, 20, 9) + 1_234;
    let stamp = day_timestamp(date(2026, 1, 18), now, utc8());

    assert_eq!(stamp, at(2026, 1, 18, 9) + 1_000);
    assert_eq!(local_date(stamp, utc8()), Some(date(2026, 1, 18)));
}

#[test]
fn entries_stamped_later_sort_after_earlier_ones() {
    let day = date(2026, 3, 1);
    let first = day_timestamp(day, at(2026, 3, 5, 8), utc8());
    let second = day_timestamp(day, at(2026, 3, 5, 21), utc8());

    assert!(first < second);
    assert_eq!(local_date(second, utc8()), Some(day));
}
