use chrono::{FixedOffset, NaiveDate, TimeZone};
use daylog_core::db::open_db_in_memory;
use daylog_core::{
    GestureConfig, GesturePhase, ListEffect, ListScope, ReorderOutcome, Review, ReviewDraft,
    ReviewListController, ReviewRepository, SlotReviewRepository, SqliteKvSlot, TimerToken,
    TouchEvent,
};

const ROW: f32 = 72.0;

fn titles(reviews: &[Review]) -> Vec<&str> {
    reviews.iter().map(|r| r.title.as_str()).collect()
}

fn row_titles<R: ReviewRepository>(list: &ReviewListController<R>) -> Vec<String> {
    list.rows().iter().map(|r| r.review.title.clone()).collect()
}

fn press<R: ReviewRepository>(list: &mut ReviewListController<R>, row: usize) -> TimerToken {
    let y = row as f32 * ROW + ROW / 2.0;
    match list.handle_touch(TouchEvent::start(row, 150.0, y)).unwrap() {
        Some(ListEffect::ScheduleLongPress { token, .. }) => token,
        other => panic!("unexpected effect: {other:?}"),
    }
}

fn drag<R: ReviewRepository>(
    list: &mut ReviewListController<R>,
    row: usize,
    delta_y: f32,
) -> Option<ListEffect> {
    let y = row as f32 * ROW + ROW / 2.0;
    let token = press(list, row);
    assert_eq!(list.long_press_elapsed(token, ROW), Some(ListEffect::Haptic));
    list.handle_touch(TouchEvent::moved(row, 150.0, y + delta_y))
        .unwrap();
    list.handle_touch(TouchEvent::end(row, 150.0, y + delta_y))
        .unwrap()
}

fn swipe<R: ReviewRepository>(list: &mut ReviewListController<R>, row: usize, distance: f32) {
    let y = row as f32 * ROW + ROW / 2.0;
    press(list, row);
    list.handle_touch(TouchEvent::moved(row, 150.0 - distance, y))
        .unwrap();
    list.handle_touch(TouchEvent::end(row, 150.0 - distance, y))
        .unwrap();
}

#[test]
fn drag_first_row_to_end_then_delete_middle() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    repo.insert(&ReviewDraft::new("t1")).unwrap();
    let b = repo.insert(&ReviewDraft::new("t2")).unwrap();
    repo.insert(&ReviewDraft::new("t3")).unwrap();
    assert_eq!(titles(&repo.get_all()), vec!["t1", "t2", "t3"]);

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    let effect = drag(&mut list, 0, ROW * 2.0);

    match effect {
        Some(ListEffect::Reordered { reviews }) => {
            assert_eq!(titles(&reviews), vec!["t2", "t3", "t1"])
        }
        other => panic!("unexpected effect: {other:?}"),
    }
    assert_eq!(titles(&repo.get_all()), vec!["t2", "t3", "t1"]);
    assert!(list
        .rows()
        .iter()
        .all(|row| row.visual.vertical_displacement == 0.0));

    let effect = list.confirm_delete(&b.id).unwrap();
    assert_eq!(
        effect,
        Some(ListEffect::ScheduleRemoval {
            id: b.id.clone(),
            delay_ms: 300
        })
    );
    assert_eq!(titles(&repo.get_all()), vec!["t3", "t1"]);
    assert!(list.rows()[0].visual.deleting);
    assert_eq!(row_titles(&list), vec!["t2", "t3", "t1"]);

    list.removal_elapsed(&b.id);
    assert_eq!(row_titles(&list), vec!["t3", "t1"]);
}

#[test]
fn in_flight_drag_displaces_rows_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    for title in ["a", "b", "c", "d"] {
        repo.insert(&ReviewDraft::new(title)).unwrap();
    }
    let before = repo.get_all();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    let token = press(&mut list, 3);
    list.long_press_elapsed(token, ROW);
    let y = 3.0 * ROW + ROW / 2.0;
    list.handle_touch(TouchEvent::moved(3, 150.0, y - ROW * 2.0))
        .unwrap();

    let displacements: Vec<f32> = list
        .rows()
        .iter()
        .map(|row| row.visual.vertical_displacement)
        .collect();
    assert_eq!(displacements, vec![0.0, ROW, ROW, -ROW * 2.0]);
    assert_eq!(list.gesture_phase(), GesturePhase::Dragging);
    assert_eq!(repo.get_all(), before);
}

#[test]
fn drag_released_in_place_does_not_write() {
    let conn = open_db_in_memory().unwrap();
    let slot = SqliteKvSlot::try_new(&conn).unwrap();
    let repo = SlotReviewRepository::new(&slot);
    repo.insert(&ReviewDraft::new("a")).unwrap();
    repo.insert(&ReviewDraft::new("b")).unwrap();
    conn.execute("UPDATE kv_slots SET updated_at = 0", []).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    assert_eq!(drag(&mut list, 1, ROW * 0.3), None);

    let updated_at: i64 = conn
        .query_row("SELECT updated_at FROM kv_slots", [], |row| row.get(0))
        .unwrap();
    assert_eq!(updated_at, 0);
    assert_eq!(row_titles(&list), vec!["a", "b"]);
}

#[test]
fn only_one_row_stays_revealed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    repo.insert(&ReviewDraft::new("a")).unwrap();
    repo.insert(&ReviewDraft::new("b")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    swipe(&mut list, 0, 90.0);
    assert!(list.rows()[0].visual.revealed);
    assert_eq!(list.rows()[0].visual.horizontal_offset, -80.0);

    swipe(&mut list, 1, 70.0);
    assert!(!list.rows()[0].visual.revealed);
    assert_eq!(list.rows()[0].visual.horizontal_offset, 0.0);
    assert!(list.rows()[1].visual.revealed);

    swipe(&mut list, 1, 30.0);
    assert!(list.rows().iter().all(|row| !row.visual.revealed));
}

#[test]
fn tap_emits_review_and_collapses_reveal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    let a = repo.insert(&ReviewDraft::new("a")).unwrap();
    repo.insert(&ReviewDraft::new("b")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    swipe(&mut list, 1, 90.0);
    press(&mut list, 0);
    let effect = list
        .handle_touch(TouchEvent::end(0, 150.0, ROW / 2.0))
        .unwrap();

    assert_eq!(effect, Some(ListEffect::Tap { id: a.id }));
    assert!(list.rows().iter().all(|row| !row.visual.revealed));
}

#[test]
fn cancel_delete_closes_row_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    let a = repo.insert(&ReviewDraft::new("a")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    swipe(&mut list, 0, 90.0);
    list.cancel_delete(&a.id);

    assert_eq!(list.rows()[0].visual.horizontal_offset, 0.0);
    assert!(!list.rows()[0].visual.revealed);
    assert_eq!(repo.get_all().len(), 1);
}

#[test]
fn delete_cancels_gesture_on_that_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    let a = repo.insert(&ReviewDraft::new("a")).unwrap();
    repo.insert(&ReviewDraft::new("b")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    let token = press(&mut list, 0);
    list.confirm_delete(&a.id).unwrap();

    assert_eq!(list.gesture_phase(), GesturePhase::Idle);
    assert_eq!(list.long_press_elapsed(token, ROW), None);

    // Rows playing their exit animation ignore new touches.
    assert_eq!(
        list.handle_touch(TouchEvent::start(0, 150.0, ROW / 2.0))
            .unwrap(),
        None
    );
}

#[test]
fn removal_after_reload_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    let a = repo.insert(&ReviewDraft::new("a")).unwrap();
    repo.insert(&ReviewDraft::new("b")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    list.confirm_delete(&a.id).unwrap();
    list.reload();
    list.removal_elapsed(&a.id);

    assert_eq!(row_titles(&list), vec!["b"]);
}

#[test]
fn reorder_within_day_keeps_other_days_in_place() {
    let utc8 = FixedOffset::east_opt(8 * 3600).unwrap();
    let at = |day: u32, hour: u32| {
        utc8.with_ymd_and_hms(2026, 1, day, hour, 0, 0)
            .unwrap()
            .timestamp_millis()
    };
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    repo.insert(&ReviewDraft::new("d18-a").created_at(at(18, 8)))
        .unwrap();
    repo.insert(&ReviewDraft::new("d19-x").created_at(at(19, 8)))
        .unwrap();
    repo.insert(&ReviewDraft::new("d18-b").created_at(at(18, 12)))
        .unwrap();
    repo.insert(&ReviewDraft::new("d18-c").created_at(at(18, 21)))
        .unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    list.show(ListScope::Day {
        day: NaiveDate::from_ymd_opt(2026, 1, 18).unwrap(),
        offset: utc8,
    });
    assert_eq!(row_titles(&list), vec!["d18-a", "d18-b", "d18-c"]);

    drag(&mut list, 2, -ROW * 2.0);

    assert_eq!(row_titles(&list), vec!["d18-c", "d18-a", "d18-b"]);
    assert_eq!(
        titles(&repo.get_all()),
        vec!["d18-c", "d19-x", "d18-a", "d18-b"]
    );
}

#[test]
fn stale_reorder_writes_nothing_and_reloads() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    let a = repo.insert(&ReviewDraft::new("a")).unwrap();
    repo.insert(&ReviewDraft::new("b")).unwrap();
    repo.insert(&ReviewDraft::new("c")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    repo.delete(&a.id).unwrap();

    assert_eq!(list.commit_reorder(2, 0).unwrap(), ReorderOutcome::Stale);
    assert_eq!(titles(&repo.get_all()), vec!["b", "c"]);
    assert_eq!(row_titles(&list), vec!["b", "c"]);
}

#[test]
fn touch_on_deleting_row_cancels_pending_long_press() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    repo.insert(&ReviewDraft::new("t1")).unwrap();
    let b = repo.insert(&ReviewDraft::new("t2")).unwrap();
    repo.insert(&ReviewDraft::new("t3")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    list.confirm_delete(&b.id).unwrap();

    // The end event of this sequence never arrives.
    let stale = press(&mut list, 0);
    let effect = list
        .handle_touch(TouchEvent::start(1, 150.0, ROW * 1.5))
        .unwrap();

    assert_eq!(effect, None);
    assert_eq!(list.gesture_phase(), GesturePhase::Idle);
    assert_eq!(list.long_press_elapsed(stale, ROW), None);
    assert_eq!(list.gesture_phase(), GesturePhase::Idle);
}

#[test]
fn new_touch_while_armed_moves_long_press_to_new_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    for title in ["a", "b", "c"] {
        repo.insert(&ReviewDraft::new(title)).unwrap();
    }

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    let stale = press(&mut list, 0);
    let fresh = press(&mut list, 2);

    assert_eq!(list.long_press_elapsed(stale, ROW), None);
    assert_eq!(list.gesture_phase(), GesturePhase::Armed);
    assert_eq!(list.long_press_elapsed(fresh, ROW), Some(ListEffect::Haptic));
    assert_eq!(list.gesture_phase(), GesturePhase::Dragging);

    let y = 2.0 * ROW + ROW / 2.0;
    list.handle_touch(TouchEvent::moved(2, 150.0, y - ROW * 2.0))
        .unwrap();
    list.handle_touch(TouchEvent::end(2, 150.0, y - ROW * 2.0))
        .unwrap();
    assert_eq!(titles(&repo.get_all()), vec!["c", "a", "b"]);
}

#[test]
fn new_touch_after_abandoned_swipe_resets_partial_offset() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    repo.insert(&ReviewDraft::new("a")).unwrap();
    repo.insert(&ReviewDraft::new("b")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    let token = press(&mut list, 0);
    list.handle_touch(TouchEvent::moved(0, 110.0, ROW / 2.0))
        .unwrap();
    assert_eq!(list.rows()[0].visual.horizontal_offset, -40.0);

    press(&mut list, 1);

    assert_eq!(list.rows()[0].visual.horizontal_offset, 0.0);
    assert!(!list.rows()[0].visual.revealed);
    assert_eq!(list.long_press_elapsed(token, ROW), None);
    assert_eq!(list.gesture_phase(), GesturePhase::Armed);
}

#[test]
fn refresh_keeps_rows_playing_exit_animation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn).unwrap());
    repo.insert(&ReviewDraft::new("a")).unwrap();
    let b = repo.insert(&ReviewDraft::new("b")).unwrap();
    repo.insert(&ReviewDraft::new("c")).unwrap();

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    list.confirm_delete(&b.id).unwrap();
    repo.insert(&ReviewDraft::new("d")).unwrap();
    list.refresh();

    assert_eq!(row_titles(&list), vec!["a", "b", "c", "d"]);
    assert!(list.rows()[1].visual.deleting);
    assert_eq!(titles(&repo.get_all()), vec!["a", "c", "d"]);

    list.removal_elapsed(&b.id);
    assert_eq!(row_titles(&list), vec!["a", "c", "d"]);
}
