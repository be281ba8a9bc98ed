//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `daylog_core` linkage.
//! - Replay a fixed insert/drag/delete script against an in-memory store.
//! - Keep output deterministic for quick local sanity checks.

use daylog_core::db::open_db_in_memory;
use daylog_core::{
    GestureConfig, ListEffect, ReviewDraft, ReviewListController, ReviewRepository,
    SlotReviewRepository, SqliteKvSlot, TouchEvent,
};
use std::error::Error;
use std::process::ExitCode;

const ROW_HEIGHT: f32 = 60.0;

fn main() -> ExitCode {
    println!("daylog_core ping={}", daylog_core::ping());
    println!("daylog_core version={}", daylog_core::core_version());

    match run_scenario() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("scenario failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_scenario() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let repo = SlotReviewRepository::new(SqliteKvSlot::try_new(&conn)?);
    for title in ["t1", "t2", "t3"] {
        repo.insert(&ReviewDraft::new(title))?;
    }
    print_order("inserted", &repo);

    let mut list = ReviewListController::new(&repo, GestureConfig::default());
    let start_y = ROW_HEIGHT / 2.0;
    let token = match list.handle_touch(TouchEvent::start(0, 120.0, start_y))? {
        Some(ListEffect::ScheduleLongPress { token, .. }) => token,
        other => return Err(format!("expected long press schedule, got {other:?}").into()),
    };
    list.long_press_elapsed(token, ROW_HEIGHT);
    let end_y = start_y + ROW_HEIGHT * 2.0;
    list.handle_touch(TouchEvent::moved(0, 120.0, end_y))?;
    list.handle_touch(TouchEvent::end(0, 120.0, end_y))?;
    print_order("dragged", &repo);

    let Some(middle) = repo.get_all().into_iter().nth(1) else {
        return Err("collection lost a record".into());
    };
    list.confirm_delete(&middle.id)?;
    print_order("deleted", &repo);
    list.removal_elapsed(&middle.id);
    println!("rows={}", list.rows().len());
    Ok(())
}

fn print_order(step: &str, repo: &impl ReviewRepository) {
    let titles: Vec<String> = repo.get_all().into_iter().map(|r| r.title).collect();
    println!("{step}={}", titles.join(","));
}
