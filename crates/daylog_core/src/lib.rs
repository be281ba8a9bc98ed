//! Core domain logic for Daylog.
//! This crate owns the review collection and the list gesture rules.

pub mod db;
pub mod gesture;
pub mod journal;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod repo;
pub mod service;

pub use gesture::machine::{
    GestureMachine, GestureOutput, GesturePhase, Point, TimerToken, TouchEvent, TouchPhase,
};
pub use gesture::reorder::{move_item, project, Projection};
pub use gesture::GestureConfig;
pub use journal::{day_timestamp, local_date, reviews_on_day};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::review::{
    Priority, Review, ReviewDraft, ReviewField, ReviewId, ReviewPatch, ReviewStatus,
    ReviewValidationError, MAX_TITLE_CHARS,
};
pub use navigation::{navigation_channel, IntentReceiver, IntentSender, NavigationIntent};
pub use repo::kv_slot::{KvSlot, SqliteKvSlot, REVIEWS_SLOT_KEY};
pub use repo::review_repo::{now_epoch_ms, ReviewRepository, SlotReviewRepository};
pub use repo::{RepoError, RepoResult};
pub use service::review_list::{
    ListEffect, ListError, ListRow, ListScope, ReorderOutcome, ReviewListController, RowVisual,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
