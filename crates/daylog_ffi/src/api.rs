//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose review CRUD, list gestures and calendar jumps to Dart via FRB.
//! - Own the single list controller so every store write is serialized.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Return values are UTF-8 strings or envelopes with stable meaning.
//! - Record titles and contents are never logged.

use chrono::{FixedOffset, NaiveDate};
use daylog_core::db::open_db;
use daylog_core::{
    core_version as core_version_inner, day_timestamp, init_logging as init_logging_inner,
    navigation_channel, now_epoch_ms, ping as ping_inner, GestureConfig, IntentReceiver,
    IntentSender, KvSlot, ListEffect, ListRow, ListScope, NavigationIntent, Priority, RepoResult,
    Review, ReviewDraft, ReviewId, ReviewListController, ReviewPatch, ReviewRepository,
    ReviewStatus, SlotReviewRepository, SqliteKvSlot, TimerToken, TouchEvent,
};
use log::{info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const STORE_DB_FILE_NAME: &str = "daylog_reviews.sqlite3";
const DATE_FORMAT: &str = "%Y-%m-%d";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<ListSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the SQLite file backing the review store.
///
/// Must be called before the first store access; afterwards only the same
/// path is accepted. Returns empty string on success and error message on
/// failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "store path must not be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    if !requested.is_absolute() {
        return "store path must be absolute".to_string();
    }
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "store path already configured: active={} requested={}",
            active.display(),
            requested.display()
        )
    }
}

/// One review as shown to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub id: String,
    pub title: String,
    pub content: String,
    /// `""|high|medium|low`.
    pub priority: String,
    /// `completed|failed`, or `None` for legacy records.
    pub status: Option<String>,
    pub create_time_ms: i64,
}

/// Review collection envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewListResponse {
    pub items: Vec<ReviewItem>,
    pub message: String,
}

/// Generic action envelope for review CRUD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected review ID when known.
    pub review_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ReviewActionResponse {
    fn success(message: impl Into<String>, review_id: &ReviewId) -> Self {
        Self {
            ok: true,
            review_id: Some(review_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            review_id: None,
            message: message.into(),
        }
    }
}

/// Rendered row of the interactive list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRowItem {
    pub review: ReviewItem,
    pub horizontal_offset: f64,
    pub vertical_displacement: f64,
    pub revealed: bool,
    pub deleting: bool,
}

/// Effect envelope returned by every list interaction.
///
/// `kind` is one of `none|schedule_long_press|haptic|tap|reordered|
/// schedule_removal`. `rows` always carries the post-event list state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEffectResponse {
    pub ok: bool,
    pub kind: String,
    /// Timer token to hand back to `list_long_press_elapsed`.
    pub token: Option<u64>,
    /// Delay before the host calls back.
    pub delay_ms: Option<u64>,
    /// Tapped or removed review.
    pub review_id: Option<String>,
    pub rows: Vec<ListRowItem>,
    pub message: String,
}

impl ListEffectResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            kind: "none".to_string(),
            token: None,
            delay_ms: None,
            review_id: None,
            rows: Vec::new(),
            message: message.into(),
        }
    }
}

/// Returns the full review collection in stored order.
#[flutter_rust_bridge::frb(sync)]
pub fn review_list_all() -> ReviewListResponse {
    match with_session(|session| session.controller.repo().get_all()) {
        Ok(reviews) => ReviewListResponse {
            message: format!("Loaded {} review(s).", reviews.len()),
            items: reviews.iter().map(to_review_item).collect(),
        },
        Err(err) => ReviewListResponse {
            items: Vec::new(),
            message: format!("review_list_all failed: {err}"),
        },
    }
}

/// Appends a new review.
///
/// `day` (`YYYY-MM-DD`) places the record on that local date at the current
/// time of day; `None` stamps it with the current instant.
#[flutter_rust_bridge::frb(sync)]
pub fn review_create(
    title: String,
    content: String,
    priority: String,
    day: Option<String>,
    utc_offset_minutes: i32,
) -> ReviewActionResponse {
    let draft = match build_draft(title, content, &priority, day, utc_offset_minutes) {
        Ok(draft) => draft,
        Err(err) => return ReviewActionResponse::failure(format!("review_create failed: {err}")),
    };
    let result = with_session(|session| {
        let created = session.controller.repo().insert(&draft);
        session.controller.refresh();
        created
    });
    match result {
        Ok(Ok(review)) => ReviewActionResponse::success("Review created.", &review.id),
        Ok(Err(err)) | Err(SessionError::Repo(err)) => {
            ReviewActionResponse::failure(format!("review_create failed: {err}"))
        }
        Err(err) => ReviewActionResponse::failure(format!("review_create failed: {err}")),
    }
}

/// Updates the listed fields of one review; `None` leaves a field unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn review_update(
    id: String,
    title: Option<String>,
    content: Option<String>,
    priority: Option<String>,
    status: Option<String>,
) -> ReviewActionResponse {
    let patch = match build_patch(title, content, priority, status) {
        Ok(patch) => patch,
        Err(err) => return ReviewActionResponse::failure(format!("review_update failed: {err}")),
    };
    let review_id = ReviewId::from(id);
    let result = with_session(|session| {
        let updated = session.controller.repo().update(&review_id, &patch);
        session.controller.refresh();
        updated
    });
    match result {
        Ok(Ok(true)) => ReviewActionResponse::success("Review updated.", &review_id),
        Ok(Ok(false)) => ReviewActionResponse::failure("review_update failed: review not found"),
        Ok(Err(err)) | Err(SessionError::Repo(err)) => {
            ReviewActionResponse::failure(format!("review_update failed: {err}"))
        }
        Err(err) => ReviewActionResponse::failure(format!("review_update failed: {err}")),
    }
}

/// Removes one review immediately, without the list exit animation.
#[flutter_rust_bridge::frb(sync)]
pub fn review_delete(id: String) -> ReviewActionResponse {
    let review_id = ReviewId::from(id);
    let result = with_session(|session| {
        let deleted = session.controller.repo().delete(&review_id);
        session.controller.refresh();
        deleted
    });
    match result {
        Ok(Ok(())) => ReviewActionResponse::success("Review deleted.", &review_id),
        Ok(Err(err)) | Err(SessionError::Repo(err)) => {
            ReviewActionResponse::failure(format!("review_delete failed: {err}"))
        }
        Err(err) => ReviewActionResponse::failure(format!("review_delete failed: {err}")),
    }
}

/// Switches the interactive list to one local day, or to the whole
/// collection when `day` is `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn list_show(day: Option<String>, utc_offset_minutes: i32) -> ListEffectResponse {
    let scope = match day {
        None => Ok(ListScope::All),
        Some(raw) => parse_date(&raw).and_then(|day| {
            parse_offset(utc_offset_minutes).map(|offset| ListScope::Day { day, offset })
        }),
    };
    let scope = match scope {
        Ok(scope) => scope,
        Err(err) => return ListEffectResponse::failure(format!("list_show failed: {err}")),
    };
    respond("list_show", |session| {
        session.controller.show(scope);
        Ok(None)
    })
}

/// Current list rows without changing anything.
#[flutter_rust_bridge::frb(sync)]
pub fn list_rows() -> ListEffectResponse {
    respond("list_rows", |_| Ok(None))
}

/// Forwards one pointer event.
///
/// `phase` is `start|move|end`; `row` is the index of the row under the
/// pointer at touch start.
#[flutter_rust_bridge::frb(sync)]
pub fn list_touch(phase: String, row: u32, x: f64, y: f64) -> ListEffectResponse {
    let (row, x, y) = (row as usize, x as f32, y as f32);
    let event = match phase.trim() {
        "start" => TouchEvent::start(row, x, y),
        "move" => TouchEvent::moved(row, x, y),
        "end" => TouchEvent::end(row, x, y),
        other => {
            return ListEffectResponse::failure(format!(
                "list_touch failed: unsupported phase `{other}`"
            ))
        }
    };
    respond("list_touch", |session| {
        session
            .controller
            .handle_touch(event)
            .map_err(|err| err.to_string())
    })
}

/// Delivers a long-press timer scheduled by a `schedule_long_press` effect.
#[flutter_rust_bridge::frb(sync)]
pub fn list_long_press_elapsed(token: u64, row_height: f64) -> ListEffectResponse {
    respond("list_long_press_elapsed", |session| {
        Ok(session
            .controller
            .long_press_elapsed(TimerToken::from_raw(token), row_height as f32))
    })
}

/// Abandons the in-flight gesture, e.g. when the OS cancels the pointer.
#[flutter_rust_bridge::frb(sync)]
pub fn list_cancel_touch() -> ListEffectResponse {
    respond("list_cancel_touch", |session| {
        session.controller.cancel_touch();
        Ok(None)
    })
}

/// Confirms deletion from the revealed action; the record is removed from
/// storage before the exit animation starts.
#[flutter_rust_bridge::frb(sync)]
pub fn list_confirm_delete(id: String) -> ListEffectResponse {
    let review_id = ReviewId::from(id);
    respond("list_confirm_delete", |session| {
        session
            .controller
            .confirm_delete(&review_id)
            .map_err(|err| err.to_string())
    })
}

/// Dismisses the delete confirmation and closes the row.
#[flutter_rust_bridge::frb(sync)]
pub fn list_cancel_delete(id: String) -> ListEffectResponse {
    let review_id = ReviewId::from(id);
    respond("list_cancel_delete", |session| {
        session.controller.cancel_delete(&review_id);
        Ok(None)
    })
}

/// Drops a deleted row after its exit animation.
#[flutter_rust_bridge::frb(sync)]
pub fn list_removal_elapsed(id: String) -> ListEffectResponse {
    let review_id = ReviewId::from(id);
    respond("list_removal_elapsed", |session| {
        session.controller.removal_elapsed(&review_id);
        Ok(None)
    })
}

/// Posts a calendar jump for the list page to pick up.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_jump_to(day: String) -> String {
    let day = match parse_date(&day) {
        Ok(day) => day,
        Err(err) => return format!("calendar_jump_to failed: {err}"),
    };
    match with_session(|session| session.jump_tx.post(NavigationIntent::JumpToDate(day))) {
        Ok(true) => String::new(),
        Ok(false) => "calendar_jump_to failed: list page is gone".to_string(),
        Err(err) => format!("calendar_jump_to failed: {err}"),
    }
}

/// Takes the newest pending calendar jump as `YYYY-MM-DD`, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn list_take_jump() -> Option<String> {
    with_session(|session| session.jump_rx.take())
        .ok()
        .flatten()
        .map(|NavigationIntent::JumpToDate(day)| day.format(DATE_FORMAT).to_string())
}

/// Slot storage owning its connection, so the session can live in a static.
struct StoreSlot {
    conn: Connection,
}

impl KvSlot for StoreSlot {
    fn read(&self, key: &str) -> RepoResult<Option<String>> {
        SqliteKvSlot::try_new(&self.conn)?.read(key)
    }

    fn write(&self, key: &str, value: &str) -> RepoResult<()> {
        SqliteKvSlot::try_new(&self.conn)?.write(key, value)
    }
}

struct ListSession {
    controller: ReviewListController<SlotReviewRepository<StoreSlot>>,
    jump_tx: IntentSender,
    jump_rx: IntentReceiver,
}

impl ListSession {
    fn open(path: &Path) -> Result<Self, SessionError> {
        let conn = open_db(path).map_err(|err| SessionError::Open(err.to_string()))?;
        SqliteKvSlot::try_new(&conn).map_err(SessionError::Repo)?;
        let repo = SlotReviewRepository::new(StoreSlot { conn });
        let (jump_tx, jump_rx) = navigation_channel();
        info!("event=list_session_open module=ffi status=ok");
        Ok(Self {
            controller: ReviewListController::new(repo, GestureConfig::default()),
            jump_tx,
            jump_rx,
        })
    }
}

#[derive(Debug)]
enum SessionError {
    Open(String),
    Repo(daylog_core::RepoError),
    Poisoned,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(message) => write!(f, "store open failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "list session lock poisoned"),
        }
    }
}

fn with_session<T>(f: impl FnOnce(&mut ListSession) -> T) -> Result<T, SessionError> {
    let mut guard = SESSION.lock().map_err(|_| SessionError::Poisoned)?;
    if guard.is_none() {
        let path = resolve_store_db_path();
        match ListSession::open(&path) {
            Ok(session) => *guard = Some(session),
            Err(err) => {
                warn!("event=list_session_open module=ffi status=error error={err}");
                return Err(err);
            }
        }
    }
    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => Err(SessionError::Open("session unavailable".to_string())),
    }
}

fn respond(
    op: &str,
    f: impl FnOnce(&mut ListSession) -> Result<Option<ListEffect>, String>,
) -> ListEffectResponse {
    let result = with_session(|session| {
        let effect = f(session);
        let rows = session
            .controller
            .rows()
            .iter()
            .map(to_row_item)
            .collect::<Vec<_>>();
        (effect, rows)
    });
    match result {
        Ok((Ok(effect), rows)) => to_effect_response(effect, rows),
        Ok((Err(err), rows)) => ListEffectResponse {
            rows,
            ..ListEffectResponse::failure(format!("{op} failed: {err}"))
        },
        Err(err) => ListEffectResponse::failure(format!("{op} failed: {err}")),
    }
}

fn to_effect_response(effect: Option<ListEffect>, rows: Vec<ListRowItem>) -> ListEffectResponse {
    let mut response = ListEffectResponse {
        ok: true,
        kind: "none".to_string(),
        token: None,
        delay_ms: None,
        review_id: None,
        rows,
        message: String::new(),
    };
    match effect {
        None => {}
        Some(ListEffect::ScheduleLongPress { token, delay_ms }) => {
            response.kind = "schedule_long_press".to_string();
            response.token = Some(token.raw());
            response.delay_ms = Some(delay_ms);
        }
        Some(ListEffect::Haptic) => response.kind = "haptic".to_string(),
        Some(ListEffect::Tap { id }) => {
            response.kind = "tap".to_string();
            response.review_id = Some(id.to_string());
        }
        Some(ListEffect::Reordered { .. }) => response.kind = "reordered".to_string(),
        Some(ListEffect::ScheduleRemoval { id, delay_ms }) => {
            response.kind = "schedule_removal".to_string();
            response.review_id = Some(id.to_string());
            response.delay_ms = Some(delay_ms);
        }
    }
    response
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("DAYLOG_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn build_draft(
    title: String,
    content: String,
    priority: &str,
    day: Option<String>,
    utc_offset_minutes: i32,
) -> Result<ReviewDraft, String> {
    let mut draft = ReviewDraft::new(title.trim())
        .with_content(content)
        .with_priority(parse_priority(priority)?);
    if let Some(raw) = day {
        let day = parse_date(&raw)?;
        let offset = parse_offset(utc_offset_minutes)?;
        draft = draft.created_at(day_timestamp(day, now_epoch_ms(), offset));
    }
    Ok(draft)
}

fn build_patch(
    title: Option<String>,
    content: Option<String>,
    priority: Option<String>,
    status: Option<String>,
) -> Result<ReviewPatch, String> {
    let mut patch = ReviewPatch::new();
    if let Some(title) = title {
        patch = patch.title(title.trim());
    }
    if let Some(content) = content {
        patch = patch.content(content);
    }
    if let Some(priority) = priority {
        patch = patch.priority(parse_priority(&priority)?);
    }
    if let Some(status) = status {
        patch = patch.status(parse_status(&status)?);
    }
    if patch.is_empty() {
        return Err("no fields to update".to_string());
    }
    Ok(patch)
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(Priority::None),
        "high" => Ok(Priority::High),
        "medium" => Ok(Priority::Medium),
        "low" => Ok(Priority::Low),
        other => Err(format!("unsupported priority `{other}`")),
    }
}

fn parse_status(raw: &str) -> Result<ReviewStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "completed" => Ok(ReviewStatus::Completed),
        "failed" => Ok(ReviewStatus::Failed),
        other => Err(format!("unsupported status `{other}`")),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|err| format!("invalid date `{}`: {err}", raw.trim()))
}

fn parse_offset(minutes: i32) -> Result<FixedOffset, String> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| format!("invalid utc offset {minutes} minutes"))
}

fn to_review_item(review: &Review) -> ReviewItem {
    ReviewItem {
        id: review.id.to_string(),
        title: review.title.clone(),
        content: review.content.clone(),
        priority: priority_label(review.priority).to_string(),
        status: review.status.map(|status| status_label(status).to_string()),
        create_time_ms: review.create_time,
    }
}

fn to_row_item(row: &ListRow) -> ListRowItem {
    ListRowItem {
        review: to_review_item(&row.review),
        horizontal_offset: f64::from(row.visual.horizontal_offset),
        vertical_displacement: f64::from(row.visual.vertical_displacement),
        revealed: row.visual.revealed,
        deleting: row.visual.deleting,
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::None => "",
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

fn status_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Completed => "completed",
        ReviewStatus::Failed => "failed",
    }
}
