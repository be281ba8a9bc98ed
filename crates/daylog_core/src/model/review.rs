//! Review domain model.
//!
//! # Responsibility
//! - Define the canonical journal entry persisted in the review collection.
//! - Define the enumerated patch surface used by update paths.
//! - Validate user-facing title constraints before any write.
//!
//! # Invariants
//! - `id` is assigned once at creation and never rewritten.
//! - `create_time` is never touched by patches.
//! - `title` is non-empty and at most `MAX_TITLE_CHARS` characters.
//! - Unknown persisted fields survive a read/write cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum title length, counted in characters regardless of width.
pub const MAX_TITLE_CHARS: usize = 14;

/// Opaque review identifier.
///
/// Stored as a plain string so collections written by older builds (which
/// used time-derived ids) stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(String);

impl ReviewId {
    /// Generates a fresh collision-resistant identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ReviewId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ReviewId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ReviewId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Time-of-day slot a review belongs to.
///
/// The presenter labels `High`/`Medium`/`Low` as morning/noon/night.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Persisted as the empty string.
    #[default]
    #[serde(rename = "")]
    None,
    High,
    Medium,
    Low,
}

/// Outcome recorded for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Completed,
    Failed,
}

/// Validation failures for review write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Title exceeds `MAX_TITLE_CHARS`.
    TitleTooLong { chars: usize, max: usize },
}

impl Display for ReviewValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "review title cannot be empty"),
            Self::TitleTooLong { chars, max } => write!(
                f,
                "review title has {chars} characters; at most {max} are allowed"
            ),
        }
    }
}

impl Error for ReviewValidationError {}

/// Checks the title constraints shared by insert and update.
pub fn validate_title(title: &str) -> Result<(), ReviewValidationError> {
    if title.trim().is_empty() {
        return Err(ReviewValidationError::EmptyTitle);
    }
    let chars = title.chars().count();
    if chars > MAX_TITLE_CHARS {
        return Err(ReviewValidationError::TitleTooLong {
            chars,
            max: MAX_TITLE_CHARS,
        });
    }
    Ok(())
}

/// Canonical persisted journal entry.
///
/// Wire names follow the stored collection format (`createTime`, camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    /// `None` reads as completed for every aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    /// Unix epoch milliseconds.
    pub create_time: i64,
    /// Fields this build does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    /// Whether aggregation should count this review as completed.
    pub fn is_completed(&self) -> bool {
        !matches!(self.status, Some(ReviewStatus::Failed))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, Some(ReviewStatus::Failed))
    }

    /// Applies every field of `patch` in order.
    ///
    /// Callers validate the patch first; this never touches `id` or
    /// `create_time`.
    pub fn apply(&mut self, patch: &ReviewPatch) {
        for field in patch.fields() {
            match field {
                ReviewField::Title(title) => self.title = title.clone(),
                ReviewField::Content(content) => self.content = content.clone(),
                ReviewField::Priority(priority) => self.priority = *priority,
                ReviewField::Status(status) => self.status = Some(*status),
            }
        }
    }
}

/// Creation input for a new review.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewDraft {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub status: Option<ReviewStatus>,
    /// Explicit creation time; the store uses the current time when `None`.
    pub create_time: Option<i64>,
}

impl ReviewDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: ReviewStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created_at(mut self, epoch_ms: i64) -> Self {
        self.create_time = Some(epoch_ms);
        self
    }

    pub fn validate(&self) -> Result<(), ReviewValidationError> {
        validate_title(&self.title)
    }
}

/// One updatable review field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewField {
    Title(String),
    Content(String),
    Priority(Priority),
    Status(ReviewStatus),
}

/// Shallow patch: only listed fields change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewPatch {
    fields: Vec<ReviewField>,
}

impl ReviewPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.fields.push(ReviewField::Title(title.into()));
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.fields.push(ReviewField::Content(content.into()));
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.fields.push(ReviewField::Priority(priority));
        self
    }

    pub fn status(mut self, status: ReviewStatus) -> Self {
        self.fields.push(ReviewField::Status(status));
        self
    }

    pub fn fields(&self) -> &[ReviewField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates every title field carried by this patch.
    pub fn validate(&self) -> Result<(), ReviewValidationError> {
        for field in &self.fields {
            if let ReviewField::Title(title) = field {
                validate_title(title)?;
            }
        }
        Ok(())
    }
}

impl From<Vec<ReviewField>> for ReviewPatch {
    fn from(fields: Vec<ReviewField>) -> Self {
        Self { fields }
    }
}
