//! Interactive review list use-case.
//!
//! # Responsibility
//! - Hold the in-memory working copy rendered by the list presenter.
//! - Route touch events through the gesture machine and reflect its output
//!   as per-row visual state.
//! - Commit reorders and deletions to the review repository.
//!
//! # Invariants
//! - At most one row is revealed at a time.
//! - Storage is written only on reorder commit and delete confirmation.
//! - A reorder commit keeps the persisted collection a permutation of
//!   itself; rows outside the visible scope keep their positions.
//! - Deleting a row cancels any gesture in flight on it.

use crate::gesture::machine::{
    GestureMachine, GestureOutput, GesturePhase, TimerToken, TouchEvent, TouchPhase,
};
use crate::gesture::reorder::move_item;
use crate::gesture::GestureConfig;
use crate::journal::reviews_on_day;
use crate::model::review::{Review, ReviewId};
use crate::repo::review_repo::ReviewRepository;
use crate::repo::RepoError;
use chrono::{FixedOffset, NaiveDate};
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Presenter-facing visual state of one row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowVisual {
    /// Swipe offset; `0` at rest, negative when revealing.
    pub horizontal_offset: f32,
    /// Reorder displacement while a drag is in flight.
    pub vertical_displacement: f32,
    /// Delete affordance is exposed.
    pub revealed: bool,
    /// Exit animation is playing; removal is pending.
    pub deleting: bool,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub review: Review,
    pub visual: RowVisual,
}

impl ListRow {
    fn new(review: Review) -> Self {
        Self {
            review,
            visual: RowVisual::default(),
        }
    }
}

/// Which part of the collection the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    Day { day: NaiveDate, offset: FixedOffset },
}

/// Side effects the presenter must carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEffect {
    /// Call `long_press_elapsed(token, ..)` after `delay_ms`.
    ScheduleLongPress { token: TimerToken, delay_ms: u64 },
    /// A drag was armed; play a short vibration.
    Haptic,
    /// The row was tapped; open it for editing.
    Tap { id: ReviewId },
    /// Reorder committed; re-render from this order.
    Reordered { reviews: Vec<Review> },
    /// Call `removal_elapsed(id)` after `delay_ms`.
    ScheduleRemoval { id: ReviewId, delay_ms: u64 },
}

/// Result of releasing a reorder drag.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    /// Released on its own slot; only visuals were reset.
    Unchanged,
    /// New order persisted.
    Committed(Vec<Review>),
    /// A visible review vanished from storage; nothing was written and the
    /// list was reloaded.
    Stale,
}

/// Error for list operations that write storage.
#[derive(Debug)]
pub enum ListError {
    Repo(RepoError),
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ListError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Working list plus gesture state over one review repository.
pub struct ReviewListController<R: ReviewRepository> {
    repo: R,
    machine: GestureMachine,
    rows: Vec<ListRow>,
    scope: ListScope,
}

impl<R: ReviewRepository> ReviewListController<R> {
    /// Creates a controller showing the whole collection.
    pub fn new(repo: R, config: GestureConfig) -> Self {
        let mut controller = Self {
            repo,
            machine: GestureMachine::new(config),
            rows: Vec::new(),
            scope: ListScope::All,
        };
        controller.reload();
        controller
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn scope(&self) -> ListScope {
        self.scope
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.machine.phase()
    }

    /// Reviews in current display order.
    pub fn reviews(&self) -> Vec<Review> {
        self.rows.iter().map(|row| row.review.clone()).collect()
    }

    /// Switches scope and reloads.
    pub fn show(&mut self, scope: ListScope) {
        self.scope = scope;
        self.reload();
    }

    /// Rebuilds the working copy from storage, dropping all visual state.
    pub fn reload(&mut self) {
        let all = self.repo.get_all();
        let visible = match self.scope {
            ListScope::All => all,
            ListScope::Day { day, offset } => reviews_on_day(&all, day, offset),
        };
        self.machine.cancel();
        self.rows = visible.into_iter().map(ListRow::new).collect();
    }

    /// Rebuilds the working copy like [`Self::reload`], keeping rows that
    /// are still playing their exit animation until `removal_elapsed`.
    pub fn refresh(&mut self) {
        let pending: Vec<(usize, ListRow)> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.visual.deleting)
            .map(|(index, row)| (index, row.clone()))
            .collect();
        self.reload();
        for (index, row) in pending {
            if self.position(&row.review.id).is_none() {
                let at = index.min(self.rows.len());
                self.rows.insert(at, row);
            }
        }
    }

    /// Feeds one presenter touch event.
    ///
    /// A start always abandons the previous sequence first, so its pending
    /// long press can no longer arm a drag.
    ///
    /// # Errors
    /// - Storage failures while committing a reorder.
    pub fn handle_touch(&mut self, event: TouchEvent) -> Result<Option<ListEffect>, ListError> {
        if event.phase == TouchPhase::Start {
            self.cancel_touch();
            if !self.is_interactive(event.row) {
                return Ok(None);
            }
        }
        let output = self.machine.handle(event);
        self.apply(output)
    }

    /// Delivers a long-press timer firing scheduled by `ScheduleLongPress`.
    ///
    /// `row_height` is the rendered height of the touched row.
    pub fn long_press_elapsed(&mut self, token: TimerToken, row_height: f32) -> Option<ListEffect> {
        let output = self
            .machine
            .long_press_fired(token, row_height, self.rows.len());
        match output {
            GestureOutput::DragStarted { .. } => Some(ListEffect::Haptic),
            _ => None,
        }
    }

    /// Abandons the in-flight gesture and clears transient offsets.
    pub fn cancel_touch(&mut self) {
        if let Some(row) = self.machine.active_row() {
            if let Some(row) = self.rows.get_mut(row) {
                if !row.visual.revealed {
                    row.visual.horizontal_offset = 0.0;
                }
            }
        }
        self.machine.cancel();
        self.clear_displacements();
    }

    /// Confirms deletion of `id`: storage first, then the exit animation.
    ///
    /// Returns `None` when `id` is not in the working list.
    pub fn confirm_delete(&mut self, id: &ReviewId) -> Result<Option<ListEffect>, ListError> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        self.repo.delete(id)?;

        match self.machine.phase() {
            GesturePhase::Dragging => {
                self.machine.cancel();
                self.clear_displacements();
            }
            _ if self.machine.active_row() == Some(index) => self.machine.cancel(),
            _ => {}
        }

        let visual = &mut self.rows[index].visual;
        visual.deleting = true;
        Ok(Some(ListEffect::ScheduleRemoval {
            id: id.clone(),
            delay_ms: self.machine.config().delete_animation_ms,
        }))
    }

    /// Cancels a pending delete confirmation by closing the row.
    pub fn cancel_delete(&mut self, id: &ReviewId) {
        if let Some(index) = self.position(id) {
            let visual = &mut self.rows[index].visual;
            visual.horizontal_offset = 0.0;
            visual.revealed = false;
        }
    }

    /// Drops a deleted row once its exit animation finished.
    pub fn removal_elapsed(&mut self, id: &ReviewId) {
        let Some(index) = self.position(id) else {
            return;
        };
        if self.machine.phase() != GesturePhase::Idle {
            self.machine.cancel();
            self.clear_displacements();
        }
        self.rows.remove(index);
    }

    fn apply(&mut self, output: GestureOutput) -> Result<Option<ListEffect>, ListError> {
        match output {
            GestureOutput::None | GestureOutput::ScrollYielded { .. } => Ok(None),
            GestureOutput::ScheduleLongPress { token, delay_ms } => {
                Ok(Some(ListEffect::ScheduleLongPress { token, delay_ms }))
            }
            GestureOutput::SwipeMoved { row, offset } => {
                if let Some(row) = self.rows.get_mut(row) {
                    row.visual.horizontal_offset = offset;
                    row.visual.revealed = false;
                }
                Ok(None)
            }
            GestureOutput::SwipeSettled {
                row,
                offset,
                revealed,
            } => {
                for (index, item) in self.rows.iter_mut().enumerate() {
                    if index == row {
                        item.visual.horizontal_offset = offset;
                        item.visual.revealed = revealed;
                    } else {
                        item.visual.horizontal_offset = 0.0;
                        item.visual.revealed = false;
                    }
                }
                Ok(None)
            }
            GestureOutput::Tap { row } => {
                for item in &mut self.rows {
                    item.visual.horizontal_offset = 0.0;
                    item.visual.revealed = false;
                }
                Ok(self
                    .rows
                    .get(row)
                    .map(|item| ListEffect::Tap {
                        id: item.review.id.clone(),
                    }))
            }
            GestureOutput::DragStarted { .. } => Ok(Some(ListEffect::Haptic)),
            GestureOutput::DragMoved(projection) => {
                for (index, item) in self.rows.iter_mut().enumerate() {
                    item.visual.vertical_displacement = projection.displacement(index);
                }
                Ok(None)
            }
            GestureOutput::DragEnded { from, to } => match self.commit_reorder(from, to)? {
                ReorderOutcome::Committed(reviews) => Ok(Some(ListEffect::Reordered { reviews })),
                ReorderOutcome::Unchanged | ReorderOutcome::Stale => Ok(None),
            },
        }
    }

    /// Moves the row at `from` to `to` and persists the resulting order.
    pub fn commit_reorder(&mut self, from: usize, to: usize) -> Result<ReorderOutcome, ListError> {
        self.clear_displacements();
        if from == to || from >= self.rows.len() || to >= self.rows.len() {
            return Ok(ReorderOutcome::Unchanged);
        }

        let mut reordered = self.rows.clone();
        move_item(&mut reordered, from, to);
        let order: Vec<ReviewId> = reordered.iter().map(|row| row.review.id.clone()).collect();

        let Some(merged) = merge_order(self.repo.get_all(), &order) else {
            warn!(
                "event=reorder_commit module=service status=stale from={from} to={to} rows={}",
                self.rows.len()
            );
            self.reload();
            return Ok(ReorderOutcome::Stale);
        };
        self.repo.replace_order(&merged)?;

        self.rows = reordered
            .into_iter()
            .map(|row| ListRow::new(row.review))
            .collect();
        info!(
            "event=reorder_commit module=service status=ok from={from} to={to} rows={}",
            self.rows.len()
        );
        Ok(ReorderOutcome::Committed(self.reviews()))
    }

    fn is_interactive(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|row| !row.visual.deleting)
    }

    fn position(&self, id: &ReviewId) -> Option<usize> {
        self.rows.iter().position(|row| &row.review.id == id)
    }

    fn clear_displacements(&mut self) {
        for row in &mut self.rows {
            row.visual.vertical_displacement = 0.0;
        }
    }
}

/// Rewrites `all` so the records named by `order` appear in that order,
/// occupying the same slots they held before.
///
/// Returns `None` when some id in `order` is missing from `all`.
fn merge_order(all: Vec<Review>, order: &[ReviewId]) -> Option<Vec<Review>> {
    let wanted: HashSet<&ReviewId> = order.iter().collect();
    let mut moving: HashMap<ReviewId, Review> = HashMap::new();
    let mut layout: Vec<Option<Review>> = Vec::with_capacity(all.len());

    for review in all {
        if wanted.contains(&review.id) && !moving.contains_key(&review.id) {
            moving.insert(review.id.clone(), review);
            layout.push(None);
        } else {
            layout.push(Some(review));
        }
    }
    if moving.len() != order.len() {
        return None;
    }

    let mut next = order.iter();
    layout
        .into_iter()
        .map(|slot| match slot {
            Some(review) => Some(review),
            None => next.next().and_then(|id| moving.remove(id)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::merge_order;
    use crate::model::review::{Review, ReviewId};

    fn review(id: &str) -> Review {
        Review {
            id: ReviewId::from(id),
            title: id.to_string(),
            content: String::new(),
            priority: Default::default(),
            status: None,
            create_time: 0,
            extra: Default::default(),
        }
    }

    fn ids(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn merge_keeps_hidden_rows_in_place() {
        let all = vec![review("a"), review("x"), review("b"), review("y"), review("c")];
        let order = vec![ReviewId::from("c"), ReviewId::from("a"), ReviewId::from("b")];
        let merged = merge_order(all, &order).unwrap();
        assert_eq!(ids(&merged), vec!["c", "x", "a", "y", "b"]);
    }

    #[test]
    fn merge_rejects_missing_ids() {
        let all = vec![review("a"), review("b")];
        let order = vec![ReviewId::from("b"), ReviewId::from("gone")];
        assert!(merge_order(all, &order).is_none());
    }
}
