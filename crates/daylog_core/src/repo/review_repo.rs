//! Review collection contract and slot-backed implementation.
//!
//! # Responsibility
//! - Own the durable, ordered review collection.
//! - Serve full snapshots and apply whole-collection writes.
//!
//! # Invariants
//! - Collection order is insertion order until a reorder rewrites it.
//! - `get_all` never fails; unreadable storage reads as an empty collection
//!   and the stored value is left as it was.
//! - `replace_order` persists its input verbatim and does not check that it
//!   is a permutation of the current collection.

use crate::model::review::{Review, ReviewDraft, ReviewId, ReviewPatch};
use crate::repo::kv_slot::{KvSlot, REVIEWS_SLOT_KEY};
use crate::repo::RepoResult;
use log::{debug, error, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

/// Repository interface for the ordered review collection.
pub trait ReviewRepository {
    /// Returns the full collection snapshot in stored order.
    fn get_all(&self) -> Vec<Review>;
    /// Validates and appends a new review, returning the stored record.
    fn insert(&self, draft: &ReviewDraft) -> RepoResult<Review>;
    /// Merges `patch` onto the review with `id`.
    ///
    /// Returns `Ok(false)` without writing when `id` is unknown.
    fn update(&self, id: &ReviewId, patch: &ReviewPatch) -> RepoResult<bool>;
    /// Removes the review with `id`; the collection is rewritten even when
    /// nothing matched.
    fn delete(&self, id: &ReviewId) -> RepoResult<()>;
    /// Persists `reviews` as the new canonical order.
    fn replace_order(&self, reviews: &[Review]) -> RepoResult<()>;
}

impl<R: ReviewRepository + ?Sized> ReviewRepository for &R {
    fn get_all(&self) -> Vec<Review> {
        (**self).get_all()
    }

    fn insert(&self, draft: &ReviewDraft) -> RepoResult<Review> {
        (**self).insert(draft)
    }

    fn update(&self, id: &ReviewId, patch: &ReviewPatch) -> RepoResult<bool> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &ReviewId) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn replace_order(&self, reviews: &[Review]) -> RepoResult<()> {
        (**self).replace_order(reviews)
    }
}

/// Returns the current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Review collection stored as one JSON array inside a key-value slot.
pub struct SlotReviewRepository<S: KvSlot> {
    slot: S,
    clock: fn() -> i64,
}

impl<S: KvSlot> SlotReviewRepository<S> {
    pub fn new(slot: S) -> Self {
        Self::with_clock(slot, now_epoch_ms)
    }

    /// Uses `clock` for `createTime` defaults instead of the system time.
    pub fn with_clock(slot: S, clock: fn() -> i64) -> Self {
        Self { slot, clock }
    }

    /// Reads and decodes the collection, propagating failures.
    ///
    /// A slot that was never written decodes to an empty collection.
    pub fn try_get_all(&self) -> RepoResult<Vec<Review>> {
        match self.slot.read(REVIEWS_SLOT_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, op: &'static str, reviews: &[Review]) -> RepoResult<()> {
        let encoded = serde_json::to_string(reviews)?;
        if let Err(err) = self.slot.write(REVIEWS_SLOT_KEY, &encoded) {
            error!(
                "event=reviews_write module=repo status=error op={op} count={} error={err}",
                reviews.len()
            );
            return Err(err);
        }
        debug!(
            "event=reviews_write module=repo status=ok op={op} count={} bytes={}",
            reviews.len(),
            encoded.len()
        );
        Ok(())
    }
}

impl<S: KvSlot> ReviewRepository for SlotReviewRepository<S> {
    fn get_all(&self) -> Vec<Review> {
        match self.try_get_all() {
            Ok(reviews) => reviews,
            Err(err) => {
                warn!("event=reviews_read module=repo status=error fallback=empty error={err}");
                Vec::new()
            }
        }
    }

    fn insert(&self, draft: &ReviewDraft) -> RepoResult<Review> {
        draft.validate()?;

        let mut reviews = self.get_all();
        let review = Review {
            id: ReviewId::generate(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            priority: draft.priority,
            status: draft.status,
            create_time: draft.create_time.unwrap_or_else(self.clock),
            extra: Default::default(),
        };
        reviews.push(review.clone());
        self.persist("insert", &reviews)?;

        info!(
            "event=review_insert module=repo status=ok id={} count={}",
            review.id,
            reviews.len()
        );
        Ok(review)
    }

    fn update(&self, id: &ReviewId, patch: &ReviewPatch) -> RepoResult<bool> {
        patch.validate()?;

        let mut reviews = self.get_all();
        let Some(review) = reviews.iter_mut().find(|review| &review.id == id) else {
            info!("event=review_update module=repo status=not_found id={id}");
            return Ok(false);
        };
        review.apply(patch);
        self.persist("update", &reviews)?;

        info!(
            "event=review_update module=repo status=ok id={id} fields={}",
            patch.fields().len()
        );
        Ok(true)
    }

    fn delete(&self, id: &ReviewId) -> RepoResult<()> {
        let mut reviews = self.get_all();
        let before = reviews.len();
        reviews.retain(|review| &review.id != id);
        self.persist("delete", &reviews)?;

        info!(
            "event=review_delete module=repo status=ok id={id} removed={}",
            before - reviews.len()
        );
        Ok(())
    }

    fn replace_order(&self, reviews: &[Review]) -> RepoResult<()> {
        self.persist("replace_order", reviews)
    }
}
