//! Domain model for journal reviews.
//!
//! # Responsibility
//! - Define the record shape persisted in the review collection.
//! - Keep validation rules next to the data they guard.
//!
//! # Invariants
//! - Collection position is the only ordering; records carry no rank field.
//! - Deletion is a hard removal from the collection.

pub mod review;
