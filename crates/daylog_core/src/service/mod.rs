//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gesture interpretation and repository writes into
//!   presenter-level APIs.
//! - Keep FFI/UI layers decoupled from storage details.

pub mod review_list;
