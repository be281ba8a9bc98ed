//! Touch gesture interpretation for the review list.
//!
//! # Responsibility
//! - Classify raw touch sequences into swipe, tap and reorder gestures.
//! - Project in-flight reorder drags without touching storage.
//!
//! # Invariants
//! - Gesture code is synchronous and storage-free; commits are applied by
//!   the list service.

pub mod machine;
pub mod reorder;

/// Tuning constants for gestures and list animations.
///
/// Distances are in presenter units, delays in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Hold time before a touch turns into a reorder drag.
    pub long_press_ms: u64,
    /// Vertical travel that hands an armed touch back to list scrolling.
    pub scroll_slop: f32,
    /// Largest leftward offset a row follows while swiping.
    pub max_reveal: f32,
    /// Leftward release distance that must be exceeded to reveal.
    pub reveal_threshold: f32,
    /// Resting offset magnitude of a revealed row.
    pub revealed_offset: f32,
    /// Exit animation length before a deleted row leaves the list.
    pub delete_animation_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            scroll_slop: 10.0,
            max_reveal: 100.0,
            reveal_threshold: 60.0,
            revealed_offset: 80.0,
            delete_animation_ms: 300,
        }
    }
}
