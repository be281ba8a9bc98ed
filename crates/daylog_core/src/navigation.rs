//! One-shot navigation intents between screens.
//!
//! # Responsibility
//! - Carry "open the list at this date" requests from the calendar screen
//!   to the list screen.
//!
//! # Invariants
//! - Exactly one receiver exists per channel.
//! - `take` clears what it returns; a delivered intent is never seen twice.
//! - When several intents are pending, only the newest one is delivered.

use chrono::NaiveDate;
use std::sync::mpsc::{self, Receiver, Sender};

/// Request to show a screen in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Show the daily list for `date`.
    JumpToDate(NaiveDate),
}

/// Producer half; cheap to clone across screens.
#[derive(Debug, Clone)]
pub struct IntentSender {
    inner: Sender<NavigationIntent>,
}

/// Single consumer half, owned by the screen that acts on intents.
#[derive(Debug)]
pub struct IntentReceiver {
    inner: Receiver<NavigationIntent>,
}

/// Creates a connected sender/receiver pair.
pub fn navigation_channel() -> (IntentSender, IntentReceiver) {
    let (tx, rx) = mpsc::channel();
    (IntentSender { inner: tx }, IntentReceiver { inner: rx })
}

impl IntentSender {
    /// Posts an intent. Returns `false` when the receiver is gone.
    pub fn post(&self, intent: NavigationIntent) -> bool {
        self.inner.send(intent).is_ok()
    }
}

impl IntentReceiver {
    /// Drains pending intents and returns the newest one.
    pub fn take(&self) -> Option<NavigationIntent> {
        self.inner.try_iter().last()
    }
}
