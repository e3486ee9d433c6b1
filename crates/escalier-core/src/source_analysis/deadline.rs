// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Cooperative cancellation for parse entry points.
//!
//! A [`Deadline`] is passed explicitly into every entry point and polled at
//! each loop head. Parsing never blocks or sleeps, so a wall-clock check plus
//! a shared flag is all that is needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A wall-clock limit plus a shareable cancel flag.
///
/// Cloning a `Deadline` shares its cancel flag, so a [`CancelHandle`] taken
/// from any clone stops every parse using it.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use escalier_core::source_analysis::Deadline;
///
/// let deadline = Deadline::after(Duration::from_secs(1));
/// assert!(!deadline.is_expired());
///
/// let handle = deadline.cancel_handle();
/// handle.cancel();
/// assert!(deadline.is_expired());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    expires_at: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Deadline {
    /// A deadline that never expires unless cancelled.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(instant) => Self::at(instant),
            None => Self::none(),
        }
    }

    /// A deadline at a fixed instant.
    #[must_use]
    pub fn at(instant: Instant) -> Self {
        Self {
            expires_at: Some(instant),
            cancelled: Arc::default(),
        }
    }

    /// Returns the instant this deadline expires at, if bounded.
    #[must_use]
    pub const fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Returns a handle that cancels this deadline from another thread.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Returns `true` once the deadline has passed or was cancelled.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        self.expires_at
            .is_some_and(|instant| Instant::now() >= instant)
    }
}

/// Cancels the [`Deadline`] it was taken from.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests cancellation. Parsers notice at their next loop head.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
