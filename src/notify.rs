// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Notification sink for user-facing outcomes of ledger operations.
//!
//! The ledger store signals each outcome exactly once; message wording is
//! left to whoever renders the notice.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    FetchFailed,
    AddFailed,
    DeleteFailed,
    NotAuthenticated,
    TransactionAdded,
    TransactionDeleted,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::TransactionAdded | Notice::TransactionDeleted)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::FetchFailed => "Failed to fetch transactions",
            Notice::AddFailed => "Failed to add transaction",
            Notice::DeleteFailed => "Failed to delete transaction",
            Notice::NotAuthenticated => "Sign in to manage transactions",
            Notice::TransactionAdded => "Transaction added successfully",
            Notice::TransactionDeleted => "Transaction deleted",
        }
    }
}

/// Receives notices from the ledger store. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Renders notices through `tracing`; failures are also echoed on stderr.
#[derive(Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            tracing::warn!(?notice, "{}", notice.message());
            eprintln!("Error: {}", notice.message());
        } else {
            tracing::info!(?notice, "{}", notice.message());
        }
    }
}

/// Collects notices in memory; used by tests and embedders that poll.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, notice: Notice) -> usize {
        self.notices().iter().filter(|n| **n == notice).count()
    }

    pub fn clear(&self) {
        if let Ok(mut n) = self.notices.lock() {
            n.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut n) = self.notices.lock() {
            n.push(notice);
        }
    }
}
