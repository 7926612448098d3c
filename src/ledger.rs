// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger store: the in-memory transaction collection of the signed-in
//! user, kept in step with the persistence service and with session changes.
//!
//! All operations take `&mut self`, so at most one of them is in flight at a
//! time and responses are applied in the order the operations were issued.
//! A failed operation leaves the collection exactly as it was and reports the
//! failure once to the [`Notifier`].

use crate::error::{LedgerError, Result};
use crate::metrics::Metrics;
use crate::models::{Identity, Transaction, TransactionDraft};
use crate::notify::{Notice, Notifier};
use crate::repository::TransactionRepository;
use crate::session::{AuthProvider, IdentityWatch, SessionTracker};
use once_cell::unsync::OnceCell;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Everything the presentation layer gets to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerView {
    pub transactions: Vec<Transaction>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub is_loading: bool,
}

pub struct LedgerStore {
    session: SessionTracker,
    repository: Arc<dyn TransactionRepository>,
    notifier: Arc<dyn Notifier>,
    identity: Option<Identity>,
    transactions: Vec<Transaction>,
    is_loading: bool,
    initialized: bool,
    revision: u64,
    metrics: OnceCell<Metrics>,
    watch: Option<IdentityWatch>,
}

impl LedgerStore {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        repository: Arc<dyn TransactionRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session: SessionTracker::new(auth),
            repository,
            notifier,
            identity: None,
            transactions: Vec::new(),
            is_loading: true,
            initialized: false,
            revision: 0,
            metrics: OnceCell::new(),
            watch: None,
        }
    }

    /// Resolve the current session, start listening for session changes and
    /// load the signed-in user's transactions. `is_loading` drops to `false`
    /// once this settles, whether or not the load succeeded.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Err(LedgerError::AlreadyInitialized);
        }
        self.initialized = true;
        self.is_loading = true;

        // subscribe before resolving so no transition can slip in between
        self.watch = Some(self.session.watch());
        self.identity = self.session.resolve().await;
        tracing::debug!(identity = ?self.identity, "ledger initialized");

        let outcome = if self.identity.is_some() {
            self.reload().await
        } else {
            Ok(())
        };
        self.is_loading = false;
        outcome
    }

    /// Replace the collection with the persisted transactions of the current
    /// user. Without a user this does nothing. On failure the previous
    /// collection is kept.
    pub async fn reload(&mut self) -> Result<()> {
        let Some(identity) = self.identity.clone() else {
            return Ok(());
        };
        match self.repository.list_transactions(&identity).await {
            Ok(rows) => {
                self.replace_collection(&identity, rows);
                tracing::debug!(
                    owner = %identity,
                    count = self.transactions.len(),
                    "reloaded transactions"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(owner = %identity, error = %err, "fetching transactions failed");
                self.notifier.notify(Notice::FetchFailed);
                Err(LedgerError::FetchFailed(err))
            }
        }
    }

    fn replace_collection(&mut self, identity: &Identity, rows: Vec<Transaction>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(rows.len());
        for tx in rows {
            if tx.owner != identity.id {
                tracing::warn!(id = %tx.id, owner = %tx.owner, "dropping row owned by another user");
                continue;
            }
            if seen.insert(tx.id.clone()) {
                kept.push(tx);
            }
        }
        self.transactions = kept;
        self.touch();
    }

    /// Persist `draft` for the signed-in user. The new record shows up at
    /// the head of the collection only after the service has stored it.
    pub async fn add(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let Some(identity) = self.identity.clone() else {
            self.notifier.notify(Notice::NotAuthenticated);
            return Err(LedgerError::NotAuthenticated);
        };
        match self.repository.insert_transaction(&identity, draft).await {
            Ok(tx) => {
                self.transactions.retain(|t| t.id != tx.id);
                self.transactions.insert(0, tx.clone());
                self.touch();
                self.notifier.notify(Notice::TransactionAdded);
                Ok(tx)
            }
            Err(err) => {
                tracing::warn!(owner = %identity, error = %err, "adding transaction failed");
                self.notifier.notify(Notice::AddFailed);
                Err(LedgerError::AddFailed(err))
            }
        }
    }

    /// Delete the signed-in user's transaction with `id`, matching by
    /// identifier rather than position. An id that is not in the collection
    /// leaves it untouched.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let Some(identity) = self.identity.clone() else {
            self.notifier.notify(Notice::NotAuthenticated);
            return Err(LedgerError::NotAuthenticated);
        };
        match self.repository.delete_transaction(&identity, id).await {
            Ok(()) => {
                let before = self.transactions.len();
                self.transactions.retain(|t| t.id != id);
                if self.transactions.len() != before {
                    self.touch();
                }
                self.notifier.notify(Notice::TransactionDeleted);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(id, owner = %identity, error = %err, "deleting transaction failed");
                self.notifier.notify(Notice::DeleteFailed);
                Err(LedgerError::DeleteFailed(err))
            }
        }
    }

    /// React to a session transition. A different identity (or none) clears
    /// the collection before anything else happens; the same identity again
    /// only refreshes it.
    pub async fn apply_identity_change(&mut self, identity: Option<Identity>) -> Result<()> {
        if identity != self.identity {
            tracing::debug!(from = ?self.identity, to = ?identity, "identity changed");
            self.transactions.clear();
            self.touch();
            self.identity = identity;
        }
        self.reload().await
    }

    /// Apply every session transition queued so far, oldest first. Returns
    /// the last failure, if any, after all of them have been applied.
    pub async fn process_identity_changes(&mut self) -> Result<()> {
        let mut outcome = Ok(());
        while let Some(change) = self.watch.as_mut().and_then(|w| w.try_next()) {
            if let Err(err) = self.apply_identity_change(change).await {
                outcome = Err(err);
            }
        }
        outcome
    }

    /// Wait for the next session transition and apply it. `None` once the
    /// store has been disposed or was never initialized.
    pub async fn next_identity_change(&mut self) -> Option<Result<()>> {
        let change = self.watch.as_mut()?.next().await?;
        Some(self.apply_identity_change(change).await)
    }

    /// Stop listening for session changes. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(mut watch) = self.watch.take() {
            watch.unsubscribe();
            tracing::debug!("ledger store disposed");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.watch.as_ref().is_some_and(|w| w.is_active())
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.metrics.take();
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The first `n` transactions in held order.
    pub fn recent(&self, n: usize) -> &[Transaction] {
        &self.transactions[..n.min(self.transactions.len())]
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Bumped on every change to the collection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Metrics for the current collection, computed at most once per
    /// revision.
    pub fn metrics(&self) -> &Metrics {
        self.metrics
            .get_or_init(|| Metrics::compute(&self.transactions))
    }

    pub fn view(&self) -> LedgerView {
        let m = self.metrics();
        LedgerView {
            transactions: self.transactions.clone(),
            total_income: m.total_income,
            total_expenses: m.total_expenses,
            balance: m.balance,
            is_loading: self.is_loading,
        }
    }
}

impl Drop for LedgerStore {
    fn drop(&mut self) {
        self.dispose();
    }
}
