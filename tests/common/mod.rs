// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use fintrack::error::ServiceError;
use fintrack::models::{
    AuthEvent, Identity, Session, Transaction, TransactionDraft, TransactionType,
};
use fintrack::repository::TransactionRepository;
use fintrack::session::{AuthHandler, AuthProvider, Subscription};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn tx(id: &str, kind: TransactionType, amount: &str, category: &str) -> Transaction {
    Transaction {
        id: id.into(),
        r#type: kind,
        amount: dec(amount),
        category: category.into(),
        description: None,
        date: date("2025-01-15"),
        owner: "alice".into(),
        created_at: None,
        updated_at: None,
    }
}

pub fn draft(kind: TransactionType, amount: &str, category: &str, on: &str) -> TransactionDraft {
    TransactionDraft::new(kind, dec(amount), category, date(on))
}

/// In-memory persistence service with switchable failures.
#[derive(Default)]
pub struct ScriptedRepository {
    rows: Mutex<Vec<Transaction>>,
    next_id: AtomicUsize,
    fail_list: AtomicBool,
    fail_insert: AtomicBool,
    fail_delete: AtomicBool,
    pub list_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, owner: &str, kind: TransactionType, amount: &str, category: &str, on: &str) -> String {
        let id = format!("seed-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.rows.lock().unwrap().push(Transaction {
            id: id.clone(),
            r#type: kind,
            amount: dec(amount),
            category: category.into(),
            description: None,
            date: date(on),
            owner: owner.into(),
            created_at: None,
            updated_at: None,
        });
        id
    }

    pub fn fail_list(&self, on: bool) {
        self.fail_list.store(on, Ordering::SeqCst);
    }

    pub fn fail_insert(&self, on: bool) {
        self.fail_insert.store(on, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, on: bool) {
        self.fail_delete.store(on, Ordering::SeqCst);
    }

    pub fn stored(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn holds(&self, id: &str) -> bool {
        self.rows.lock().unwrap().iter().any(|t| t.id == id)
    }
}

#[async_trait]
impl TransactionRepository for ScriptedRepository {
    async fn list_transactions(&self, owner: &Identity) -> Result<Vec<Transaction>, ServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("network down".into()));
        }
        let mut rows: Vec<Transaction> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.owner == owner.id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn insert_transaction(
        &self,
        owner: &Identity,
        draft: TransactionDraft,
    ) -> Result<Transaction, ServiceError> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(ServiceError::Rejected("validation failed".into()));
        }
        let tx = Transaction {
            id: format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            r#type: draft.r#type,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            owner: owner.id.clone(),
            created_at: None,
            updated_at: None,
        };
        self.rows.lock().unwrap().push(tx.clone());
        Ok(tx)
    }

    async fn delete_transaction(&self, owner: &Identity, id: &str) -> Result<(), ServiceError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ServiceError::PermissionDenied("not yours".into()));
        }
        self.rows
            .lock()
            .unwrap()
            .retain(|t| t.id != id || t.owner != owner.id);
        Ok(())
    }
}

/// Auth provider whose session transitions are driven by the test.
#[derive(Default)]
pub struct ScriptedAuth {
    session: Mutex<Option<Session>>,
    handlers: Mutex<Vec<(Subscription, AuthHandler)>>,
    fail_lookup: AtomicBool,
}

impl ScriptedAuth {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: &str) -> Self {
        let auth = Self::default();
        *auth.session.lock().unwrap() = Some(Session::new(Identity::new(user)));
        auth
    }

    pub fn fail_lookup(&self, on: bool) {
        self.fail_lookup.store(on, Ordering::SeqCst);
    }

    pub fn emit(&self, event: AuthEvent) {
        *self.session.lock().unwrap() = match &event {
            AuthEvent::SignedIn(s) | AuthEvent::TokenRefreshed(s) => Some(s.clone()),
            AuthEvent::SignedOut => None,
        };
        for (sub, handler) in self.handlers.lock().unwrap().iter() {
            if sub.is_active() {
                handler(event.clone());
            }
        }
    }

    pub fn sign_in_as(&self, user: &str) {
        self.emit(AuthEvent::SignedIn(Session::new(Identity::new(user))));
    }

    pub fn live_handlers(&self) -> usize {
        self.handlers
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s.is_active())
            .count()
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuth {
    async fn get_session(&self) -> Result<Option<Session>, ServiceError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("auth timeout".into()));
        }
        Ok(self.session.lock().unwrap().clone())
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription {
        let sub = Subscription::new();
        self.handlers.lock().unwrap().push((sub.clone(), handler));
        sub
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }
}
