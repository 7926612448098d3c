// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session tracking on top of an external auth provider.
//!
//! [`SessionTracker`] resolves the signed-in identity once at startup and
//! relays later session transitions to registered handlers. Every
//! registration hands back a [`Subscription`] that the caller must revoke
//! when it is done listening.

use crate::error::ServiceError;
use crate::models::{AuthEvent, Identity, Session};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

pub type AuthHandler = Box<dyn Fn(AuthEvent) + Send + Sync>;

/// Contract of the external authentication service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get_session(&self) -> Result<Option<Session>, ServiceError>;

    /// Register `handler` for session transitions. Events are delivered in
    /// the order they occur until the returned subscription is revoked.
    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription;

    async fn sign_out(&self) -> Result<(), ServiceError>;
}

/// Revocable registration handle. Clones share the same cancellation flag.
#[derive(Debug, Clone)]
pub struct Subscription {
    active: Arc<AtomicBool>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unsubscribe(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SessionTracker {
    auth: Arc<dyn AuthProvider>,
    current: Arc<RwLock<Option<Identity>>>,
}

impl SessionTracker {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            auth,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Ask the auth provider for an existing session. A failed lookup is
    /// treated as signed out.
    pub async fn resolve(&self) -> Option<Identity> {
        let identity = match self.auth.get_session().await {
            Ok(session) => session.map(|s| s.user),
            Err(err) => {
                tracing::warn!(error = %err, "session lookup failed; continuing signed out");
                None
            }
        };
        store_identity(&self.current, identity.clone());
        identity
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.current
            .read()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Register `handler` for identity transitions (sign-in, sign-out,
    /// refresh). The same identity may be reported more than once.
    pub fn on_identity_change<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Option<Identity>) + Send + Sync + 'static,
    {
        let current = Arc::clone(&self.current);
        self.auth.on_auth_state_change(Box::new(move |event: AuthEvent| {
            let identity = event.identity();
            store_identity(&current, identity.clone());
            handler(identity);
        }))
    }

    /// Like [`on_identity_change`](Self::on_identity_change), but queues the
    /// transitions for the caller to drain in order.
    pub fn watch(&self) -> IdentityWatch {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.on_identity_change(move |identity| {
            // receiver gone means the watcher was dropped
            let _ = tx.send(identity);
        });
        IdentityWatch { subscription, rx }
    }
}

fn store_identity(slot: &RwLock<Option<Identity>>, identity: Option<Identity>) {
    match slot.write() {
        Ok(mut guard) => *guard = identity,
        Err(poisoned) => *poisoned.into_inner() = identity,
    }
}

/// Ordered queue of identity transitions backed by a live subscription.
pub struct IdentityWatch {
    subscription: Subscription,
    rx: mpsc::UnboundedReceiver<Option<Identity>>,
}

impl IdentityWatch {
    /// Next queued transition, if one is already pending.
    pub fn try_next(&mut self) -> Option<Option<Identity>> {
        if !self.subscription.is_active() {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Wait for the next transition. Returns `None` once unsubscribed.
    pub async fn next(&mut self) -> Option<Option<Identity>> {
        if !self.subscription.is_active() {
            return None;
        }
        self.rx.recv().await
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn unsubscribe(&mut self) {
        self.subscription.unsubscribe();
        self.rx.close();
    }
}
