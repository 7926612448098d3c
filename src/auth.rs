// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{SharedConnection, lock};
use crate::error::ServiceError;
use crate::models::{AuthEvent, Identity, Session};
use crate::session::{AuthHandler, AuthProvider, Subscription};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use std::sync::{Arc, Mutex};

type SharedHandler = Arc<dyn Fn(AuthEvent) + Send + Sync>;

/// Auth provider that keeps the signed-in user in the local `settings`
/// table. Session changes made through this instance are fanned out to every
/// live subscription in registration order.
pub struct LocalAuth {
    conn: SharedConnection,
    handlers: Mutex<Vec<(Subscription, SharedHandler)>>,
}

impl LocalAuth {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            conn,
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Start a session for `user`. Signing in again as the current user
    /// refreshes the session instead of starting a new one.
    pub async fn sign_in(&self, user: &str) -> Result<Session, ServiceError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(ServiceError::Rejected("user id must not be empty".into()));
        }
        let previous = self.get_session().await?;
        let session = Session::new(Identity::new(user));
        {
            let conn = lock(&self.conn)?;
            conn.execute(
                "INSERT INTO settings(key, value) VALUES('session_user', ?1)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                params![session.user.id],
            )?;
            conn.execute(
                "INSERT INTO settings(key, value) VALUES('session_signed_in_at', ?1)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value",
                params![session.signed_in_at.to_rfc3339()],
            )?;
        }
        let event = match previous {
            Some(p) if p.user == session.user => AuthEvent::TokenRefreshed(session.clone()),
            _ => AuthEvent::SignedIn(session.clone()),
        };
        tracing::debug!(user = %session.user, "signed in");
        self.emit(event);
        Ok(session)
    }

    fn emit(&self, event: AuthEvent) {
        let live: Vec<SharedHandler> = {
            let mut handlers = self
                .handlers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            handlers.retain(|(sub, _)| sub.is_active());
            handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
        };
        for handler in live {
            handler(event.clone());
        }
    }

    /// Number of registrations that have not been revoked.
    pub fn active_subscriptions(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|(sub, _)| sub.is_active())
            .count()
    }
}

#[async_trait]
impl AuthProvider for LocalAuth {
    async fn get_session(&self) -> Result<Option<Session>, ServiceError> {
        let conn = lock(&self.conn)?;
        let user: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key='session_user'",
                [],
                |r| r.get(0),
            )
            .optional()?;
        let Some(user) = user else {
            return Ok(None);
        };
        let since: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key='session_signed_in_at'",
                [],
                |r| r.get(0),
            )
            .optional()?;
        let signed_in_at = since
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        Ok(Some(Session {
            user: Identity::new(user),
            signed_in_at,
        }))
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription {
        let sub = Subscription::new();
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((sub.clone(), Arc::from(handler)));
        sub
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        {
            let conn = lock(&self.conn)?;
            conn.execute(
                "DELETE FROM settings WHERE key IN ('session_user', 'session_signed_in_at')",
                [],
            )?;
        }
        tracing::debug!("signed out");
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }
}
