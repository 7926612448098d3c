// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod reports;
pub mod session;
pub mod transactions;

use crate::auth::LocalAuth;
use crate::db::{self, SqliteTransactionRepository};
use crate::ledger::LedgerStore;
use crate::notify::Notifier;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Composition root: one auth service and one ledger store over a single
/// database.
pub struct App {
    pub auth: Arc<LocalAuth>,
    pub store: LedgerStore,
}

impl App {
    pub fn open(path: &Path, notifier: Arc<dyn Notifier>) -> Result<Self> {
        Ok(Self::with_connection(db::open_or_init(path)?, notifier))
    }

    pub fn in_memory(notifier: Arc<dyn Notifier>) -> Result<Self> {
        Ok(Self::with_connection(db::open_in_memory()?, notifier))
    }

    fn with_connection(conn: db::SharedConnection, notifier: Arc<dyn Notifier>) -> Self {
        let auth = Arc::new(LocalAuth::new(Arc::clone(&conn)));
        let repository = Arc::new(SqliteTransactionRepository::new(conn));
        let store = LedgerStore::new(auth.clone(), repository, notifier);
        Self { auth, store }
    }

    pub async fn dispatch(&mut self, matches: &clap::ArgMatches) -> Result<bool> {
        match matches.subcommand() {
            Some(("login", sub)) => session::login(self, sub).await?,
            Some(("logout", _)) => session::logout(self).await?,
            Some(("whoami", _)) => session::whoami(self),
            Some(("add", sub)) => transactions::add(&mut self.store, sub).await?,
            Some(("rm", sub)) => transactions::remove(&mut self.store, sub).await?,
            Some(("list", sub)) => transactions::list(&self.store, sub)?,
            Some(("dashboard", sub)) => reports::dashboard(&self.store, sub)?,
            Some(("analytics", sub)) => reports::analytics(&self.store, sub)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
