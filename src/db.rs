// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ServiceError;
use crate::models::{Identity, Transaction, TransactionDraft, TransactionType};
use crate::repository::TransactionRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

/// Connection shared by the persistence and auth services.
pub type SharedConnection = Arc<Mutex<Connection>>;

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<SharedConnection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn open_in_memory() -> Result<SharedConnection> {
    let conn = Connection::open_in_memory().context("Open in-memory DB")?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        owner TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions(owner, date);
    "#,
    )?;
    Ok(())
}

pub(crate) fn lock(conn: &SharedConnection) -> Result<MutexGuard<'_, Connection>, ServiceError> {
    conn.lock()
        .map_err(|_| ServiceError::Unavailable("database connection poisoned".into()))
}

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ServiceError> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| ServiceError::Malformed(format!("timestamp '{}': {}", s, e)))
}

/// Transaction storage in the local SQLite database. Reads and deletes are
/// always scoped to the requesting owner.
#[derive(Clone)]
pub struct SqliteTransactionRepository {
    conn: SharedConnection,
}

impl SqliteTransactionRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

struct RawRow {
    id: String,
    r#type: String,
    amount: String,
    category: String,
    description: Option<String>,
    date: String,
    owner: String,
    created_at: String,
    updated_at: String,
}

impl RawRow {
    fn into_transaction(self) -> Result<Transaction, ServiceError> {
        let r#type = self
            .r#type
            .parse::<TransactionType>()
            .map_err(ServiceError::Malformed)?;
        let amount = self
            .amount
            .parse::<Decimal>()
            .map_err(|e| ServiceError::Malformed(format!("amount '{}': {}", self.amount, e)))?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| ServiceError::Malformed(format!("date '{}': {}", self.date, e)))?;
        Ok(Transaction {
            id: self.id,
            r#type,
            amount,
            category: self.category,
            description: self.description,
            date,
            owner: self.owner,
            created_at: Some(parse_timestamp(&self.created_at)?),
            updated_at: Some(parse_timestamp(&self.updated_at)?),
        })
    }
}

#[async_trait]
impl TransactionRepository for SqliteTransactionRepository {
    async fn list_transactions(&self, owner: &Identity) -> Result<Vec<Transaction>, ServiceError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, type, amount, category, description, date, owner, created_at, updated_at
             FROM transactions
             WHERE owner=?1
             ORDER BY date DESC, created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map(params![owner.id], |r| {
            Ok(RawRow {
                id: r.get(0)?,
                r#type: r.get(1)?,
                amount: r.get(2)?,
                category: r.get(3)?,
                description: r.get(4)?,
                date: r.get(5)?,
                owner: r.get(6)?,
                created_at: r.get(7)?,
                updated_at: r.get(8)?,
            })
        })?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?.into_transaction()?);
        }
        Ok(data)
    }

    async fn insert_transaction(
        &self,
        owner: &Identity,
        draft: TransactionDraft,
    ) -> Result<Transaction, ServiceError> {
        if draft.amount < Decimal::ZERO {
            return Err(ServiceError::Rejected(format!(
                "amount must be non-negative, got {}",
                draft.amount
            )));
        }
        let category = draft.category.trim().to_string();
        if category.is_empty() {
            return Err(ServiceError::Rejected("category must not be empty".into()));
        }
        let description = draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let now = Utc::now().trunc_subsecs(6);
        let tx = Transaction {
            id: Uuid::new_v4().to_string(),
            r#type: draft.r#type,
            amount: draft.amount,
            category,
            description,
            date: draft.date,
            owner: owner.id.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };

        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO transactions(id, owner, type, amount, category, description, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                tx.id,
                tx.owner,
                tx.r#type.as_str(),
                tx.amount.to_string(),
                tx.category,
                tx.description,
                tx.date.to_string(),
                timestamp(now),
                timestamp(now)
            ],
        )?;
        tracing::debug!(id = %tx.id, owner = %tx.owner, "inserted transaction");
        Ok(tx)
    }

    async fn delete_transaction(&self, owner: &Identity, id: &str) -> Result<(), ServiceError> {
        let conn = lock(&self.conn)?;
        let n = conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND owner=?2",
            params![id, owner.id],
        )?;
        tracing::debug!(id, owner = %owner, removed = n, "delete transaction");
        Ok(())
    }
}
