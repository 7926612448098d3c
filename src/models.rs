// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!(
                "Unknown transaction type '{}', expected income or expense",
                other
            )),
        }
    }
}

/// A persisted ledger entry. `id`, `owner` and the timestamps are assigned by
/// the persistence service; the amount is always a non-negative magnitude and
/// its sign is implied by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub owner: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    /// Amount with the sign of its contribution to the balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.r#type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Payload for a new transaction. Carries no id or owner; both are filled in
/// server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub fn new(
        r#type: TransactionType,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            r#type,
            amount,
            category: category.into(),
            description: None,
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The authenticated principal that owns transactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Identity,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: Identity) -> Self {
        Self {
            user,
            signed_in_at: Utc::now(),
        }
    }
}

/// Session transitions reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl AuthEvent {
    pub fn identity(&self) -> Option<Identity> {
        match self {
            AuthEvent::SignedIn(s) | AuthEvent::TokenRefreshed(s) => Some(s.user.clone()),
            AuthEvent::SignedOut => None,
        }
    }
}
