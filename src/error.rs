// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the ledger core.
//!
//! [`ServiceError`] is what the auth and persistence collaborators report.
//! [`LedgerError`] is what the ledger store's operations return; each
//! failure variant wraps the collaborator error that caused it.

use thiserror::Error;

/// Failure reported by an external collaborator.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("No signed-in user")]
    NotAuthenticated,
    #[error("Failed to fetch transactions")]
    FetchFailed(#[source] ServiceError),
    #[error("Failed to add transaction")]
    AddFailed(#[source] ServiceError),
    #[error("Failed to delete transaction")]
    DeleteFailed(#[source] ServiceError),
    #[error("Ledger store already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
