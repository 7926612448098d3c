// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ServiceError;
use crate::models::{Identity, Transaction, TransactionDraft};
use async_trait::async_trait;

/// Contract of the remote persistence service for transactions.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// All transactions owned by `owner`, newest `date` first.
    async fn list_transactions(&self, owner: &Identity) -> Result<Vec<Transaction>, ServiceError>;

    /// Persist `draft` on behalf of `owner` and return the stored record with
    /// its assigned id and timestamps.
    async fn insert_transaction(
        &self,
        owner: &Identity,
        draft: TransactionDraft,
    ) -> Result<Transaction, ServiceError>;

    /// Remove the record with `id` if it belongs to `owner`. Unknown ids,
    /// and ids owned by someone else, are not an error and remove nothing.
    async fn delete_transaction(&self, owner: &Identity, id: &str) -> Result<(), ServiceError>;
}
