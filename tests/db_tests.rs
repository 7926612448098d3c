// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, draft};
use fintrack::db::{self, SqliteTransactionRepository};
use fintrack::error::ServiceError;
use fintrack::models::{Identity, TransactionType::*};
use fintrack::repository::TransactionRepository;

fn repo() -> SqliteTransactionRepository {
    SqliteTransactionRepository::new(db::open_in_memory().unwrap())
}

#[tokio::test]
async fn insert_assigns_id_owner_and_timestamps() {
    let repo = repo();
    let alice = Identity::new("alice");

    let tx = repo
        .insert_transaction(
            &alice,
            draft(Expense, "12.34", " food ", "2025-01-02").with_description("  "),
        )
        .await
        .unwrap();

    assert_eq!(tx.id.len(), 36);
    assert_eq!(tx.owner, "alice");
    assert_eq!(tx.category, "food");
    assert_eq!(tx.description, None);
    assert!(tx.created_at.is_some());
    assert_eq!(tx.created_at, tx.updated_at);

    let listed = repo.list_transactions(&alice).await.unwrap();
    assert_eq!(listed, vec![tx]);
}

#[tokio::test]
async fn list_is_owner_scoped_and_date_descending() {
    let repo = repo();
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    for (on, amount) in [("2025-01-05", "1"), ("2025-03-01", "2"), ("2025-02-10", "3")] {
        repo.insert_transaction(&alice, draft(Income, amount, "salary", on))
            .await
            .unwrap();
    }
    repo.insert_transaction(&bob, draft(Expense, "9", "rent", "2025-04-01"))
        .await
        .unwrap();

    let rows = repo.list_transactions(&alice).await.unwrap();
    let dates: Vec<String> = rows.iter().map(|t| t.date.to_string()).collect();
    assert_eq!(dates, ["2025-03-01", "2025-02-10", "2025-01-05"]);
    assert_eq!(rows[0].amount, dec("2"));
    assert_eq!(repo.list_transactions(&bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn same_date_keeps_newest_insert_first() {
    let repo = repo();
    let alice = Identity::new("alice");
    let first = repo
        .insert_transaction(&alice, draft(Expense, "1", "a", "2025-01-01"))
        .await
        .unwrap();
    let second = repo
        .insert_transaction(&alice, draft(Expense, "2", "b", "2025-01-01"))
        .await
        .unwrap();

    let ids: Vec<String> = repo
        .list_transactions(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let repo = repo();
    let err = repo
        .insert_transaction(&Identity::new("alice"), draft(Expense, "-5", "food", "2025-01-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(_)));
    assert!(
        repo.list_transactions(&Identity::new("bob"))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn delete_is_idempotent() {
    let repo = repo();
    let alice = Identity::new("alice");
    let tx = repo
        .insert_transaction(&alice, draft(Income, "10", "gift", "2025-01-01"))
        .await
        .unwrap();

    repo.delete_transaction(&alice, &tx.id).await.unwrap();
    repo.delete_transaction(&alice, &tx.id).await.unwrap();
    repo.delete_transaction(&alice, "never-existed").await.unwrap();
    assert!(repo.list_transactions(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_only_touches_own_rows() {
    let repo = repo();
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");
    let tx = repo
        .insert_transaction(&alice, draft(Expense, "42", "rent", "2025-01-01"))
        .await
        .unwrap();

    repo.delete_transaction(&bob, &tx.id).await.unwrap();

    assert_eq!(repo.list_transactions(&alice).await.unwrap(), vec![tx]);
}

#[tokio::test]
async fn amounts_keep_exact_precision() {
    let repo = repo();
    let alice = Identity::new("alice");
    repo.insert_transaction(&alice, draft(Expense, "0.10", "x", "2025-01-01"))
        .await
        .unwrap();
    repo.insert_transaction(&alice, draft(Expense, "0.20", "x", "2025-01-01"))
        .await
        .unwrap();
    let total: rust_decimal::Decimal = repo
        .list_transactions(&alice)
        .await
        .unwrap()
        .iter()
        .map(|t| t.amount)
        .sum();
    assert_eq!(total.to_string(), "0.30");
}
