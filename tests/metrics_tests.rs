// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, tx};
use fintrack::metrics::{self, Metrics};
use fintrack::models::TransactionType::*;

#[test]
fn reference_scenario() {
    let rows = vec![
        tx("1", Income, "1000", "salary"),
        tx("2", Expense, "200", "food"),
        tx("3", Expense, "50", "food"),
    ];
    let m = Metrics::compute(&rows);
    assert_eq!(m.total_income, dec("1000"));
    assert_eq!(m.total_expenses, dec("250"));
    assert_eq!(m.balance, dec("750"));
    assert_eq!(m.expenses_by_category.len(), 1);
    assert_eq!(m.expenses_by_category.get("food"), Some(&dec("250")));
    assert_eq!(metrics::balance(&rows), m.balance);
}

#[test]
fn income_categories_never_appear_in_expense_breakdown() {
    let rows = vec![
        tx("1", Income, "10", "salary"),
        tx("2", Income, "5", "food"),
        tx("3", Expense, "0", "fees"),
        tx("4", Expense, "7.25", "rent"),
    ];
    let by_cat = metrics::expenses_by_category(&rows);
    assert!(!by_cat.contains_key("salary"));
    // a zero-amount expense still is an actual expense entry
    assert_eq!(by_cat.get("fees"), Some(&dec("0")));
    for category in by_cat.keys() {
        assert!(
            rows.iter()
                .any(|t| t.is_expense() && &t.category == category)
        );
    }
}

#[test]
fn balance_can_go_negative() {
    let rows = vec![tx("1", Income, "10", "gift"), tx("2", Expense, "25.50", "food")];
    assert_eq!(metrics::balance(&rows), dec("-15.50"));
}

#[test]
fn breakdown_shares_and_comparison() {
    let rows = vec![
        tx("1", Expense, "30", "transport"),
        tx("2", Expense, "60", "food"),
        tx("3", Expense, "10", "fun"),
        tx("4", Income, "500", "salary"),
    ];
    let shares = metrics::category_breakdown(&rows);
    let labels: Vec<(&str, String)> = shares
        .iter()
        .map(|s| (s.category.as_str(), s.percent.to_string()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("food", "60".to_string()),
            ("transport", "30".to_string()),
            ("fun", "10".to_string())
        ]
    );
    assert_eq!(
        metrics::income_vs_expenses(&rows),
        (dec("500"), dec("100"))
    );
}
