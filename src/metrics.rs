// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures over a transaction collection. Everything here is a pure
//! function of the slice it is given.

use crate::models::{Transaction, TransactionType};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub expenses_by_category: BTreeMap<String, Decimal>,
}

impl Metrics {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let total_income = total_income(transactions);
        let total_expenses = total_expenses(transactions);
        Self {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            expenses_by_category: expenses_by_category(transactions),
        }
    }
}

fn sum_of(transactions: &[Transaction], kind: TransactionType) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.r#type == kind)
        .map(|t| t.amount)
        .sum()
}

pub fn total_income(transactions: &[Transaction]) -> Decimal {
    sum_of(transactions, TransactionType::Income)
}

pub fn total_expenses(transactions: &[Transaction]) -> Decimal {
    sum_of(transactions, TransactionType::Expense)
}

pub fn balance(transactions: &[Transaction]) -> Decimal {
    total_income(transactions) - total_expenses(transactions)
}

/// Expense totals per category. Only categories with at least one expense
/// appear.
pub fn expenses_by_category(transactions: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        *agg.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
    }
    agg
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Whole-percent share of total expenses.
    pub percent: Decimal,
}

/// Per-category expense totals with their share of all expenses, largest
/// first. Ties keep category name order.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let total = total_expenses(transactions);
    let mut items: Vec<CategoryShare> = expenses_by_category(transactions)
        .into_iter()
        .map(|(category, amount)| {
            let percent = if total.is_zero() {
                Decimal::ZERO
            } else {
                (amount * Decimal::ONE_HUNDRED / total)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            };
            CategoryShare {
                category,
                amount,
                percent,
            }
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount));
    items
}

/// `(income, expenses)` for side-by-side comparison.
pub fn income_vs_expenses(transactions: &[Transaction]) -> (Decimal, Decimal) {
    (total_income(transactions), total_expenses(transactions))
}
