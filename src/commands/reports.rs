// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::transactions::TransactionRow;
use crate::ledger::LedgerStore;
use crate::metrics::{self, CategoryShare};
use crate::utils::{capitalize, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub recent: Vec<TransactionRow>,
    pub is_loading: bool,
}

pub fn dashboard_summary(store: &LedgerStore, recent: usize) -> DashboardSummary {
    let view = store.view();
    DashboardSummary {
        balance: view.balance,
        total_income: view.total_income,
        total_expenses: view.total_expenses,
        recent: store.recent(recent).iter().map(TransactionRow::from).collect(),
        is_loading: view.is_loading,
    }
}

pub fn dashboard(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let recent = sub.get_one::<usize>("recent").copied().unwrap_or(5);
    let summary = dashboard_summary(store, recent);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Total Balance", "Total Income", "Total Expenses"],
            vec![vec![
                fmt_money(&summary.balance),
                fmt_money(&summary.total_income),
                fmt_money(&summary.total_expenses),
            ]],
        )
    );
    if summary.recent.is_empty() {
        println!("No transactions yet. Add your first transaction to get started!");
    } else {
        let rows = summary
            .recent
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.date.clone(),
                ]
            })
            .collect();
        println!("Recent Transactions");
        println!(
            "{}",
            pretty_table(&["Category", "Description", "Amount", "Date"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    pub expenses_by_category: Vec<CategoryShare>,
    pub income: Decimal,
    pub expenses: Decimal,
}

pub fn analytics_report(store: &LedgerStore) -> AnalyticsReport {
    let (income, expenses) = metrics::income_vs_expenses(store.transactions());
    AnalyticsReport {
        expenses_by_category: metrics::category_breakdown(store.transactions()),
        income,
        expenses,
    }
}

pub fn analytics(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let report = analytics_report(store);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let rows = report
        .expenses_by_category
        .iter()
        .map(|c| {
            vec![
                capitalize(&c.category),
                fmt_money(&c.amount),
                format!("{}%", c.percent),
            ]
        })
        .collect();
    println!("Expenses by Category");
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    println!("Income vs Expenses");
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses"],
            vec![vec![fmt_money(&report.income), fmt_money(&report.expenses)]],
        )
    );
    Ok(())
}
