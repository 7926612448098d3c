// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::LedgerStore;
use crate::models::{Transaction, TransactionDraft};
use crate::utils::{fmt_signed, maybe_print_json, parse_amount, parse_date, parse_type, pretty_table};
use anyhow::{Context, Result};
use serde::Serialize;

pub async fn add(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let r#type = parse_type(sub.get_one::<String>("type").context("missing --type")?)?;
    let amount = parse_amount(sub.get_one::<String>("amount").context("missing --amount")?)?;
    let category = sub
        .get_one::<String>("category")
        .context("missing --category")?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let mut draft = TransactionDraft::new(r#type, amount, category.trim(), date);
    if let Some(desc) = sub.get_one::<String>("description") {
        draft = draft.with_description(desc);
    }

    let tx = store.add(draft).await?;
    println!(
        "Recorded {} {} in '{}' on {} (id: {})",
        tx.r#type,
        fmt_signed(&tx),
        tx.category,
        tx.date,
        tx.id
    );
    Ok(())
}

pub async fn remove(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("missing id")?.trim();
    let held = store.transactions().iter().any(|t| t.id == id);
    store.delete(id).await?;
    if held {
        println!("Removed transaction {}", id);
    } else {
        println!("No transaction {} in your ledger", id);
    }
    Ok(())
}

pub fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if store.identity().is_none() {
            println!("Not signed in. Run `fintrack login <user>` first.");
            return Ok(());
        }
        if data.is_empty() {
            println!("No transactions yet. Add your first transaction to get started!");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Category", "Description", "Amount", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub category: String,
    pub description: String,
    pub amount: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            category: t.category.clone(),
            description: t.description.clone().unwrap_or_default(),
            amount: fmt_signed(t),
        }
    }
}

/// Filter and order the store's collection for display. Sorting here never
/// touches the order the store holds.
pub fn query_rows(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = sub
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("all");
    let sort = sub
        .get_one::<String>("sort")
        .map(String::as_str)
        .unwrap_or("date");

    let mut picked: Vec<&Transaction> = if filter == "all" {
        store.transactions().iter().collect()
    } else {
        let kind = parse_type(filter)?;
        store
            .transactions()
            .iter()
            .filter(|t| t.r#type == kind)
            .collect()
    };
    match sort {
        "amount" => picked.sort_by(|a, b| b.amount.cmp(&a.amount)),
        _ => picked.sort_by(|a, b| b.date.cmp(&a.date)),
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        picked.truncate(*limit);
    }
    Ok(picked.into_iter().map(TransactionRow::from).collect())
}
