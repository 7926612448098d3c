// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionType};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse a non-negative amount. A leading currency symbol is tolerated.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().trim_start_matches('$').replace(',', "");
    let d = cleaned
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}'", s))?;
    if d < Decimal::ZERO {
        return Err(anyhow!(
            "Amount '{}' must not be negative; use --type expense instead",
            s
        ));
    }
    Ok(d)
}

pub fn parse_type(s: &str) -> Result<TransactionType> {
    s.parse::<TransactionType>().map_err(|e| anyhow!(e))
}

pub fn fmt_money(d: &Decimal) -> String {
    let rounded = d.round_dp(2);
    if rounded < Decimal::ZERO {
        format!("-${:.2}", -rounded)
    } else {
        format!("${:.2}", rounded)
    }
}

/// `+$12.00` for income, `-$12.00` for expenses.
pub fn fmt_signed(tx: &Transaction) -> String {
    let sign = if tx.is_income() { "+" } else { "-" };
    format!("{}${:.2}", sign, tx.amount.round_dp(2))
}

/// First letter upper-cased, for category labels.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
