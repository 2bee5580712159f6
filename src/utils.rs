// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AccountId;
use crate::store::FinanceStore;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD HH:MM[:SS]` or a bare date (midnight). `None` means now.
pub fn parse_datetime(s: Option<&str>) -> Result<NaiveDateTime> {
    let Some(s) = s.map(str::trim) else {
        return Ok(Local::now().naive_local());
    };
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    let d = parse_date(s)?;
    d.and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("Invalid date '{}'", s))
}

/// Parses an amount, accepting a comma as decimal separator.
pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
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

pub fn id_for_account(store: &FinanceStore, name: &str) -> Result<AccountId> {
    let name = name.trim();
    let mut hits = store.accounts().iter().filter(|a| a.name == name);
    let first = hits
        .next()
        .with_context(|| format!("Account '{}' not found", name))?;
    if hits.next().is_some() {
        bail!("Account name '{}' is ambiguous, rename one of them first", name);
    }
    Ok(first.id)
}

/// Account name for display; transactions may outlive their account.
pub fn account_label(store: &FinanceStore, id: AccountId) -> String {
    store
        .account(id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| "(deleted)".to_string())
}

/// Resolves a full id or a unique prefix of one among `candidates`.
pub fn resolve_id(candidates: impl IntoIterator<Item = Uuid>, needle: &str) -> Result<Uuid> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        bail!("Empty id");
    }
    let hits: Vec<Uuid> = candidates
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match hits.as_slice() {
        [one] => Ok(*one),
        [] => Err(anyhow!("No record with id '{}'", needle)),
        _ => Err(anyhow!("Id prefix '{}' matches {} records", needle, hits.len())),
    }
}

pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
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
        // If v is an array, stream each element; else stream single line
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
