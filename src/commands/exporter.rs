// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Posting, Transaction};
use crate::store::FinanceStore;
use crate::utils::account_label;
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle(store: &FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();

    // Oldest first, like a ledger.
    let mut rows: Vec<Transaction> = store.transactions();
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "kind",
                "account",
                "amount",
                "category",
                "description",
                "id",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.date().format("%Y-%m-%d %H:%M:%S").to_string(),
                    t.kind().to_string(),
                    account_label(store, t.account_id()),
                    t.signed_amount().to_string(),
                    t.category().unwrap_or_default().to_string(),
                    t.description().to_string(),
                    t.id().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date().format("%Y-%m-%d %H:%M:%S").to_string(),
                        "kind": t.kind(),
                        "account": account_label(store, t.account_id()),
                        "amount": t.signed_amount().to_string(),
                        "category": t.category(),
                        "description": t.description(),
                        "id": t.id().to_string(),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
