// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AccountId;
use crate::store::{DEFAULT_ACCOUNT_NAME, FinanceStore};
use crate::utils::{fmt_money, id_for_account, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_ACCOUNT_NAME);
            ensure_name_free(store, name, None)?;
            let account = store.add_account(name)?;
            println!("Added account '{}'", account.name);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let mut ids = Vec::new();
            for name in sub.get_many::<String>("name").unwrap() {
                ids.push(id_for_account(store, name)?);
            }
            let removed = store.delete_accounts(&ids)?;
            println!("Removed {} account(s)", removed);
        }
        Some(("edit", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_account(store, name)?;
            let rename = sub.get_one::<String>("rename").map(String::as_str);
            if let Some(new_name) = rename.map(str::trim).filter(|n| !n.is_empty()) {
                ensure_name_free(store, new_name, Some(id))?;
            }
            let balance = sub
                .get_one::<String>("balance")
                .map(|s| parse_decimal(s))
                .transpose()?;
            store.update_account(id, rename, balance)?;
            println!("Updated account '{}'", name);
        }
        Some(("include", sub)) => set_included(store, sub, true)?,
        Some(("exclude", sub)) => set_included(store, sub, false)?,
        _ => {}
    }
    Ok(())
}

/// Accounts are addressed by name, so a name may belong to one account only.
fn ensure_name_free(store: &FinanceStore, name: &str, except: Option<AccountId>) -> Result<()> {
    if store
        .accounts()
        .iter()
        .any(|a| a.name == name && Some(a.id) != except)
    {
        bail!("Account '{}' already exists", name);
    }
    Ok(())
}

fn set_included(store: &mut FinanceStore, sub: &clap::ArgMatches, included: bool) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_account(store, name)?;
    store.set_included_in_analytics(id, included)?;
    if included {
        println!("Account '{}' is included in analytics", name);
    } else {
        println!("Account '{}' is excluded from analytics", name);
    }
    Ok(())
}

fn list(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if maybe_print_json(json_flag, jsonl_flag, &store.accounts())? {
        return Ok(());
    }
    let data = store
        .accounts()
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                fmt_money(&a.balance),
                if a.included_in_analytics { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Name", "Balance", "In analytics"], data)
    );
    Ok(())
}
