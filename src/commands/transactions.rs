// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Posting, Transaction};
use crate::store::FinanceStore;
use crate::utils::{
    account_label, fmt_money, id_for_account, maybe_print_json, parse_datetime, parse_decimal,
    pretty_table, resolve_id, short_id,
};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle_expense(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add_expense(store, sub)?,
        Some(("list", sub)) => list(store, sub, Kind::Expense)?,
        Some(("rm", sub)) => {
            let id = resolve_id(
                store.expenses().iter().map(|e| e.id),
                sub.get_one::<String>("id").unwrap(),
            )?;
            if let Some(e) = store.delete_expense(id)? {
                println!("Removed expense {} of {}", short_id(&e.id), fmt_money(&e.amount));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_income(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add_income(store, sub)?,
        Some(("list", sub)) => list(store, sub, Kind::Income)?,
        Some(("rm", sub)) => {
            let id = resolve_id(
                store.incomes().iter().map(|i| i.id),
                sub.get_one::<String>("id").unwrap(),
            )?;
            if let Some(i) = store.delete_income(id)? {
                println!("Removed income {} of {}", short_id(&i.id), fmt_money(&i.amount));
            }
        }
        _ => {}
    }
    Ok(())
}

fn add_expense(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim();
    let description = sub.get_one::<String>("description").unwrap().trim();
    let account_name = sub.get_one::<String>("account").unwrap();
    let date = parse_datetime(sub.get_one::<String>("date").map(String::as_str))?;
    let account_id = id_for_account(store, account_name)?;

    match store.add_expense(amount, category, description, date, account_id)? {
        Some(e) => println!(
            "Recorded expense {} of {} in '{}' (acct: {})",
            short_id(&e.id),
            fmt_money(&e.amount),
            e.category,
            account_name
        ),
        None => bail!("Amount must be greater than zero"),
    }
    Ok(())
}

fn add_income(store: &mut FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().trim();
    let account_name = sub.get_one::<String>("account").unwrap();
    let date = parse_datetime(sub.get_one::<String>("date").map(String::as_str))?;
    let account_id = id_for_account(store, account_name)?;

    match store.add_income(amount, description, date, account_id)? {
        Some(i) => println!(
            "Recorded income {} of {} (acct: {})",
            short_id(&i.id),
            fmt_money(&i.amount),
            account_name
        ),
        None => bail!("Amount must be greater than zero"),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Expense,
    Income,
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub account: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl TransactionRow {
    fn from_transaction(store: &FinanceStore, t: &Transaction) -> Self {
        Self {
            id: t.id().to_string(),
            date: t.date().format("%Y-%m-%d %H:%M").to_string(),
            account: account_label(store, t.account_id()),
            amount: fmt_money(&t.amount()),
            category: t.category().unwrap_or_default().to_string(),
            description: t.description().to_string(),
        }
    }
}

/// Rows for `expense list` / `income list`, newest first, after the
/// `--account`, `--category` and `--limit` filters.
pub fn query_rows(
    store: &FinanceStore,
    sub: &clap::ArgMatches,
    kind: Kind,
) -> Result<Vec<TransactionRow>> {
    let account = match sub.get_one::<String>("account") {
        Some(name) => Some(id_for_account(store, name)?),
        None => None,
    };
    let category = match kind {
        Kind::Expense => sub.get_one::<String>("category").map(|c| c.trim()),
        Kind::Income => None,
    };
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let mut items: Vec<Transaction> = match kind {
        Kind::Expense => store
            .expenses()
            .iter()
            .cloned()
            .map(Transaction::Expense)
            .collect(),
        Kind::Income => store
            .incomes()
            .iter()
            .cloned()
            .map(Transaction::Income)
            .collect(),
    };
    items.sort_by(|a, b| b.date().cmp(&a.date()));

    Ok(items
        .iter()
        .filter(|t| account.is_none_or(|id| t.account_id() == id))
        .filter(|t| category.is_none_or(|c| t.category() == Some(c)))
        .take(limit)
        .map(|t| TransactionRow::from_transaction(store, t))
        .collect())
}

fn list(store: &FinanceStore, sub: &clap::ArgMatches, kind: Kind) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub, kind)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let mut row = vec![
                    r.id[..8].to_string(),
                    r.date.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                ];
                if kind == Kind::Expense {
                    row.push(r.category.clone());
                }
                row.push(r.description.clone());
                row
            })
            .collect();
        let headers: &[&str] = match kind {
            Kind::Expense => &["Id", "Date", "Account", "Amount", "Category", "Description"],
            Kind::Income => &["Id", "Date", "Account", "Amount", "Description"],
        };
        println!("{}", pretty_table(headers, rows));
    }
    Ok(())
}
