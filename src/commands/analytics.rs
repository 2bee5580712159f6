// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{DateRange, Scope, Summary, included_balances};
use crate::store::FinanceStore;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use chrono::{Local, Months};
use serde::Serialize;

pub fn handle(store: &FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("breakdown", sub)) => breakdown(store, sub)?,
        Some(("balance", sub)) => balance(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Scope and range from `analytics breakdown` flags. Without dates the range
/// is the last month up to today.
pub fn scope_and_range(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<(Scope, DateRange)> {
    let scope = match sub.get_one::<String>("account") {
        Some(name) => Scope::Account(id_for_account(store, name)?),
        None => Scope::Included,
    };
    let today = Local::now().date_naive();
    let end = match sub.get_one::<String>("to") {
        Some(s) => parse_date(s)?,
        None => today,
    };
    let start = match sub.get_one::<String>("from") {
        Some(s) => parse_date(s)?,
        None => today.checked_sub_months(Months::new(1)).unwrap_or(today),
    };
    Ok((scope, DateRange::new(start, end)))
}

/// What `analytics breakdown` prints. The balance line is the account's own
/// for an account scope and the included total otherwise.
#[derive(Debug, Serialize)]
pub struct BreakdownReport {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_balance: Option<String>,
    #[serde(flatten)]
    pub summary: Summary,
}

pub fn breakdown_report(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<BreakdownReport> {
    let (scope, range) = scope_and_range(store, sub)?;
    let summary = store.summary(scope, range);
    let (account_balance, total_balance) = match scope {
        Scope::Account(id) => (store.account(id).map(|a| fmt_money(&a.balance)), None),
        Scope::Included => (None, Some(fmt_money(&store.total_balance()))),
    };
    Ok(BreakdownReport {
        from: range.start.to_string(),
        to: range.end.to_string(),
        account_balance,
        total_balance,
        summary,
    })
}

fn breakdown(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let report = breakdown_report(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    if let Some(b) = &report.account_balance {
        println!("Account balance: {}", b);
    }
    if let Some(b) = &report.total_balance {
        println!("Total balance of included accounts: {}", b);
    }
    if report.summary.categories.is_empty() {
        println!("No expenses between {} and {}", report.from, report.to);
        return Ok(());
    }
    let data = report
        .summary
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                store.category_color(&c.category).to_hex(),
                fmt_money(&c.amount),
                format!("{:.1}%", c.percentage.round_dp(1)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Color", "Spent", "Share"], data)
    );
    println!("Income:  {}", fmt_money(&report.summary.total_income));
    println!("Expense: {}", fmt_money(&report.summary.total_expense));
    Ok(())
}

fn balance(store: &FinanceStore, sub: &clap::ArgMatches) -> Result<()> {
    let mut data: Vec<Vec<String>> = included_balances(store.accounts())
        .into_iter()
        .map(|(name, b)| vec![name, fmt_money(&b)])
        .collect();
    data.push(vec!["Total".to_string(), fmt_money(&store.total_balance())]);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Account", "Balance"], data));
    }
    Ok(())
}
