// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spending analytics over an account scope and a range of calendar days.
//!
//! Everything here is a pure function of the slices it is given.

use crate::models::{Account, AccountId, Expense, Income, Posting};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Which accounts a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Account(AccountId),
    /// Every account with `included_in_analytics` set.
    Included,
}

/// Calendar days `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Start of the first day and the last second of the final day
    /// (start of day + 86 399 s). `None` when `end` is before `start`.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        if self.end < self.start {
            return None;
        }
        let lo = self.start.and_hms_opt(0, 0, 0)?;
        let hi = self.end.and_hms_opt(0, 0, 0)? + Duration::seconds(86_399);
        Some((lo, hi))
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        match self.bounds() {
            Some((lo, hi)) => lo <= at && at <= hi,
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Share of the filtered total, 0..=100. Zero when the total is zero.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub categories: Vec<CategoryShare>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

struct ScopeFilter {
    scope: Scope,
    included: HashSet<AccountId>,
}

impl ScopeFilter {
    fn new(accounts: &[Account], scope: Scope) -> Self {
        let included = match scope {
            Scope::Account(_) => HashSet::new(),
            Scope::Included => accounts
                .iter()
                .filter(|a| a.included_in_analytics)
                .map(|a| a.id)
                .collect(),
        };
        Self { scope, included }
    }

    fn matches(&self, id: AccountId) -> bool {
        match self.scope {
            Scope::Account(target) => id == target,
            Scope::Included => self.included.contains(&id),
        }
    }
}

// Sums clamp at the Decimal bounds instead of panicking.
fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

fn filtered<'a, P: Posting>(
    items: &'a [P],
    accounts: &[Account],
    scope: Scope,
    range: DateRange,
) -> impl Iterator<Item = &'a P> {
    let filter = ScopeFilter::new(accounts, scope);
    let bounds = range.bounds();
    items.iter().filter(move |p| match bounds {
        Some((lo, hi)) => filter.matches(p.account_id()) && lo <= p.date() && p.date() <= hi,
        None => false,
    })
}

/// Expenses in scope and range, summed per category, largest first. Equal
/// amounts are ordered by category name.
pub fn category_breakdown(
    expenses: &[Expense],
    accounts: &[Account],
    scope: Scope,
    range: DateRange,
) -> Vec<CategoryShare> {
    let mut per_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;
    for e in filtered(expenses, accounts, scope, range) {
        let sum = per_category.entry(e.category.as_str()).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(e.amount);
        total = total.saturating_add(e.amount);
    }

    let hundred = Decimal::ONE_HUNDRED;
    let mut shares: Vec<CategoryShare> = per_category
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            percentage: if total.is_zero() {
                Decimal::ZERO
            } else {
                amount / total * hundred
            },
        })
        .collect();
    // BTreeMap yields names in order and sort_by is stable.
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

pub fn total_expense(
    expenses: &[Expense],
    accounts: &[Account],
    scope: Scope,
    range: DateRange,
) -> Decimal {
    saturating_sum(filtered(expenses, accounts, scope, range).map(Posting::amount))
}

pub fn total_income(
    incomes: &[Income],
    accounts: &[Account],
    scope: Scope,
    range: DateRange,
) -> Decimal {
    saturating_sum(filtered(incomes, accounts, scope, range).map(Posting::amount))
}

pub fn summarize(
    expenses: &[Expense],
    incomes: &[Income],
    accounts: &[Account],
    scope: Scope,
    range: DateRange,
) -> Summary {
    Summary {
        categories: category_breakdown(expenses, accounts, scope, range),
        total_income: total_income(incomes, accounts, scope, range),
        total_expense: total_expense(expenses, accounts, scope, range),
    }
}

/// Stored balances of the included accounts, summed.
pub fn total_balance(accounts: &[Account]) -> Decimal {
    saturating_sum(
        accounts
            .iter()
            .filter(|a| a.included_in_analytics)
            .map(|a| a.balance),
    )
}

/// `(name, balance)` for every included account, in list order.
pub fn included_balances(accounts: &[Account]) -> Vec<(String, Decimal)> {
    accounts
        .iter()
        .filter(|a| a.included_in_analytics)
        .map(|a| (a.name.clone(), a.balance))
        .collect()
}
