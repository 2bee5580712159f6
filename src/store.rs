// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The record store: owns every collection and keeps account balances in
//! step with the incomes and expenses posted against them.
//!
//! Each mutation updates memory first and then writes a full snapshot of the
//! collections it touched. Invalid input (unknown account, blank name,
//! non-positive amount) makes the operation a no-op rather than an error.

use crate::analytics::{self, DateRange, Scope, Summary};
use crate::colors::{Rgb, palette_color};
use crate::error::{Result, StoreError};
use crate::models::{Account, AccountId, DEFAULT_WALLET, Expense, Income, Posting, Transaction};
use crate::persistence::{Collection, Persistence};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use uuid::Uuid;

pub const DEFAULT_ACCOUNT_NAME: &str = "New account";

pub const SEED_ACCOUNTS: [&str; 3] = ["Personal", "Family", "Work"];

pub const SEED_CATEGORIES: [&str; 15] = [
    "Groceries",
    "Cafes & Restaurants",
    "Transport",
    "Housing",
    "Clothing & Shoes",
    "Health",
    "Education",
    "Entertainment",
    "Travel",
    "Gifts & Charity",
    "Loans & Debts",
    "Family & Kids",
    "Household",
    "Phone & Internet",
    "Other",
];

pub struct FinanceStore {
    backend: Box<dyn Persistence>,
    accounts: Vec<Account>,
    incomes: Vec<Income>,
    expenses: Vec<Expense>,
    categories: Vec<String>,
    category_colors: BTreeMap<String, Rgb>,
}

impl FinanceStore {
    /// Loads every collection from `backend`. Anything missing or
    /// undecodable counts as empty; empty accounts and categories are seeded
    /// with defaults and uncolored categories get palette colors.
    pub fn load(backend: Box<dyn Persistence>) -> Result<Self> {
        let accounts: Vec<Account> = decode_or_default(backend.as_ref(), Collection::Accounts);
        let incomes: Vec<Income> = decode_or_default(backend.as_ref(), Collection::Incomes);
        let expenses: Vec<Expense> = decode_or_default(backend.as_ref(), Collection::Expenses);
        let categories: Vec<String> = decode_or_default(backend.as_ref(), Collection::Categories);
        let raw_colors: Option<BTreeMap<String, String>> =
            decode(backend.as_ref(), Collection::CategoryColors);
        let colors_loaded = raw_colors.is_some();
        let category_colors = raw_colors
            .unwrap_or_default()
            .into_iter()
            .map(|(name, hex)| {
                let color = hex.parse().unwrap_or(Rgb::GRAY);
                (name, color)
            })
            .collect();

        let mut store = Self {
            backend,
            accounts,
            incomes,
            expenses,
            categories,
            category_colors,
        };

        if store.accounts.is_empty() {
            store.accounts = SEED_ACCOUNTS.iter().map(|n| Account::new(*n)).collect();
            tracing::info!(count = store.accounts.len(), "seeded default accounts");
            store.persist(Collection::Accounts)?;
        }
        if store.categories.is_empty() {
            store.categories = SEED_CATEGORIES.iter().map(|c| c.to_string()).collect();
            tracing::info!(count = store.categories.len(), "seeded default categories");
            store.persist(Collection::Categories)?;
        }
        let assigned = store.backfill_colors();
        if assigned > 0 || !colors_loaded {
            tracing::debug!(assigned, "backfilled category colors");
            store.persist(Collection::CategoryColors)?;
        }
        Ok(store)
    }

    /// Gives every category without a color the next palette entry. The
    /// palette index counts only the categories colored here.
    fn backfill_colors(&mut self) -> usize {
        let mut assigned = 0;
        for category in &self.categories {
            if !self.category_colors.contains_key(category) {
                self.category_colors
                    .insert(category.clone(), palette_color(assigned));
                assigned += 1;
            }
        }
        assigned
    }

    fn persist(&mut self, collection: Collection) -> Result<()> {
        let payload = match collection {
            Collection::Accounts => serde_json::to_string_pretty(&self.accounts),
            Collection::Incomes => serde_json::to_string_pretty(&self.incomes),
            Collection::Expenses => serde_json::to_string_pretty(&self.expenses),
            Collection::Categories => serde_json::to_string_pretty(&self.categories),
            Collection::CategoryColors => serde_json::to_string_pretty(&self.category_colors),
        }
        .map_err(|e| persist_error(collection, e.into()))?;
        self.backend
            .save(collection, &payload)
            .map_err(|e| persist_error(collection, e))
    }

    // Accounts

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn add_account(&mut self, name: &str) -> Result<Account> {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_ACCOUNT_NAME
        } else {
            name
        };
        let account = Account::new(name);
        self.accounts.push(account.clone());
        tracing::debug!(id = %account.id, name = %account.name, "added account");
        self.persist(Collection::Accounts)?;
        Ok(account)
    }

    /// Removes the listed accounts. Transactions that reference them are kept.
    pub fn delete_accounts(&mut self, ids: &[AccountId]) -> Result<usize> {
        let before = self.accounts.len();
        self.accounts.retain(|a| !ids.contains(&a.id));
        let removed = before - self.accounts.len();
        if removed > 0 {
            tracing::debug!(removed, "deleted accounts");
            self.persist(Collection::Accounts)?;
        }
        Ok(removed)
    }

    /// Overwrites the name and/or balance of an account. A balance set here
    /// is not reconciled against the account's transactions.
    pub fn update_account(
        &mut self,
        id: AccountId,
        name: Option<&str>,
        balance: Option<Decimal>,
    ) -> Result<bool> {
        let Some(account) = self.account_mut(id) else {
            return Ok(false);
        };
        if let Some(n) = name.map(str::trim).filter(|n| !n.is_empty()) {
            account.name = n.to_string();
        }
        if let Some(b) = balance {
            account.balance = b;
        }
        self.persist(Collection::Accounts)?;
        Ok(true)
    }

    pub fn set_included_in_analytics(&mut self, id: AccountId, included: bool) -> Result<bool> {
        let Some(account) = self.account_mut(id) else {
            return Ok(false);
        };
        account.included_in_analytics = included;
        self.persist(Collection::Accounts)?;
        Ok(true)
    }

    // Transactions

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn incomes(&self) -> &[Income] {
        &self.incomes
    }

    /// Both kinds merged, most recent first.
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut all: Vec<Transaction> = self
            .expenses
            .iter()
            .cloned()
            .map(Transaction::Expense)
            .chain(self.incomes.iter().cloned().map(Transaction::Income))
            .collect();
        all.sort_by(|a, b| b.date().cmp(&a.date()));
        all
    }

    /// Records an expense and debits the account. Returns `None` without
    /// touching anything if the account does not exist, the amount is not
    /// positive, or the new balance would overflow.
    pub fn add_expense(
        &mut self,
        amount: Decimal,
        category: &str,
        description: &str,
        date: NaiveDateTime,
        account_id: AccountId,
    ) -> Result<Option<Expense>> {
        if amount <= Decimal::ZERO {
            return Ok(None);
        }
        let Some(account) = self.account_mut(account_id) else {
            tracing::debug!(%account_id, "expense skipped: unknown account");
            return Ok(None);
        };
        let Some(balance) = account.balance.checked_sub(amount) else {
            tracing::debug!(%account_id, %amount, "expense skipped: balance overflow");
            return Ok(None);
        };
        account.balance = balance;
        let expense = Expense {
            id: Uuid::new_v4(),
            amount,
            wallet: DEFAULT_WALLET.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            date,
            account_id,
        };
        self.expenses.insert(0, expense.clone());
        self.persist(Collection::Expenses)?;
        self.persist(Collection::Accounts)?;
        Ok(Some(expense))
    }

    /// Records an income and credits the account. Same no-op rules as
    /// [`FinanceStore::add_expense`].
    pub fn add_income(
        &mut self,
        amount: Decimal,
        description: &str,
        date: NaiveDateTime,
        account_id: AccountId,
    ) -> Result<Option<Income>> {
        if amount <= Decimal::ZERO {
            return Ok(None);
        }
        let Some(account) = self.account_mut(account_id) else {
            tracing::debug!(%account_id, "income skipped: unknown account");
            return Ok(None);
        };
        let Some(balance) = account.balance.checked_add(amount) else {
            tracing::debug!(%account_id, %amount, "income skipped: balance overflow");
            return Ok(None);
        };
        account.balance = balance;
        let income = Income {
            id: Uuid::new_v4(),
            amount,
            description: description.to_string(),
            date,
            account_id,
        };
        self.incomes.insert(0, income.clone());
        self.persist(Collection::Incomes)?;
        self.persist(Collection::Accounts)?;
        Ok(Some(income))
    }

    /// Removes an expense and credits its amount back to the account. If the
    /// account is gone only the record is removed. A credit that would
    /// overflow the balance leaves everything untouched and returns `None`.
    pub fn delete_expense(&mut self, id: Uuid) -> Result<Option<Expense>> {
        let Some(pos) = self.expenses.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let (account_id, amount) = (self.expenses[pos].account_id, self.expenses[pos].amount);
        let reversed = match self.account_mut(account_id) {
            Some(account) => match account.balance.checked_add(amount) {
                Some(balance) => {
                    account.balance = balance;
                    true
                }
                None => {
                    tracing::debug!(%id, %account_id, "delete skipped: balance overflow");
                    return Ok(None);
                }
            },
            None => {
                tracing::debug!(%id, %account_id, "account missing, balance left as is");
                false
            }
        };
        let expense = self.expenses.remove(pos);
        self.persist(Collection::Expenses)?;
        if reversed {
            self.persist(Collection::Accounts)?;
        }
        Ok(Some(expense))
    }

    /// Removes an income and debits its amount from the account, if the
    /// account still exists.
    pub fn delete_income(&mut self, id: Uuid) -> Result<Option<Income>> {
        let Some(pos) = self.incomes.iter().position(|i| i.id == id) else {
            return Ok(None);
        };
        let (account_id, amount) = (self.incomes[pos].account_id, self.incomes[pos].amount);
        let reversed = match self.account_mut(account_id) {
            Some(account) => match account.balance.checked_sub(amount) {
                Some(balance) => {
                    account.balance = balance;
                    true
                }
                None => {
                    tracing::debug!(%id, %account_id, "delete skipped: balance overflow");
                    return Ok(None);
                }
            },
            None => {
                tracing::debug!(%id, %account_id, "account missing, balance left as is");
                false
            }
        };
        let income = self.incomes.remove(pos);
        self.persist(Collection::Incomes)?;
        if reversed {
            self.persist(Collection::Accounts)?;
        }
        Ok(Some(income))
    }

    // Categories

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category_colors(&self) -> &BTreeMap<String, Rgb> {
        &self.category_colors
    }

    /// Appends a trimmed, non-empty, not-yet-present category and gives it
    /// the palette color at `color map size % palette size`.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() || self.categories.iter().any(|c| c == name) {
            return Ok(false);
        }
        self.categories.push(name.to_string());
        let color = palette_color(self.category_colors.len());
        self.category_colors.insert(name.to_string(), color);
        tracing::debug!(category = name, %color, "added category");
        self.persist(Collection::Categories)?;
        self.persist(Collection::CategoryColors)?;
        Ok(true)
    }

    /// Removes the category at `index` along with its color. Expenses keep
    /// the name.
    pub fn delete_category(&mut self, index: usize) -> Result<Option<String>> {
        if index >= self.categories.len() {
            return Ok(None);
        }
        let removed = self.categories.remove(index);
        self.category_colors.remove(&removed);
        self.persist(Collection::Categories)?;
        self.persist(Collection::CategoryColors)?;
        Ok(Some(removed))
    }

    /// Moves the category at `from` so it ends up at position `to` (clamped to
    /// the end of the list).
    pub fn reorder_category(&mut self, from: usize, to: usize) -> Result<bool> {
        if from >= self.categories.len() {
            return Ok(false);
        }
        let item = self.categories.remove(from);
        let to = to.min(self.categories.len());
        self.categories.insert(to, item);
        self.persist(Collection::Categories)?;
        Ok(true)
    }

    /// Renames the category at `index`. The old name's color entry is left
    /// behind; the new name gets a fresh palette color unless it has one.
    pub fn rename_category(&mut self, index: usize, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() || index >= self.categories.len() {
            return Ok(false);
        }
        self.categories[index] = name.to_string();
        let recolored = if self.category_colors.contains_key(name) {
            false
        } else {
            let color = palette_color(self.category_colors.len());
            self.category_colors.insert(name.to_string(), color);
            true
        };
        self.persist(Collection::Categories)?;
        if recolored {
            self.persist(Collection::CategoryColors)?;
        }
        Ok(true)
    }

    pub fn set_category_color(&mut self, name: &str, color: Rgb) -> Result<()> {
        self.category_colors.insert(name.to_string(), color);
        self.persist(Collection::CategoryColors)
    }

    pub fn category_color(&self, name: &str) -> Rgb {
        self.category_colors.get(name).copied().unwrap_or(Rgb::GRAY)
    }

    // Analytics over the current state

    pub fn summary(&self, scope: Scope, range: DateRange) -> Summary {
        analytics::summarize(
            &self.expenses,
            &self.incomes,
            &self.accounts,
            scope,
            range,
        )
    }

    pub fn total_balance(&self) -> Decimal {
        analytics::total_balance(&self.accounts)
    }
}

fn persist_error(collection: Collection, source: StoreError) -> StoreError {
    tracing::warn!(%collection, error = %source, "snapshot write failed");
    StoreError::Persist {
        collection,
        source: Box::new(source),
    }
}

fn decode<T: DeserializeOwned>(backend: &dyn Persistence, collection: Collection) -> Option<T> {
    let raw = match backend.load(collection) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(%collection, error = %e, "snapshot unreadable, treating as absent");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(%collection, error = %e, "snapshot undecodable, treating as absent");
            None
        }
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(
    backend: &dyn Persistence,
    collection: Collection,
) -> T {
    decode(backend, collection).unwrap_or_default()
}
