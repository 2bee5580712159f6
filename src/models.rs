// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AccountId = Uuid;

/// Label stamped on every expense. The field is kept for data compatibility,
/// nothing reads it.
pub const DEFAULT_WALLET: &str = "Account";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    /// Running total, adjusted by every income and expense posted against
    /// the account.
    pub balance: Decimal,
    pub included_in_analytics: bool,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance: Decimal::ZERO,
            included_in_analytics: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub amount: Decimal,
    pub wallet: String,
    pub category: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDateTime,
    pub account_id: AccountId,
}

/// Fields common to incomes and expenses, used by the aggregation filters.
pub trait Posting {
    fn amount(&self) -> Decimal;
    fn date(&self) -> NaiveDateTime;
    fn account_id(&self) -> AccountId;
}

impl Posting for Expense {
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> NaiveDateTime {
        self.date
    }
    fn account_id(&self) -> AccountId {
        self.account_id
    }
}

impl Posting for Income {
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn date(&self) -> NaiveDateTime {
        self.date
    }
    fn account_id(&self) -> AccountId {
        self.account_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Transaction {
    Expense(Expense),
    Income(Income),
}

impl Transaction {
    pub fn id(&self) -> Uuid {
        match self {
            Transaction::Expense(e) => e.id,
            Transaction::Income(i) => i.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Transaction::Expense(_) => "expense",
            Transaction::Income(_) => "income",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Transaction::Expense(e) => &e.description,
            Transaction::Income(i) => &i.description,
        }
    }

    /// Category of an expense; incomes have none.
    pub fn category(&self) -> Option<&str> {
        match self {
            Transaction::Expense(e) => Some(&e.category),
            Transaction::Income(_) => None,
        }
    }

    /// Amount with its effect on the account balance: negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self {
            Transaction::Expense(e) => -e.amount,
            Transaction::Income(i) => i.amount,
        }
    }
}

impl Posting for Transaction {
    fn amount(&self) -> Decimal {
        match self {
            Transaction::Expense(e) => e.amount,
            Transaction::Income(i) => i.amount,
        }
    }
    fn date(&self) -> NaiveDateTime {
        match self {
            Transaction::Expense(e) => e.date,
            Transaction::Income(i) => i.date,
        }
    }
    fn account_id(&self) -> AccountId {
        match self {
            Transaction::Expense(e) => e.account_id,
            Transaction::Income(i) => i.account_id,
        }
    }
}
