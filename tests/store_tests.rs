// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use coinpurse::colors::{PALETTE, Rgb};
use coinpurse::error::StoreError;
use coinpurse::persistence::{Collection, JsonDir, Persistence, SqliteSnapshots};
use coinpurse::store::{FinanceStore, SEED_ACCOUNTS, SEED_CATEGORIES};
use rust_decimal::Decimal;
use std::cell::Cell;
use std::rc::Rc;
use tempfile::tempdir;
use uuid::Uuid;

fn setup() -> FinanceStore {
    FinanceStore::load(Box::new(SqliteSnapshots::open_in_memory().unwrap())).unwrap()
}

fn at(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn balance(store: &FinanceStore, id: Uuid) -> Decimal {
    store.account(id).unwrap().balance
}

#[test]
fn first_load_seeds_defaults() {
    let store = setup();
    let names: Vec<&str> = store.accounts().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, SEED_ACCOUNTS);
    assert!(store.accounts().iter().all(|a| a.balance.is_zero() && a.included_in_analytics));
    assert_eq!(store.categories().len(), SEED_CATEGORIES.len());
    for (i, c) in store.categories().iter().enumerate() {
        assert_eq!(store.category_color(c), PALETTE[i % PALETTE.len()]);
    }
}

#[test]
fn add_account_appends_with_zero_balance() {
    let mut store = setup();
    let a = store.add_account("  Savings ").unwrap();
    assert_eq!(a.name, "Savings");
    assert!(a.balance.is_zero());
    assert!(a.included_in_analytics);
    assert_eq!(store.accounts().last().unwrap().id, a.id);

    let unnamed = store.add_account("   ").unwrap();
    assert_eq!(unnamed.name, "New account");
}

#[test]
fn balance_tracks_incomes_minus_expenses() {
    let mut store = setup();
    let id = store.accounts()[0].id;

    store.add_income(dec("100"), "salary", at(1), id).unwrap().unwrap();
    assert_eq!(balance(&store, id), dec("100"));
    let lunch = store
        .add_expense(dec("40"), "Food", "lunch", at(1), id)
        .unwrap()
        .unwrap();
    assert_eq!(balance(&store, id), dec("60"));
    let bus = store
        .add_expense(dec("20"), "Transport", "bus", at(2), id)
        .unwrap()
        .unwrap();
    assert_eq!(balance(&store, id), dec("40"));

    let check = |store: &FinanceStore| {
        let inc: Decimal = store.incomes().iter().map(|i| i.amount).sum();
        let exp: Decimal = store.expenses().iter().map(|e| e.amount).sum();
        assert_eq!(balance(store, id), inc - exp);
    };
    check(&store);

    store.delete_expense(lunch.id).unwrap().unwrap();
    assert_eq!(balance(&store, id), dec("80"));
    check(&store);

    let salary = store.incomes()[0].id;
    store.delete_income(salary).unwrap().unwrap();
    assert_eq!(balance(&store, id), dec("-20"));
    check(&store);

    store.delete_expense(bus.id).unwrap().unwrap();
    assert!(balance(&store, id).is_zero());
    check(&store);
}

#[test]
fn new_transactions_go_to_the_front() {
    let mut store = setup();
    let id = store.accounts()[0].id;
    let first = store.add_expense(dec("1"), "A", "", at(5), id).unwrap().unwrap();
    let second = store.add_expense(dec("2"), "B", "", at(1), id).unwrap().unwrap();
    assert_eq!(store.expenses()[0].id, second.id);
    assert_eq!(store.expenses()[1].id, first.id);
    assert_eq!(store.expenses()[0].wallet, "Account");

    let i1 = store.add_income(dec("1"), "a", at(1), id).unwrap().unwrap();
    let i2 = store.add_income(dec("1"), "b", at(1), id).unwrap().unwrap();
    assert_eq!(store.incomes()[0].id, i2.id);
    assert_eq!(store.incomes()[1].id, i1.id);
}

#[test]
fn delete_then_readd_restores_balance() {
    let mut store = setup();
    let id = store.accounts()[1].id;
    store.add_income(dec("500"), "bonus", at(3), id).unwrap();
    let e = store
        .add_expense(dec("123.45"), "Housing", "rent", at(3), id)
        .unwrap()
        .unwrap();
    let before = balance(&store, id);

    store.delete_expense(e.id).unwrap();
    store
        .add_expense(e.amount, &e.category, &e.description, e.date, e.account_id)
        .unwrap()
        .unwrap();
    assert_eq!(balance(&store, id), before);
}

#[test]
fn unknown_account_or_bad_amount_is_a_noop() {
    let mut store = setup();
    let ghost = Uuid::new_v4();
    assert!(store.add_expense(dec("10"), "Food", "", at(1), ghost).unwrap().is_none());
    assert!(store.add_income(dec("10"), "", at(1), ghost).unwrap().is_none());

    let id = store.accounts()[0].id;
    assert!(store.add_expense(Decimal::ZERO, "Food", "", at(1), id).unwrap().is_none());
    assert!(store.add_income(dec("-5"), "", at(1), id).unwrap().is_none());

    assert!(store.expenses().is_empty());
    assert!(store.incomes().is_empty());
    assert!(store.accounts().iter().all(|a| a.balance.is_zero()));
}

#[test]
fn deleting_account_keeps_its_transactions() {
    let mut store = setup();
    let a = store.add_account("A").unwrap().id;
    store.add_income(dec("100"), "salary", at(1), a).unwrap();
    store.add_expense(dec("40"), "Food", "lunch", at(1), a).unwrap();
    store.add_expense(dec("20"), "Transport", "bus", at(2), a).unwrap();
    let other = store.accounts()[0].id;
    let other_before = balance(&store, other);

    assert_eq!(store.delete_accounts(&[a]).unwrap(), 1);
    assert!(store.account(a).is_none());
    assert_eq!(store.expenses().len(), 2);
    assert_eq!(store.incomes().len(), 1);
    assert!(store.expenses().iter().all(|e| e.account_id == a));

    let orphan = store.expenses()[0].id;
    let removed = store.delete_expense(orphan).unwrap().unwrap();
    assert_eq!(removed.id, orphan);
    assert_eq!(store.expenses().len(), 1);
    let orphan_income = store.incomes()[0].id;
    store.delete_income(orphan_income).unwrap().unwrap();
    assert!(store.incomes().is_empty());
    assert_eq!(balance(&store, other), other_before);
}

#[test]
fn deleting_unknown_transaction_returns_none() {
    let mut store = setup();
    assert!(store.delete_expense(Uuid::new_v4()).unwrap().is_none());
    assert!(store.delete_income(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn duplicate_or_blank_category_is_ignored() {
    let mut store = setup();
    let cats = store.categories().to_vec();
    let colors = store.category_colors().clone();

    assert!(!store.add_category("Groceries").unwrap());
    assert!(!store.add_category("  Groceries  ").unwrap());
    assert!(!store.add_category("   ").unwrap());
    assert_eq!(store.categories(), cats.as_slice());
    assert_eq!(store.category_colors(), &colors);

    // case-sensitive match: a different case is a new category
    assert!(store.add_category("groceries").unwrap());
    assert_eq!(store.categories().len(), cats.len() + 1);
}

#[test]
fn new_category_color_follows_map_size() {
    let mut store = setup();
    let size = store.category_colors().len();
    assert!(store.add_category(" Pets ").unwrap());
    assert_eq!(store.categories().last().unwrap(), "Pets");
    assert_eq!(store.category_color("Pets"), PALETTE[size % PALETTE.len()]);
}

#[test]
fn missing_color_falls_back_to_gray() {
    let store = setup();
    assert_eq!(store.category_color("Nope"), Rgb::GRAY);
    assert_eq!(Rgb::GRAY.to_hex(), "#808080");
}

#[test]
fn set_category_color_overrides() {
    let mut store = setup();
    store.set_category_color("Travel", Rgb(1, 2, 3)).unwrap();
    assert_eq!(store.category_color("Travel"), Rgb(1, 2, 3));
}

#[test]
fn delete_category_drops_its_color_but_not_expenses() {
    let mut store = setup();
    let id = store.accounts()[0].id;
    store.add_expense(dec("9"), "Health", "", at(1), id).unwrap();
    let idx = store.categories().iter().position(|c| c == "Health").unwrap();

    assert_eq!(store.delete_category(idx).unwrap().as_deref(), Some("Health"));
    assert!(!store.categories().iter().any(|c| c == "Health"));
    assert_eq!(store.category_color("Health"), Rgb::GRAY);
    assert_eq!(store.expenses()[0].category, "Health");

    assert!(store.delete_category(999).unwrap().is_none());
}

#[test]
fn reorder_moves_one_entry() {
    let mut store = setup();
    let first = store.categories()[0].clone();
    assert!(store.reorder_category(0, 2).unwrap());
    assert_eq!(store.categories()[2], first);
    assert_eq!(store.categories().len(), SEED_CATEGORIES.len());

    assert!(store.reorder_category(1, 1000).unwrap());
    assert!(!store.reorder_category(1000, 0).unwrap());
}

#[test]
fn rename_orphans_old_color() {
    let mut store = setup();
    let idx = store.categories().iter().position(|c| c == "Travel").unwrap();
    let old_color = store.category_color("Travel");
    let size = store.category_colors().len();

    assert!(store.rename_category(idx, " Trips ").unwrap());
    assert_eq!(store.categories()[idx], "Trips");
    assert_eq!(store.category_colors().get("Travel"), Some(&old_color));
    assert_eq!(store.category_color("Trips"), PALETTE[size % PALETTE.len()]);

    assert!(!store.rename_category(idx, "  ").unwrap());
}

#[test]
fn update_account_and_inclusion_flag() {
    let mut store = setup();
    let id = store.accounts()[2].id;
    assert!(store.update_account(id, Some("Office"), Some(dec("12.5"))).unwrap());
    let a = store.account(id).unwrap();
    assert_eq!(a.name, "Office");
    assert_eq!(a.balance, dec("12.5"));

    assert!(store.update_account(id, Some(" "), None).unwrap());
    assert_eq!(store.account(id).unwrap().name, "Office");

    assert!(store.set_included_in_analytics(id, false).unwrap());
    assert!(!store.account(id).unwrap().included_in_analytics);
    assert!(!store.set_included_in_analytics(Uuid::new_v4(), true).unwrap());
}

#[test]
fn merged_history_is_newest_first() {
    let mut store = setup();
    let id = store.accounts()[0].id;
    store.add_expense(dec("1"), "A", "", at(2), id).unwrap();
    store.add_income(dec("1"), "", at(3), id).unwrap();
    store.add_expense(dec("1"), "A", "", at(1), id).unwrap();
    let kinds: Vec<&str> = store.transactions().iter().map(|t| t.kind()).collect();
    assert_eq!(kinds, ["income", "expense", "expense"]);
}

#[test]
fn state_survives_reload_from_json_dir() {
    let dir = tempdir().unwrap();
    let (acct, expense) = {
        let mut store = FinanceStore::load(Box::new(JsonDir::open(dir.path()).unwrap())).unwrap();
        let acct = store.add_account("Wallet").unwrap().id;
        store.add_income(dec("50"), "gift", at(4), acct).unwrap();
        let e = store
            .add_expense(dec("7.25"), "Pets", "food", at(4), acct)
            .unwrap()
            .unwrap();
        store.add_category("Pets").unwrap();
        store.set_category_color("Pets", Rgb(0x12, 0x34, 0x56)).unwrap();
        (acct, e)
    };

    for c in Collection::ALL {
        assert!(dir.path().join(format!("{}.json", c.key())).exists());
    }
    let colors = std::fs::read_to_string(dir.path().join("category_colors.json")).unwrap();
    assert!(colors.contains("\"#123456\""));

    let store = FinanceStore::load(Box::new(JsonDir::open(dir.path()).unwrap())).unwrap();
    assert_eq!(store.accounts().len(), SEED_ACCOUNTS.len() + 1);
    assert_eq!(store.account(acct).unwrap().balance, dec("42.75"));
    assert_eq!(store.expenses(), &[expense]);
    assert_eq!(store.categories().last().unwrap(), "Pets");
    assert_eq!(store.category_color("Pets"), Rgb(0x12, 0x34, 0x56));
}

#[test]
fn corrupt_snapshot_is_treated_as_absent() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("accounts.json"), "{not json").unwrap();
    std::fs::write(dir.path().join("categories.json"), "[\"Only\"]").unwrap();
    std::fs::write(
        dir.path().join("category_colors.json"),
        r##"{"Only": "bogus"}"##,
    )
    .unwrap();

    let store = FinanceStore::load(Box::new(JsonDir::open(dir.path()).unwrap())).unwrap();
    assert_eq!(store.accounts().len(), SEED_ACCOUNTS.len());
    assert_eq!(store.categories(), &["Only".to_string()]);
    // an unparsable hex decodes to gray instead of dropping the map
    assert_eq!(store.category_color("Only"), Rgb::GRAY);
}

#[test]
fn backfill_counts_only_new_assignments() {
    let mut backend = SqliteSnapshots::open_in_memory().unwrap();
    backend
        .save(Collection::Categories, r#"["A","B","C"]"#)
        .unwrap();
    backend
        .save(Collection::CategoryColors, r##"{"B":"#010203"}"##)
        .unwrap();

    let store = FinanceStore::load(Box::new(backend)).unwrap();
    assert_eq!(store.category_color("A"), PALETTE[0]);
    assert_eq!(store.category_color("B"), Rgb(1, 2, 3));
    assert_eq!(store.category_color("C"), PALETTE[1]);
}

#[test]
fn overflowing_balance_is_a_noop() {
    let mut store = setup();
    let id = store.accounts()[0].id;
    store.add_income(Decimal::MAX, "jackpot", at(1), id).unwrap().unwrap();

    assert!(store.add_income(Decimal::ONE, "more", at(2), id).unwrap().is_none());
    assert_eq!(store.incomes().len(), 1);
    assert_eq!(balance(&store, id), Decimal::MAX);

    let other = store.accounts()[1].id;
    store.add_expense(Decimal::MAX, "Bills", "", at(1), other).unwrap().unwrap();
    assert!(store.add_expense(Decimal::ONE, "Bills", "", at(2), other).unwrap().is_none());
    assert_eq!(store.expenses().len(), 1);
    assert_eq!(balance(&store, other), Decimal::MIN);

    // Deleting an expense would have to credit MAX back onto a MAX balance.
    let stray = store.add_expense(Decimal::MAX, "Bills", "", at(3), id).unwrap().unwrap();
    store.add_income(Decimal::MAX, "again", at(3), id).unwrap().unwrap();
    assert_eq!(balance(&store, id), Decimal::MAX);
    assert!(store.delete_expense(stray.id).unwrap().is_none());
    assert_eq!(store.expenses().len(), 2);
    assert_eq!(balance(&store, id), Decimal::MAX);

    // Totals clamp rather than panic.
    assert_eq!(store.total_balance(), Decimal::ZERO);
}

/// Loads and seeds normally, then fails every save once `fail` is set.
struct FailingSaves {
    inner: SqliteSnapshots,
    fail: Rc<Cell<bool>>,
}

impl Persistence for FailingSaves {
    fn save(&mut self, collection: Collection, payload: &str) -> coinpurse::error::Result<()> {
        if self.fail.get() {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.save(collection, payload)
    }

    fn load(&self, collection: Collection) -> coinpurse::error::Result<Option<String>> {
        self.inner.load(collection)
    }
}

#[test]
fn failed_save_keeps_the_change_and_reports_it() {
    let fail = Rc::new(Cell::new(false));
    let backend = FailingSaves {
        inner: SqliteSnapshots::open_in_memory().unwrap(),
        fail: fail.clone(),
    };
    let mut store = FinanceStore::load(Box::new(backend)).unwrap();
    let id = store.accounts()[0].id;
    fail.set(true);

    let err = store.add_account("Offline").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Persist { collection: Collection::Accounts, .. }
    ));
    assert!(err.to_string().contains("disk full"));
    assert_eq!(store.accounts().last().unwrap().name, "Offline");

    let err = store.add_income(dec("25"), "cash", at(1), id).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Persist { collection: Collection::Incomes, .. }
    ));
    assert_eq!(store.incomes().len(), 1);
    assert_eq!(balance(&store, id), dec("25"));

    assert!(store.add_category("Pets").is_err());
    assert!(store.categories().iter().any(|c| c == "Pets"));
}
