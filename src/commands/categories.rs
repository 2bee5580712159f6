// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::colors::Rgb;
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct CategoryRow<'a> {
    position: usize,
    name: &'a str,
    color: Rgb,
}

fn index_of(store: &FinanceStore, name: &str) -> Result<usize> {
    let name = name.trim();
    store
        .categories()
        .iter()
        .position(|c| c == name)
        .with_context(|| format!("Category '{}' not found", name))
}

pub fn handle(store: &mut FinanceStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            if store.add_category(name)? {
                println!(
                    "Added category '{}' ({})",
                    name.trim(),
                    store.category_color(name.trim())
                );
            } else {
                println!("Category '{}' is empty or already exists", name.trim());
            }
        }
        Some(("list", sub)) => {
            let rows: Vec<CategoryRow> = store
                .categories()
                .iter()
                .enumerate()
                .map(|(i, c)| CategoryRow {
                    position: i + 1,
                    name: c,
                    color: store.category_color(c),
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .iter()
                    .map(|r| vec![r.position.to_string(), r.name.to_string(), r.color.to_hex()])
                    .collect();
                println!("{}", pretty_table(&["#", "Category", "Color"], data));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let idx = index_of(store, name)?;
            store.delete_category(idx)?;
            println!("Removed category '{}'", name.trim());
        }
        Some(("move", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let to = *sub.get_one::<usize>("to").unwrap();
            let idx = index_of(store, name)?;
            store.reorder_category(idx, to.saturating_sub(1))?;
            println!("Moved category '{}'", name.trim());
        }
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let new_name = sub.get_one::<String>("new_name").unwrap();
            let idx = index_of(store, name)?;
            if store.rename_category(idx, new_name)? {
                println!("Renamed category '{}' to '{}'", name.trim(), new_name.trim());
            }
        }
        Some(("color", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            match sub.get_one::<String>("hex") {
                Some(hex) => {
                    let color: Rgb = hex.parse()?;
                    store.set_category_color(name, color)?;
                    println!("Category '{}' is now {}", name, color);
                }
                None => println!("{}", store.category_color(name)),
            }
        }
        _ => {}
    }
    Ok(())
}
