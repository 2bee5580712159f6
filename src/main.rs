// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use coinpurse::{cli, commands, config::Config, db, store::FinanceStore};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    setup_logging();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::from_matches(&matches)?;
    tracing::debug!(data_dir = %cfg.data_dir.display(), backend = %cfg.backend, "loading store");
    let backend = db::open_backend(&cfg)
        .with_context(|| format!("Open {} store in {}", cfg.backend, cfg.data_dir.display()))?;
    let mut store = FinanceStore::load(backend)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Data initialized in {} ({} backend)",
                cfg.data_dir.display(),
                cfg.backend
            );
        }
        Some(("account", sub)) => commands::accounts::handle(&mut store, sub)?,
        Some(("expense", sub)) => commands::transactions::handle_expense(&mut store, sub)?,
        Some(("income", sub)) => commands::transactions::handle_income(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("analytics", sub)) => commands::analytics::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
