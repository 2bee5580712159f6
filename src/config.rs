// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::default_data_dir;
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "COINPURSE_DATA_DIR";
pub const BACKEND_ENV: &str = "COINPURSE_BACKEND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// One JSON file per collection
    #[default]
    Json,
    /// One SQLite row per collection
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Json => f.write_str("json"),
            Backend::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
}

impl Config {
    /// Builds the config from top-level CLI matches. Flags and their env
    /// fallbacks are resolved by clap; anything unset gets the platform
    /// default.
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let data_dir = match m.get_one::<String>("data-dir") {
            Some(d) if !d.trim().is_empty() => PathBuf::from(d.trim()),
            _ => default_data_dir()?,
        };
        let backend = m.get_one::<Backend>("backend").copied().unwrap_or_default();
        Ok(Self { data_dir, backend })
    }
}
