// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Backend, Config};
use crate::error::{Result, StoreError};
use crate::persistence::{JsonDir, Persistence, SqliteSnapshots};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Coinpurse", "coinpurse"));

pub const SQLITE_FILE: &str = "coinpurse.sqlite";

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or(StoreError::NoDataDir)?;
    Ok(proj.data_dir().to_path_buf())
}

pub fn sqlite_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SQLITE_FILE)
}

/// Opens the backend selected by `cfg`, creating the data dir if needed.
pub fn open_backend(cfg: &Config) -> Result<Box<dyn Persistence>> {
    fs::create_dir_all(&cfg.data_dir)?;
    match cfg.backend {
        Backend::Json => Ok(Box::new(JsonDir::open(&cfg.data_dir)?)),
        Backend::Sqlite => {
            let path = sqlite_path(&cfg.data_dir);
            let conn = Connection::open(&path)?;
            tracing::debug!(path = %path.display(), "opened sqlite snapshot store");
            Ok(Box::new(SqliteSnapshots::new(conn)?))
        }
    }
}
