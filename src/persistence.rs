// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Snapshot storage for the five collections.
//!
//! Each collection is stored independently as a JSON document. A backend only
//! moves opaque payloads; encoding and decoding live in the store.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::fmt;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    Incomes,
    Expenses,
    Categories,
    CategoryColors,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Accounts,
        Collection::Incomes,
        Collection::Expenses,
        Collection::Categories,
        Collection::CategoryColors,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Collection::Accounts => "accounts",
            Collection::Incomes => "incomes",
            Collection::Expenses => "expenses",
            Collection::Categories => "categories",
            Collection::CategoryColors => "category_colors",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub trait Persistence {
    /// Replaces the stored snapshot of `collection` with `payload`.
    fn save(&mut self, collection: Collection, payload: &str) -> Result<()>;

    /// Returns the stored snapshot, or `None` if nothing was ever saved.
    fn load(&self, collection: Collection) -> Result<Option<String>>;
}

/// One `<collection>.json` file per collection inside a directory.
#[derive(Debug, Clone)]
pub struct JsonDir {
    dir: PathBuf,
}

impl JsonDir {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.key()))
    }
}

impl Persistence for JsonDir {
    fn save(&mut self, collection: Collection, payload: &str) -> Result<()> {
        let path = self.path_for(collection);
        fs::write(&path, payload)?;
        tracing::trace!(path = %path.display(), bytes = payload.len(), "wrote snapshot");
        Ok(())
    }

    fn load(&self, collection: Collection) -> Result<Option<String>> {
        let path = self.path_for(collection);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// One row per collection in a `snapshots` table.
pub struct SqliteSnapshots {
    conn: Connection,
}

impl SqliteSnapshots {
    pub fn new(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
    CREATE TABLE IF NOT EXISTS snapshots(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
        )?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }
}

impl Persistence for SqliteSnapshots {
    fn save(&mut self, collection: Collection, payload: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO snapshots(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
            params![collection.key(), payload],
        )?;
        tracing::trace!(%collection, bytes = payload.len(), "stored snapshot row");
        Ok(())
    }

    fn load(&self, collection: Collection) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE key=?1",
                params![collection.key()],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }
}
