// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error type shared by the store and the persistence backends.

use crate::persistence::Collection;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A snapshot could not be written. The in-memory state has already been
    /// mutated when this is returned.
    #[error("failed to persist {collection}: {source}")]
    Persist {
        collection: Collection,
        #[source]
        source: Box<StoreError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// The platform data directory could not be determined.
    #[error("could not determine platform-specific data dir")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, StoreError>;
