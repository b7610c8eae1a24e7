// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Seed persistence backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `settings`: key → value (`mnemonic` → space-separated phrase)

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

use crate::wallet::SeedPersistence;

/// Database file name inside the data directory.
pub const SEED_DB_FILE: &str = "wallet.redb";

const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");

const MNEMONIC_KEY: &str = "mnemonic";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// SeedDatabase
// =============================================================================

/// Embedded single-key seed database.
pub struct SeedDatabase {
    db: Database,
}

impl SeedDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SETTINGS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn get_mnemonic(&self) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS)?;
        let value = table.get(MNEMONIC_KEY)?.map(|v| v.value().to_string());
        Ok(value)
    }

    pub fn set_mnemonic(&self, phrase: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS)?;
            table.insert(MNEMONIC_KEY, phrase)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl SeedPersistence for SeedDatabase {
    fn load(&self) -> StorageResult<Option<String>> {
        self.get_mnemonic()
    }

    fn store(&self, phrase: &str) -> StorageResult<()> {
        self.set_mnemonic(phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{OTHER_MNEMONIC, TEST_MNEMONIC};

    fn temp_db() -> (SeedDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = SeedDatabase::open(&dir.path().join(SEED_DB_FILE)).unwrap();
        (db, dir)
    }

    #[test]
    fn empty_database_has_no_mnemonic() {
        let (db, _dir) = temp_db();
        assert_eq!(db.get_mnemonic().unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let (db, _dir) = temp_db();
        db.set_mnemonic(TEST_MNEMONIC).unwrap();
        db.set_mnemonic(OTHER_MNEMONIC).unwrap();
        assert_eq!(db.get_mnemonic().unwrap().as_deref(), Some(OTHER_MNEMONIC));
    }

    #[test]
    fn value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SEED_DB_FILE);
        {
            let db = SeedDatabase::open(&path).unwrap();
            db.store(TEST_MNEMONIC).unwrap();
        }
        let db = SeedDatabase::open(&path).unwrap();
        assert_eq!(db.load().unwrap().as_deref(), Some(TEST_MNEMONIC));
    }
}
