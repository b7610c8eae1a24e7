// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Storage Module
//!
//! The wallet keeps exactly one durable value: the mnemonic phrase, stored
//! in plaintext in an embedded redb database.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   wallet.redb       # table `settings`, key `mnemonic`
//! ```
//!
//! Anyone with read access to the data directory controls the wallet.

pub mod seed_db;

pub use seed_db::{SeedDatabase, StorageError, StorageResult, SEED_DB_FILE};
