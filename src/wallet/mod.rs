// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mnemonic seed lifecycle: parsing, generation, precedence and persistence.

pub mod mnemonic;
pub mod seed_store;

pub use mnemonic::{link_parameter, share_link, MnemonicPhrase, LINK_PARAM};
pub use seed_store::{
    resolve_mnemonic, InMemorySeedPersistence, MnemonicSource, ResolvedMnemonic, SeedPersistence,
    SeedStore,
};

use crate::storage::StorageError;

/// Errors raised while resolving or replacing the seed.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid wallet link: {0}")]
    InvalidLink(String),

    #[error("Seed persistence failed: {0}")]
    Persistence(#[from] StorageError),
}
