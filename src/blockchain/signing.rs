// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account derivation.
//!
//! A mnemonic maps to exactly one account: the BIP-39 seed (empty passphrase)
//! is truncated to its first 32 bytes and used directly as the ed25519 keypair
//! seed. There is no hierarchical derivation path.

use std::fmt;

use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::{keypair::keypair_from_seed, Signer},
};

use crate::wallet::MnemonicPhrase;

/// Bytes of the BIP-39 seed used as keypair seed.
pub const KEYPAIR_SEED_LEN: usize = 32;

/// The session's signing account. Never persisted; re-derived from the mnemonic.
pub struct Account {
    keypair: Keypair,
}

impl Account {
    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// Secret and public key bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.keypair.to_bytes()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Account {}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Derive the account for `mnemonic`.
pub fn derive(mnemonic: &MnemonicPhrase) -> Result<Account, DerivationError> {
    account_from_seed(&mnemonic.to_seed())
}

/// Build an account from a binary seed, using its first 32 bytes.
pub fn account_from_seed(seed: &[u8]) -> Result<Account, DerivationError> {
    let prefix = seed
        .get(..KEYPAIR_SEED_LEN)
        .ok_or(DerivationError::SeedTooShort(seed.len()))?;

    if prefix.iter().all(|b| *b == 0) {
        return Err(DerivationError::DegenerateSeed);
    }

    let keypair =
        keypair_from_seed(prefix).map_err(|e| DerivationError::Keypair(e.to_string()))?;

    Ok(Account { keypair })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    #[error("Seed is {0} bytes, need at least {KEYPAIR_SEED_LEN}")]
    SeedTooShort(usize),

    #[error("Seed prefix is all zeros")]
    DegenerateSeed,

    #[error("Keypair generation failed: {0}")]
    Keypair(String),
}
