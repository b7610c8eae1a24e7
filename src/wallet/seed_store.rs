// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Seed precedence and persistence.
//!
//! ## Precedence
//!
//! 1. A mnemonic carried by the shareable link wins and overwrites the
//!    persisted value.
//! 2. Otherwise the persisted mnemonic from a previous session is reused.
//! 3. Otherwise a fresh mnemonic is generated and persisted immediately, so a
//!    restart reproduces the same account.
//!
//! The seed is stored in plaintext. Import and regenerate destroy the previous
//! seed; callers must obtain explicit confirmation before invoking them.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use super::{MnemonicPhrase, SeedError};
use crate::storage::StorageError;

/// Durable slot holding the mnemonic string.
pub trait SeedPersistence: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn store(&self, phrase: &str) -> Result<(), StorageError>;
}

/// Where the resolved mnemonic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicSource {
    Link,
    Persisted,
    Generated,
}

#[derive(Debug, Clone)]
pub struct ResolvedMnemonic {
    pub mnemonic: MnemonicPhrase,
    pub source: MnemonicSource,
}

/// Apply the precedence rules to the two optional inputs. Does not persist.
pub fn resolve_mnemonic(
    link_param: Option<&str>,
    persisted: Option<&str>,
) -> Result<ResolvedMnemonic, SeedError> {
    if let Some(phrase) = link_param.filter(|p| !p.trim().is_empty()) {
        return Ok(ResolvedMnemonic {
            mnemonic: MnemonicPhrase::parse(phrase)?,
            source: MnemonicSource::Link,
        });
    }

    if let Some(phrase) = persisted.filter(|p| !p.trim().is_empty()) {
        return Ok(ResolvedMnemonic {
            mnemonic: MnemonicPhrase::parse(phrase)?,
            source: MnemonicSource::Persisted,
        });
    }

    Ok(ResolvedMnemonic {
        mnemonic: MnemonicPhrase::generate()?,
        source: MnemonicSource::Generated,
    })
}

/// Owns the persisted mnemonic.
pub struct SeedStore {
    persistence: Arc<dyn SeedPersistence>,
}

impl SeedStore {
    pub fn new(persistence: Arc<dyn SeedPersistence>) -> Self {
        Self { persistence }
    }

    /// Resolve the startup mnemonic and persist it unless it came from storage.
    pub fn resolve(&self, link_param: Option<&str>) -> Result<ResolvedMnemonic, SeedError> {
        let persisted = self.persistence.load()?;
        let resolved = resolve_mnemonic(link_param, persisted.as_deref())?;

        match resolved.source {
            MnemonicSource::Persisted => {
                info!("Loaded persisted wallet seed");
            }
            MnemonicSource::Link => {
                if persisted.is_some() {
                    warn!("Wallet link overrides the persisted seed");
                }
                self.persistence.store(&resolved.mnemonic.phrase())?;
            }
            MnemonicSource::Generated => {
                info!("No wallet seed found, generated a new one");
                self.persistence.store(&resolved.mnemonic.phrase())?;
            }
        }

        Ok(resolved)
    }

    /// Validate and persist an imported phrase, replacing the current seed.
    pub fn import(&self, phrase: &str) -> Result<MnemonicPhrase, SeedError> {
        let mnemonic = MnemonicPhrase::parse(phrase)?;
        self.persistence.store(&mnemonic.phrase())?;
        info!("Imported wallet seed");
        Ok(mnemonic)
    }

    /// Generate and persist a new seed, replacing the current one.
    pub fn regenerate(&self) -> Result<MnemonicPhrase, SeedError> {
        let mnemonic = MnemonicPhrase::generate()?;
        self.persistence.store(&mnemonic.phrase())?;
        info!("Regenerated wallet seed");
        Ok(mnemonic)
    }

    /// The raw persisted value, if any.
    pub fn persisted(&self) -> Result<Option<String>, SeedError> {
        Ok(self.persistence.load()?)
    }
}

/// Process-local persistence, lost on exit.
#[derive(Debug, Default)]
pub struct InMemorySeedPersistence {
    value: Mutex<Option<String>>,
}

impl InMemorySeedPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(phrase: &str) -> Self {
        Self {
            value: Mutex::new(Some(phrase.to_string())),
        }
    }
}

impl SeedPersistence for InMemorySeedPersistence {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let value = self.value.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(value.clone())
    }

    fn store(&self, phrase: &str) -> Result<(), StorageError> {
        let mut value = self.value.lock().map_err(|_| StorageError::Poisoned)?;
        *value = Some(phrase.to_string());
        Ok(())
    }
}
