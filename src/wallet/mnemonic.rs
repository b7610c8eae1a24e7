// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! BIP-39 mnemonic phrase handling and shareable seed links.

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::{rngs::OsRng, RngCore};

use super::SeedError;

/// Query parameter carrying the mnemonic in a shareable link.
pub const LINK_PARAM: &str = "mnemonic";

/// Entropy of a freshly generated mnemonic (128 bits, 12 words).
const ENTROPY_BYTES: usize = 16;

/// A validated BIP-39 English mnemonic.
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicPhrase(Mnemonic);

impl MnemonicPhrase {
    /// Parse a phrase, checking word list, word count and checksum.
    ///
    /// Whitespace is collapsed and words are lower-cased before parsing.
    pub fn parse(raw: &str) -> Result<Self, SeedError> {
        let normalized = normalize(raw);
        Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map(Self)
            .map_err(|e| SeedError::InvalidMnemonic(e.to_string()))
    }

    /// Generate a new mnemonic from OS randomness.
    pub fn generate() -> Result<Self, SeedError> {
        let mut entropy = [0u8; ENTROPY_BYTES];
        OsRng.fill_bytes(&mut entropy);
        Mnemonic::from_entropy_in(Language::English, &entropy)
            .map(Self)
            .map_err(|e| SeedError::InvalidMnemonic(e.to_string()))
    }

    /// The space-separated words.
    pub fn phrase(&self) -> String {
        self.0.to_string()
    }

    pub fn word_count(&self) -> usize {
        self.0.word_count()
    }

    /// BIP-39 binary seed with an empty passphrase.
    pub fn to_seed(&self) -> [u8; 64] {
        self.0.to_seed_normalized("")
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MnemonicPhrase({} words)", self.word_count())
    }
}

fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build `<base_url>?mnemonic=<phrase>` for moving the wallet to another device.
pub fn share_link(base_url: &str, mnemonic: &MnemonicPhrase) -> Result<String, SeedError> {
    let mut url =
        url::Url::parse(base_url).map_err(|e| SeedError::InvalidLink(e.to_string()))?;
    url.query_pairs_mut()
        .clear()
        .append_pair(LINK_PARAM, &mnemonic.phrase());
    Ok(url.to_string())
}

/// Extract the link parameter from a startup input.
///
/// Accepts either a full shareable link or a bare phrase. Returns `None`
/// when the link has no (or an empty) `mnemonic` parameter.
pub fn link_parameter(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    match url::Url::parse(input) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == LINK_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.trim().is_empty()),
        Err(_) => Some(input.to_string()),
    }
}
