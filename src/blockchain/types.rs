// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Decimals of the native coin (1 SOL = 10^9 lamports).
pub const NATIVE_DECIMALS: u8 = 9;

/// Wrapped SOL mint, used as the asset key when quoting the native coin price.
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Solana cluster configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Cluster name as used by RPC tooling and the explorer
    pub cluster: &'static str,
    /// Public RPC endpoint URL
    pub rpc_url: &'static str,
}

/// Solana mainnet-beta configuration.
pub const SOLANA_MAINNET: NetworkConfig = NetworkConfig {
    name: "Solana Mainnet Beta",
    cluster: "mainnet-beta",
    rpc_url: "https://api.mainnet-beta.solana.com",
};

/// Solana devnet configuration.
pub const SOLANA_DEVNET: NetworkConfig = NetworkConfig {
    name: "Solana Devnet",
    cluster: "devnet",
    rpc_url: "https://api.devnet.solana.com",
};

/// Solana testnet configuration.
pub const SOLANA_TESTNET: NetworkConfig = NetworkConfig {
    name: "Solana Testnet",
    cluster: "testnet",
    rpc_url: "https://api.testnet.solana.com",
};

const EXPLORER_URL: &str = "https://explorer.solana.com";

/// Selectable ledger deployment.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkId {
    #[serde(alias = "mainnet")]
    MainnetBeta,
    #[default]
    Devnet,
    Testnet,
}

impl NetworkId {
    pub const ALL: [NetworkId; 3] = [NetworkId::MainnetBeta, NetworkId::Devnet, NetworkId::Testnet];

    pub fn config(&self) -> &'static NetworkConfig {
        match self {
            NetworkId::MainnetBeta => &SOLANA_MAINNET,
            NetworkId::Devnet => &SOLANA_DEVNET,
            NetworkId::Testnet => &SOLANA_TESTNET,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.config().cluster
    }

    /// Explorer link for a transaction signature on this network.
    pub fn explorer_tx_url(&self, signature: &str) -> String {
        match self {
            NetworkId::MainnetBeta => format!("{EXPLORER_URL}/tx/{signature}"),
            other => format!("{EXPLORER_URL}/tx/{signature}?cluster={}", other.as_str()),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet-beta" | "mainnet" => Ok(NetworkId::MainnetBeta),
            "devnet" => Ok(NetworkId::Devnet),
            "testnet" => Ok(NetworkId::Testnet),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown network `{0}` (expected mainnet-beta, devnet or testnet)")]
pub struct UnknownNetwork(pub String);

/// The two asset kinds a burner wallet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Native SOL
    Native,
    /// The tracked SPL token (USDC)
    Token,
}

impl AssetKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            AssetKind::Native => "SOL",
            AssetKind::Token => USDC_TOKEN.symbol,
        }
    }

    /// Number of decimals between display units and smallest units.
    pub fn decimals(&self) -> u8 {
        match self {
            AssetKind::Native => NATIVE_DECIMALS,
            AssetKind::Token => USDC_TOKEN.decimals,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Known SPL tokens.
#[derive(Debug, Clone)]
pub struct SplToken {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
    /// Mainnet mint address
    pub mainnet_mint: &'static str,
    /// Mint used on devnet and testnet
    pub devnet_mint: &'static str,
}

impl SplToken {
    /// Mint identifier for the given network.
    ///
    /// Testnet has no canonical USDC deployment; it shares the devnet mint.
    pub fn mint_for(&self, network: NetworkId) -> &'static str {
        match network {
            NetworkId::MainnetBeta => self.mainnet_mint,
            NetworkId::Devnet | NetworkId::Testnet => self.devnet_mint,
        }
    }
}

/// USDC, the one tracked fungible token. Pegged 1:1 to the reference currency.
pub const USDC_TOKEN: SplToken = SplToken {
    symbol: "USDC",
    name: "USD Coin",
    decimals: 6,
    mainnet_mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
    devnet_mint: "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU",
};
