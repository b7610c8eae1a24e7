// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding the seed database | `./data` |
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `8080` |
//! | `WALLET_BASE_URL` | Base of shareable seed links | `https://tempwallet.xyz` |
//! | `CORS_ALLOW_ORIGINS` | Comma-separated browser origins allowed to call the API | origin of `WALLET_BASE_URL` |
//! | `WALLET_LINK` | Startup link (or bare phrase) carrying a mnemonic | unset |
//! | `SOLANA_NETWORK` | Initially selected network | `devnet` |
//! | `SOLANA_RPC_MAINNET` | mainnet-beta RPC endpoint | public endpoint |
//! | `SOLANA_RPC_DEVNET` | devnet RPC endpoint | public endpoint |
//! | `SOLANA_RPC_TESTNET` | testnet RPC endpoint | public endpoint |
//! | `PRICE_API_BASE_URL` | Price oracle base URL | `https://public-api.solscan.io` |
//! | `BALANCE_REFRESH_SECS` | Periodic balance refresh, `0` disables | `0` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use crate::{
    blockchain::{NetworkId, RpcEndpoints, UnknownNetwork},
    providers::DEFAULT_PRICE_API_BASE_URL,
};

/// Environment variable name for the data directory path.
///
/// The seed database (`wallet.redb`) lives here.
///
/// # Default
/// `./data`
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "./data";

pub const HOST_ENV: &str = "HOST";
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable name for the shareable link base.
///
/// Revealed seeds are rendered as `<base>?mnemonic=<phrase>`.
pub const WALLET_BASE_URL_ENV: &str = "WALLET_BASE_URL";
pub const DEFAULT_WALLET_BASE_URL: &str = "https://tempwallet.xyz";

/// Environment variable name for the CORS allow-list.
///
/// The API reveals the seed and signs transfers, so only these origins may
/// read its responses from a browser. Each entry must be a full origin such
/// as `http://localhost:3000`; a wildcard is rejected.
pub const CORS_ALLOW_ORIGINS_ENV: &str = "CORS_ALLOW_ORIGINS";

/// Environment variable name for the startup link.
///
/// Read once at startup. A mnemonic found here takes precedence over the
/// persisted seed and replaces it.
pub const WALLET_LINK_ENV: &str = "WALLET_LINK";

pub const SOLANA_NETWORK_ENV: &str = "SOLANA_NETWORK";

pub const SOLANA_RPC_MAINNET_ENV: &str = "SOLANA_RPC_MAINNET";
pub const SOLANA_RPC_DEVNET_ENV: &str = "SOLANA_RPC_DEVNET";
pub const SOLANA_RPC_TESTNET_ENV: &str = "SOLANA_RPC_TESTNET";

pub const PRICE_API_BASE_URL_ENV: &str = "PRICE_API_BASE_URL";

pub const BALANCE_REFRESH_SECS_ENV: &str = "BALANCE_REFRESH_SECS";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    Network {
        var: &'static str,
        source: UnknownNetwork,
    },

    #[error("{var}: expected {expected}, got `{value}`")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub cors_origins: Vec<String>,
    pub link: Option<String>,
    pub network: NetworkId,
    pub rpc: RpcEndpoints,
    pub price_api_base_url: String,
    pub refresh_interval: Option<Duration>,
    pub log_format: LogFormat,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_url: DEFAULT_WALLET_BASE_URL.to_string(),
            cors_origins: origin_of(DEFAULT_WALLET_BASE_URL).into_iter().collect(),
            link: None,
            network: NetworkId::default(),
            rpc: RpcEndpoints::default(),
            price_api_base_url: DEFAULT_PRICE_API_BASE_URL.to_string(),
            refresh_interval: None,
            log_format: LogFormat::default(),
        }
    }
}

impl WalletConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match get(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                expected: "a port number",
                value,
            })?,
            None => defaults.port,
        };

        let network = match get(SOLANA_NETWORK_ENV) {
            Some(value) => value.parse().map_err(|source| ConfigError::Network {
                var: SOLANA_NETWORK_ENV,
                source,
            })?,
            None => defaults.network,
        };

        let refresh_interval = match get(BALANCE_REFRESH_SECS_ENV) {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: BALANCE_REFRESH_SECS_ENV,
                    expected: "a number of seconds",
                    value,
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let base_url = get(WALLET_BASE_URL_ENV).unwrap_or(defaults.base_url);

        let cors_origins = match get(CORS_ALLOW_ORIGINS_ENV) {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(|origin| {
                    origin_of(origin).ok_or_else(|| ConfigError::Invalid {
                        var: CORS_ALLOW_ORIGINS_ENV,
                        expected: "comma-separated origins like `https://host:port`",
                        value: origin.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => origin_of(&base_url).into_iter().collect(),
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: LOG_FORMAT_ENV,
                        expected: "`json` or `pretty`",
                        value,
                    })
                }
            },
            None => defaults.log_format,
        };

        Ok(Self {
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from).unwrap_or(defaults.data_dir),
            host: get(HOST_ENV).unwrap_or(defaults.host),
            port,
            base_url,
            cors_origins,
            link: get(WALLET_LINK_ENV),
            network,
            rpc: RpcEndpoints {
                mainnet: get(SOLANA_RPC_MAINNET_ENV).unwrap_or(defaults.rpc.mainnet),
                devnet: get(SOLANA_RPC_DEVNET_ENV).unwrap_or(defaults.rpc.devnet),
                testnet: get(SOLANA_RPC_TESTNET_ENV).unwrap_or(defaults.rpc.testnet),
            },
            price_api_base_url: get(PRICE_API_BASE_URL_ENV)
                .unwrap_or(defaults.price_api_base_url),
            refresh_interval,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Invalid {
            var: HOST_ENV,
            expected: "an IP address",
            value: self.host.clone(),
        })
    }
}

/// Serialized origin (`scheme://host[:port]`) of a URL. `None` for anything
/// without a tuple origin, including `*`.
fn origin_of(url: &str) -> Option<String> {
    let origin = url::Url::parse(url).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<WalletConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WalletConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config, WalletConfig::default());
        assert_eq!(config.network, NetworkId::Devnet);
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            (SOLANA_NETWORK_ENV, "mainnet"),
            (SOLANA_RPC_MAINNET_ENV, "https://rpc.example.com"),
            (PORT_ENV, "9000"),
            (WALLET_LINK_ENV, "https://tempwallet.xyz/?mnemonic=a+b"),
            (BALANCE_REFRESH_SECS_ENV, "30"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();

        assert_eq!(config.network, NetworkId::MainnetBeta);
        assert_eq!(config.rpc.mainnet, "https://rpc.example.com");
        assert_eq!(config.rpc.devnet, RpcEndpoints::default().devnet);
        assert_eq!(config.port, 9000);
        assert!(config.link.is_some());
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(30)));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn cors_defaults_to_link_base_origin() {
        assert_eq!(WalletConfig::default().cors_origins, vec!["https://tempwallet.xyz"]);

        let local = config(&[(WALLET_BASE_URL_ENV, "http://localhost:3000/wallet")]).unwrap();
        assert_eq!(local.cors_origins, vec!["http://localhost:3000"]);

        let invalid = config(&[(WALLET_BASE_URL_ENV, "not a url")]).unwrap();
        assert!(invalid.cors_origins.is_empty());
    }

    #[test]
    fn cors_origins_are_normalized_and_validated() {
        let listed = config(&[(
            CORS_ALLOW_ORIGINS_ENV,
            "http://localhost:3000/, https://wallet.example.com",
        )])
        .unwrap();
        assert_eq!(
            listed.cors_origins,
            vec!["http://localhost:3000", "https://wallet.example.com"]
        );

        assert!(matches!(
            config(&[(CORS_ALLOW_ORIGINS_ENV, "*")]),
            Err(ConfigError::Invalid { var: CORS_ALLOW_ORIGINS_ENV, .. })
        ));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = config(&[(WALLET_LINK_ENV, ""), (BALANCE_REFRESH_SECS_ENV, "0")]).unwrap();
        assert_eq!(config.link, None);
        assert_eq!(config.refresh_interval, None);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config(&[(SOLANA_NETWORK_ENV, "localnet")]),
            Err(ConfigError::Network { .. })
        ));
        assert!(matches!(
            config(&[(PORT_ENV, "http")]),
            Err(ConfigError::Invalid { var: PORT_ENV, .. })
        ));
        assert!(matches!(
            config(&[(LOG_FORMAT_ENV, "xml")]),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
