// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer building, signing and submission.
//!
//! Native transfers are a single system instruction. Token transfers move
//! USDC between associated token accounts, creating missing ones in the
//! same transaction (paid by the sender).
//!
//! Requests that cannot produce a transfer (no account, empty destination,
//! non-positive amount, amount below one smallest unit) are skipped without
//! touching the network and yield `Ok(None)`.

use std::{str::FromStr, sync::Arc};

use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signer::Signer, transaction::Transaction};
use solana_system_interface::instruction as system_instruction;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::client::{LedgerConnector, LedgerError, LedgerRpc};
use super::signing::Account;
use super::spl;
use super::types::{AssetKind, NetworkId, NATIVE_DECIMALS, USDC_TOKEN};

/// A transfer as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TransferRequest {
    pub asset: AssetKind,
    /// Destination address, validated on submission
    pub destination: String,
    /// Amount in display units
    pub amount: Decimal,
}

/// Result of a confirmed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TransferReceipt {
    pub signature: String,
    pub asset: AssetKind,
    pub amount: Decimal,
    /// Amount actually moved, in smallest units
    pub raw_amount: u64,
    pub destination: String,
    pub network: NetworkId,
    /// Associated token accounts created by this transfer
    pub created_accounts: Vec<String>,
    pub explorer_url: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransferFailureReason {
    #[error("invalid destination address: {0}")]
    InvalidDestination(String),

    #[error("amount does not fit in {0} smallest units")]
    AmountOverflow(AssetKind),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// A transfer that was attempted and did not confirm.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{asset} transfer of {amount} to {destination} failed: {reason}")]
pub struct TransferSubmissionFailure {
    pub asset: AssetKind,
    pub amount: Decimal,
    pub destination: String,
    pub reason: TransferFailureReason,
}

/// Scale a display amount to smallest units, truncating toward zero.
///
/// `None` when the scaled amount does not fit in a `u64`.
pub fn to_smallest_units(amount: Decimal, decimals: u32) -> Option<u64> {
    let factor = Decimal::from(10u64.checked_pow(decimals)?);
    amount.checked_mul(factor)?.trunc().to_u64()
}

/// Builds, signs and submits transfers through the ledger connector.
pub struct TransferEngine {
    connector: Arc<dyn LedgerConnector>,
}

impl TransferEngine {
    pub fn new(connector: Arc<dyn LedgerConnector>) -> Self {
        Self { connector }
    }

    /// Dispatch a transfer request by asset kind.
    pub async fn transfer(
        &self,
        account: Option<&Account>,
        network: NetworkId,
        request: &TransferRequest,
    ) -> Result<Option<TransferReceipt>, TransferSubmissionFailure> {
        match request.asset {
            AssetKind::Native => {
                self.transfer_native(account, network, &request.destination, request.amount)
                    .await
            }
            AssetKind::Token => {
                self.transfer_token(account, network, &request.destination, request.amount)
                    .await
            }
        }
    }

    /// Send `amount` SOL to `destination`.
    pub async fn transfer_native(
        &self,
        account: Option<&Account>,
        network: NetworkId,
        destination: &str,
        amount: Decimal,
    ) -> Result<Option<TransferReceipt>, TransferSubmissionFailure> {
        let Some(prepared) = Prepared::new(AssetKind::Native, account, destination, amount) else {
            return Ok(None);
        };
        let Prepared {
            account,
            destination,
            ..
        } = prepared;

        let fail = |reason: TransferFailureReason| {
            failure(AssetKind::Native, amount, destination, reason)
        };

        let lamports = match to_smallest_units(amount, u32::from(NATIVE_DECIMALS)) {
            Some(0) => return Ok(skip(AssetKind::Native, "amount below one lamport")),
            Some(lamports) => lamports,
            None => return Err(fail(TransferFailureReason::AmountOverflow(AssetKind::Native))),
        };
        let to = parse_destination(destination).map_err(&fail)?;

        let ledger = self.connector.connect(network);
        let instruction = system_instruction::transfer(&account.address(), &to, lamports);
        let signature = submit(ledger.as_ref(), account, vec![instruction])
            .await
            .map_err(|e| fail(e.into()))?;

        info!(
            network = %network,
            to = %to,
            lamports,
            signature = %signature,
            "Native transfer confirmed"
        );

        Ok(Some(TransferReceipt {
            explorer_url: network.explorer_tx_url(&signature),
            signature,
            asset: AssetKind::Native,
            amount,
            raw_amount: lamports,
            destination: destination.to_string(),
            network,
            created_accounts: Vec::new(),
        }))
    }

    /// Send `amount` USDC to the associated token account of `destination`.
    pub async fn transfer_token(
        &self,
        account: Option<&Account>,
        network: NetworkId,
        destination: &str,
        amount: Decimal,
    ) -> Result<Option<TransferReceipt>, TransferSubmissionFailure> {
        let Some(prepared) = Prepared::new(AssetKind::Token, account, destination, amount) else {
            return Ok(None);
        };
        let Prepared {
            account,
            destination,
            ..
        } = prepared;

        let fail =
            |reason: TransferFailureReason| failure(AssetKind::Token, amount, destination, reason);

        let units = match to_smallest_units(amount, u32::from(USDC_TOKEN.decimals)) {
            Some(0) => return Ok(skip(AssetKind::Token, "amount below one token unit")),
            Some(units) => units,
            None => return Err(fail(TransferFailureReason::AmountOverflow(AssetKind::Token))),
        };
        let to = parse_destination(destination).map_err(&fail)?;
        let mint = spl::token_mint(&USDC_TOKEN, network).map_err(|e| fail(e.into()))?;

        let ledger = self.connector.connect(network);
        let owner = account.address();

        let (source_ata, destination_ata) = tokio::try_join!(
            spl::resolve_associated_account(ledger.as_ref(), &owner, &mint),
            spl::resolve_associated_account(ledger.as_ref(), &to, &mint),
        )
        .map_err(|e| fail(e.into()))?;

        let mut instructions = Vec::with_capacity(3);
        let mut created_accounts = Vec::new();
        let self_transfer = destination_ata.address == source_ata.address;
        let to_create = if self_transfer {
            vec![&source_ata]
        } else {
            vec![&source_ata, &destination_ata]
        };
        for ata in to_create {
            if let Some(create) = ata.create_instruction(&owner, &mint) {
                debug!(owner = %ata.owner, address = %ata.address, "Creating associated token account");
                instructions.push(create);
                created_accounts.push(ata.address.to_string());
            }
        }
        instructions.push(
            spl::transfer_instruction(&source_ata.address, &destination_ata.address, &owner, units)
                .map_err(|e| fail(e.into()))?,
        );

        let signature = submit(ledger.as_ref(), account, instructions)
            .await
            .map_err(|e| fail(e.into()))?;

        info!(
            network = %network,
            to = %to,
            units,
            created = created_accounts.len(),
            signature = %signature,
            "Token transfer confirmed"
        );

        Ok(Some(TransferReceipt {
            explorer_url: network.explorer_tx_url(&signature),
            signature,
            asset: AssetKind::Token,
            amount,
            raw_amount: units,
            destination: destination.to_string(),
            network,
            created_accounts,
        }))
    }
}

/// Inputs that passed the local preconditions.
struct Prepared<'a> {
    account: &'a Account,
    destination: &'a str,
}

impl<'a> Prepared<'a> {
    fn new(
        asset: AssetKind,
        account: Option<&'a Account>,
        destination: &'a str,
        amount: Decimal,
    ) -> Option<Self> {
        let Some(account) = account else {
            return skip(asset, "no active account");
        };
        let destination = destination.trim();
        if destination.is_empty() {
            return skip(asset, "empty destination");
        }
        if amount <= Decimal::ZERO {
            return skip(asset, "non-positive amount");
        }
        Some(Self {
            account,
            destination,
        })
    }
}

fn skip<T>(asset: AssetKind, reason: &'static str) -> Option<T> {
    debug!(%asset, reason, "Skipping transfer");
    None
}

fn parse_destination(destination: &str) -> Result<Pubkey, TransferFailureReason> {
    Pubkey::from_str(destination)
        .map_err(|e| TransferFailureReason::InvalidDestination(format!("{destination}: {e}")))
}

fn failure(
    asset: AssetKind,
    amount: Decimal,
    destination: &str,
    reason: TransferFailureReason,
) -> TransferSubmissionFailure {
    warn!(%asset, %amount, destination, error = %reason, "Transfer failed");
    TransferSubmissionFailure {
        asset,
        amount,
        destination: destination.to_string(),
        reason,
    }
}

/// Sign `instructions` with the account as fee payer, then send and confirm.
async fn submit(
    ledger: &dyn LedgerRpc,
    account: &Account,
    instructions: Vec<Instruction>,
) -> Result<String, LedgerError> {
    let blockhash = ledger.latest_blockhash().await?;
    let payer = account.keypair();
    let transaction = Transaction::new_signed_with_payer(
        &instructions,
        Some(&payer.pubkey()),
        &[payer],
        blockhash,
    );
    let signature = ledger.send_and_confirm_transaction(&transaction).await?;
    Ok(signature.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_account, MockConnector, MockLedger};
    use solana_system_interface::program as system_program;
    use spl_associated_token_account::get_associated_token_address;

    fn engine(ledger: MockLedger) -> (TransferEngine, Arc<MockLedger>) {
        let ledger = Arc::new(ledger);
        let engine = TransferEngine::new(Arc::new(MockConnector::single(ledger.clone())));
        (engine, ledger)
    }

    fn last_instruction_data(ledger: &MockLedger) -> Vec<u8> {
        let sent = ledger.sent_transactions();
        let message = &sent.last().unwrap().message;
        message.instructions.last().unwrap().data.clone()
    }

    #[test]
    fn scaling_truncates_toward_zero() {
        assert_eq!(to_smallest_units(Decimal::new(15, 1), 9), Some(1_500_000_000));
        assert_eq!(to_smallest_units(Decimal::new(25, 1), 6), Some(2_500_000));
        assert_eq!(to_smallest_units(Decimal::new(1234567, 7), 6), Some(123_456));
        assert_eq!(to_smallest_units(Decimal::new(1, 10), 9), Some(0));
        assert_eq!(to_smallest_units(Decimal::MAX, 9), None);
    }

    #[tokio::test]
    async fn zero_amount_makes_no_network_call() {
        let (engine, ledger) = engine(MockLedger::new());
        let account = test_account();
        let to = Pubkey::new_unique().to_string();

        let receipt = engine
            .transfer_native(Some(&account), NetworkId::Devnet, &to, Decimal::ZERO)
            .await
            .unwrap();

        assert!(receipt.is_none());
        assert_eq!(ledger.total_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_preconditions_are_skipped() {
        let (engine, ledger) = engine(MockLedger::new());
        let account = test_account();
        let to = Pubkey::new_unique().to_string();

        let cases = [
            (None, to.as_str(), Decimal::ONE),
            (Some(&account), "   ", Decimal::ONE),
            (Some(&account), to.as_str(), Decimal::new(-1, 0)),
            // Below one lamport
            (Some(&account), to.as_str(), Decimal::new(1, 10)),
        ];
        for (account, destination, amount) in cases {
            let result = engine
                .transfer_native(account, NetworkId::Devnet, destination, amount)
                .await
                .unwrap();
            assert!(result.is_none());
        }
        // Below one USDC unit
        let result = engine
            .transfer_token(Some(&account), NetworkId::Devnet, &to, Decimal::new(1, 7))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(ledger.total_calls(), 0);
    }

    #[tokio::test]
    async fn native_transfer_sends_scaled_lamports() {
        let (engine, ledger) = engine(MockLedger::new());
        let account = test_account();
        let to = Pubkey::new_unique();

        let receipt = engine
            .transfer_native(Some(&account), NetworkId::Devnet, &to.to_string(), Decimal::new(15, 1))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(receipt.raw_amount, 1_500_000_000);
        assert_eq!(receipt.asset, AssetKind::Native);
        assert_eq!(receipt.destination, to.to_string());
        assert!(receipt.created_accounts.is_empty());
        assert!(receipt.explorer_url.ends_with("?cluster=devnet"));

        let sent = ledger.sent_transactions();
        assert_eq!(sent.len(), 1);
        let message = &sent[0].message;
        assert_eq!(message.account_keys[0], account.address());
        assert_eq!(message.instructions.len(), 1);
        let program = message.account_keys[message.instructions[0].program_id_index as usize];
        assert_eq!(program, system_program::id());
        // System transfer: u32 tag 2, then little-endian lamports
        let data = last_instruction_data(&ledger);
        assert_eq!(u64::from_le_bytes(data[4..12].try_into().unwrap()), 1_500_000_000);
        assert_eq!(receipt.signature, sent[0].signatures[0].to_string());
    }

    #[tokio::test]
    async fn token_transfer_creates_missing_accounts() {
        let account = test_account();
        let mint = spl::token_mint(&USDC_TOKEN, NetworkId::Devnet).unwrap();
        let source_ata = get_associated_token_address(&account.address(), &mint);
        let to = Pubkey::new_unique();
        let destination_ata = get_associated_token_address(&to, &mint);

        let (engine, ledger) = engine(MockLedger::new().with_existing_account(source_ata));

        let receipt = engine
            .transfer_token(Some(&account), NetworkId::Devnet, &to.to_string(), Decimal::new(25, 1))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(receipt.raw_amount, 2_500_000);
        assert_eq!(receipt.created_accounts, vec![destination_ata.to_string()]);

        let sent = ledger.sent_transactions();
        let message = &sent[0].message;
        assert_eq!(message.instructions.len(), 2);
        let program_of = |i: usize| {
            message.account_keys[message.instructions[i].program_id_index as usize]
        };
        assert_eq!(program_of(0), spl_associated_token_account::id());
        assert_eq!(program_of(1), spl_token::id());
        let data = last_instruction_data(&ledger);
        assert_eq!(data[0], 3);
        assert_eq!(u64::from_le_bytes(data[1..9].try_into().unwrap()), 2_500_000);
    }

    #[tokio::test]
    async fn token_transfer_to_self_creates_account_once() {
        let account = test_account();
        let mint = spl::token_mint(&USDC_TOKEN, NetworkId::Devnet).unwrap();
        let own_ata = get_associated_token_address(&account.address(), &mint);
        let (engine, ledger) = engine(MockLedger::new());

        let receipt = engine
            .transfer_token(
                Some(&account),
                NetworkId::Devnet,
                &account.address().to_string(),
                Decimal::ONE,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(receipt.created_accounts, vec![own_ata.to_string()]);
        let sent = ledger.sent_transactions();
        let message = &sent[0].message;
        // One create, one transfer
        assert_eq!(message.instructions.len(), 2);
        let program_of = |i: usize| {
            message.account_keys[message.instructions[i].program_id_index as usize]
        };
        assert_eq!(program_of(0), spl_associated_token_account::id());
        assert_eq!(program_of(1), spl_token::id());
    }

    #[tokio::test]
    async fn token_transfer_between_existing_accounts() {
        let account = test_account();
        let mint = spl::token_mint(&USDC_TOKEN, NetworkId::MainnetBeta).unwrap();
        let to = Pubkey::new_unique();
        let ledger = MockLedger::new()
            .with_existing_account(get_associated_token_address(&account.address(), &mint))
            .with_existing_account(get_associated_token_address(&to, &mint));
        let (engine, ledger) = engine(ledger);

        let request = TransferRequest {
            asset: AssetKind::Token,
            destination: to.to_string(),
            amount: Decimal::ONE,
        };
        let receipt = engine
            .transfer(Some(&account), NetworkId::MainnetBeta, &request)
            .await
            .unwrap()
            .unwrap();

        assert!(receipt.created_accounts.is_empty());
        assert_eq!(receipt.raw_amount, 1_000_000);
        assert_eq!(receipt.network, NetworkId::MainnetBeta);
        assert_eq!(ledger.sent_transactions()[0].message.instructions.len(), 1);
    }

    #[tokio::test]
    async fn submission_failure_carries_details() {
        let (engine, _) = engine(MockLedger::new().with_send_failure("blockhash not found"));
        let account = test_account();
        let to = Pubkey::new_unique().to_string();

        let err = engine
            .transfer_native(Some(&account), NetworkId::Devnet, &to, Decimal::new(5, 1))
            .await
            .unwrap_err();

        assert_eq!(err.asset, AssetKind::Native);
        assert_eq!(err.amount, Decimal::new(5, 1));
        assert_eq!(err.destination, to);
        assert!(matches!(
            err.reason,
            TransferFailureReason::Ledger(LedgerError::TransactionFailed(_))
        ));
        assert!(err.to_string().contains("blockhash not found"));
    }

    #[tokio::test]
    async fn invalid_destination_fails_before_network() {
        let (engine, ledger) = engine(MockLedger::new());
        let account = test_account();

        let err = engine
            .transfer_token(Some(&account), NetworkId::Devnet, "not-an-address", Decimal::ONE)
            .await
            .unwrap_err();

        assert!(matches!(err.reason, TransferFailureReason::InvalidDestination(_)));
        assert_eq!(err.destination, "not-an-address");
        assert_eq!(ledger.total_calls(), 0);
    }
}
