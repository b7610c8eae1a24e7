// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SPL token interactions: mint lookup, associated token accounts, balances
//! and transfer instructions.

use std::str::FromStr;

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};

use super::client::{LedgerError, LedgerRpc, TokenAmount};
use super::types::{NetworkId, SplToken};

/// Mint of `token` on `network`.
pub fn token_mint(token: &SplToken, network: NetworkId) -> Result<Pubkey, LedgerError> {
    let mint = token.mint_for(network);
    Pubkey::from_str(mint).map_err(|e| {
        LedgerError::InvalidAddress(format!("Invalid {} mint {mint}: {e}", token.symbol))
    })
}

/// The associated token account of an owner for one mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedAccount {
    pub owner: Pubkey,
    pub address: Pubkey,
    /// Whether the account is already initialized on-chain
    pub exists: bool,
}

impl AssociatedAccount {
    /// Instruction creating this account, paid for by `payer`. `None` when
    /// the account already exists.
    pub fn create_instruction(&self, payer: &Pubkey, mint: &Pubkey) -> Option<Instruction> {
        if self.exists {
            return None;
        }
        Some(create_associated_token_account_idempotent(
            payer,
            &self.owner,
            mint,
            &spl_token::id(),
        ))
    }
}

/// Derive the associated token account of `owner` and check whether it exists.
pub async fn resolve_associated_account(
    ledger: &dyn LedgerRpc,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<AssociatedAccount, LedgerError> {
    let address = get_associated_token_address(owner, mint);
    let exists = ledger.account_exists(&address).await?;
    Ok(AssociatedAccount {
        owner: *owner,
        address,
        exists,
    })
}

/// Token balance of `owner`. An owner holding no token account has a zero balance.
pub async fn token_balance(
    ledger: &dyn LedgerRpc,
    owner: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
) -> Result<TokenAmount, LedgerError> {
    let accounts = ledger.get_token_accounts_by_owner(owner, mint).await?;
    match accounts.first() {
        Some(account) => ledger.get_token_account_balance(account).await,
        None => Ok(TokenAmount::zero(decimals)),
    }
}

/// SPL `Transfer` instruction moving `amount` smallest units.
pub fn transfer_instruction(
    source: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, LedgerError> {
    spl_token::instruction::transfer(&spl_token::id(), source, destination, authority, &[], amount)
        .map_err(|e| LedgerError::InvalidInstruction(e.to_string()))
}
