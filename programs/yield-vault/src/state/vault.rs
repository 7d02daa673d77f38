use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_INVEST_RATIO_BPS, PRICE_SCALE},
    errors::VaultError,
    math::mul_div_floor,
    state::{AccessGate, FeeCalculator},
};

/// Global vault state tracking the idle / invested split
///
/// Security considerations:
/// - Asset totals are bookkeeping, never read from the token account, so a
///   direct transfer into custody cannot move the exchange rate
/// - `locked` is held for the whole of every mutating operation and written
///   back before any token CPI
/// - 32 bytes padding for future upgrades
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VaultState {
    /// Admin that can invest, harvest, swap strategies and configure the vault
    pub authority: Pubkey,          // 32 bytes

    /// Mint of the underlying asset token
    pub asset_mint: Pubkey,         // 32 bytes

    /// Share ledger bound to this vault
    pub share_ledger: Pubkey,       // 32 bytes

    /// Active strategy, `Pubkey::default()` when none is bound
    pub strategy: Pubkey,           // 32 bytes

    /// Assets held by the vault itself
    pub idle_assets: u64,           // 8 bytes

    /// Assets believed to be deployed in the strategy
    pub invested_assets: u64,       // 8 bytes

    /// Share of total assets auto-allocated to the strategy
    pub invest_ratio_bps: u16,      // 2 bytes

    /// Set by the first qualifying deposit, never cleared
    pub initialized: bool,          // 1 byte

    /// Re-entrancy guard
    pub locked: bool,               // 1 byte

    pub gate: AccessGate,           // 2 bytes

    pub fees: FeeCalculator,        // 5 bytes

    /// Bump seed for vault state PDA
    pub bump: u8,                   // 1 byte

    /// Bump seed for vault authority PDA
    pub authority_bump: u8,         // 1 byte

    // Padding for future upgrades
    pub _reserved: [u8; 32],        // 32 bytes
}

impl VaultState {
    pub fn has_strategy(&self) -> bool {
        self.strategy != Pubkey::default()
    }

    pub fn set_invest_ratio(&mut self, bps: u16) -> Result<()> {
        require!(bps <= MAX_INVEST_RATIO_BPS, VaultError::InvalidInvestRatio);
        self.invest_ratio_bps = bps;
        Ok(())
    }

    /// Take the re-entrancy guard. Fails if an outer call already holds it.
    pub fn acquire_lock(&mut self) -> Result<()> {
        if self.locked {
            msg!("Rejected re-entrant call into locked vault");
            return err!(VaultError::ReentrancyDetected);
        }
        self.locked = true;
        Ok(())
    }

    pub fn release_lock(&mut self) {
        self.locked = false;
    }

    /// `idle_assets + strategy_assets`
    pub fn total_assets_with(&self, strategy_assets: u64) -> Result<u64> {
        self.idle_assets
            .checked_add(strategy_assets)
            .ok_or(error!(VaultError::MathOverflow))
    }
}

/// Shares minted for `assets`: 1:1 into an empty vault, otherwise
/// `floor(assets * total_supply / total_assets)`.
pub fn convert_to_shares(assets: u64, total_assets: u64, total_supply: u64) -> Result<u64> {
    if total_supply == 0 {
        return Ok(assets);
    }
    mul_div_floor(assets, total_supply, total_assets)
}

/// Assets paid for `shares`: `floor(shares * total_assets / total_supply)`.
pub fn convert_to_assets(shares: u64, total_assets: u64, total_supply: u64) -> Result<u64> {
    if total_supply == 0 {
        return Ok(0);
    }
    mul_div_floor(shares, total_assets, total_supply)
}

/// `total_assets * PRICE_SCALE / total_supply`, or `PRICE_SCALE` for an empty vault
pub fn share_price(total_assets: u64, total_supply: u64) -> Result<u64> {
    if total_supply == 0 {
        return Ok(PRICE_SCALE);
    }
    mul_div_floor(total_assets, PRICE_SCALE, total_supply)
}
