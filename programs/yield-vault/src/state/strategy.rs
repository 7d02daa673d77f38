use anchor_lang::prelude::*;

use crate::{
    constants::{BPS_DENOMINATOR, MAX_APY_BPS, MAX_LOSS_BPS, SECONDS_PER_YEAR},
    errors::VaultError,
    math::bps_of,
};

/// Profit and loss realized by one strategy harvest
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub profit: u64,
    pub loss: u64,
}

/// Contract every yield source plugged into a vault must satisfy.
///
/// Mutating calls are restricted to the owning vault: `caller` is the vault
/// state key the accountant acts as. `now` is the unix timestamp of the
/// current execution context.
pub trait StrategyAdapter {
    /// Vault this adapter is bound to
    fn vault(&self) -> Pubkey;

    fn is_active(&self) -> bool;

    /// Accept `amount` of principal from the vault
    fn invest(&mut self, caller: &Pubkey, amount: u64, now: i64) -> Result<()>;

    /// Realize profit or loss since the previous harvest
    fn harvest(&mut self, caller: &Pubkey, now: i64) -> Result<HarvestReport>;

    /// Return up to `amount` of principal. The returned value is what was
    /// actually recovered and may be less than requested.
    fn withdraw(&mut self, caller: &Pubkey, amount: u64, now: i64) -> Result<u64>;

    /// Recover everything available and shut the adapter down
    fn emergency_withdraw(&mut self, caller: &Pubkey, now: i64) -> Result<u64>;

    /// Best-effort current value, including unrealized yield
    fn total_assets(&self, now: i64) -> Result<u64>;
}

/// Reference adapter: principal accrues simple interest at `apy_bps`.
///
/// Funds stay in the strategy's own token account, so withdrawals recover
/// exactly what is asked. Profit must be physically backed by tokens sent
/// through `fund_strategy_rewards`.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LinearYieldStrategy {
    /// Vault allowed to drive this strategy
    pub vault: Pubkey,

    /// Underlying asset, same as the vault's
    pub asset_mint: Pubkey,

    /// Distinguishes successive strategies of one vault
    pub strategy_id: u64,

    /// Strategy's own belief about invested principal
    pub principal: u64,

    pub is_active: bool,

    /// Simulated annual yield
    pub apy_bps: u16,

    /// When set, the next harvest reports `principal * loss_bps` as loss
    pub simulate_loss: bool,

    pub loss_bps: u16,

    /// Yield accrued on earlier principal amounts, not yet harvested
    pub pending_profit: u64,

    /// Start of the current accrual window
    pub last_accrual_ts: i64,

    pub bump: u8,

    /// Bump seed for strategy authority PDA
    pub authority_bump: u8,
}

impl LinearYieldStrategy {
    pub const SPACE: usize = 8 + 32 + 32 + 8 + 8 + 1 + 2 + 1 + 2 + 8 + 8 + 1 + 1;

    pub fn new(vault: Pubkey, asset_mint: Pubkey, strategy_id: u64, apy_bps: u16, now: i64) -> Result<Self> {
        require!(apy_bps <= MAX_APY_BPS, VaultError::InvalidAPY);
        Ok(Self {
            vault,
            asset_mint,
            strategy_id,
            principal: 0,
            is_active: true,
            apy_bps,
            simulate_loss: false,
            loss_bps: 0,
            pending_profit: 0,
            last_accrual_ts: now,
            bump: 0,
            authority_bump: 0,
        })
    }

    /// Yield on the current principal since `last_accrual_ts`
    ///
    /// profit = principal * apy_bps * elapsed / (BPS_DENOMINATOR * SECONDS_PER_YEAR)
    pub fn accrued_since_checkpoint(&self, now: i64) -> Result<u64> {
        let elapsed = now.saturating_sub(self.last_accrual_ts).max(0) as u128;

        let numerator = (self.principal as u128)
            .checked_mul(self.apy_bps as u128)
            .and_then(|v| v.checked_mul(elapsed))
            .ok_or(VaultError::MathOverflow)?;
        let denominator = (BPS_DENOMINATOR as u128) * (SECONDS_PER_YEAR as u128);

        u64::try_from(numerator / denominator).map_err(|_| error!(VaultError::MathOverflow))
    }

    /// Fold yield accrued on the current principal into `pending_profit`
    /// before principal changes.
    fn checkpoint(&mut self, now: i64) -> Result<()> {
        if !self.simulate_loss {
            let accrued = self.accrued_since_checkpoint(now)?;
            self.pending_profit = self
                .pending_profit
                .checked_add(accrued)
                .ok_or(VaultError::MathOverflow)?;
        }
        self.last_accrual_ts = now;
        Ok(())
    }

    fn only_vault(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.vault, VaultError::OnlyVault);
        Ok(())
    }

    pub fn activate(&mut self, now: i64) -> Result<()> {
        require!(!self.is_active, VaultError::AlreadyActive);
        self.is_active = true;
        // no yield accrues while inactive
        self.last_accrual_ts = now;
        Ok(())
    }

    pub fn deactivate(&mut self, now: i64) -> Result<()> {
        require!(self.is_active, VaultError::NotActive);
        self.checkpoint(now)?;
        self.is_active = false;
        Ok(())
    }

    pub fn set_apy(&mut self, apy_bps: u16, now: i64) -> Result<()> {
        require!(apy_bps <= MAX_APY_BPS, VaultError::InvalidAPY);
        if self.is_active {
            self.checkpoint(now)?;
        }
        self.apy_bps = apy_bps;
        Ok(())
    }

    pub fn set_loss_simulation(&mut self, enabled: bool, loss_bps: u16, now: i64) -> Result<()> {
        require!(loss_bps <= MAX_LOSS_BPS, VaultError::InvalidLossRate);
        if self.is_active {
            self.checkpoint(now)?;
        }
        self.simulate_loss = enabled;
        self.loss_bps = loss_bps;
        Ok(())
    }
}

impl StrategyAdapter for LinearYieldStrategy {
    fn vault(&self) -> Pubkey {
        self.vault
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn invest(&mut self, caller: &Pubkey, amount: u64, now: i64) -> Result<()> {
        self.only_vault(caller)?;
        require!(self.is_active, VaultError::NotActive);
        require!(amount > 0, VaultError::ZeroAmount);

        let principal = self
            .principal
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        self.checkpoint(now)?;
        self.principal = principal;
        Ok(())
    }

    fn harvest(&mut self, caller: &Pubkey, now: i64) -> Result<HarvestReport> {
        self.only_vault(caller)?;
        require!(self.is_active, VaultError::NotActive);

        let report = if self.simulate_loss {
            // loss mode realizes no yield
            HarvestReport {
                profit: 0,
                loss: bps_of(self.principal, self.loss_bps)?,
            }
        } else {
            HarvestReport {
                profit: self
                    .pending_profit
                    .checked_add(self.accrued_since_checkpoint(now)?)
                    .ok_or(VaultError::MathOverflow)?,
                loss: 0,
            }
        };

        self.principal = self
            .principal
            .checked_add(report.profit)
            .ok_or(VaultError::MathOverflow)?
            .saturating_sub(report.loss);
        self.pending_profit = 0;
        self.last_accrual_ts = now;

        Ok(report)
    }

    fn withdraw(&mut self, caller: &Pubkey, amount: u64, now: i64) -> Result<u64> {
        self.only_vault(caller)?;
        require!(amount <= self.principal, VaultError::InsufficientAssets);

        if self.is_active {
            self.checkpoint(now)?;
        }
        self.principal -= amount;
        Ok(amount)
    }

    fn emergency_withdraw(&mut self, caller: &Pubkey, now: i64) -> Result<u64> {
        self.only_vault(caller)?;

        let recovered = self.principal;
        self.principal = 0;
        self.pending_profit = 0;
        self.is_active = false;
        self.last_accrual_ts = now;

        Ok(recovered)
    }

    fn total_assets(&self, now: i64) -> Result<u64> {
        // loss is only realized at harvest, never double counted here
        if self.simulate_loss {
            return Ok(self.principal);
        }

        let accrued = if self.is_active {
            self.accrued_since_checkpoint(now)?
        } else {
            0
        };

        self.principal
            .checked_add(self.pending_profit)
            .and_then(|v| v.checked_add(accrued))
            .ok_or(error!(VaultError::MathOverflow))
    }
}
