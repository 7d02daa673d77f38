//! Vault accounting engine.
//!
//! `VaultAccountant` borrows the vault, its share ledger and (optionally) the
//! bound strategy for the duration of one instruction and runs the
//! deposit / redeem / invest / harvest state machine over them. Token
//! movements are queued while bookkeeping is updated and only handed to
//! `AssetCustody` once every effect is recorded, with the vault lock still
//! held.

use anchor_lang::prelude::*;

use crate::{
    constants::MINIMUM_SHARES,
    errors::VaultError,
    math::bps_of,
    state::{
        convert_to_assets, convert_to_shares, share_price, HarvestReport, ShareBalance,
        ShareLedger, StrategyAdapter, VaultState,
    },
};

/// Verified identity and execution time of the current instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Transaction signer the operation is performed for
    pub caller: Pubkey,
    /// Unix timestamp from the clock sysvar
    pub now: i64,
    /// Caller holds an allowlist entry for this vault
    pub allowlisted: bool,
}

impl CallContext {
    pub fn new(caller: Pubkey, now: i64) -> Self {
        Self {
            caller,
            now,
            allowlisted: false,
        }
    }

    pub fn with_allowlist(mut self, allowlisted: bool) -> Self {
        self.allowlisted = allowlisted;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferRoute {
    /// Depositor's token account into vault custody
    DepositorToVault,
    /// Vault custody out to the redeemer
    VaultToReceiver,
    VaultToStrategy,
    StrategyToVault,
}

/// Moves tokens on behalf of the accountant.
///
/// `committed` is the vault state at the moment of the transfer: all
/// bookkeeping for the operation already applied and the lock still held.
pub trait AssetCustody {
    fn transfer(&mut self, route: TransferRoute, amount: u64, committed: &VaultState) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DepositOutcome {
    pub shares: u64,
    /// Moved into the strategy by auto-allocation
    pub auto_invested: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedeemOutcome {
    pub assets: u64,
    /// Recovered from the strategy to cover the idle shortfall
    pub pulled_from_strategy: u64,
    /// Informational quote, not deducted
    pub withdrawal_fee: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HarvestOutcome {
    pub report: HarvestReport,
    pub invested_assets: u64,
    /// Informational quote, not deducted
    pub performance_fee: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrategyReplacement {
    pub previous: Pubkey,
    /// `invested_assets` bookkeeping before the drain
    pub expected: u64,
    /// What the outgoing strategy actually returned
    pub recovered: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrategySummary {
    pub strategy: Pubkey,
    pub is_active: bool,
    pub invested_assets: u64,
    /// The strategy's own estimate, including unrealized yield
    pub reported_assets: u64,
}

pub struct VaultAccountant<'a> {
    vault_key: Pubkey,
    vault: &'a mut VaultState,
    ledger_key: Pubkey,
    ledger: &'a mut ShareLedger,
    strategy: Option<&'a mut dyn StrategyAdapter>,
    custody: Option<&'a mut dyn AssetCustody>,
    pending: Vec<(TransferRoute, u64)>,
}

impl<'a> VaultAccountant<'a> {
    pub fn new(
        vault_key: Pubkey,
        vault: &'a mut VaultState,
        ledger_key: Pubkey,
        ledger: &'a mut ShareLedger,
    ) -> Result<Self> {
        require_keys_eq!(vault.share_ledger, ledger_key, VaultError::LedgerMismatch);
        Ok(Self {
            vault_key,
            vault,
            ledger_key,
            ledger,
            strategy: None,
            custody: None,
            pending: Vec::new(),
        })
    }

    /// Attach the vault's bound strategy. Must be supplied exactly when the
    /// vault has one.
    pub fn with_strategy(mut self, strategy: Option<&'a mut dyn StrategyAdapter>) -> Result<Self> {
        require!(
            self.vault.has_strategy() == strategy.is_some(),
            VaultError::StrategyMismatch
        );
        if let Some(strategy) = strategy.as_deref() {
            require_keys_eq!(strategy.vault(), self.vault_key, VaultError::StrategyMismatch);
        }
        self.strategy = strategy;
        Ok(self)
    }

    pub fn with_custody(mut self, custody: &'a mut dyn AssetCustody) -> Self {
        self.custody = Some(custody);
        self
    }

    // ============ Views ============

    /// `idle_assets + strategy.total_assets()`; never reads a token balance
    pub fn total_assets(&self, now: i64) -> Result<u64> {
        let strategy_assets = match self.strategy.as_deref() {
            Some(strategy) => strategy.total_assets(now)?,
            None => 0,
        };
        self.vault.total_assets_with(strategy_assets)
    }

    pub fn total_idle_assets(&self) -> u64 {
        self.vault.idle_assets
    }

    pub fn total_invested_assets(&self) -> u64 {
        self.vault.invested_assets
    }

    pub fn total_supply(&self) -> u64 {
        self.ledger.total_supply
    }

    pub fn preview_deposit(&self, assets: u64, now: i64) -> Result<u64> {
        convert_to_shares(assets, self.total_assets(now)?, self.ledger.total_supply)
    }

    pub fn preview_redeem(&self, shares: u64, now: i64) -> Result<u64> {
        convert_to_assets(shares, self.total_assets(now)?, self.ledger.total_supply)
    }

    pub fn share_price(&self, now: i64) -> Result<u64> {
        share_price(self.total_assets(now)?, self.ledger.total_supply)
    }

    pub fn balance_of_assets(&self, holder: &ShareBalance, now: i64) -> Result<u64> {
        require_keys_eq!(holder.ledger, self.ledger_key, VaultError::LedgerMismatch);
        self.preview_redeem(holder.shares, now)
    }

    pub fn strategy_summary(&self, now: i64) -> Result<StrategySummary> {
        let (is_active, reported_assets) = match self.strategy.as_deref() {
            Some(strategy) => (strategy.is_active(), strategy.total_assets(now)?),
            None => (false, 0),
        };
        Ok(StrategySummary {
            strategy: self.vault.strategy,
            is_active,
            invested_assets: self.vault.invested_assets,
            reported_assets,
        })
    }

    // ============ Mutating operations ============

    pub fn deposit(
        &mut self,
        ctx: &CallContext,
        holder: &mut ShareBalance,
        assets: u64,
    ) -> Result<DepositOutcome> {
        self.guarded(|this| {
            this.vault.gate.ensure_can_deposit(ctx.allowlisted)?;
            require!(assets > 0, VaultError::ZeroAmount);
            require_keys_eq!(holder.ledger, this.ledger_key, VaultError::LedgerMismatch);

            let shares = this.preview_deposit(assets, ctx.now)?;
            require!(shares > 0, VaultError::ZeroShares);
            // bootstrap floor applies whenever the pool is empty
            if this.ledger.total_supply == 0 {
                require!(shares >= MINIMUM_SHARES, VaultError::FirstDepositTooSmall);
            }

            let idle_assets = this
                .vault
                .idle_assets
                .checked_add(assets)
                .ok_or(VaultError::MathOverflow)?;

            // EFFECTS
            this.ledger
                .mint(&this.ledger_key, &this.vault_key, holder, shares)?;
            this.vault.idle_assets = idle_assets;
            this.vault.initialized = true;
            this.pending.push((TransferRoute::DepositorToVault, assets));

            let auto_invested = this.auto_invest(ctx.now)?;

            Ok(DepositOutcome {
                shares,
                auto_invested,
            })
        })
    }

    pub fn redeem(
        &mut self,
        ctx: &CallContext,
        holder: &mut ShareBalance,
        shares: u64,
    ) -> Result<RedeemOutcome> {
        self.guarded(|this| {
            this.vault.gate.ensure_not_paused()?;
            require!(shares > 0, VaultError::ZeroAmount);
            require_keys_eq!(holder.ledger, this.ledger_key, VaultError::LedgerMismatch);
            require!(holder.shares >= shares, VaultError::InsufficientBalance);

            let total_assets = this.total_assets(ctx.now)?;
            let assets = convert_to_assets(shares, total_assets, this.ledger.total_supply)?;
            require!(assets > 0, VaultError::ZeroShares);
            require!(assets <= total_assets, VaultError::InsufficientAssets);

            let pulled_from_strategy = if assets > this.vault.idle_assets {
                let shortfall = assets - this.vault.idle_assets;
                this.withdraw_from_strategy(shortfall, ctx.now)?
            } else {
                0
            };
            // partial strategy withdrawals can leave idle short
            require!(assets <= this.vault.idle_assets, VaultError::InsufficientAssets);
            let withdrawal_fee = this.vault.fees.withdrawal_fee(assets)?;

            // EFFECTS
            this.vault.idle_assets -= assets;
            this.ledger
                .burn(&this.ledger_key, &this.vault_key, holder, shares)?;
            this.pending.push((TransferRoute::VaultToReceiver, assets));

            Ok(RedeemOutcome {
                assets,
                pulled_from_strategy,
                withdrawal_fee,
            })
        })
    }

    /// Invest `invest_ratio_bps` of the idle balance, regardless of target
    pub fn invest(&mut self, ctx: &CallContext) -> Result<u64> {
        self.only_authority(ctx)?;
        self.guarded(|this| {
            this.vault.gate.ensure_not_paused()?;
            let strategy = this.strategy.as_deref().ok_or(VaultError::NoStrategy)?;
            require!(strategy.is_active(), VaultError::NotActive);

            let amount = bps_of(this.vault.idle_assets, this.vault.invest_ratio_bps)?;
            require!(amount > 0, VaultError::ZeroAmount);

            this.invest_into_strategy(amount, ctx.now)?;
            Ok(amount)
        })
    }

    /// Reconcile the strategy's self-reported result into `invested_assets`
    pub fn harvest(&mut self, ctx: &CallContext) -> Result<HarvestOutcome> {
        self.only_authority(ctx)?;
        self.guarded(|this| {
            this.vault.gate.ensure_not_paused()?;
            let vault_key = this.vault_key;
            let report = this.strategy_mut()?.harvest(&vault_key, ctx.now)?;
            let performance_fee = this
                .vault
                .fees
                .performance_fee(report.profit.saturating_sub(report.loss))?;

            let invested = this.vault.invested_assets;
            this.vault.invested_assets = if report.profit >= report.loss {
                invested
                    .checked_add(report.profit - report.loss)
                    .ok_or(VaultError::MathOverflow)?
            } else {
                invested - invested.min(report.loss - report.profit)
            };

            Ok(HarvestOutcome {
                report,
                invested_assets: this.vault.invested_assets,
                performance_fee,
            })
        })
    }

    /// Drain the current strategy (if any) and bind `new_strategy`.
    ///
    /// The drained amount is whatever the outgoing strategy actually returns;
    /// any gap to the previous `invested_assets` is reported, not corrected.
    pub fn set_strategy(
        &mut self,
        ctx: &CallContext,
        new_key: Pubkey,
        new_strategy: &'a mut dyn StrategyAdapter,
    ) -> Result<StrategyReplacement> {
        self.only_authority(ctx)?;
        self.guarded(|this| {
            this.vault.gate.ensure_not_paused()?;
            require!(new_key != Pubkey::default(), VaultError::InvalidStrategy);
            require!(new_key != this.vault.strategy, VaultError::InvalidStrategy);
            require_keys_eq!(new_strategy.vault(), this.vault_key, VaultError::InvalidStrategy);

            let vault_key = this.vault_key;
            let previous = this.vault.strategy;
            let expected = this.vault.invested_assets;

            let recovered = match this.strategy.as_deref_mut() {
                Some(old) => old.emergency_withdraw(&vault_key, ctx.now)?,
                None => 0,
            };

            // EFFECTS
            this.vault.idle_assets = this
                .vault
                .idle_assets
                .checked_add(recovered)
                .ok_or(VaultError::MathOverflow)?;
            this.vault.invested_assets = 0;
            this.vault.strategy = new_key;
            if recovered > 0 {
                this.pending.push((TransferRoute::StrategyToVault, recovered));
            }
            if recovered != expected {
                msg!(
                    "Strategy {} drained with slippage: expected {}, recovered {}",
                    previous,
                    expected,
                    recovered
                );
            }
            this.strategy = Some(new_strategy);

            Ok(StrategyReplacement {
                previous,
                expected,
                recovered,
            })
        })
    }

    pub fn set_invest_ratio(&mut self, ctx: &CallContext, bps: u16) -> Result<()> {
        self.only_authority(ctx)?;
        self.vault.set_invest_ratio(bps)
    }

    // ============ Internals ============

    fn only_authority(&self, ctx: &CallContext) -> Result<()> {
        require_keys_eq!(ctx.caller, self.vault.authority, VaultError::Unauthorized);
        Ok(())
    }

    fn strategy_mut(&mut self) -> Result<&mut (dyn StrategyAdapter + 'a)> {
        self.strategy
            .as_deref_mut()
            .ok_or(error!(VaultError::NoStrategy))
    }

    /// Runs `op` holding the vault lock, then settles queued transfers.
    /// The lock is released on every exit path. Effects applied before a
    /// late failure (after an adapter call) are not undone here; on-chain
    /// the failed transaction's account writes are discarded by the runtime.
    fn guarded<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.vault.acquire_lock()?;
        let result = op(&mut *self).and_then(|value| self.settle().map(|()| value));
        self.pending.clear();
        self.vault.release_lock();
        result
    }

    fn settle(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let custody = self
            .custody
            .as_deref_mut()
            .ok_or(VaultError::CustodyUnavailable)?;
        for (route, amount) in self.pending.drain(..) {
            custody.transfer(route, amount, &*self.vault)?;
        }
        Ok(())
    }

    /// Top the strategy up to `invest_ratio_bps` of total assets
    fn auto_invest(&mut self, now: i64) -> Result<u64> {
        match self.strategy.as_deref() {
            Some(strategy) if strategy.is_active() => {}
            _ => return Ok(0),
        }

        let target = bps_of(self.total_assets(now)?, self.vault.invest_ratio_bps)?;
        if target <= self.vault.invested_assets {
            return Ok(0);
        }

        let amount = (target - self.vault.invested_assets).min(self.vault.idle_assets);
        if amount == 0 {
            return Ok(0);
        }
        self.invest_into_strategy(amount, now)?;
        Ok(amount)
    }

    fn invest_into_strategy(&mut self, amount: u64, now: i64) -> Result<()> {
        let idle_assets = self
            .vault
            .idle_assets
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientAssets)?;
        let invested_assets = self
            .vault
            .invested_assets
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        let vault_key = self.vault_key;
        self.strategy_mut()?.invest(&vault_key, amount, now)?;

        self.vault.idle_assets = idle_assets;
        self.vault.invested_assets = invested_assets;
        self.pending.push((TransferRoute::VaultToStrategy, amount));
        Ok(())
    }

    /// Pull up to `shortfall` back from the strategy, never asking for more
    /// than `invested_assets`. Returns what the strategy actually released.
    fn withdraw_from_strategy(&mut self, shortfall: u64, now: i64) -> Result<u64> {
        let request = shortfall.min(self.vault.invested_assets);
        if request == 0 {
            return Ok(0);
        }

        let vault_key = self.vault_key;
        let recovered = self.strategy_mut()?.withdraw(&vault_key, request, now)?;

        self.vault.invested_assets = self.vault.invested_assets.saturating_sub(recovered);
        self.vault.idle_assets = self
            .vault
            .idle_assets
            .checked_add(recovered)
            .ok_or(VaultError::MathOverflow)?;
        if recovered > 0 {
            self.pending.push((TransferRoute::StrategyToVault, recovered));
        }
        Ok(recovered)
    }
}
