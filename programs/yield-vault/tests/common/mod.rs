#![allow(dead_code)]

use anchor_lang::prelude::*;
use yield_vault::{
    accountant::{AssetCustody, CallContext, TransferRoute, VaultAccountant},
    constants::SECONDS_PER_YEAR,
    errors::VaultError,
    state::*,
};

pub const YEAR: i64 = SECONDS_PER_YEAR as i64;

/// In-memory token movements. Balances are the real token holdings, which
/// the vault's bookkeeping must never read.
#[derive(Default)]
pub struct MockCustody {
    pub vault_tokens: u64,
    pub strategy_tokens: u64,
    pub paid_out: u64,
    pub log: Vec<(TransferRoute, u64)>,
    /// Set if any transfer observed the vault unlocked
    pub saw_unlocked: bool,
}

impl MockCustody {
    /// Raw transfer into vault custody, bypassing the accountant
    pub fn donate(&mut self, amount: u64) {
        self.vault_tokens += amount;
    }
}

impl AssetCustody for MockCustody {
    fn transfer(&mut self, route: TransferRoute, amount: u64, committed: &VaultState) -> Result<()> {
        if !committed.locked {
            self.saw_unlocked = true;
        }
        match route {
            TransferRoute::DepositorToVault => self.vault_tokens += amount,
            TransferRoute::VaultToReceiver => {
                self.vault_tokens = self
                    .vault_tokens
                    .checked_sub(amount)
                    .ok_or(VaultError::InsufficientAssets)?;
                self.paid_out += amount;
            }
            TransferRoute::VaultToStrategy => {
                self.vault_tokens = self
                    .vault_tokens
                    .checked_sub(amount)
                    .ok_or(VaultError::InsufficientAssets)?;
                self.strategy_tokens += amount;
            }
            TransferRoute::StrategyToVault => {
                self.strategy_tokens = self
                    .strategy_tokens
                    .checked_sub(amount)
                    .ok_or(VaultError::InsufficientAssets)?;
                self.vault_tokens += amount;
            }
        }
        self.log.push((route, amount));
        Ok(())
    }
}

/// Adapter that recovers only part of what it is asked for and reports
/// whatever harvest result the test scripts.
pub struct LossyStrategy {
    pub vault: Pubkey,
    pub principal: u64,
    pub is_active: bool,
    /// Share of each withdrawal that is lost, in bps
    pub haircut_bps: u64,
    pub next_report: HarvestReport,
}

impl LossyStrategy {
    pub fn new(vault: Pubkey, haircut_bps: u64) -> Self {
        Self {
            vault,
            principal: 0,
            is_active: true,
            haircut_bps,
            next_report: HarvestReport::default(),
        }
    }

    fn after_haircut(&self, amount: u64) -> u64 {
        amount - amount * self.haircut_bps / 10_000
    }
}

impl StrategyAdapter for LossyStrategy {
    fn vault(&self) -> Pubkey {
        self.vault
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn invest(&mut self, caller: &Pubkey, amount: u64, _now: i64) -> Result<()> {
        require_keys_eq!(*caller, self.vault, VaultError::OnlyVault);
        self.principal += amount;
        Ok(())
    }

    fn harvest(&mut self, caller: &Pubkey, _now: i64) -> Result<HarvestReport> {
        require_keys_eq!(*caller, self.vault, VaultError::OnlyVault);
        let report = std::mem::take(&mut self.next_report);
        self.principal = (self.principal + report.profit).saturating_sub(report.loss);
        Ok(report)
    }

    fn withdraw(&mut self, caller: &Pubkey, amount: u64, _now: i64) -> Result<u64> {
        require_keys_eq!(*caller, self.vault, VaultError::OnlyVault);
        self.principal -= amount;
        Ok(self.after_haircut(amount))
    }

    fn emergency_withdraw(&mut self, caller: &Pubkey, _now: i64) -> Result<u64> {
        require_keys_eq!(*caller, self.vault, VaultError::OnlyVault);
        let recovered = self.after_haircut(self.principal);
        self.principal = 0;
        self.is_active = false;
        Ok(recovered)
    }

    fn total_assets(&self, _now: i64) -> Result<u64> {
        Ok(self.principal)
    }
}

/// One vault with its ledger and custody, driven directly through the
/// accountant the way the program handlers do.
pub struct Harness {
    pub vault_key: Pubkey,
    pub vault: VaultState,
    pub ledger_key: Pubkey,
    pub ledger: ShareLedger,
    pub authority: Pubkey,
    pub custody: MockCustody,
}

impl Harness {
    pub fn new(invest_ratio_bps: u16) -> Self {
        let vault_key = Pubkey::new_unique();
        let ledger_key = Pubkey::new_unique();
        let authority = Pubkey::new_unique();

        let mut ledger = ShareLedger::default();
        ledger.bind(vault_key).unwrap();

        let mut vault = VaultState {
            authority,
            asset_mint: Pubkey::new_unique(),
            share_ledger: ledger_key,
            gate: AccessGate {
                paused: false,
                public_deposits: true,
            },
            ..VaultState::default()
        };
        vault.set_invest_ratio(invest_ratio_bps).unwrap();

        Self {
            vault_key,
            vault,
            ledger_key,
            ledger,
            authority,
            custody: MockCustody::default(),
        }
    }

    pub fn accountant<'a>(&'a mut self, strategy: Option<&'a mut dyn StrategyAdapter>) -> VaultAccountant<'a> {
        VaultAccountant::new(self.vault_key, &mut self.vault, self.ledger_key, &mut self.ledger)
            .unwrap()
            .with_strategy(strategy)
            .unwrap()
            .with_custody(&mut self.custody)
    }

    pub fn holder(&self) -> ShareBalance {
        ShareBalance::new(self.ledger_key, Pubkey::new_unique())
    }

    pub fn user_call(&self, holder: &ShareBalance, now: i64) -> CallContext {
        CallContext::new(holder.owner, now)
    }

    pub fn admin_call(&self, now: i64) -> CallContext {
        CallContext::new(self.authority, now)
    }

    pub fn linear_strategy(&self, apy_bps: u16) -> (Pubkey, LinearYieldStrategy) {
        let strategy =
            LinearYieldStrategy::new(self.vault_key, self.vault.asset_mint, 0, apy_bps, 0).unwrap();
        (Pubkey::new_unique(), strategy)
    }

    /// Bind `strategy` to the vault through `set_strategy`
    pub fn bind<'a>(
        &'a mut self,
        key: Pubkey,
        strategy: &'a mut dyn StrategyAdapter,
        current: Option<&'a mut dyn StrategyAdapter>,
    ) {
        let call = self.admin_call(0);
        self.accountant(current)
            .set_strategy(&call, key, strategy)
            .unwrap();
    }

    /// `preview_redeem(total_supply) <= total_assets`
    pub fn assert_solvent<'a>(&'a mut self, strategy: Option<&'a mut dyn StrategyAdapter>, now: i64) {
        let accountant = self.accountant(strategy);
        let total_assets = accountant.total_assets(now).unwrap();
        let redeemable = accountant
            .preview_redeem(accountant.total_supply(), now)
            .unwrap();
        assert!(redeemable <= total_assets);
    }
}
