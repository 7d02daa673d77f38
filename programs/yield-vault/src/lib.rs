// Yield Vault - pooled-deposit vault with a pluggable yield strategy on Solana
// Security: share price derives from internal bookkeeping only; every mutating
// vault operation runs under a re-entrancy lock with effects before transfers

use anchor_lang::prelude::*;

pub mod accountant;
pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;

use instructions::*;

declare_id!("GVauv3SsPRDMAT9RoKLqAWeMhCvV4xchX2LYmR7BXEs9");

#[program]
pub mod yield_vault {
    use super::*;

    /// Initialize a new vault and its share ledger for a given asset token
    ///
    /// Security considerations:
    /// - Validates authority is signer
    /// - Binds the share ledger to the vault state PDA, exactly once
    /// - Validates the initial invest ratio
    pub fn initialize_vault(ctx: Context<InitializeVault>, params: InitializeVaultParams) -> Result<()> {
        instructions::initialize_vault::handler(ctx, params)
    }

    /// Deposit assets into the vault and receive shares
    ///
    /// Security considerations:
    /// - Pause and allowlist checks
    /// - Bootstrap deposit must mint at least MINIMUM_SHARES
    /// - Auto-allocates into the strategy up to the invest ratio
    /// - Emits event for tracking
    pub fn deposit(ctx: Context<Deposit>, assets: u64) -> Result<()> {
        instructions::deposit::handler(ctx, assets)
    }

    /// Burn shares for the proportional share of total assets
    ///
    /// Security considerations:
    /// - Holder must own the share balance
    /// - Pulls only the idle shortfall back from the strategy
    /// - Emits event for tracking
    pub fn redeem(ctx: Context<Redeem>, shares: u64) -> Result<()> {
        instructions::redeem::handler(ctx, shares)
    }

    /// Invest the configured ratio of idle assets into the strategy
    ///
    /// Security considerations:
    /// - Authority-only function (has_one constraint)
    /// - Only into the vault's bound, active strategy
    pub fn invest(ctx: Context<Invest>) -> Result<()> {
        instructions::invest::handler(ctx)
    }

    /// Reconcile strategy profit/loss into invested bookkeeping
    pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
        instructions::harvest::handler(ctx)
    }

    /// Drain the current strategy and bind a new one
    ///
    /// Security considerations:
    /// - Authority-only function
    /// - New strategy must belong to this vault and hold the same asset
    /// - Slippage on the drain is reported, never papered over
    pub fn set_strategy(ctx: Context<SetStrategy>) -> Result<()> {
        instructions::set_strategy::handler(ctx)
    }

    pub fn set_invest_ratio(ctx: Context<SetInvestRatio>, bps: u16) -> Result<()> {
        instructions::set_invest_ratio::handler(ctx, bps)
    }

    // ============ Strategy administration ============

    pub fn initialize_strategy(ctx: Context<InitializeStrategy>, strategy_id: u64, apy_bps: u16) -> Result<()> {
        instructions::strategy_admin::initialize_handler(ctx, strategy_id, apy_bps)
    }

    pub fn activate_strategy(ctx: Context<StrategyAdmin>) -> Result<()> {
        instructions::strategy_admin::activate_handler(ctx)
    }

    pub fn deactivate_strategy(ctx: Context<StrategyAdmin>) -> Result<()> {
        instructions::strategy_admin::deactivate_handler(ctx)
    }

    pub fn set_strategy_apy(ctx: Context<StrategyAdmin>, apy_bps: u16) -> Result<()> {
        instructions::strategy_admin::set_apy_handler(ctx, apy_bps)
    }

    /// Make the next harvest report `loss_bps` of principal as loss
    pub fn set_strategy_loss_simulation(ctx: Context<StrategyAdmin>, enabled: bool, loss_bps: u16) -> Result<()> {
        instructions::strategy_admin::set_loss_simulation_handler(ctx, enabled, loss_bps)
    }

    /// Back reported strategy profit with real tokens. Permissionless.
    pub fn fund_strategy_rewards(ctx: Context<FundStrategyRewards>, amount: u64) -> Result<()> {
        instructions::strategy_admin::fund_rewards_handler(ctx, amount)
    }

    // ============ Access gate ============

    /// Emergency circuit breaker
    pub fn set_paused(ctx: Context<GateAdmin>, paused: bool) -> Result<()> {
        instructions::gate_admin::set_paused_handler(ctx, paused)
    }

    pub fn set_public_deposits(ctx: Context<GateAdmin>, public_deposits: bool) -> Result<()> {
        instructions::gate_admin::set_public_deposits_handler(ctx, public_deposits)
    }

    pub fn add_to_allowlist(ctx: Context<AddToAllowlist>, user: Pubkey) -> Result<()> {
        instructions::gate_admin::add_to_allowlist_handler(ctx, user)
    }

    pub fn remove_from_allowlist(ctx: Context<RemoveFromAllowlist>) -> Result<()> {
        instructions::gate_admin::remove_from_allowlist_handler(ctx)
    }

    /// Fee rates are quoted on events and through `preview_fees`; payouts
    /// are not reduced
    pub fn configure_fees(
        ctx: Context<ConfigureFees>,
        performance_fee_bps: u16,
        withdrawal_fee_bps: u16,
        enabled: bool,
    ) -> Result<()> {
        instructions::configure_fees::handler(ctx, performance_fee_bps, withdrawal_fee_bps, enabled)
    }

    // ============ Views (return data, u64 little-endian) ============

    pub fn preview_deposit(ctx: Context<VaultView>, assets: u64) -> Result<()> {
        instructions::view::preview_deposit(ctx, assets)
    }

    pub fn preview_redeem(ctx: Context<VaultView>, shares: u64) -> Result<()> {
        instructions::view::preview_redeem(ctx, shares)
    }

    pub fn share_price(ctx: Context<VaultView>) -> Result<()> {
        instructions::view::share_price(ctx)
    }

    pub fn total_assets(ctx: Context<VaultView>) -> Result<()> {
        instructions::view::total_assets(ctx)
    }

    pub fn total_idle_assets(ctx: Context<VaultView>) -> Result<()> {
        instructions::view::total_idle_assets(ctx)
    }

    pub fn total_invested_assets(ctx: Context<VaultView>) -> Result<()> {
        instructions::view::total_invested_assets(ctx)
    }

    pub fn balance_of_assets(ctx: Context<VaultViewWithHolder>) -> Result<()> {
        instructions::view::balance_of_assets(ctx)
    }

    pub fn preview_fees(ctx: Context<VaultView>, amount: u64) -> Result<()> {
        instructions::view::preview_fees(ctx, amount)
    }
}
