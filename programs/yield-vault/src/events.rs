use anchor_lang::prelude::*;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub asset_mint: Pubkey,
    pub share_ledger: Pubkey,
    pub invest_ratio_bps: u16,
    pub public_deposits: bool,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub asset_amount: u64,
    pub shares_minted: u64,
    pub auto_invested: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when shares are redeemed
#[event]
pub struct Redeemed {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub shares_burned: u64,
    pub asset_amount: u64,
    pub pulled_from_strategy: u64,
    /// Quote only, not deducted from `asset_amount`
    pub withdrawal_fee: u64,
    pub total_assets: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when idle assets are moved into the strategy
#[event]
pub struct Invested {
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub strategy: Pubkey,
    pub amount: u64,
    pub idle_assets: u64,
    pub invested_assets: u64,
    pub timestamp: i64,
}

/// Event emitted when strategy profit or loss is reconciled
#[event]
pub struct Harvested {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub profit: u64,
    pub loss: u64,
    /// Quote only, not collected
    pub performance_fee: u64,
    pub invested_assets: u64,
    pub share_price: u64,
    pub timestamp: i64,
}

/// Event emitted when the vault's strategy is swapped
#[event]
pub struct StrategyReplaced {
    pub vault: Pubkey,
    pub previous: Pubkey,
    pub current: Pubkey,
    pub expected: u64,
    pub recovered: u64,
    pub timestamp: i64,
}

#[event]
pub struct InvestRatioUpdated {
    pub vault: Pubkey,
    pub old_bps: u16,
    pub new_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct StrategyInitialized {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub strategy_id: u64,
    pub apy_bps: u16,
    pub timestamp: i64,
}

/// Event emitted on activate / deactivate
#[event]
pub struct StrategyStatusChanged {
    pub strategy: Pubkey,
    pub is_active: bool,
    pub timestamp: i64,
}

/// Event emitted when APY or loss simulation settings change
#[event]
pub struct StrategyConfigured {
    pub strategy: Pubkey,
    pub apy_bps: u16,
    pub simulate_loss: bool,
    pub loss_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct StrategyRewardsFunded {
    pub strategy: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultPauseToggled {
    pub vault: Pubkey,
    pub paused: bool,
    pub timestamp: i64,
}

#[event]
pub struct PublicDepositsToggled {
    pub vault: Pubkey,
    pub public_deposits: bool,
    pub timestamp: i64,
}

/// Event emitted when an allowlist entry is created or closed
#[event]
pub struct AllowlistUpdated {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub allowed: bool,
    pub timestamp: i64,
}

#[event]
pub struct FeesConfigured {
    pub vault: Pubkey,
    pub enabled: bool,
    pub performance_fee_bps: u16,
    pub withdrawal_fee_bps: u16,
    pub timestamp: i64,
}
