// Constants for the Yield Vault program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the share ledger PDA
pub const SHARE_LEDGER_SEED: &[u8] = b"share_ledger";

/// Seed for per-holder share balance PDAs
pub const SHARE_BALANCE_SEED: &[u8] = b"share_balance";

/// Seed for the PDA that owns the vault's token account
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for strategy state PDAs
pub const STRATEGY_SEED: &[u8] = b"strategy";

/// Seed for the PDA that owns a strategy's token account
pub const STRATEGY_AUTHORITY_SEED: &[u8] = b"strategy_authority";

/// Seed for deposit allowlist entries
pub const ALLOWLIST_SEED: &[u8] = b"allowlist";

/// Shares the bootstrap deposit must mint at minimum (inflation attack floor)
pub const MINIMUM_SHARES: u64 = 1_000;

/// 100% in basis points
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Upper bound for the auto-allocation ratio
pub const MAX_INVEST_RATIO_BPS: u16 = 9_500;

/// Fixed-point scale of `share_price` (1.0 == PRICE_SCALE)
pub const PRICE_SCALE: u64 = 1_000_000_000;

/// 365 days
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Reference strategy: highest configurable APY (100%)
pub const MAX_APY_BPS: u16 = 10_000;

/// Reference strategy: highest simulated loss per harvest (50%)
pub const MAX_LOSS_BPS: u16 = 5_000;

/// Fee calculator ceilings
pub const MAX_PERFORMANCE_FEE_BPS: u16 = 3_000;
pub const MAX_WITHDRAWAL_FEE_BPS: u16 = 500;

/// Space for VaultState account (8 discriminator + 32 authority + 32 asset_mint +
/// 32 share_ledger + 32 strategy + 8 idle + 8 invested + 2 ratio + 1 initialized +
/// 1 locked + 2 gate + 5 fees + 1 bump + 1 authority_bump + 32 padding)
pub const VAULT_STATE_SIZE: usize = 8 + 32 + 32 + 32 + 32 + 8 + 8 + 2 + 1 + 1 + 2 + 5 + 1 + 1 + 32;
