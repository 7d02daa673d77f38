use anchor_lang::prelude::*;

/// Custom error codes for the Yield Vault program
#[error_code]
pub enum VaultError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Conversion rounds down to zero")]
    ZeroShares,

    #[msg("First deposit must mint at least MINIMUM_SHARES")]
    FirstDepositTooSmall,

    #[msg("Requested assets exceed what the vault can recover")]
    InsufficientAssets,

    #[msg("Insufficient share balance")]
    InsufficientBalance,

    #[msg("Invest ratio exceeds the configured maximum")]
    InvalidInvestRatio,

    #[msg("Invalid strategy")]
    InvalidStrategy,

    #[msg("APY outside the allowed range")]
    InvalidAPY,

    #[msg("Loss rate outside the allowed range")]
    InvalidLossRate,

    #[msg("Fee rate exceeds the configured maximum")]
    InvalidFeeRate,

    #[msg("Only the bound ledger authority can mint or burn")]
    OnlyAuthority,

    #[msg("Only the owning vault can call the strategy")]
    OnlyVault,

    #[msg("Unauthorized - only vault authority can perform this action")]
    Unauthorized,

    #[msg("Strategy is not active")]
    NotActive,

    #[msg("Strategy is already active")]
    AlreadyActive,

    #[msg("Share ledger authority is already bound")]
    AlreadyBound,

    #[msg("Ledger authority cannot be the default key")]
    InvalidAuthority,

    #[msg("Share balance belongs to another ledger")]
    LedgerMismatch,

    #[msg("No strategy bound to the vault")]
    NoStrategy,

    #[msg("Strategy account does not match the vault's strategy")]
    StrategyMismatch,

    #[msg("Vault is paused")]
    VaultPaused,

    #[msg("Caller is not permitted to deposit")]
    DepositNotPermitted,

    #[msg("Re-entrant call into a locked vault")]
    ReentrancyDetected,

    #[msg("Token custody accounts were not supplied")]
    CustodyUnavailable,

    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    #[msg("Invalid token mint - does not match vault asset")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,
}
