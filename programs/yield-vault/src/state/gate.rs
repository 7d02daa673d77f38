use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// Pause switch and deposit permissioning, stored inline in `VaultState`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessGate {
    /// Emergency circuit breaker for every mutating vault operation
    pub paused: bool,

    /// When false, only allowlisted callers may deposit
    pub public_deposits: bool,
}

impl AccessGate {
    pub const SPACE: usize = 1 + 1;

    pub fn ensure_not_paused(&self) -> Result<()> {
        require!(!self.paused, VaultError::VaultPaused);
        Ok(())
    }

    pub fn can_deposit(&self, allowlisted: bool) -> bool {
        self.public_deposits || allowlisted
    }

    pub fn ensure_can_deposit(&self, allowlisted: bool) -> Result<()> {
        self.ensure_not_paused()?;
        require!(self.can_deposit(allowlisted), VaultError::DepositNotPermitted);
        Ok(())
    }
}

/// Marks `user` as allowed to deposit into `vault` while public deposits are off
#[account]
pub struct AllowlistEntry {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub bump: u8,
}

impl AllowlistEntry {
    pub const SPACE: usize = 8 + 32 + 32 + 1;
}
