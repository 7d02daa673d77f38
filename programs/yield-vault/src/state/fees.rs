use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_PERFORMANCE_FEE_BPS, MAX_WITHDRAWAL_FEE_BPS},
    errors::VaultError,
    math::bps_of,
};

/// Performance and withdrawal fee quotes.
///
/// The accountant does not deduct these from payouts; they are reported
/// alongside harvest and redeem events and through `preview_fees`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeCalculator {
    pub enabled: bool,
    pub performance_fee_bps: u16,
    pub withdrawal_fee_bps: u16,
}

impl FeeCalculator {
    pub const SPACE: usize = 1 + 2 + 2;

    pub fn configure(&mut self, performance_fee_bps: u16, withdrawal_fee_bps: u16, enabled: bool) -> Result<()> {
        require!(
            performance_fee_bps <= MAX_PERFORMANCE_FEE_BPS,
            VaultError::InvalidFeeRate
        );
        require!(
            withdrawal_fee_bps <= MAX_WITHDRAWAL_FEE_BPS,
            VaultError::InvalidFeeRate
        );

        self.performance_fee_bps = performance_fee_bps;
        self.withdrawal_fee_bps = withdrawal_fee_bps;
        self.enabled = enabled;
        Ok(())
    }

    pub fn performance_fee(&self, profit: u64) -> Result<u64> {
        if !self.enabled {
            return Ok(0);
        }
        bps_of(profit, self.performance_fee_bps)
    }

    pub fn withdrawal_fee(&self, amount: u64) -> Result<u64> {
        if !self.enabled {
            return Ok(0);
        }
        bps_of(amount, self.withdrawal_fee_bps)
    }
}
