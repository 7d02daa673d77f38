use anchor_lang::prelude::*;

use crate::{constants::BPS_DENOMINATOR, errors::VaultError};

/// Computes `floor(value * numerator / denominator)` with a u128 intermediate.
///
/// Every conversion in the vault rounds down: depositors get fewer shares,
/// redeemers get fewer assets, and the pool keeps the dust.
pub fn mul_div_floor(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, VaultError::DivisionByZero);

    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(VaultError::MathOverflow)?;

    u64::try_from(product / denominator as u128).map_err(|_| error!(VaultError::MathOverflow))
}

/// `floor(amount * bps / 10_000)`
pub fn bps_of(amount: u64, bps: u16) -> Result<u64> {
    mul_div_floor(amount, bps as u64, BPS_DENOMINATOR)
}
