use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

#[derive(Accounts)]
pub struct ConfigureFees<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,
}

pub fn handler(
    ctx: Context<ConfigureFees>,
    performance_fee_bps: u16,
    withdrawal_fee_bps: u16,
    enabled: bool,
) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state
        .fees
        .configure(performance_fee_bps, withdrawal_fee_bps, enabled)?;

    emit!(FeesConfigured {
        vault: vault_state.key(),
        enabled,
        performance_fee_bps,
        withdrawal_fee_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
