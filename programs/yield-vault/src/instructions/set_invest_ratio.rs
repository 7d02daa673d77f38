use anchor_lang::prelude::*;

use crate::{
    accountant::{CallContext, VaultAccountant},
    constants::*,
    errors::*,
    events::*,
    state::*,
};

#[derive(Accounts)]
pub struct SetInvestRatio<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(address = vault_state.share_ledger @ VaultError::LedgerMismatch)]
    pub share_ledger: Account<'info, ShareLedger>,
}

pub fn handler(ctx: Context<SetInvestRatio>, bps: u16) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault_state.key();
    let ledger_key = ctx.accounts.share_ledger.key();
    let old_bps = ctx.accounts.vault_state.invest_ratio_bps;

    let accounts = &mut *ctx.accounts;
    let call = CallContext::new(accounts.authority.key(), now);

    // Takes effect on the next deposit; nothing is rebalanced here
    VaultAccountant::new(
        vault_key,
        &mut accounts.vault_state,
        ledger_key,
        &mut accounts.share_ledger,
    )?
    .set_invest_ratio(&call, bps)?;

    emit!(InvestRatioUpdated {
        vault: vault_key,
        old_bps,
        new_bps: bps,
        timestamp: now,
    });

    Ok(())
}
