use anchor_lang::prelude::*;

use crate::{
    accountant::{CallContext, VaultAccountant},
    constants::*,
    errors::*,
    events::*,
    instructions::custody::bound_strategy,
    state::*,
};

/// Realize strategy profit or loss into the vault's invested bookkeeping.
/// No tokens move; profit stays in the strategy as principal.
#[derive(Accounts)]
pub struct Harvest<'info> {
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

    #[account(mut)]
    pub strategy: Option<Account<'info, LinearYieldStrategy>>,
}

pub fn handler(ctx: Context<Harvest>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault_state.key();
    let ledger_key = ctx.accounts.share_ledger.key();
    let strategy_key = ctx.accounts.vault_state.strategy;

    let accounts = &mut *ctx.accounts;
    let strategy = bound_strategy(&accounts.vault_state, accounts.strategy.as_mut())?;
    let call = CallContext::new(accounts.authority.key(), now);

    let mut accountant = VaultAccountant::new(
        vault_key,
        &mut accounts.vault_state,
        ledger_key,
        &mut accounts.share_ledger,
    )?
    .with_strategy(strategy)?;

    let outcome = accountant.harvest(&call)?;

    emit!(Harvested {
        vault: vault_key,
        strategy: strategy_key,
        profit: outcome.report.profit,
        loss: outcome.report.loss,
        performance_fee: outcome.performance_fee,
        invested_assets: outcome.invested_assets,
        share_price: accountant.share_price(now)?,
        timestamp: now,
    });

    Ok(())
}
