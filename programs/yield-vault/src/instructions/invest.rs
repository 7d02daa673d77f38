use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    accountant::{CallContext, VaultAccountant},
    constants::*,
    errors::*,
    events::*,
    instructions::custody::{bound_strategy, validate_strategy_tokens, CpiCustody},
    state::*,
};

/// Move `invest_ratio_bps` of idle assets into the bound strategy
///
/// Security considerations:
/// - Authority-only function (has_one constraint + accountant check)
/// - Destination is the strategy authority's token account, never arbitrary
#[derive(Accounts)]
pub struct Invest<'info> {
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

    /// CHECK: validated against the strategy's authority bump
    pub strategy_authority: Option<UncheckedAccount<'info>>,

    #[account(mut)]
    pub strategy_token_account: Option<Account<'info, TokenAccount>>,

    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Invest>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault_state.key();
    let ledger_key = ctx.accounts.share_ledger.key();
    let strategy_key = ctx.accounts.vault_state.strategy;

    let strategy_tokens = validate_strategy_tokens(
        ctx.accounts.strategy.as_ref(),
        ctx.accounts.strategy_authority.as_ref(),
        ctx.accounts.strategy_token_account.as_ref(),
    )?;
    let mut custody = CpiCustody::new(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_state.to_account_info(),
        ctx.accounts.vault_authority.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        &ctx.accounts.vault_state,
    )
    .with_strategy(strategy_tokens);

    let accounts = &mut *ctx.accounts;
    let strategy = bound_strategy(&accounts.vault_state, accounts.strategy.as_mut())?;
    let call = CallContext::new(accounts.authority.key(), now);

    let mut accountant = VaultAccountant::new(
        vault_key,
        &mut accounts.vault_state,
        ledger_key,
        &mut accounts.share_ledger,
    )?
    .with_strategy(strategy)?
    .with_custody(&mut custody);

    let amount = accountant.invest(&call)?;

    emit!(Invested {
        vault: vault_key,
        authority: call.caller,
        strategy: strategy_key,
        amount,
        idle_assets: accountant.total_idle_assets(),
        invested_assets: accountant.total_invested_assets(),
        timestamp: now,
    });

    Ok(())
}
