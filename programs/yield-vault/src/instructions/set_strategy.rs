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

/// Replace the vault's strategy
///
/// Security considerations:
/// - Authority-only function
/// - The outgoing strategy is emergency-withdrawn in full before the new
///   one is bound; the vault never points at two strategies
/// - Whatever the old strategy actually returns becomes idle; any gap to the
///   previous bookkeeping is reported on the event
#[derive(Accounts)]
pub struct SetStrategy<'info> {
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

    /// Strategy being replaced, required whenever the vault has one
    #[account(mut)]
    pub current_strategy: Option<Account<'info, LinearYieldStrategy>>,

    /// CHECK: validated against the current strategy's authority bump
    pub current_strategy_authority: Option<UncheckedAccount<'info>>,

    #[account(mut)]
    pub current_strategy_token_account: Option<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = new_strategy.asset_mint == vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub new_strategy: Account<'info, LinearYieldStrategy>,

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

pub fn handler(ctx: Context<SetStrategy>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault_state.key();
    let ledger_key = ctx.accounts.share_ledger.key();
    let new_key = ctx.accounts.new_strategy.key();

    let strategy_tokens = validate_strategy_tokens(
        ctx.accounts.current_strategy.as_ref(),
        ctx.accounts.current_strategy_authority.as_ref(),
        ctx.accounts.current_strategy_token_account.as_ref(),
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
    let current = bound_strategy(&accounts.vault_state, accounts.current_strategy.as_mut())?;
    let new_strategy: &mut LinearYieldStrategy = &mut accounts.new_strategy;
    let call = CallContext::new(accounts.authority.key(), now);

    let mut accountant = VaultAccountant::new(
        vault_key,
        &mut accounts.vault_state,
        ledger_key,
        &mut accounts.share_ledger,
    )?
    .with_strategy(current)?
    .with_custody(&mut custody);

    let replacement = accountant.set_strategy(&call, new_key, new_strategy)?;

    emit!(StrategyReplaced {
        vault: vault_key,
        previous: replacement.previous,
        current: new_key,
        expected: replacement.expected,
        recovered: replacement.recovered,
        timestamp: now,
    });

    Ok(())
}
