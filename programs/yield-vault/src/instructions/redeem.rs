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

/// Burn shares and withdraw the proportional assets
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: User must be signer and own the share balance
/// ✅ 2. ACCOUNT OWNERSHIP: Vault, ledger and balance PDAs validated with seeds
/// ✅ 6. MATH SAFETY: Floor conversion, payout never exceeds total assets
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 8. BUSINESS LOGIC: Shortfall pulled from the strategy before burning
/// ✅ 10. EVENTS: Emits Redeemed event
#[derive(Accounts)]
pub struct Redeem<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        address = vault_state.share_ledger @ VaultError::LedgerMismatch,
    )]
    pub share_ledger: Account<'info, ShareLedger>,

    #[account(
        mut,
        seeds = [SHARE_BALANCE_SEED, share_ledger.key().as_ref(), user.key().as_ref()],
        bump = share_balance.bump,
        constraint = share_balance.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub share_balance: Account<'info, ShareBalance>,

    #[account(mut)]
    pub strategy: Option<Account<'info, LinearYieldStrategy>>,

    /// Needed only if idle assets do not cover the payout
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

    /// Receives the redeemed assets
    #[account(
        mut,
        constraint = user_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
    )]
    pub user_asset_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Redeem>, shares: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let user = ctx.accounts.user.key();
    let vault_key = ctx.accounts.vault_state.key();
    let ledger_key = ctx.accounts.share_ledger.key();

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
    .with_receiver(ctx.accounts.user_asset_account.to_account_info())
    .with_strategy(strategy_tokens);

    let accounts = &mut *ctx.accounts;
    let strategy = bound_strategy(&accounts.vault_state, accounts.strategy.as_mut())?;
    let call = CallContext::new(user, now);

    let mut accountant = VaultAccountant::new(
        vault_key,
        &mut accounts.vault_state,
        ledger_key,
        &mut accounts.share_ledger,
    )?
    .with_strategy(strategy)?
    .with_custody(&mut custody);

    let outcome = accountant.redeem(&call, &mut accounts.share_balance, shares)?;

    emit!(Redeemed {
        vault: vault_key,
        user,
        shares_burned: shares,
        asset_amount: outcome.assets,
        pulled_from_strategy: outcome.pulled_from_strategy,
        withdrawal_fee: outcome.withdrawal_fee,
        total_assets: accountant.total_assets(now)?,
        total_shares: accountant.total_supply(),
        timestamp: now,
    });

    Ok(())
}
