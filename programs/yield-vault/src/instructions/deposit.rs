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

/// Deposit assets into the vault and receive shares
///
/// Security checklist:
/// ✅ 1. SIGNER VALIDATION: User must be signer
/// ✅ 2. ACCOUNT OWNERSHIP: Vault, ledger and balance PDAs validated with seeds
/// ✅ 6. MATH SAFETY: Floor conversion with u128 intermediate
/// ✅ 7. TOKEN ACCOUNT VALIDATION: Validates mint and owner
/// ✅ 8. BUSINESS LOGIC: Effects recorded before any token CPI, vault locked throughout
/// ✅ 10. EVENTS: Emits Deposited event
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User depositing assets
    #[account(mut)]
    pub user: Signer<'info>,

    /// Vault state PDA
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

    /// Depositor's share balance, created on first deposit
    #[account(
        init_if_needed,
        payer = user,
        space = ShareBalance::SPACE,
        seeds = [SHARE_BALANCE_SEED, share_ledger.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub share_balance: Account<'info, ShareBalance>,

    /// Present when the user is allowlisted for a private vault
    pub allowlist_entry: Option<Account<'info, AllowlistEntry>>,

    /// Bound strategy, required whenever the vault has one
    #[account(mut)]
    pub strategy: Option<Account<'info, LinearYieldStrategy>>,

    /// Needed only if auto-allocation moves funds
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

    /// User's asset token account (source)
    #[account(
        mut,
        constraint = user_asset_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = user_asset_account.owner == user.key() @ VaultError::InvalidOwner,
    )]
    pub user_asset_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = vault_token_account.mint == vault_state.asset_mint @ VaultError::InvalidMint,
        constraint = vault_token_account.owner == vault_authority.key() @ VaultError::InvalidOwner,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, assets: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let user = ctx.accounts.user.key();
    let vault_key = ctx.accounts.vault_state.key();
    let ledger_key = ctx.accounts.share_ledger.key();

    let allowlisted = ctx
        .accounts
        .allowlist_entry
        .as_ref()
        .is_some_and(|entry| entry.vault == vault_key && entry.user == user);

    let share_balance = &mut ctx.accounts.share_balance;
    if share_balance.ledger == Pubkey::default() {
        share_balance.ledger = ledger_key;
        share_balance.owner = user;
        share_balance.bump = ctx.bumps.share_balance;
    }

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
    .with_depositor(
        ctx.accounts.user_asset_account.to_account_info(),
        ctx.accounts.user.to_account_info(),
    )
    .with_strategy(strategy_tokens);

    let accounts = &mut *ctx.accounts;
    let strategy = bound_strategy(&accounts.vault_state, accounts.strategy.as_mut())?;
    let call = CallContext::new(user, now).with_allowlist(allowlisted);

    let mut accountant = VaultAccountant::new(
        vault_key,
        &mut accounts.vault_state,
        ledger_key,
        &mut accounts.share_ledger,
    )?
    .with_strategy(strategy)?
    .with_custody(&mut custody);

    let outcome = accountant.deposit(&call, &mut accounts.share_balance, assets)?;

    emit!(Deposited {
        vault: vault_key,
        user,
        asset_amount: assets,
        shares_minted: outcome.shares,
        auto_invested: outcome.auto_invested,
        total_assets: accountant.total_assets(now)?,
        total_shares: accountant.total_supply(),
        timestamp: now,
    });

    Ok(())
}
