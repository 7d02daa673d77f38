use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{Mint, Token, TokenAccount},
};

use crate::{constants::*, events::*, state::*};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct InitializeVaultParams {
    /// Share of total assets auto-allocated to the strategy on deposit
    pub invest_ratio_bps: u16,
    /// Open deposits to everyone instead of allowlisted users only
    pub public_deposits: bool,
}

/// Initialize a new vault and its share ledger for a given asset token
#[derive(Accounts)]
pub struct InitializeVault<'info> {
    /// Vault admin
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Vault state PDA
    /// Security: Initialized with proper space and padding for upgrades
    #[account(
        init,
        payer = authority,
        space = VAULT_STATE_SIZE,
        seeds = [VAULT_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_state: Account<'info, VaultState>,

    /// Share ledger PDA, bound to vault_state below
    #[account(
        init,
        payer = authority,
        space = ShareLedger::SPACE,
        seeds = [SHARE_LEDGER_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub share_ledger: Account<'info, ShareLedger>,

    /// Asset token mint (the underlying token users deposit)
    pub asset_mint: Account<'info, Mint>,

    /// Vault authority PDA - owns the vault token account
    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, asset_mint.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault's token account for holding idle assets
    /// Security: Owned by vault_authority PDA, correct mint
    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = vault_authority,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeVault>, params: InitializeVaultParams) -> Result<()> {
    let vault_key = ctx.accounts.vault_state.key();
    let ledger_key = ctx.accounts.share_ledger.key();

    // The vault state PDA is the only key allowed to mint or burn shares
    let share_ledger = &mut ctx.accounts.share_ledger;
    share_ledger.bind(vault_key)?;
    share_ledger.bump = ctx.bumps.share_ledger;

    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.set_invest_ratio(params.invest_ratio_bps)?;
    vault_state.authority = ctx.accounts.authority.key();
    vault_state.asset_mint = ctx.accounts.asset_mint.key();
    vault_state.share_ledger = ledger_key;
    vault_state.strategy = Pubkey::default();
    vault_state.idle_assets = 0;
    vault_state.invested_assets = 0;
    vault_state.initialized = false;
    vault_state.locked = false;
    vault_state.gate = AccessGate {
        paused: false,
        public_deposits: params.public_deposits,
    };
    vault_state.fees = FeeCalculator::default();
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.authority_bump = ctx.bumps.vault_authority;
    vault_state._reserved = [0; 32];

    emit!(VaultInitialized {
        vault: vault_key,
        authority: vault_state.authority,
        asset_mint: vault_state.asset_mint,
        share_ledger: ledger_key,
        invest_ratio_bps: vault_state.invest_ratio_bps,
        public_deposits: params.public_deposits,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
