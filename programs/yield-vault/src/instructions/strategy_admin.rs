use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{self, Mint, Token, TokenAccount, Transfer},
};

use crate::{constants::*, errors::*, events::*, state::*};

/// Create a reference yield strategy bound to a vault
///
/// The strategy holds its principal in an associated token account owned by
/// its own authority PDA. It is not used by the vault until `set_strategy`.
#[derive(Accounts)]
#[instruction(strategy_id: u64)]
pub struct InitializeStrategy<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
        has_one = asset_mint @ VaultError::InvalidMint,
    )]
    pub vault_state: Account<'info, VaultState>,

    pub asset_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        space = LinearYieldStrategy::SPACE,
        seeds = [STRATEGY_SEED, vault_state.key().as_ref(), &strategy_id.to_le_bytes()],
        bump
    )]
    pub strategy: Account<'info, LinearYieldStrategy>,

    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [STRATEGY_AUTHORITY_SEED, strategy.key().as_ref()],
        bump
    )]
    pub strategy_authority: UncheckedAccount<'info>,

    #[account(
        init,
        payer = authority,
        associated_token::mint = asset_mint,
        associated_token::authority = strategy_authority,
    )]
    pub strategy_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// Vault-authority controls over an existing strategy
#[derive(Accounts)]
pub struct StrategyAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(has_one = authority @ VaultError::Unauthorized)]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        constraint = strategy.vault == vault_state.key() @ VaultError::InvalidStrategy,
    )]
    pub strategy: Account<'info, LinearYieldStrategy>,
}

/// Top up the reserve that backs strategy profit
#[derive(Accounts)]
pub struct FundStrategyRewards<'info> {
    pub funder: Signer<'info>,

    pub strategy: Account<'info, LinearYieldStrategy>,

    /// CHECK: PDA used as token authority, validated by seeds
    #[account(
        seeds = [STRATEGY_AUTHORITY_SEED, strategy.key().as_ref()],
        bump = strategy.authority_bump,
    )]
    pub strategy_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = strategy_token_account.mint == strategy.asset_mint @ VaultError::InvalidMint,
        constraint = strategy_token_account.owner == strategy_authority.key() @ VaultError::InvalidOwner,
    )]
    pub strategy_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = funder_token_account.mint == strategy.asset_mint @ VaultError::InvalidMint,
        constraint = funder_token_account.owner == funder.key() @ VaultError::InvalidOwner,
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn initialize_handler(ctx: Context<InitializeStrategy>, strategy_id: u64, apy_bps: u16) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault_state.key();

    let strategy = &mut ctx.accounts.strategy;
    strategy.set_inner(LinearYieldStrategy::new(
        vault_key,
        ctx.accounts.asset_mint.key(),
        strategy_id,
        apy_bps,
        now,
    )?);
    strategy.bump = ctx.bumps.strategy;
    strategy.authority_bump = ctx.bumps.strategy_authority;

    emit!(StrategyInitialized {
        vault: vault_key,
        strategy: strategy.key(),
        strategy_id,
        apy_bps,
        timestamp: now,
    });

    Ok(())
}

pub fn activate_handler(ctx: Context<StrategyAdmin>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let strategy = &mut ctx.accounts.strategy;
    strategy.activate(now)?;

    emit!(StrategyStatusChanged {
        strategy: strategy.key(),
        is_active: true,
        timestamp: now,
    });
    Ok(())
}

pub fn deactivate_handler(ctx: Context<StrategyAdmin>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let strategy = &mut ctx.accounts.strategy;
    strategy.deactivate(now)?;

    emit!(StrategyStatusChanged {
        strategy: strategy.key(),
        is_active: false,
        timestamp: now,
    });
    Ok(())
}

pub fn set_apy_handler(ctx: Context<StrategyAdmin>, apy_bps: u16) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_apy(apy_bps, now)?;

    emit_configured(strategy, now);
    Ok(())
}

pub fn set_loss_simulation_handler(ctx: Context<StrategyAdmin>, enabled: bool, loss_bps: u16) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_loss_simulation(enabled, loss_bps, now)?;

    emit_configured(strategy, now);
    Ok(())
}

fn emit_configured(strategy: &Account<LinearYieldStrategy>, now: i64) {
    emit!(StrategyConfigured {
        strategy: strategy.key(),
        apy_bps: strategy.apy_bps,
        simulate_loss: strategy.simulate_loss,
        loss_bps: strategy.loss_bps,
        timestamp: now,
    });
}

pub fn fund_rewards_handler(ctx: Context<FundStrategyRewards>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);

    // Reserve only; principal and vault bookkeeping are untouched
    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.funder_token_account.to_account_info(),
            to: ctx.accounts.strategy_token_account.to_account_info(),
            authority: ctx.accounts.funder.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(StrategyRewardsFunded {
        strategy: ctx.accounts.strategy.key(),
        funder: ctx.accounts.funder.key(),
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
