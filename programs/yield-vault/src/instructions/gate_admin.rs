use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

#[derive(Accounts)]
pub struct GateAdmin<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault_state.asset_mint.as_ref()],
        bump = vault_state.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,
}

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct AddToAllowlist<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(has_one = authority @ VaultError::Unauthorized)]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        init,
        payer = authority,
        space = AllowlistEntry::SPACE,
        seeds = [ALLOWLIST_SEED, vault_state.key().as_ref(), user.as_ref()],
        bump
    )]
    pub allowlist_entry: Account<'info, AllowlistEntry>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct RemoveFromAllowlist<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(has_one = authority @ VaultError::Unauthorized)]
    pub vault_state: Account<'info, VaultState>,

    /// Rent goes back to the authority
    #[account(
        mut,
        close = authority,
        seeds = [ALLOWLIST_SEED, vault_state.key().as_ref(), allowlist_entry.user.as_ref()],
        bump = allowlist_entry.bump,
    )]
    pub allowlist_entry: Account<'info, AllowlistEntry>,
}

/// Emergency circuit breaker: blocks deposit, redeem, invest, harvest and
/// set_strategy while set
pub fn set_paused_handler(ctx: Context<GateAdmin>, paused: bool) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.gate.paused = paused;

    if paused {
        msg!("Vault {} paused", vault_state.key());
    }

    emit!(VaultPauseToggled {
        vault: vault_state.key(),
        paused,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn set_public_deposits_handler(ctx: Context<GateAdmin>, public_deposits: bool) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;
    vault_state.gate.public_deposits = public_deposits;

    emit!(PublicDepositsToggled {
        vault: vault_state.key(),
        public_deposits,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn add_to_allowlist_handler(ctx: Context<AddToAllowlist>, user: Pubkey) -> Result<()> {
    let vault_key = ctx.accounts.vault_state.key();

    let entry = &mut ctx.accounts.allowlist_entry;
    entry.vault = vault_key;
    entry.user = user;
    entry.bump = ctx.bumps.allowlist_entry;

    emit!(AllowlistUpdated {
        vault: vault_key,
        user,
        allowed: true,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn remove_from_allowlist_handler(ctx: Context<RemoveFromAllowlist>) -> Result<()> {
    emit!(AllowlistUpdated {
        vault: ctx.accounts.vault_state.key(),
        user: ctx.accounts.allowlist_entry.user,
        allowed: false,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
