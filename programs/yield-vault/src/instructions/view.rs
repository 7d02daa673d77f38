use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::set_return_data;

use crate::{
    accountant::VaultAccountant,
    errors::VaultError,
    instructions::custody::bound_strategy,
    state::{LinearYieldStrategy, ShareBalance, ShareLedger, VaultState},
};

#[derive(Accounts)]
pub struct VaultView<'info> {
    pub vault_state: Account<'info, VaultState>,

    #[account(address = vault_state.share_ledger @ VaultError::LedgerMismatch)]
    pub share_ledger: Account<'info, ShareLedger>,

    /// Required whenever the vault has a strategy bound
    pub strategy: Option<Account<'info, LinearYieldStrategy>>,
}

#[derive(Accounts)]
pub struct VaultViewWithHolder<'info> {
    pub view: VaultView<'info>,

    #[account(constraint = share_balance.ledger == view.share_ledger.key() @ VaultError::LedgerMismatch)]
    pub share_balance: Account<'info, ShareBalance>,
}

impl<'info> VaultView<'info> {
    /// Run a read-only query against the accountant at the current clock
    fn quote(&mut self, query: impl FnOnce(&VaultAccountant<'_>, i64) -> Result<u64>) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let vault_key = self.vault_state.key();
        let ledger_key = self.share_ledger.key();

        let strategy = bound_strategy(&self.vault_state, self.strategy.as_mut())?;
        let accountant = VaultAccountant::new(
            vault_key,
            &mut self.vault_state,
            ledger_key,
            &mut self.share_ledger,
        )?
        .with_strategy(strategy)?;

        query(&accountant, now)
    }
}

/// Shares that `assets` would mint now (floor rounding)
pub fn preview_deposit(ctx: Context<VaultView>, assets: u64) -> Result<()> {
    let shares = ctx.accounts.quote(|vault, now| vault.preview_deposit(assets, now))?;
    set_return_data(&shares.to_le_bytes());
    Ok(())
}

/// Assets that redeeming `shares` would pay now (floor rounding)
pub fn preview_redeem(ctx: Context<VaultView>, shares: u64) -> Result<()> {
    let assets = ctx.accounts.quote(|vault, now| vault.preview_redeem(shares, now))?;
    set_return_data(&assets.to_le_bytes());
    Ok(())
}

/// Assets per share scaled by PRICE_SCALE
pub fn share_price(ctx: Context<VaultView>) -> Result<()> {
    let price = ctx.accounts.quote(|vault, now| vault.share_price(now))?;
    set_return_data(&price.to_le_bytes());
    Ok(())
}

pub fn total_assets(ctx: Context<VaultView>) -> Result<()> {
    let assets = ctx.accounts.quote(|vault, now| vault.total_assets(now))?;
    set_return_data(&assets.to_le_bytes());
    Ok(())
}

pub fn total_idle_assets(ctx: Context<VaultView>) -> Result<()> {
    let assets = ctx.accounts.quote(|vault, _| Ok(vault.total_idle_assets()))?;
    set_return_data(&assets.to_le_bytes());
    Ok(())
}

pub fn total_invested_assets(ctx: Context<VaultView>) -> Result<()> {
    let assets = ctx.accounts.quote(|vault, _| Ok(vault.total_invested_assets()))?;
    set_return_data(&assets.to_le_bytes());
    Ok(())
}

/// Current asset value of one holder's shares
pub fn balance_of_assets(ctx: Context<VaultViewWithHolder>) -> Result<()> {
    let holder: &ShareBalance = &ctx.accounts.share_balance;
    let assets = ctx
        .accounts
        .view
        .quote(|vault, now| vault.balance_of_assets(holder, now))?;
    set_return_data(&assets.to_le_bytes());
    Ok(())
}

/// Fee quotes for `amount`: performance fee then withdrawal fee, both u64 LE
pub fn preview_fees(ctx: Context<VaultView>, amount: u64) -> Result<()> {
    let fees = &ctx.accounts.vault_state.fees;

    let mut data = fees.performance_fee(amount)?.to_le_bytes().to_vec();
    data.extend_from_slice(&fees.withdrawal_fee(amount)?.to_le_bytes());
    set_return_data(&data);
    Ok(())
}
