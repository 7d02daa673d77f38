use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::{
    accountant::{AssetCustody, TransferRoute},
    constants::*,
    errors::VaultError,
    state::{LinearYieldStrategy, StrategyAdapter, VaultState},
};

/// Strategy-side token accounts for routes that touch the strategy
pub struct StrategyTokens<'info> {
    pub strategy: Pubkey,
    pub authority: AccountInfo<'info>,
    pub authority_bump: u8,
    pub token_account: AccountInfo<'info>,
}

/// `AssetCustody` backed by SPL token CPIs.
///
/// Vault outflows are signed by the vault authority PDA, strategy outflows
/// by the strategy authority PDA. Before each CPI the committed vault state
/// is serialized into the vault account, so anything the transfer invokes
/// sees the lock held and the bookkeeping already updated.
pub struct CpiCustody<'info> {
    token_program: AccountInfo<'info>,
    vault_state: AccountInfo<'info>,
    vault_authority: AccountInfo<'info>,
    vault_token_account: AccountInfo<'info>,
    asset_mint: Pubkey,
    authority_bump: u8,
    depositor: Option<(AccountInfo<'info>, AccountInfo<'info>)>,
    receiver: Option<AccountInfo<'info>>,
    strategy: Option<StrategyTokens<'info>>,
}

impl<'info> CpiCustody<'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        vault_state: AccountInfo<'info>,
        vault_authority: AccountInfo<'info>,
        vault_token_account: AccountInfo<'info>,
        vault: &VaultState,
    ) -> Self {
        Self {
            token_program,
            vault_state,
            vault_authority,
            vault_token_account,
            asset_mint: vault.asset_mint,
            authority_bump: vault.authority_bump,
            depositor: None,
            receiver: None,
            strategy: None,
        }
    }

    /// Source token account and its signing owner for deposits
    pub fn with_depositor(mut self, token_account: AccountInfo<'info>, owner: AccountInfo<'info>) -> Self {
        self.depositor = Some((token_account, owner));
        self
    }

    pub fn with_receiver(mut self, token_account: AccountInfo<'info>) -> Self {
        self.receiver = Some(token_account);
        self
    }

    pub fn with_strategy(mut self, strategy: Option<StrategyTokens<'info>>) -> Self {
        self.strategy = strategy;
        self
    }

    fn write_back(&self, committed: &VaultState) -> Result<()> {
        let mut data = self.vault_state.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        committed.try_serialize(&mut writer)
    }

    fn strategy_tokens(&self) -> Result<&StrategyTokens<'info>> {
        self.strategy
            .as_ref()
            .ok_or(error!(VaultError::CustodyUnavailable))
    }

    fn vault_signed(&self, to: AccountInfo<'info>, amount: u64) -> Result<()> {
        let authority_seeds: &[&[u8]] = &[
            VAULT_AUTHORITY_SEED,
            self.asset_mint.as_ref(),
            &[self.authority_bump],
        ];
        let signer_seeds = &[authority_seeds];

        let transfer_ctx = CpiContext::new_with_signer(
            self.token_program.clone(),
            Transfer {
                from: self.vault_token_account.clone(),
                to,
                authority: self.vault_authority.clone(),
            },
            signer_seeds,
        );
        token::transfer(transfer_ctx, amount)
    }
}

impl<'info> AssetCustody for CpiCustody<'info> {
    fn transfer(&mut self, route: TransferRoute, amount: u64, committed: &VaultState) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.write_back(committed)?;

        match route {
            TransferRoute::DepositorToVault => {
                let (from, owner) = self
                    .depositor
                    .as_ref()
                    .ok_or(VaultError::CustodyUnavailable)?;
                let transfer_ctx = CpiContext::new(
                    self.token_program.clone(),
                    Transfer {
                        from: from.clone(),
                        to: self.vault_token_account.clone(),
                        authority: owner.clone(),
                    },
                );
                token::transfer(transfer_ctx, amount)
            }
            TransferRoute::VaultToReceiver => {
                let to = self
                    .receiver
                    .clone()
                    .ok_or(VaultError::CustodyUnavailable)?;
                self.vault_signed(to, amount)
            }
            TransferRoute::VaultToStrategy => {
                let to = self.strategy_tokens()?.token_account.clone();
                self.vault_signed(to, amount)
            }
            TransferRoute::StrategyToVault => {
                let tokens = self.strategy_tokens()?;
                let authority_seeds: &[&[u8]] = &[
                    STRATEGY_AUTHORITY_SEED,
                    tokens.strategy.as_ref(),
                    &[tokens.authority_bump],
                ];
                let signer_seeds = &[authority_seeds];

                let transfer_ctx = CpiContext::new_with_signer(
                    self.token_program.clone(),
                    Transfer {
                        from: tokens.token_account.clone(),
                        to: self.vault_token_account.clone(),
                        authority: tokens.authority.clone(),
                    },
                    signer_seeds,
                );
                token::transfer(transfer_ctx, amount)
            }
        }
    }
}

/// Check that `strategy` is the vault's bound strategy and view it as an
/// adapter. Presence must match `vault.strategy`.
pub fn bound_strategy<'a>(
    vault: &VaultState,
    strategy: Option<&'a mut Account<'_, LinearYieldStrategy>>,
) -> Result<Option<&'a mut dyn StrategyAdapter>> {
    match strategy {
        Some(account) => {
            require_keys_eq!(account.key(), vault.strategy, VaultError::StrategyMismatch);
            let adapter: &mut LinearYieldStrategy = account;
            Ok(Some(adapter as &mut dyn StrategyAdapter))
        }
        None => {
            require!(!vault.has_strategy(), VaultError::StrategyMismatch);
            Ok(None)
        }
    }
}

/// Validate the strategy authority PDA and token account that back
/// `strategy`. Returns `None` when the caller did not supply them; custody
/// then fails only if a strategy transfer is actually needed.
pub fn validate_strategy_tokens<'info>(
    strategy: Option<&Account<'info, LinearYieldStrategy>>,
    authority: Option<&UncheckedAccount<'info>>,
    token_account: Option<&Account<'info, TokenAccount>>,
) -> Result<Option<StrategyTokens<'info>>> {
    let (Some(strategy), Some(authority), Some(token_account)) = (strategy, authority, token_account) else {
        return Ok(None);
    };

    let expected = Pubkey::create_program_address(
        &[
            STRATEGY_AUTHORITY_SEED,
            strategy.key().as_ref(),
            &[strategy.authority_bump],
        ],
        &crate::ID,
    )
    .map_err(|_| error!(VaultError::InvalidAuthority))?;
    require_keys_eq!(authority.key(), expected, VaultError::InvalidAuthority);
    require_keys_eq!(token_account.owner, expected, VaultError::InvalidOwner);
    require_keys_eq!(token_account.mint, strategy.asset_mint, VaultError::InvalidMint);

    Ok(Some(StrategyTokens {
        strategy: strategy.key(),
        authority: authority.to_account_info(),
        authority_bump: strategy.authority_bump,
        token_account: token_account.to_account_info(),
    }))
}
