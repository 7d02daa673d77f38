use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// Registry of vault shares.
///
/// Supply only moves through `mint` / `burn`, and only the bound authority
/// (the vault state PDA) may issue them, so the sum of all `ShareBalance`
/// accounts always equals `total_supply`.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShareLedger {
    /// Sole minter/burner, bound once at vault initialization
    pub authority: Pubkey,

    /// Sum of all holder balances
    pub total_supply: u64,

    /// Bump seed for ledger PDA
    pub bump: u8,
}

/// One holder's position in a `ShareLedger`
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShareBalance {
    pub ledger: Pubkey,
    pub owner: Pubkey,
    pub shares: u64,
    pub bump: u8,
}

impl ShareLedger {
    pub const SPACE: usize = 8 + 32 + 8 + 1;

    pub fn is_bound(&self) -> bool {
        self.authority != Pubkey::default()
    }

    /// Bind the minting authority. Succeeds exactly once.
    pub fn bind(&mut self, authority: Pubkey) -> Result<()> {
        require!(!self.is_bound(), VaultError::AlreadyBound);
        require!(authority != Pubkey::default(), VaultError::InvalidAuthority);
        self.authority = authority;
        Ok(())
    }

    pub fn mint(
        &mut self,
        ledger_key: &Pubkey,
        caller: &Pubkey,
        to: &mut ShareBalance,
        amount: u64,
    ) -> Result<()> {
        self.check_access(ledger_key, caller, to)?;

        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let shares = to.shares.checked_add(amount).ok_or(VaultError::MathOverflow)?;

        self.total_supply = total_supply;
        to.shares = shares;
        Ok(())
    }

    pub fn burn(
        &mut self,
        ledger_key: &Pubkey,
        caller: &Pubkey,
        from: &mut ShareBalance,
        amount: u64,
    ) -> Result<()> {
        self.check_access(ledger_key, caller, from)?;
        require!(from.shares >= amount, VaultError::InsufficientBalance);

        let total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(VaultError::MathOverflow)?;

        from.shares -= amount;
        self.total_supply = total_supply;
        Ok(())
    }

    fn check_access(&self, ledger_key: &Pubkey, caller: &Pubkey, balance: &ShareBalance) -> Result<()> {
        require!(self.is_bound(), VaultError::OnlyAuthority);
        require_keys_eq!(*caller, self.authority, VaultError::OnlyAuthority);
        require_keys_eq!(balance.ledger, *ledger_key, VaultError::LedgerMismatch);
        Ok(())
    }
}

impl ShareBalance {
    pub const SPACE: usize = 8 + 32 + 32 + 8 + 1;

    pub fn new(ledger: Pubkey, owner: Pubkey) -> Self {
        Self {
            ledger,
            owner,
            shares: 0,
            bump: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_ledger() -> (ShareLedger, Pubkey, Pubkey) {
        let ledger_key = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let mut ledger = ShareLedger::default();
        ledger.bind(authority).unwrap();
        (ledger, ledger_key, authority)
    }

    #[test]
    fn test_bind_once() {
        let mut ledger = ShareLedger::default();
        ledger.bind(Pubkey::new_unique()).unwrap();
        assert_eq!(
            ledger.bind(Pubkey::new_unique()).unwrap_err(),
            error!(VaultError::AlreadyBound)
        );
    }

    #[test]
    fn test_bind_rejects_default_key() {
        let mut ledger = ShareLedger::default();
        assert_eq!(
            ledger.bind(Pubkey::default()).unwrap_err(),
            error!(VaultError::InvalidAuthority)
        );
        assert!(!ledger.is_bound());
    }

    #[test]
    fn test_mint_and_burn_keep_supply_in_sync() {
        let (mut ledger, ledger_key, authority) = bound_ledger();
        let mut alice = ShareBalance::new(ledger_key, Pubkey::new_unique());
        let mut bob = ShareBalance::new(ledger_key, Pubkey::new_unique());

        ledger.mint(&ledger_key, &authority, &mut alice, 700).unwrap();
        ledger.mint(&ledger_key, &authority, &mut bob, 300).unwrap();
        ledger.burn(&ledger_key, &authority, &mut alice, 200).unwrap();

        assert_eq!(alice.shares, 500);
        assert_eq!(bob.shares, 300);
        assert_eq!(ledger.total_supply, alice.shares + bob.shares);
    }

    #[test]
    fn test_zero_mint_has_no_effect() {
        let (mut ledger, ledger_key, authority) = bound_ledger();
        let mut alice = ShareBalance::new(ledger_key, Pubkey::new_unique());
        ledger.mint(&ledger_key, &authority, &mut alice, 0).unwrap();
        assert_eq!(alice.shares, 0);
        assert_eq!(ledger.total_supply, 0);
    }

    #[test]
    fn test_only_authority_can_mint_or_burn() {
        let (mut ledger, ledger_key, authority) = bound_ledger();
        let mut alice = ShareBalance::new(ledger_key, Pubkey::new_unique());
        let intruder = Pubkey::new_unique();

        assert_eq!(
            ledger.mint(&ledger_key, &intruder, &mut alice, 10).unwrap_err(),
            error!(VaultError::OnlyAuthority)
        );
        ledger.mint(&ledger_key, &authority, &mut alice, 10).unwrap();
        assert_eq!(
            ledger.burn(&ledger_key, &intruder, &mut alice, 10).unwrap_err(),
            error!(VaultError::OnlyAuthority)
        );
        assert_eq!(alice.shares, 10);
    }

    #[test]
    fn test_unbound_ledger_rejects_mint() {
        let mut ledger = ShareLedger::default();
        let ledger_key = Pubkey::new_unique();
        let mut alice = ShareBalance::new(ledger_key, Pubkey::new_unique());
        assert!(ledger
            .mint(&ledger_key, &Pubkey::default(), &mut alice, 10)
            .is_err());
    }

    #[test]
    fn test_burn_insufficient_balance() {
        let (mut ledger, ledger_key, authority) = bound_ledger();
        let mut alice = ShareBalance::new(ledger_key, Pubkey::new_unique());
        ledger.mint(&ledger_key, &authority, &mut alice, 5).unwrap();

        assert_eq!(
            ledger.burn(&ledger_key, &authority, &mut alice, 6).unwrap_err(),
            error!(VaultError::InsufficientBalance)
        );
        assert_eq!(alice.shares, 5);
        assert_eq!(ledger.total_supply, 5);
    }

    #[test]
    fn test_balance_from_other_ledger_rejected() {
        let (mut ledger, ledger_key, authority) = bound_ledger();
        let mut foreign = ShareBalance::new(Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(
            ledger.mint(&ledger_key, &authority, &mut foreign, 1).unwrap_err(),
            error!(VaultError::LedgerMismatch)
        );
    }
}
