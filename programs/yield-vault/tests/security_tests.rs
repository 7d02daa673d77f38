mod common;

use anchor_lang::prelude::*;
use common::*;
use yield_vault::{
    accountant::{AssetCustody, CallContext, TransferRoute, VaultAccountant},
    constants::*,
    errors::VaultError,
    state::*,
};

// ============ Donation resistance ============

#[test]
fn test_donation_does_not_move_share_price() {
    let mut h = Harness::new(0);
    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    h.accountant(None).deposit(&call, &mut alice, 1_000).unwrap();

    // Security: raw transfer into custody, outside the accountant
    h.custody.donate(100_000);

    let accountant = h.accountant(None);
    assert_eq!(accountant.share_price(0).unwrap(), PRICE_SCALE);
    assert_eq!(accountant.total_assets(0).unwrap(), 1_000);
    assert_eq!(accountant.preview_deposit(1_000, 0).unwrap(), 1_000);
}

#[test]
fn test_donation_with_strategy_bound() {
    let mut h = Harness::new(8_000);
    let (key, mut strategy) = h.linear_strategy(1_000);
    h.bind(key, &mut strategy, None);

    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    h.accountant(Some(&mut strategy))
        .deposit(&call, &mut alice, 1_000)
        .unwrap();

    let before = h.accountant(Some(&mut strategy)).share_price(0).unwrap();
    h.custody.donate(1_000_000);
    h.custody.strategy_tokens += 1_000_000;
    assert_eq!(h.accountant(Some(&mut strategy)).share_price(0).unwrap(), before);

    // an attacker depositing after the donation gets the fair rate
    let mut mallory = h.holder();
    let call = h.user_call(&mallory, 0);
    let outcome = h
        .accountant(Some(&mut strategy))
        .deposit(&call, &mut mallory, 10_000)
        .unwrap();
    assert_eq!(outcome.shares, 10_000);
}

// ============ Re-entrancy ============

/// Custody that tries to deposit again from inside every transfer, using a
/// copy of the vault state as it was handed over.
struct ReentrantCustody {
    vault_key: Pubkey,
    ledger_key: Pubkey,
    observed: Vec<VaultState>,
    nested_errors: Vec<anchor_lang::error::Error>,
}

impl AssetCustody for ReentrantCustody {
    fn transfer(&mut self, _route: TransferRoute, _amount: u64, committed: &VaultState) -> Result<()> {
        let mut vault = committed.clone();
        let mut ledger = ShareLedger::default();
        ledger.bind(self.vault_key).unwrap();
        let mut holder = ShareBalance::new(self.ledger_key, Pubkey::new_unique());
        let call = CallContext::new(holder.owner, 0);

        let nested = VaultAccountant::new(self.vault_key, &mut vault, self.ledger_key, &mut ledger)
            .and_then(|accountant| accountant.with_strategy(None))
            .and_then(|mut accountant| accountant.deposit(&call, &mut holder, 5_000));

        self.observed.push(committed.clone());
        if let Err(error) = nested {
            self.nested_errors.push(error);
        }
        Ok(())
    }
}

#[test]
fn test_nested_deposit_from_transfer_is_rejected() {
    let mut h = Harness::new(0);
    let mut custody = ReentrantCustody {
        vault_key: h.vault_key,
        ledger_key: h.ledger_key,
        observed: Vec::new(),
        nested_errors: Vec::new(),
    };

    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    let outcome = VaultAccountant::new(h.vault_key, &mut h.vault, h.ledger_key, &mut h.ledger)
        .unwrap()
        .with_strategy(None)
        .unwrap()
        .with_custody(&mut custody)
        .deposit(&call, &mut alice, 1_000)
        .unwrap();

    assert_eq!(outcome.shares, 1_000);
    assert_eq!(custody.nested_errors, vec![error!(VaultError::ReentrancyDetected)]);

    // the transfer saw the lock held and bookkeeping already updated
    let seen = &custody.observed[0];
    assert!(seen.locked);
    assert_eq!(seen.idle_assets, 1_000);
    assert!(seen.initialized);

    assert!(!h.vault.locked);
    assert_eq!(h.ledger.total_supply, 1_000);
}

#[test]
fn test_every_transfer_sees_locked_vault() {
    let mut h = Harness::new(8_000);
    let (key, mut strategy) = h.linear_strategy(1_000);
    h.bind(key, &mut strategy, None);

    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    h.accountant(Some(&mut strategy))
        .deposit(&call, &mut alice, 1_000)
        .unwrap();
    h.accountant(Some(&mut strategy))
        .redeem(&call, &mut alice, 900)
        .unwrap();

    let (new_key, mut new) = h.linear_strategy(1_000);
    let admin = h.admin_call(0);
    h.accountant(Some(&mut strategy))
        .set_strategy(&admin, new_key, &mut new)
        .unwrap();

    assert!(h.custody.log.len() >= 5);
    assert!(!h.custody.saw_unlocked);
    assert!(!h.vault.locked);
}

/// Custody that refuses every transfer
struct FailingCustody;

impl AssetCustody for FailingCustody {
    fn transfer(&mut self, _route: TransferRoute, _amount: u64, _committed: &VaultState) -> Result<()> {
        err!(VaultError::InsufficientAssets)
    }
}

#[test]
fn test_lock_released_when_transfer_fails() {
    let mut h = Harness::new(0);
    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    let mut custody = FailingCustody;

    let result = VaultAccountant::new(h.vault_key, &mut h.vault, h.ledger_key, &mut h.ledger)
        .unwrap()
        .with_strategy(None)
        .unwrap()
        .with_custody(&mut custody)
        .deposit(&call, &mut alice, 1_000);

    assert_eq!(result.unwrap_err(), error!(VaultError::InsufficientAssets));
    assert!(!h.vault.locked);
}

#[test]
fn test_transfers_require_custody() {
    let mut h = Harness::new(0);
    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);

    let result = VaultAccountant::new(h.vault_key, &mut h.vault, h.ledger_key, &mut h.ledger)
        .unwrap()
        .with_strategy(None)
        .unwrap()
        .deposit(&call, &mut alice, 1_000);

    assert_eq!(result.unwrap_err(), error!(VaultError::CustodyUnavailable));
    assert!(!h.vault.locked);
}

#[test]
fn test_held_lock_blocks_entry() {
    let mut h = Harness::new(0);
    h.vault.locked = true;

    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    assert_eq!(
        h.accountant(None).deposit(&call, &mut alice, 1_000).unwrap_err(),
        error!(VaultError::ReentrancyDetected)
    );
    // the outer holder still owns the lock
    assert!(h.vault.locked);
    assert_eq!(h.vault.idle_assets, 0);
}

// ============ Access gate ============

#[test]
fn test_pause_blocks_mutating_operations() {
    let mut h = Harness::new(5_000);
    let (key, mut strategy) = h.linear_strategy(1_000);
    h.bind(key, &mut strategy, None);

    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    h.accountant(Some(&mut strategy))
        .deposit(&call, &mut alice, 1_000)
        .unwrap();

    h.vault.gate.paused = true;
    let admin = h.admin_call(0);
    let paused = error!(VaultError::VaultPaused);

    assert_eq!(
        h.accountant(Some(&mut strategy))
            .deposit(&call, &mut alice, 1_000)
            .unwrap_err(),
        paused
    );
    assert_eq!(
        h.accountant(Some(&mut strategy))
            .redeem(&call, &mut alice, 100)
            .unwrap_err(),
        paused
    );
    assert_eq!(h.accountant(Some(&mut strategy)).invest(&admin).unwrap_err(), paused);
    assert_eq!(h.accountant(Some(&mut strategy)).harvest(&admin).unwrap_err(), paused);

    let (new_key, mut new) = h.linear_strategy(1_000);
    assert_eq!(
        h.accountant(Some(&mut strategy))
            .set_strategy(&admin, new_key, &mut new)
            .unwrap_err(),
        paused
    );

    // configuration stays available to the admin
    h.accountant(Some(&mut strategy))
        .set_invest_ratio(&admin, 1_000)
        .unwrap();
    assert_eq!(h.vault.invest_ratio_bps, 1_000);
    assert!(!h.vault.locked);
}

#[test]
fn test_private_vault_requires_allowlist() {
    let mut h = Harness::new(0);
    h.vault.gate.public_deposits = false;

    let mut alice = h.holder();
    let call = h.user_call(&alice, 0);
    assert_eq!(
        h.accountant(None).deposit(&call, &mut alice, 1_000).unwrap_err(),
        error!(VaultError::DepositNotPermitted)
    );

    let allowed = call.with_allowlist(true);
    assert_eq!(h.accountant(None).deposit(&allowed, &mut alice, 1_000).unwrap().shares, 1_000);

    // redemption is never gated by the allowlist
    assert_eq!(h.accountant(None).redeem(&call, &mut alice, 1_000).unwrap().assets, 1_000);
}

// ============ Privileged roles ============

#[test]
fn test_admin_operations_reject_other_callers() {
    let mut h = Harness::new(5_000);
    let (key, mut strategy) = h.linear_strategy(1_000);
    h.bind(key, &mut strategy, None);

    let intruder = CallContext::new(Pubkey::new_unique(), 0);
    let unauthorized = error!(VaultError::Unauthorized);

    assert_eq!(
        h.accountant(Some(&mut strategy)).invest(&intruder).unwrap_err(),
        unauthorized
    );
    assert_eq!(
        h.accountant(Some(&mut strategy)).harvest(&intruder).unwrap_err(),
        unauthorized
    );
    assert_eq!(
        h.accountant(Some(&mut strategy))
            .set_invest_ratio(&intruder, 100)
            .unwrap_err(),
        unauthorized
    );
    let (new_key, mut new) = h.linear_strategy(1_000);
    assert_eq!(
        h.accountant(Some(&mut strategy))
            .set_strategy(&intruder, new_key, &mut new)
            .unwrap_err(),
        unauthorized
    );
    assert_eq!(h.vault.strategy, key);
    assert_eq!(h.vault.invest_ratio_bps, 5_000);
}

#[test]
fn test_invest_ratio_bound_enforced() {
    let mut h = Harness::new(0);
    let admin = h.admin_call(0);
    assert_eq!(
        h.accountant(None)
            .set_invest_ratio(&admin, MAX_INVEST_RATIO_BPS + 1)
            .unwrap_err(),
        error!(VaultError::InvalidInvestRatio)
    );
    h.accountant(None)
        .set_invest_ratio(&admin, MAX_INVEST_RATIO_BPS)
        .unwrap();
}

#[test]
fn test_strategy_only_obeys_its_vault() {
    let h = Harness::new(0);
    let (_, mut strategy) = h.linear_strategy(1_000);
    let other_vault = Pubkey::new_unique();

    assert_eq!(
        strategy.invest(&other_vault, 100, 0).unwrap_err(),
        error!(VaultError::OnlyVault)
    );
    assert_eq!(
        strategy.emergency_withdraw(&other_vault, 0).unwrap_err(),
        error!(VaultError::OnlyVault)
    );
}

// ============ Ledger binding ============

#[test]
fn test_foreign_share_balance_rejected() {
    let mut h = Harness::new(0);
    let mut foreign = ShareBalance::new(Pubkey::new_unique(), Pubkey::new_unique());
    let call = CallContext::new(foreign.owner, 0);

    assert_eq!(
        h.accountant(None).deposit(&call, &mut foreign, 1_000).unwrap_err(),
        error!(VaultError::LedgerMismatch)
    );
    assert_eq!(h.ledger.total_supply, 0);
}

#[test]
fn test_accountant_requires_bound_ledger() {
    let mut h = Harness::new(0);
    let wrong_ledger = Pubkey::new_unique();
    assert_eq!(
        VaultAccountant::new(h.vault_key, &mut h.vault, wrong_ledger, &mut h.ledger)
            .err()
            .unwrap(),
        error!(VaultError::LedgerMismatch)
    );
}

#[test]
fn test_pda_derivation() {
    let program_id = yield_vault::id();
    let asset_mint = Pubkey::new_unique();

    let (vault_state, _) = Pubkey::find_program_address(&[VAULT_SEED, asset_mint.as_ref()], &program_id);
    let (share_ledger, _) =
        Pubkey::find_program_address(&[SHARE_LEDGER_SEED, vault_state.as_ref()], &program_id);
    let (vault_authority, _) =
        Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED, asset_mint.as_ref()], &program_id);
    let (strategy, _) = Pubkey::find_program_address(
        &[STRATEGY_SEED, vault_state.as_ref(), &0u64.to_le_bytes()],
        &program_id,
    );
    let (strategy_authority, _) =
        Pubkey::find_program_address(&[STRATEGY_AUTHORITY_SEED, strategy.as_ref()], &program_id);

    // Security: every role resolves to a distinct address
    let keys = [vault_state, share_ledger, vault_authority, strategy, strategy_authority];
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
