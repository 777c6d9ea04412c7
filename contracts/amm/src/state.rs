use borsh::{BorshDeserialize, BorshSerialize};
use sdk::AccountId;

use crate::error::AmmError;
use crate::ledger::{as_value, BoundedLedger};
use crate::token::TokenType;
use crate::{BALANCE_UPPER_BOUND, POOL_UPPER_BOUND};

/// The pool's own holdings, one entry per token.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PoolReserves(BoundedLedger<TokenType>);

/// User holdings, keyed by (account, token).
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AccountBalances(BoundedLedger<(AccountId, TokenType)>);

impl PoolReserves {
    pub fn get_reserve(&self, token: TokenType) -> u128 {
        self.0.read(&token)
    }

    pub fn set_reserve(&mut self, token: TokenType, value: u128) -> Result<(), AmmError> {
        self.0.write(token, as_value(value), 0..=POOL_UPPER_BOUND - 1)
    }
}

impl AccountBalances {
    pub fn get_balance(&self, account: AccountId, token: TokenType) -> u128 {
        self.0.read(&(account, token))
    }

    /// Only mutator for balances: credits with a positive delta, debits with a negative one.
    pub fn adjust_balance(
        &mut self,
        account: AccountId,
        token: TokenType,
        delta: i128,
    ) -> Result<(), AmmError> {
        let current = as_value(self.get_balance(account, token));
        self.0.write(
            (account, token),
            current.saturating_add(delta),
            0..=BALANCE_UPPER_BOUND - 1,
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (AccountId, TokenType, u128)> + '_ {
        self.0
            .iter()
            .map(|((account, token), balance)| (*account, *token, balance))
    }
}
