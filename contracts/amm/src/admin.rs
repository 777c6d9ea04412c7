use sdk::{info, AccountId};

use crate::error::AmmError;
use crate::ledger::{as_value, check_bounds};
use crate::token::TokenType;
use crate::{Amm, MAX_FUND_AMOUNT, POOL_UPPER_BOUND};

impl Amm {
    /// Sets both reserves. Calling it again simply overwrites them.
    pub fn init_pool(&mut self, reserve_a: u128, reserve_b: u128) -> Result<(), AmmError> {
        for reserve in [reserve_a, reserve_b] {
            check_bounds(as_value(reserve), &(0..=POOL_UPPER_BOUND - 1))?;
        }
        self.reserves.set_reserve(TokenType::A, reserve_a)?;
        self.reserves.set_reserve(TokenType::B, reserve_b)?;
        info!("🏊 Pool initialized with {} A and {} B", reserve_a, reserve_b);
        Ok(())
    }

    /// Demo faucet. Each call may credit at most [MAX_FUND_AMOUNT] of each token.
    pub fn fund_account(
        &mut self,
        account: AccountId,
        amount_a: u128,
        amount_b: u128,
    ) -> Result<(), AmmError> {
        for amount in [amount_a, amount_b] {
            check_bounds(as_value(amount), &(0..=MAX_FUND_AMOUNT))?;
        }
        self.balances.adjust_balance(account, TokenType::A, as_value(amount_a))?;
        self.balances.adjust_balance(account, TokenType::B, as_value(amount_b))?;
        info!("💰 Funded {} with {} A and {} B", account, amount_a, amount_b);
        Ok(())
    }

    pub fn get_account_balance(&self, account: AccountId, token: TokenType) -> u128 {
        self.balances.get_balance(account, token)
    }

    pub fn get_pool_reserve(&self, token: TokenType) -> u128 {
        self.reserves.get_reserve(token)
    }

    /// Every stored (account, token, balance) entry, ordered by account.
    pub fn accounts(&self) -> impl Iterator<Item = (AccountId, TokenType, u128)> + '_ {
        self.balances.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_pool() {
        let mut amm = Amm::default();
        amm.init_pool(1000, 2000).unwrap();
        assert_eq!(amm.get_pool_reserve(TokenType::A), 1000);
        assert_eq!(amm.get_pool_reserve(TokenType::B), 2000);

        amm.init_pool(5, 0).unwrap();
        assert_eq!(amm.get_pool_reserve(TokenType::A), 5);
        assert_eq!(amm.get_pool_reserve(TokenType::B), 0);
    }

    #[test]
    fn test_init_pool_out_of_range() {
        let mut amm = Amm::default();
        assert!(matches!(
            amm.init_pool(POOL_UPPER_BOUND, 0),
            Err(AmmError::OutOfRange { .. })
        ));
        // Checked before any write: reserve A is untouched too.
        assert!(amm.init_pool(10, POOL_UPPER_BOUND).is_err());
        assert_eq!(amm, Amm::default());

        assert!(amm.init_pool(POOL_UPPER_BOUND - 1, POOL_UPPER_BOUND - 1).is_ok());
    }

    #[test]
    fn test_fund_account() {
        let mut amm = Amm::default();
        let alice = AccountId(42);
        amm.fund_account(alice, 10, 20).unwrap();
        amm.fund_account(alice, 1, MAX_FUND_AMOUNT).unwrap();

        assert_eq!(amm.get_account_balance(alice, TokenType::A), 11);
        assert_eq!(
            amm.get_account_balance(alice, TokenType::B),
            20 + MAX_FUND_AMOUNT
        );
        assert_eq!(amm.get_account_balance(AccountId(43), TokenType::A), 0);
    }

    #[test]
    fn test_fund_account_above_faucet_bound() {
        let mut amm = Amm::default();
        let alice = AccountId(42);

        assert_eq!(
            amm.fund_account(alice, MAX_FUND_AMOUNT + 1, 0),
            Err(AmmError::OutOfRange {
                value: 1_073_742,
                min: 0,
                max: 1_073_741
            })
        );
        assert!(amm.fund_account(alice, 0, u128::MAX).is_err());
        assert_eq!(amm.accounts().count(), 0);
    }
}
