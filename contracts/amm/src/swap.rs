use sdk::{info, AccountId};

use crate::error::AmmError;
use crate::ledger::{as_value, check_bounds};
use crate::token::TokenType;
use crate::{Amm, BALANCE_UPPER_BOUND, POOL_UPPER_BOUND};

/// Constant-product output for `amount_from` sent into the pool:
/// `floor(reserve_to * amount_from / (reserve_from + amount_from))`.
///
/// Rounding always favors the pool, so the product of the reserves never decreases. An empty
/// pool with a zero input yields zero.
pub fn get_amount_to(
    reserve_from: u128,
    reserve_to: u128,
    amount_from: u128,
) -> Result<u128, AmmError> {
    let too_large = || AmmError::AmountOutOfBounds {
        amount: amount_from,
        max: BALANCE_UPPER_BOUND - 1,
    };
    let denominator = reserve_from.checked_add(amount_from).ok_or_else(too_large)?;
    if denominator == 0 {
        return Ok(0);
    }
    let numerator = reserve_to.checked_mul(amount_from).ok_or_else(too_large)?;
    Ok(numerator / denominator)
}

fn check_amount(amount: u128) -> Result<i128, AmmError> {
    let out_of_bounds = AmmError::AmountOutOfBounds {
        amount,
        max: BALANCE_UPPER_BOUND - 1,
    };
    if amount > BALANCE_UPPER_BOUND - 1 {
        return Err(out_of_bounds);
    }
    i128::try_from(amount).map_err(|_| out_of_bounds)
}

impl Amm {
    /// Sells `amount_from` of `token_from` to the pool for the opposite token, and returns the
    /// amount received.
    ///
    /// Every precondition, including the bounds of the four values about to be written, is
    /// checked before the first write.
    pub fn swap(
        &mut self,
        account: AccountId,
        token_from: TokenType,
        amount_from: u128,
    ) -> Result<u128, AmmError> {
        let delta_from = check_amount(amount_from)?;

        let available = self.balances.get_balance(account, token_from);
        if amount_from > available {
            return Err(AmmError::InsufficientFunds {
                requested: amount_from,
                available,
            });
        }

        let token_to = token_from.opposite();
        let reserve_from = self.reserves.get_reserve(token_from);
        let reserve_to = self.reserves.get_reserve(token_to);
        let amount_to = get_amount_to(reserve_from, reserve_to, amount_from)?;
        let delta_to = check_amount(amount_to)?;
        let new_reserve_to = reserve_to
            .checked_sub(amount_to)
            .ok_or(AmmError::AmountOutOfBounds {
                amount: amount_to,
                max: reserve_to,
            })?;
        let new_reserve_from = reserve_from.saturating_add(amount_from);
        check_bounds(as_value(new_reserve_from), &(0..=POOL_UPPER_BOUND - 1))?;
        let new_balance_to = self.balances.get_balance(account, token_to) + amount_to;
        check_bounds(as_value(new_balance_to), &(0..=BALANCE_UPPER_BOUND - 1))?;

        self.balances.adjust_balance(account, token_from, -delta_from)?;
        self.reserves.set_reserve(token_from, new_reserve_from)?;
        self.balances.adjust_balance(account, token_to, delta_to)?;
        self.reserves.set_reserve(token_to, new_reserve_to)?;

        info!(
            "🔁 {} swapped {} {} for {} {}",
            account, amount_from, token_from, amount_to, token_to
        );
        Ok(amount_to)
    }

    /// What [Amm::swap] would pay for `amount_from`, without touching any balance.
    pub fn quote(&self, token_from: TokenType, amount_from: u128) -> Result<u128, AmmError> {
        check_amount(amount_from)?;
        get_amount_to(
            self.reserves.get_reserve(token_from),
            self.reserves.get_reserve(token_from.opposite()),
            amount_from,
        )
    }
}
