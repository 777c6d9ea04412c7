//! Two-token constant-product AMM ledger.
//!
//! The contract holds the pool reserves and the per-account balances of tokens A and B, and
//! exposes pool initialization, a demo faucet and a swap priced on the `x * y = k` curve.
//! Every stored value goes through a [ledger::BoundedLedger], so reserves always stay in
//! `[0, POOL_UPPER_BOUND - 1]` and balances in `[0, BALANCE_UPPER_BOUND - 1]`.
//!
//! The contract is meant to run inside an environment that serializes calls and discards the
//! writes of a failed call (see `sdk::guest::execute`).
use borsh::{BorshDeserialize, BorshSerialize};
use sdk::{
    info, utils::parse_calldata, Calldata, ContractAction, Digestable, LedgerContract, RunResult,
    StateDigest,
};
use strum_macros::IntoStaticStr;

pub mod admin;
pub mod error;
pub mod ledger;
pub mod state;
pub mod swap;
pub mod token;

pub use error::AmmError;
pub use state::{AccountBalances, PoolReserves};
pub use swap::get_amount_to;
pub use token::TokenType;

/// Exclusive ceiling of a pool reserve.
pub const POOL_UPPER_BOUND: u128 = 1 << 30;
/// Exclusive ceiling of an account balance.
pub const BALANCE_UPPER_BOUND: u128 = 1 << 64;
/// Largest amount of each token the faucet hands out in a single call. Keeps any one account far
/// below the pool's scale.
pub const MAX_FUND_AMOUNT: u128 = POOL_UPPER_BOUND / 1000;
pub const ACCOUNT_BALANCE_BOUND: u128 = MAX_FUND_AMOUNT + 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Amm {
    reserves: PoolReserves,
    balances: AccountBalances,
}

/// Enum representing the actions that can be performed by the Amm contract.
///
/// Tokens travel as raw ids so that an unknown token is rejected by the contract itself.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, IntoStaticStr)]
pub enum AmmAction {
    InitializePool { reserve_a: u128, reserve_b: u128 },
    FundAccount { amount_a: u128, amount_b: u128 },
    Swap { token_from: u32, amount_from: u128 },
}

impl ContractAction for AmmAction {}

impl Amm {
    pub fn as_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("Failed to encode Amm")
    }

    pub fn execute_action(
        &mut self,
        calldata: &Calldata,
        action: AmmAction,
    ) -> Result<String, AmmError> {
        let account = calldata.identity;
        match action {
            AmmAction::InitializePool {
                reserve_a,
                reserve_b,
            } => {
                self.init_pool(reserve_a, reserve_b)?;
                Ok(format!("Pool initialized with {reserve_a} A and {reserve_b} B"))
            }
            AmmAction::FundAccount { amount_a, amount_b } => {
                self.fund_account(account, amount_a, amount_b)?;
                Ok(format!("Funded {account} with {amount_a} A and {amount_b} B"))
            }
            AmmAction::Swap {
                token_from,
                amount_from,
            } => {
                let token_from = TokenType::try_from(token_from)?;
                let amount_to = self.swap(account, token_from, amount_from)?;
                Ok(format!(
                    "Swapped {amount_from} {token_from} for {amount_to} {}",
                    token_from.opposite()
                ))
            }
        }
    }
}

impl LedgerContract for Amm {
    fn execute(&mut self, calldata: &Calldata) -> RunResult {
        let action: AmmAction = parse_calldata(calldata)?;
        let name: &'static str = (&action).into();
        info!("⚙️  {} from {} ({})", name, calldata.identity, calldata.tx_hash);
        self.execute_action(calldata, action).map_err(String::from)
    }

    fn commit(&self) -> StateDigest {
        self.as_digest()
    }
}

impl Digestable for Amm {
    fn as_digest(&self) -> StateDigest {
        StateDigest::of(&self.as_bytes())
    }
}

impl TryFrom<&[u8]> for Amm {
    type Error = String;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        borsh::from_slice(bytes).map_err(|e| format!("Could not decode amm state: {e}"))
    }
}
