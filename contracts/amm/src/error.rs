use derive_more::derive::Display;

/// Every failure aborts the current operation. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AmmError {
    #[display("Invalid token type {_0}, expected A (0) or B (1)")]
    InvalidToken(String),
    #[display("Amount {amount} is out of bounds, maximum is {max}")]
    AmountOutOfBounds { amount: u128, max: u128 },
    #[display("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u128, available: u128 },
    #[display("Value {value} is out of range [{min}, {max}]")]
    OutOfRange { value: i128, min: u128, max: u128 },
}

impl std::error::Error for AmmError {}

impl From<AmmError> for String {
    fn from(e: AmmError) -> Self {
        e.to_string()
    }
}
