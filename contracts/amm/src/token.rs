use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// The two assets held by the pool.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub enum TokenType {
    A,
    B,
}

impl TokenType {
    pub const ALL: [TokenType; 2] = [TokenType::A, TokenType::B];

    pub fn opposite(self) -> Self {
        match self {
            TokenType::A => TokenType::B,
            TokenType::B => TokenType::A,
        }
    }

    /// Raw id used on the wire.
    pub fn id(self) -> u32 {
        match self {
            TokenType::A => 0,
            TokenType::B => 1,
        }
    }
}

impl TryFrom<u32> for TokenType {
    type Error = AmmError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(TokenType::A),
            1 => Ok(TokenType::B),
            other => Err(AmmError::InvalidToken(other.to_string())),
        }
    }
}

/// Accepts `A`/`B` (any case) or a raw numeric id.
impl FromStr for TokenType {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(TokenType::A),
            "B" | "b" => Ok(TokenType::B),
            other => match other.parse::<u32>() {
                Ok(id) => TokenType::try_from(id),
                Err(_) => Err(AmmError::InvalidToken(other.to_string())),
            },
        }
    }
}
