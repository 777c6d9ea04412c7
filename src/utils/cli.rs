use amm::{AmmAction, TokenType};
use clap::{Parser, Subcommand};
use sdk::AccountId;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: CliCommand,

    #[arg(long, default_value = "config.ron")]
    pub config_file: String,

    #[arg(long)]
    pub data_directory: Option<String>,

    /// Caller identity
    #[arg(short, long, default_value_t = 0)]
    pub account: u64,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Set both pool reserves
    InitPool { reserve_a: u128, reserve_b: u128 },
    /// Credit the caller from the faucet
    Fund { amount_a: u128, amount_b: u128 },
    /// Trade `amount` of `token` against the pool
    Swap {
        #[arg(value_parser = parse_token_id)]
        token: u32,
        amount: u128,
    },
    /// Price a swap without executing it
    Quote {
        #[arg(value_parser = parse_token_id)]
        token: u32,
        amount: u128,
    },
    Balance {
        #[arg(value_parser = parse_token_id)]
        token: u32,
    },
    Reserve {
        #[arg(value_parser = parse_token_id)]
        token: u32,
    },
    /// Dump reserves, balances and the state digest
    State,
}

impl CliCommand {
    /// The ledger action behind a state-changing command, `None` for reads.
    pub fn as_action(&self) -> Option<AmmAction> {
        match *self {
            CliCommand::InitPool {
                reserve_a,
                reserve_b,
            } => Some(AmmAction::InitializePool {
                reserve_a,
                reserve_b,
            }),
            CliCommand::Fund { amount_a, amount_b } => {
                Some(AmmAction::FundAccount { amount_a, amount_b })
            }
            CliCommand::Swap { token, amount } => Some(AmmAction::Swap {
                token_from: token,
                amount_from: amount,
            }),
            CliCommand::Quote { .. }
            | CliCommand::Balance { .. }
            | CliCommand::Reserve { .. }
            | CliCommand::State => None,
        }
    }
}

impl Args {
    pub fn identity(&self) -> AccountId {
        AccountId(self.account)
    }
}

/// Accepts `A`, `B` or a raw token id. Unknown ids are let through so that the ledger rejects
/// them.
fn parse_token_id(s: &str) -> Result<u32, String> {
    match s.parse::<u32>() {
        Ok(id) => Ok(id),
        Err(_) => s
            .parse::<TokenType>()
            .map(TokenType::id)
            .map_err(|e| e.to_string()),
    }
}
