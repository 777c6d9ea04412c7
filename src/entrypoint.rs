use amm::{Amm, TokenType};
use anyhow::{Context, Result};
use borsh::{BorshDeserialize, BorshSerialize};
use sdk::{LedgerContract, TxHash};
use tracing::info;

use crate::{
    state_store::StateStore,
    tx_executor::TxExecutor,
    utils::{
        cli::{Args, CliCommand},
        conf::Conf,
    },
};

/// What the host keeps on disk between two commands.
#[derive(Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PersistedLedger {
    /// Nonce of the next call, so that tx hashes never repeat across runs
    pub nonce: u64,
    pub amm: Amm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Set for state-changing commands only
    pub tx_hash: Option<TxHash>,
    pub output: String,
}

/// Runs one CLI command against the persisted ledger.
///
/// State-changing commands go through a [TxExecutor]. The state file is only rewritten when the
/// call succeeds. Each invocation is a single call, so nothing is kept for `cancel_tx`.
pub fn run_command(args: &Args, conf: &Conf) -> Result<CommandOutcome> {
    let store = StateStore::new(conf.state_path());
    let PersistedLedger { nonce, amm } = store.load_or_default()?;

    let Some(action) = args.command.as_action() else {
        return Ok(CommandOutcome {
            tx_hash: None,
            output: read_command(&amm, args)?,
        });
    };

    let mut executor = TxExecutor::new(amm, 0).with_nonce(nonce);
    let output = executor.execute_tx(args.identity(), &action)?;
    let persisted = PersistedLedger {
        nonce: executor.nonce(),
        amm: executor.into_contract(),
    };
    store.save(&persisted).context("Persisting ledger state")?;
    info!("📦 New state digest {}", output.next_state);

    Ok(CommandOutcome {
        output: output.output_str(),
        tx_hash: Some(output.tx_hash),
    })
}

fn read_command(amm: &Amm, args: &Args) -> Result<String> {
    match args.command {
        CliCommand::Quote { token, amount } => {
            let token = TokenType::try_from(token)?;
            let amount_to = amm.quote(token, amount)?;
            Ok(format!(
                "{amount} {token} would swap for {amount_to} {}",
                token.opposite()
            ))
        }
        CliCommand::Balance { token } => {
            let token = TokenType::try_from(token)?;
            Ok(amm.get_account_balance(args.identity(), token).to_string())
        }
        CliCommand::Reserve { token } => {
            let token = TokenType::try_from(token)?;
            Ok(amm.get_pool_reserve(token).to_string())
        }
        CliCommand::State => Ok(describe_state(amm)),
        CliCommand::InitPool { .. } | CliCommand::Fund { .. } | CliCommand::Swap { .. } => {
            anyhow::bail!("{:?} is not a read command", args.command)
        }
    }
}

fn describe_state(amm: &Amm) -> String {
    TokenType::ALL
        .into_iter()
        .map(|token| format!("reserve {token}: {}", amm.get_pool_reserve(token)))
        .chain(
            amm.accounts()
                .map(|(account, token, balance)| format!("account {account} {token}: {balance}")),
        )
        .chain(std::iter::once(format!("digest: {}", amm.commit())))
        .collect::<Vec<_>>()
        .join("\n")
}
