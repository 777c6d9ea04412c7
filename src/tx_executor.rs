use std::{
    collections::VecDeque,
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::{bail, Context, Result};
use sdk::{
    guest, AccountId, Calldata, ContractAction, LedgerContract, ProgramOutput, TxHash,
};
use tracing::{debug, info, warn};

/// Host side of the execution environment.
///
/// Calls go through `&mut self`, so they are serialized by construction. A failed call leaves
/// the contract untouched. The state before each committed call is kept, up to `history_size`
/// calls, so that a call can later be cancelled.
#[derive(Debug, Clone)]
pub struct TxExecutor<Contract> {
    contract: Contract,
    nonce: u64,
    unsettled_txs: VecDeque<Calldata>,
    state_history: VecDeque<Contract>,
    history_size: usize,
}

impl<Contract> TxExecutor<Contract>
where
    Contract: LedgerContract + Debug + Clone,
{
    pub fn new(contract: Contract, history_size: usize) -> Self {
        TxExecutor {
            contract,
            nonce: 0,
            unsettled_txs: VecDeque::new(),
            state_history: VecDeque::new(),
            history_size,
        }
    }

    /// Starts numbering calls at `nonce`, so that hashes keep being unique when a host reloads a
    /// contract that has already run calls.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Nonce the next call will be hashed with.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn into_contract(self) -> Contract {
        self.contract
    }

    /// Hashes of the calls that can still be cancelled, oldest first.
    pub fn unsettled_txs(&self) -> impl Iterator<Item = &TxHash> {
        self.unsettled_txs.iter().map(|calldata| &calldata.tx_hash)
    }

    pub fn build_calldata<Action: ContractAction>(
        &mut self,
        identity: AccountId,
        action: &Action,
    ) -> Result<Calldata> {
        let blob = action.as_blob_data().context("Encoding contract action")?;
        let tx_hash = TxHash::compute(&identity, self.nonce, &blob);
        self.nonce += 1;
        Ok(Calldata::new(identity, tx_hash, blob))
    }

    pub fn execute_tx<Action: ContractAction>(
        &mut self,
        identity: AccountId,
        action: &Action,
    ) -> Result<ProgramOutput> {
        let calldata = self.build_calldata(identity, action)?;
        self.execute_calldata(calldata)
    }

    /// This function executes the calldata and returns the output of the contract.
    /// It also keeps track of the call as unsettled, along with the state it started from.
    pub fn execute_calldata(&mut self, calldata: Calldata) -> Result<ProgramOutput> {
        let initial_state = self.contract.clone();
        let output = guest::execute_one(&mut self.contract, &calldata);
        if !output.success {
            warn!(
                "❌ Transaction {} from {} failed: {}",
                calldata.tx_hash,
                calldata.identity,
                output.output_str()
            );
            bail!("Error while executing contract: {}", output.output_str());
        }
        info!(
            "✅ Transaction {} from {}: {}",
            calldata.tx_hash,
            calldata.identity,
            output.output_str()
        );

        self.unsettled_txs.push_back(calldata);
        self.state_history.push_back(initial_state);
        while self.unsettled_txs.len() > self.history_size {
            self.unsettled_txs.pop_front();
            self.state_history.pop_front();
        }

        Ok(output)
    }

    /// Reverts the state to what it was before `tx_hash`, then re-executes every call committed
    /// after it. Re-executed calls that no longer succeed are dropped.
    pub fn cancel_tx(&mut self, tx_hash: &TxHash) -> Result<()> {
        let Some(tx_pos) = self
            .unsettled_txs
            .iter()
            .position(|calldata| calldata.tx_hash == *tx_hash)
        else {
            bail!("Transaction {tx_hash} not found in unsettled transactions");
        };

        let Some(state) = self.state_history.get(tx_pos) else {
            bail!("State history not found for the cancelled transaction");
        };
        self.contract = state.clone();
        self.state_history.truncate(tx_pos);

        let reexecute_txs: Vec<Calldata> = self.unsettled_txs.drain(tx_pos..).skip(1).collect();
        info!(
            "↩️  Cancelled transaction {}, re-executing {} later ones",
            tx_hash,
            reexecute_txs.len()
        );
        for calldata in reexecute_txs {
            let tx_hash = calldata.tx_hash.clone();
            if let Err(e) = self.execute_calldata(calldata) {
                debug!("Dropping transaction {}: {:#}", tx_hash, e);
            }
        }
        Ok(())
    }

    pub fn shared(self) -> SharedTxExecutor<Contract> {
        SharedTxExecutor(Arc::new(Mutex::new(self)))
    }
}

/// Single-writer handle for hosts that receive calls from several threads. Every call holds the
/// lock for its whole execution.
#[derive(Debug)]
pub struct SharedTxExecutor<Contract>(Arc<Mutex<TxExecutor<Contract>>>);

impl<Contract> Clone for SharedTxExecutor<Contract> {
    fn clone(&self) -> Self {
        SharedTxExecutor(Arc::clone(&self.0))
    }
}

impl<Contract> SharedTxExecutor<Contract>
where
    Contract: LedgerContract + Debug + Clone,
{
    pub fn lock(&self) -> Result<MutexGuard<'_, TxExecutor<Contract>>> {
        self.0
            .lock()
            .map_err(|_| anyhow::anyhow!("Executor lock poisoned"))
    }

    pub fn execute_tx<Action: ContractAction>(
        &self,
        identity: AccountId,
        action: &Action,
    ) -> Result<ProgramOutput> {
        self.lock()?.execute_tx(identity, action)
    }

    /// Runs `f` against a consistent view of the contract.
    pub fn read<R>(&self, f: impl FnOnce(&Contract) -> R) -> Result<R> {
        Ok(f(self.lock()?.contract()))
    }
}
