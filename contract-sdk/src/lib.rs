//! # Contract SDK
//!
//! Types shared between ledger contracts and the environment that runs them.
//!
//! A contract is a struct implementing [LedgerContract]. The environment hands it one
//! [Calldata] per invocation: the authenticated caller identity, the transaction hash and the
//! encoded action. The contract answers with a [RunResult], and the environment turns it into a
//! [ProgramOutput] through [guest::execute], which also takes care of discarding the writes of a
//! failed invocation.
//!
//! Contract actions are encoded with borsh. Implement [ContractAction] on the action enum to get
//! [ContractAction::as_blob_data] for free, and decode it back with [utils::parse_calldata].
use core::fmt::Display;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

pub mod guest;
pub mod utils;

#[cfg(feature = "tracing")]
pub use tracing;

// With the "tracing" feature on, contract logs are regular tracing events.
#[cfg(feature = "tracing")]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*);
    }
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        println!($($arg)*);
    }
}

/// Outcome of a contract invocation: a human readable output on success, the failure reason
/// otherwise.
pub type RunResult = Result<String, String>;

/**
Entry point of a ledger contract.

The environment guarantees that calls are serialized, and that the state observed by a call is
the state committed by the previous successful call. A contract is free to fail half-way through
[LedgerContract::execute]: the environment restores the state it had before the call.

```rust
use borsh::{BorshDeserialize, BorshSerialize};
use cpamm_contract_sdk::{utils::parse_calldata, Calldata, LedgerContract, RunResult, StateDigest};

#[derive(Clone, BorshSerialize, BorshDeserialize)]
struct Counter(u64);

#[derive(BorshSerialize, BorshDeserialize)]
enum CounterAction {
    Increment,
}

impl LedgerContract for Counter {
    fn execute(&mut self, calldata: &Calldata) -> RunResult {
        let CounterAction::Increment = parse_calldata(calldata)?;
        self.0 += 1;
        Ok(format!("Counter is now {}", self.0))
    }

    fn commit(&self) -> StateDigest {
        StateDigest::of(&self.0.to_le_bytes())
    }
}
```
*/
pub trait LedgerContract {
    /// Runs a single invocation against the current state.
    fn execute(&mut self, calldata: &Calldata) -> RunResult;

    /// Commitment of the current state.
    fn commit(&self) -> StateDigest;
}

pub trait Digestable {
    fn as_digest(&self) -> StateDigest;
}

pub trait ContractAction: BorshSerialize {
    fn as_blob_data(&self) -> borsh::io::Result<BlobData> {
        borsh::to_vec(self).map(BlobData)
    }
}

/// Opaque caller identifier. Authenticity is the environment's business.
#[derive(
    Default,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct AccountId(pub u64);

#[derive(
    Default,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct TxHash(pub String);

#[derive(
    Default,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct BlobData(pub Vec<u8>);

#[derive(
    Default,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct StateDigest(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Calldata {
    pub identity: AccountId,
    pub tx_hash: TxHash,
    pub blob: BlobData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ProgramOutput {
    pub initial_state: StateDigest,
    pub next_state: StateDigest,
    pub identity: AccountId,
    pub tx_hash: TxHash,
    pub success: bool,
    pub program_outputs: Vec<u8>,
}

impl StateDigest {
    /// sha3-256 commitment of an encoded state.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(bytes);
        StateDigest(hasher.finalize().to_vec())
    }
}

impl Calldata {
    pub fn new(identity: AccountId, tx_hash: TxHash, blob: BlobData) -> Self {
        Calldata {
            identity,
            tx_hash,
            blob,
        }
    }
}

impl TxHash {
    pub fn new(s: &str) -> TxHash {
        TxHash(s.into())
    }

    /// Deterministic hash of a call: the same caller sending the same action at the same nonce
    /// always gets the same hash.
    pub fn compute(identity: &AccountId, nonce: u64, blob: &BlobData) -> TxHash {
        let mut hasher = Sha3_256::new();
        hasher.update(identity.0.to_le_bytes());
        hasher.update(nonce.to_le_bytes());
        hasher.update(&blob.0);
        TxHash(hex::encode(hasher.finalize()))
    }
}

impl ProgramOutput {
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.program_outputs).into_owned()
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", &self.0)
    }
}
impl Display for TxHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", &self.0)
    }
}
impl Display for StateDigest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}
