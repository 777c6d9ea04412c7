//! # cpamm
//!
//! Host for the two-token constant-product AMM ledger.
//!
//! The ledger itself lives in the `amm` contract crate. This crate runs it: calls are executed
//! one at a time through a [tx_executor::TxExecutor], which discards the writes of a failed call
//! and can cancel a recent one, and the resulting state is kept on disk by a
//! [state_store::StateStore]. The `cpamm` binary exposes every ledger operation as a subcommand.

pub mod entrypoint;
pub mod state_store;
pub mod tx_executor;
pub mod utils;
