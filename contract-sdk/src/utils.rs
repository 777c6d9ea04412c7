use borsh::BorshDeserialize;

use crate::{Calldata, ProgramOutput, RunResult, StateDigest};

/// Decodes the action carried by a calldata blob.
pub fn parse_calldata<Parameters>(calldata: &Calldata) -> Result<Parameters, String>
where
    Parameters: BorshDeserialize,
{
    borsh::from_slice::<Parameters>(calldata.blob.0.as_slice()).map_err(|_| {
        format!(
            "Could not deserialize blob of transaction {}",
            calldata.tx_hash
        )
    })
}

pub fn as_program_output(
    initial_state: StateDigest,
    next_state: StateDigest,
    calldata: &Calldata,
    res: RunResult,
) -> ProgramOutput {
    match res {
        Ok(output) => ProgramOutput {
            initial_state,
            next_state,
            identity: calldata.identity,
            tx_hash: calldata.tx_hash.clone(),
            success: true,
            program_outputs: output.into_bytes(),
        },
        Err(message) => fail(calldata, initial_state, &message),
    }
}

/// A failed call never moves the state commitment.
pub fn fail(calldata: &Calldata, initial_state: StateDigest, message: &str) -> ProgramOutput {
    ProgramOutput {
        initial_state: initial_state.clone(),
        next_state: initial_state,
        identity: calldata.identity,
        tx_hash: calldata.tx_hash.clone(),
        success: false,
        program_outputs: message.as_bytes().to_vec(),
    }
}
