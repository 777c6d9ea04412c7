/*!
The `guest` module is the transactional half of the environment contract.

[execute] runs a batch of calls against a contract, one after the other. Each call sees the state
committed by the previous successful call. When a call fails, every write it made is discarded
and the contract is put back exactly as it was before the call.

```rust,ignore
let outputs = execute(&mut contract, &calldatas);
for output in outputs {
    println!("{}: {}", output.tx_hash, output.output_str());
}
```
*/

use crate::utils::as_program_output;
use crate::{Calldata, LedgerContract, ProgramOutput, RunResult};

pub fn execute<C>(contract: &mut C, calldata: &[Calldata]) -> Vec<ProgramOutput>
where
    C: LedgerContract + Clone,
{
    let mut outputs = Vec::with_capacity(calldata.len());
    for calldata in calldata.iter() {
        outputs.push(execute_one(contract, calldata));
    }
    outputs
}

pub fn execute_one<C>(contract: &mut C, calldata: &Calldata) -> ProgramOutput
where
    C: LedgerContract + Clone,
{
    let initial_state_commitment = contract.commit();
    let snapshot = contract.clone();

    let res: RunResult = contract.execute(calldata);
    if res.is_err() {
        *contract = snapshot;
    }

    let next_state_commitment = contract.commit();
    as_program_output(
        initial_state_commitment,
        next_state_commitment,
        calldata,
        res,
    )
}
