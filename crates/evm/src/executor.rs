//! EVM executor, which can execute calls and deployments against an
//! in-memory state.

use crate::{decode::decode_revert, EvmOpts};
use alloy_dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{Address, Bytes, Log, U256};
use revm::{
    db::{CacheDB, EmptyDB},
    interpreter::{return_ok, InstructionResult},
    primitives::{
        AccountInfo, Bytecode, EnvWithHandlerCfg, EvmState, ExecutionResult, Output, ResultAndState,
        TxKind,
    },
    DatabaseCommit, DatabaseRef, Evm,
};

/// A type that can execute calls and deployments.
///
/// There are two ways of executing calls:
/// - `committing`: any state changes made during the call are persisted in
///   the underlying database;
/// - non-committing: state changes only exist for the duration of the call
///   and are discarded afterwards.
#[derive(Clone, Debug)]
pub struct Executor {
    /// The `revm` database that contains all account state.
    db: CacheDB<EmptyDB>,
    /// The environment template applied to every transaction.
    env: EnvWithHandlerCfg,
}

impl Executor {
    /// Creates an executor with an empty state database.
    pub fn new(opts: &EvmOpts) -> Self {
        Self { db: CacheDB::new(EmptyDB::default()), env: opts.evm_env() }
    }

    /// Set the balance of an account.
    pub fn set_balance(&mut self, address: Address, amount: U256) -> &mut Self {
        trace!(?address, ?amount, "setting account balance");
        let mut account = self.account(address);
        account.balance = amount;
        self.db.insert_account_info(address, account);
        self
    }

    /// Gets the balance of an account.
    pub fn get_balance(&self, address: Address) -> U256 {
        self.account(address).balance
    }

    /// Set the nonce of an account.
    pub fn set_nonce(&mut self, address: Address, nonce: u64) -> &mut Self {
        let mut account = self.account(address);
        account.nonce = nonce;
        self.db.insert_account_info(address, account);
        self
    }

    /// Gets the nonce of an account.
    pub fn get_nonce(&self, address: Address) -> u64 {
        self.account(address).nonce
    }

    /// Set the runtime code of an account.
    pub fn set_code(&mut self, address: Address, code: Bytes) -> &mut Self {
        trace!(?address, code_len = code.len(), "setting account code");
        let mut account = self.account(address);
        let bytecode = Bytecode::new_raw(code);
        account.code_hash = bytecode.hash_slow();
        account.code = Some(bytecode);
        self.db.insert_account_info(address, account);
        self
    }

    /// Gets the runtime code of an account.
    pub fn get_code(&self, address: Address) -> Bytes {
        self.account(address).code.map(|code| code.original_bytes()).unwrap_or_default()
    }

    /// Deploys a contract and commits the new state to the underlying
    /// database.
    ///
    /// Executes a CREATE transaction with the given creation `code`. A
    /// deployment that reverts or halts is an error carrying the decoded
    /// revert reason; custom errors are resolved against `abi` if given.
    pub fn deploy(
        &mut self,
        from: Address,
        code: Bytes,
        value: U256,
        abi: Option<&JsonAbi>,
    ) -> Result<DeployResult, EvmError> {
        trace!(sender = %from, code_len = code.len(), "deploying contract");
        let env = self.build_tx_env(from, TxKind::Create, code, value);
        let mut result = self.transact_with_env(env)?;
        self.commit(&mut result);
        let result = result.into_result(abi)?;
        let Some(Output::Create(_, Some(address))) = result.out else {
            return Err(EvmError::Eyre(eyre::eyre!(
                "deployment succeeded, but no address was returned"
            )));
        };
        debug!(%address, gas = result.gas_used, "deployed contract");
        Ok(DeployResult { raw: result, address })
    }

    /// Performs a call to an account on the current state.
    ///
    /// The state after the call is not persisted.
    pub fn call(
        &self,
        from: Address,
        to: Address,
        func: &Function,
        args: &[DynSolValue],
        value: U256,
        abi: Option<&JsonAbi>,
    ) -> Result<CallResult, EvmError> {
        let calldata = Bytes::from(func.abi_encode_input(args)?);
        let result = self.call_raw(from, to, calldata, value)?;
        result.into_decoded_result(func, abi)
    }

    /// Performs a call to an account on the current state.
    ///
    /// The state after the call is persisted.
    pub fn call_committing(
        &mut self,
        from: Address,
        to: Address,
        func: &Function,
        args: &[DynSolValue],
        value: U256,
        abi: Option<&JsonAbi>,
    ) -> Result<CallResult, EvmError> {
        let calldata = Bytes::from(func.abi_encode_input(args)?);
        let result = self.call_raw_committing(from, to, calldata, value)?;
        result.into_decoded_result(func, abi)
    }

    /// Performs a raw call with pre-encoded calldata on the current state.
    ///
    /// Any state modifications made by the call are not committed.
    pub fn call_raw(
        &self,
        from: Address,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> eyre::Result<RawCallResult> {
        let env = self.build_tx_env(from, TxKind::Call(to), calldata, value);
        let mut evm =
            Evm::builder().with_ref_db(&self.db).with_env_with_handler_cfg(env).build();
        let result = evm.transact()?;
        Ok(convert_executed_result(result))
    }

    /// Performs a raw call with pre-encoded calldata and commits its state
    /// changes.
    pub fn call_raw_committing(
        &mut self,
        from: Address,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> eyre::Result<RawCallResult> {
        let env = self.build_tx_env(from, TxKind::Call(to), calldata, value);
        let mut result = self.transact_with_env(env)?;
        self.commit(&mut result);
        Ok(result)
    }

    /// Executes the transaction configured in `env`.
    fn transact_with_env(&mut self, env: EnvWithHandlerCfg) -> eyre::Result<RawCallResult> {
        let result = {
            let mut evm =
                Evm::builder().with_db(&mut self.db).with_env_with_handler_cfg(env).build();
            evm.transact()?
        };
        Ok(convert_executed_result(result))
    }

    /// Commits the result's state changeset to the database.
    fn commit(&mut self, result: &mut RawCallResult) {
        if let Some(changes) = result.state_changeset.take() {
            self.db.commit(changes);
        }
    }

    /// Creates the environment for a single transaction from the template.
    fn build_tx_env(
        &self,
        caller: Address,
        transact_to: TxKind,
        data: Bytes,
        value: U256,
    ) -> EnvWithHandlerCfg {
        let mut env = self.env.clone();
        env.tx.caller = caller;
        env.tx.transact_to = transact_to;
        env.tx.data = data;
        env.tx.value = value;
        // The account's on-chain nonce is used; transactions never race here.
        env.tx.nonce = None;
        env
    }

    fn account(&self, address: Address) -> AccountInfo {
        self.db.basic_ref(address).ok().flatten().unwrap_or_default()
    }
}

/// Represents the context after an execution error occurred.
#[derive(Debug, thiserror::Error)]
#[error("execution reverted: {reason} (gas: {})", raw.gas_used)]
pub struct ExecutionErr {
    /// The raw result of the call.
    pub raw: RawCallResult,
    /// The decoded revert reason.
    pub reason: String,
}

impl std::ops::Deref for ExecutionErr {
    type Target = RawCallResult;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl std::ops::DerefMut for ExecutionErr {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.raw
    }
}

/// Error variants of an executed transaction.
#[derive(Debug, thiserror::Error)]
pub enum EvmError {
    /// Error which occurred during execution of a transaction.
    #[error(transparent)]
    Execution(#[from] Box<ExecutionErr>),
    /// Error which occurred during ABI encoding or decoding.
    #[error(transparent)]
    Abi(#[from] alloy_dyn_abi::Error),
    /// Any other error.
    #[error(transparent)]
    Eyre(#[from] eyre::Report),
}

impl From<ExecutionErr> for EvmError {
    fn from(err: ExecutionErr) -> Self {
        Self::Execution(Box::new(err))
    }
}

impl From<alloy_sol_types::Error> for EvmError {
    fn from(err: alloy_sol_types::Error) -> Self {
        Self::Abi(err.into())
    }
}

/// The result of a deployment.
#[derive(Debug)]
pub struct DeployResult {
    /// The raw result of the deployment transaction.
    pub raw: RawCallResult,
    /// The address of the deployed contract.
    pub address: Address,
}

impl std::ops::Deref for DeployResult {
    type Target = RawCallResult;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// The result of a raw call.
#[derive(Debug)]
pub struct RawCallResult {
    /// The exit status of the call.
    pub exit_reason: InstructionResult,
    /// Whether the call reverted or not.
    pub reverted: bool,
    /// The raw returned data.
    pub result: Bytes,
    /// The gas used for the call.
    pub gas_used: u64,
    /// Refunded gas.
    pub gas_refunded: u64,
    /// The logs emitted during the call.
    pub logs: Vec<Log>,
    /// The raw output of the execution.
    pub out: Option<Output>,
    /// The changeset of the state.
    ///
    /// This is only present if the changed state was not committed to the
    /// database.
    pub state_changeset: Option<State>,
}

impl RawCallResult {
    /// Converts the result of the call into an [`EvmError`] carrying the
    /// decoded revert reason.
    pub fn into_evm_error(self, abi: Option<&JsonAbi>) -> EvmError {
        let reason = decode_revert(&self.result, abi, Some(self.exit_reason));
        EvmError::Execution(Box::new(ExecutionErr { raw: self, reason }))
    }

    /// Returns an [`EvmError`] if the call failed, otherwise returns `self`.
    pub fn into_result(self, abi: Option<&JsonAbi>) -> Result<Self, EvmError> {
        if self.exit_reason.is_ok() {
            Ok(self)
        } else {
            Err(self.into_evm_error(abi))
        }
    }

    /// Decodes the return data of the call with the given function.
    pub fn into_decoded_result(
        self,
        func: &Function,
        abi: Option<&JsonAbi>,
    ) -> Result<CallResult, EvmError> {
        let this = self.into_result(abi)?;
        let mut result = func.abi_decode_output(&this.result, false)?;
        let decoded_result = if result.len() == 1 {
            result.pop().unwrap()
        } else {
            // combine results into a tuple
            DynSolValue::Tuple(result)
        };
        Ok(CallResult { raw: this, decoded_result })
    }
}

/// The result of a call, including the decoded return value.
#[derive(Debug)]
pub struct CallResult {
    /// The raw result of the call.
    pub raw: RawCallResult,
    /// The decoded result of the call.
    pub decoded_result: DynSolValue,
}

impl std::ops::Deref for CallResult {
    type Target = RawCallResult;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Converts a revm [`ResultAndState`] into a [`RawCallResult`].
fn convert_executed_result(result_and_state: ResultAndState) -> RawCallResult {
    let ResultAndState { result: exec_result, state } = result_and_state;
    let (exit_reason, gas_refunded, gas_used, out, logs) = match exec_result {
        ExecutionResult::Success { reason, gas_used, gas_refunded, logs, output } => {
            (reason.into(), gas_refunded, gas_used, Some(output), logs)
        }
        ExecutionResult::Revert { gas_used, output } => {
            (InstructionResult::Revert, 0_u64, gas_used, Some(Output::Call(output)), Vec::new())
        }
        ExecutionResult::Halt { reason, gas_used } => {
            (reason.into(), 0_u64, gas_used, None, Vec::new())
        }
    };

    let result = match &out {
        Some(Output::Call(data)) => data.clone(),
        _ => Bytes::new(),
    };

    RawCallResult {
        exit_reason,
        reverted: !matches!(exit_reason, return_ok!()),
        result,
        gas_used,
        gas_refunded,
        logs,
        out,
        state_changeset: Some(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    /// Creation code that deploys an empty runtime.
    const EMPTY_INIT: &[u8] = &hex!("60006000f3");
    /// Creation code for a runtime that returns `uint256(42)` to any call.
    const ANSWER_INIT: &[u8] = &hex!("69602a60005260206000f3600052600a6016f3");
    /// Creation code for a runtime that reverts with no data.
    const REVERT_INIT: &[u8] = &hex!("6460006000fd6000526005601bf3");

    const ALICE: Address = address!("0000000000000000000000000000000000000200");
    const BOB: Address = address!("0000000000000000000000000000000000000201");

    fn executor() -> Executor {
        Executor::new(&EvmOpts::default())
    }

    #[test]
    fn account_editing_round_trips() {
        let mut executor = executor();
        assert_eq!(executor.get_balance(ALICE), U256::ZERO);

        executor.set_balance(ALICE, U256::from(1_000)).set_nonce(ALICE, 7);
        assert_eq!(executor.get_balance(ALICE), U256::from(1_000));
        assert_eq!(executor.get_nonce(ALICE), 7);

        let code = Bytes::from_static(&hex!("6001600101"));
        executor.set_code(BOB, code.clone());
        assert_eq!(executor.get_code(BOB), code);
    }

    #[test]
    fn deploys_and_calls_a_contract() {
        let mut executor = executor();
        let deployed = executor
            .deploy(ALICE, Bytes::from_static(ANSWER_INIT), U256::ZERO, None)
            .unwrap();
        assert!(!deployed.reverted);
        assert!(deployed.gas_used > 21_000);
        // the created account carries the returned runtime code
        assert_eq!(
            executor.get_code(deployed.address),
            Bytes::from_static(&hex!("602a60005260206000f3"))
        );
        // the deployer's nonce advanced
        assert_eq!(executor.get_nonce(ALICE), 1);

        let func = Function::parse("function answer() view returns (uint256)").unwrap();
        let result = executor.call(ALICE, deployed.address, &func, &[], U256::ZERO, None).unwrap();
        assert_eq!(result.decoded_result, DynSolValue::Uint(U256::from(42), 256));
    }

    #[test]
    fn successive_deployments_get_distinct_addresses() {
        let mut executor = executor();
        let first =
            executor.deploy(ALICE, Bytes::from_static(EMPTY_INIT), U256::ZERO, None).unwrap();
        let second =
            executor.deploy(ALICE, Bytes::from_static(EMPTY_INIT), U256::ZERO, None).unwrap();
        assert_ne!(first.address, second.address);
    }

    #[test]
    fn failed_deployment_is_an_execution_error() {
        let mut executor = executor();
        let err = executor
            .deploy(ALICE, Bytes::from_static(&hex!("60006000fd")), U256::ZERO, None)
            .unwrap_err();
        assert!(matches!(err, EvmError::Execution(_)));
    }

    #[test]
    fn committing_call_transfers_value() {
        let mut executor = executor();
        executor.set_balance(ALICE, U256::from(1_000));

        let result = executor
            .call_raw_committing(ALICE, BOB, Bytes::new(), U256::from(100))
            .unwrap();
        assert!(!result.reverted);
        assert_eq!(executor.get_balance(BOB), U256::from(100));
        assert_eq!(executor.get_balance(ALICE), U256::from(900));
    }

    #[test]
    fn non_committing_call_discards_state() {
        let mut executor = executor();
        executor.set_balance(ALICE, U256::from(1_000));

        let result = executor.call_raw(ALICE, BOB, Bytes::new(), U256::from(100)).unwrap();
        assert!(!result.reverted);
        assert!(result.state_changeset.is_some());
        assert_eq!(executor.get_balance(BOB), U256::ZERO);
        assert_eq!(executor.get_balance(ALICE), U256::from(1_000));
    }

    #[test]
    fn reverting_call_reports_the_reason() {
        let mut executor = executor();
        let deployed = executor
            .deploy(ALICE, Bytes::from_static(REVERT_INIT), U256::ZERO, None)
            .unwrap();

        let raw = executor.call_raw(ALICE, deployed.address, Bytes::new(), U256::ZERO).unwrap();
        assert_eq!(raw.exit_reason, InstructionResult::Revert);
        assert!(raw.reverted);

        let func = Function::parse("function ping()").unwrap();
        let err = executor
            .call(ALICE, deployed.address, &func, &[], U256::ZERO, None)
            .unwrap_err();
        let EvmError::Execution(err) = err else { panic!("expected execution error: {err}") };
        assert_eq!(err.reason, "EvmError: Revert");
    }
}
