use alloy_primitives::{address, Address, B256, U256};
use revm::primitives::{BlobExcessGasAndPrice, Env, EnvWithHandlerCfg, SpecId};

/// The default block coinbase.
pub const DEFAULT_COINBASE: Address = address!("0000000000000000000000000000000000000001");

/// Configuration of the in-memory execution environment.
#[derive(Clone, Debug)]
pub struct EvmOpts {
    /// Chain id of the environment.
    pub chain_id: u64,
    /// Block number the environment reports.
    pub block_number: u64,
    /// Block timestamp, in seconds since the epoch.
    pub block_timestamp: u64,
    /// Block coinbase.
    pub block_coinbase: Address,
    /// Gas limit, applied both to the block and to every transaction.
    pub gas_limit: u64,
    /// Hardfork to execute under.
    pub spec_id: SpecId,
}

impl Default for EvmOpts {
    fn default() -> Self {
        Self {
            chain_id: 1,
            block_number: 1,
            block_timestamp: 1_672_502_400,
            block_coinbase: DEFAULT_COINBASE,
            gas_limit: 30_000_000,
            spec_id: SpecId::CANCUN,
        }
    }
}

impl EvmOpts {
    /// Builds the environment template applied to every transaction.
    ///
    /// Gas price and basefee are zero so senders can act without first
    /// buying gas; the per-transaction fields (caller, target, calldata,
    /// value) are filled in by the executor.
    pub fn evm_env(&self) -> EnvWithHandlerCfg {
        let mut env = Env::default();
        env.cfg.chain_id = self.chain_id;
        env.block.number = U256::from(self.block_number);
        env.block.coinbase = self.block_coinbase;
        env.block.timestamp = U256::from(self.block_timestamp);
        env.block.gas_limit = U256::from(self.gas_limit);
        env.block.basefee = U256::ZERO;
        env.block.difficulty = U256::ZERO;
        env.block.prevrandao = Some(B256::ZERO);
        env.block.blob_excess_gas_and_price = Some(BlobExcessGasAndPrice::new(0));
        env.tx.gas_limit = self.gas_limit;
        env.tx.gas_price = U256::ZERO;
        env.tx.chain_id = Some(self.chain_id);
        EnvWithHandlerCfg::new_with_spec_id(Box::new(env), self.spec_id)
    }
}
