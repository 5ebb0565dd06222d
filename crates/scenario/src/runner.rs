//! Executes the fixed auction scenario step by step.

use crate::{addresses, ScenarioConfig, ScenarioReport, StepReport};
use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_primitives::{utils::format_ether, Address, Bytes, U256};
use eyre::{eyre, Result, WrapErr};
use gavel_artifacts::{ArtifactStore, ContractArtifact};
use gavel_common::fmt::format_token;
use gavel_evm::{decode_event_logs, EvmOpts, Executor};

/// Drives the fixed auction scenario against an in-memory EVM.
///
/// The sequence aborts at the first failed step; a failed transaction
/// surfaces its decoded revert reason through the returned error.
pub struct AuctionScenario {
    executor: Executor,
    config: ScenarioConfig,
    nft: ContractArtifact,
    auction: ContractArtifact,
    report: ScenarioReport,
}

impl AuctionScenario {
    /// Loads both contract artifacts and prepares a fresh executor.
    ///
    /// Artifact loading failures abort the run before anything executes.
    pub fn new(config: ScenarioConfig, opts: &EvmOpts) -> Result<Self> {
        let store = ArtifactStore::new(&config.contracts_dir);
        let nft = store.get_deployable(&config.nft_contract)?;
        let auction = store.get_deployable(&config.auction_contract)?;
        info!(
            nft = %nft.contract_name,
            auction = %auction.contract_name,
            dir = %store.root().display(),
            "loaded contract artifacts"
        );
        Ok(Self {
            executor: Executor::new(opts),
            config,
            nft,
            auction,
            report: ScenarioReport::default(),
        })
    }

    /// Runs the whole scenario and returns the per-step report.
    pub fn run(mut self) -> Result<ScenarioReport> {
        self.fund_accounts();
        let nft_address = self.deploy_nft()?;
        let auction_address = self.deploy_auction(nft_address)?;
        let token_id = self.mint(nft_address)?;
        self.transfer_to_auction(nft_address, auction_address, token_id)?;
        self.start_auction(auction_address, token_id)?;
        self.query_auction_record(auction_address, token_id)?;
        Ok(self.report)
    }

    /// Assigns the configured funding to every scenario account.
    fn fund_accounts(&mut self) {
        for address in addresses::FUNDED {
            self.executor.set_balance(address, self.config.funding);
        }
        self.push_step(
            "fund accounts".into(),
            format!(
                "{} accounts funded with {} ETH each",
                addresses::FUNDED.len(),
                format_ether(self.config.funding)
            ),
            None,
            Vec::new(),
        );
    }

    fn deploy_nft(&mut self) -> Result<Address> {
        let deployed = self
            .executor
            .deploy(addresses::DEPLOYER, self.nft.bytecode.clone(), U256::ZERO, Some(&self.nft.abi))
            .wrap_err_with(|| format!("deployment of `{}` failed", self.nft.contract_name))?;
        let logs = decode_event_logs(&self.nft.abi, &deployed.logs);
        self.push_step(
            format!("deploy {}", self.nft.contract_name),
            format!("deployed at {}", deployed.address),
            Some(deployed.gas_used),
            logs,
        );
        Ok(deployed.address)
    }

    fn deploy_auction(&mut self, nft_address: Address) -> Result<Address> {
        let code = encode_constructor_call(&self.auction, &[DynSolValue::Address(nft_address)])?;
        let deployed = self
            .executor
            .deploy(addresses::DEPLOYER, code, U256::ZERO, Some(&self.auction.abi))
            .wrap_err_with(|| format!("deployment of `{}` failed", self.auction.contract_name))?;
        let logs = decode_event_logs(&self.auction.abi, &deployed.logs);
        self.push_step(
            format!("deploy {}", self.auction.contract_name),
            format!("deployed at {}", deployed.address),
            Some(deployed.gas_used),
            logs,
        );
        Ok(deployed.address)
    }

    /// Mints a token to the receiver account and returns its id.
    fn mint(&mut self, nft_address: Address) -> Result<U256> {
        let func = self.nft.function("mint")?;
        let args = [
            DynSolValue::Address(addresses::TOKEN_RECEIVER),
            DynSolValue::String(self.config.token_uri.clone()),
        ];
        let result = self
            .executor
            .call_committing(addresses::DEPLOYER, nft_address, func, &args, U256::ZERO, Some(&self.nft.abi))
            .wrap_err("`mint` failed")?;
        let token_id = result
            .decoded_result
            .as_uint()
            .map(|(id, _)| id)
            .ok_or_else(|| eyre!("`mint` did not return a token id"))?;
        let logs = decode_event_logs(&self.nft.abi, &result.logs);
        self.push_step(
            "mint".into(),
            format!("token {token_id} minted to {}", addresses::TOKEN_RECEIVER),
            Some(result.gas_used),
            logs,
        );
        Ok(token_id)
    }

    /// Transfers the minted token from the receiver into the auction
    /// contract's custody.
    fn transfer_to_auction(
        &mut self,
        nft_address: Address,
        auction_address: Address,
        token_id: U256,
    ) -> Result<()> {
        // The three-argument ERC-721 overload.
        let func = self.nft.function_with_inputs("safeTransferFrom", 3)?;
        let args = [
            DynSolValue::Address(addresses::TOKEN_RECEIVER),
            DynSolValue::Address(auction_address),
            DynSolValue::Uint(token_id, 256),
        ];
        let result = self
            .executor
            .call_committing(
                addresses::TOKEN_RECEIVER,
                nft_address,
                func,
                &args,
                U256::ZERO,
                Some(&self.nft.abi),
            )
            .wrap_err("`safeTransferFrom` failed")?;
        let logs = decode_event_logs(&self.nft.abi, &result.logs);
        self.push_step(
            "transfer to auction".into(),
            format!("token {token_id} -> {auction_address}"),
            Some(result.gas_used),
            logs,
        );
        Ok(())
    }

    fn start_auction(&mut self, auction_address: Address, token_id: U256) -> Result<()> {
        let func = self.auction.function("startAuction")?;
        let args = [
            DynSolValue::Uint(token_id, 256),
            DynSolValue::Uint(self.config.starting_price, 256),
            DynSolValue::Uint(self.config.min_increment, 256),
            DynSolValue::Uint(U256::from(self.config.end_time), 256),
        ];
        let result = self
            .executor
            .call_committing(
                addresses::DEPLOYER,
                auction_address,
                func,
                &args,
                U256::ZERO,
                Some(&self.auction.abi),
            )
            .wrap_err("`startAuction` failed")?;
        let detail = if func.outputs.is_empty() {
            format!("auction open until {}", self.config.end_time)
        } else {
            format_token(&result.decoded_result)
        };
        let logs = decode_event_logs(&self.auction.abi, &result.logs);
        self.push_step("start auction".into(), detail, Some(result.gas_used), logs);
        Ok(())
    }

    /// Reads the auction record back without committing state.
    fn query_auction_record(&mut self, auction_address: Address, token_id: U256) -> Result<()> {
        let func = self.auction.function("getAuctionRecord")?;
        let result = self
            .executor
            .call(
                addresses::OPERATOR,
                auction_address,
                func,
                &[DynSolValue::Uint(token_id, 256)],
                U256::ZERO,
                Some(&self.auction.abi),
            )
            .wrap_err("`getAuctionRecord` failed")?;
        let detail = format_token(&result.decoded_result);
        self.push_step("query auction record".into(), detail, Some(result.gas_used), Vec::new());
        Ok(())
    }

    fn push_step(&mut self, label: String, detail: String, gas_used: Option<u64>, logs: Vec<String>) {
        debug!(step = %label, %detail, "step complete");
        self.report.steps.push(StepReport { label, detail, gas_used, logs });
    }
}

/// Appends the ABI-encoded constructor arguments to the creation bytecode.
///
/// A contract without a constructor entry takes no arguments; passing any
/// is an error.
pub fn encode_constructor_call(
    artifact: &ContractArtifact,
    args: &[DynSolValue],
) -> Result<Bytes> {
    let mut code = artifact.bytecode.to_vec();
    match artifact.constructor() {
        Some(constructor) => {
            let encoded = constructor.abi_encode_input(args).wrap_err_with(|| {
                format!("constructor arguments of `{}` do not match its ABI", artifact.contract_name)
            })?;
            code.extend(encoded);
        }
        None if args.is_empty() => {}
        None => {
            return Err(eyre!(
                "`{}` has no constructor, but constructor arguments were given",
                artifact.contract_name
            ))
        }
    }
    Ok(code.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const NFT_FIXTURE: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "AuctionNFT",
        "sourceName": "contracts/AuctionNFT.sol",
        "abi": [
            {
                "inputs": [
                    { "internalType": "address", "name": "to", "type": "address" },
                    { "internalType": "string", "name": "uri", "type": "string" }
                ],
                "name": "mint",
                "outputs": [ { "internalType": "uint256", "name": "", "type": "uint256" } ],
                "stateMutability": "nonpayable",
                "type": "function"
            }
        ],
        "bytecode": "0x60006000f3",
        "deployedBytecode": "0x",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#;

    const AUCTION_FIXTURE: &str = r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "Auction",
        "sourceName": "contracts/Auction.sol",
        "abi": [
            {
                "inputs": [ { "internalType": "address", "name": "nft", "type": "address" } ],
                "stateMutability": "nonpayable",
                "type": "constructor"
            }
        ],
        "bytecode": "0x60006000f3",
        "deployedBytecode": "0x",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#;

    fn fixture_config() -> (tempfile::TempDir, ScenarioConfig) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("AuctionNFT.json"), NFT_FIXTURE).unwrap();
        fs::write(dir.path().join("Auction.json"), AUCTION_FIXTURE).unwrap();
        let config =
            ScenarioConfig { contracts_dir: dir.path().to_path_buf(), ..Default::default() };
        (dir, config)
    }

    #[test]
    fn missing_artifacts_abort_before_execution() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ScenarioConfig { contracts_dir: dir.path().to_path_buf(), ..Default::default() };
        let err = AuctionScenario::new(config, &EvmOpts::default()).err().unwrap();
        assert!(err.to_string().contains("AuctionNFT.json"), "{err}");
    }

    #[test]
    fn funding_covers_every_scenario_account() {
        let (_dir, config) = fixture_config();
        let funding = config.funding;
        let mut scenario = AuctionScenario::new(config, &EvmOpts::default()).unwrap();

        scenario.fund_accounts();
        for address in addresses::FUNDED {
            assert_eq!(scenario.executor.get_balance(address), funding);
        }
        assert_eq!(scenario.report.steps.len(), 1);
        assert!(scenario.report.steps[0].detail.contains("100"), "{}", scenario.report.steps[0].detail);
    }

    #[test]
    fn constructor_arguments_are_appended_to_the_creation_code() {
        let artifact: ContractArtifact = serde_json::from_str(AUCTION_FIXTURE).unwrap();
        let nft = addresses::OPERATOR;
        let code = encode_constructor_call(&artifact, &[DynSolValue::Address(nft)]).unwrap();

        assert_eq!(code.len(), artifact.bytecode.len() + 32);
        assert!(code.starts_with(&artifact.bytecode));
        // the address is encoded as a left-padded 32-byte word
        assert_eq!(&code[code.len() - 20..], nft.as_slice());
    }

    #[test]
    fn surplus_constructor_arguments_are_rejected() {
        let artifact: ContractArtifact = serde_json::from_str(NFT_FIXTURE).unwrap();
        let err = encode_constructor_call(&artifact, &[DynSolValue::Bool(true)]).unwrap_err();
        assert!(err.to_string().contains("no constructor"), "{err}");
    }

    #[test]
    fn scenario_aborts_at_the_first_failing_step() {
        // The fixture bytecode deploys an empty runtime, so both deployments
        // succeed and `mint` is the first step that can fail: its calldata
        // lands on a codeless account and returns no data to decode.
        let (_dir, config) = fixture_config();
        let err = AuctionScenario::new(config, &EvmOpts::default())
            .unwrap()
            .run()
            .err()
            .unwrap();
        assert!(err.to_string().contains("mint"), "{err}");
    }
}
