use alloy_primitives::U256;
use clap::Parser;
use gavel_evm::EvmOpts;
use gavel_scenario::ScenarioConfig;
use std::path::PathBuf;

/// Drives a scripted NFT auction scenario against an in-memory EVM.
///
/// Two Hardhat artifacts are loaded from the contracts directory, deployed,
/// and exercised: mint, transfer into the auction, start the auction, and
/// query the auction record. Decoded results are printed per step.
#[derive(Parser, Debug)]
#[command(name = "gavel", version, about)]
pub struct Gavel {
    /// Directory containing the compiled contract artifacts.
    #[arg(long, value_name = "DIR", default_value = "./contracts")]
    pub contracts: PathBuf,

    /// Name of the NFT contract artifact.
    #[arg(long, default_value = "AuctionNFT")]
    pub nft_contract: String,

    /// Name of the auction contract artifact.
    #[arg(long, default_value = "Auction")]
    pub auction_contract: String,

    /// Token URI passed to `mint`.
    #[arg(long, default_value = "https://ipfs.io/ipfs/Qm")]
    pub token_uri: String,

    /// Starting price of the auction, in wei.
    #[arg(long, default_value = "1000")]
    pub starting_price: U256,

    /// Minimum bid increment, in wei.
    #[arg(long, default_value = "100")]
    pub min_increment: U256,

    /// Timestamp the auction ends at, in seconds since the epoch.
    #[arg(long, default_value_t = 1_672_602_400)]
    pub end_time: u64,

    /// Balance assigned to every scenario account, in wei.
    #[arg(long, default_value = "100000000000000000000")]
    pub funding: U256,

    /// Gas limit applied to the block and to every transaction.
    #[arg(long, default_value_t = 30_000_000)]
    pub gas_limit: u64,

    /// Print the report as JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

impl Gavel {
    /// The scenario configuration described by these arguments.
    pub fn scenario_config(&self) -> ScenarioConfig {
        ScenarioConfig {
            contracts_dir: self.contracts.clone(),
            nft_contract: self.nft_contract.clone(),
            auction_contract: self.auction_contract.clone(),
            token_uri: self.token_uri.clone(),
            starting_price: self.starting_price,
            min_increment: self.min_increment,
            end_time: self.end_time,
            funding: self.funding,
        }
    }

    /// The EVM environment described by these arguments.
    pub fn evm_opts(&self) -> EvmOpts {
        EvmOpts { gas_limit: self.gas_limit, ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Gavel::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_scenario() {
        let args = Gavel::parse_from(["gavel"]);
        let config = args.scenario_config();
        assert_eq!(config.contracts_dir, PathBuf::from("./contracts"));
        assert_eq!(config.nft_contract, "AuctionNFT");
        assert_eq!(config.auction_contract, "Auction");
        assert_eq!(config.starting_price, U256::from(1_000));
        assert_eq!(args.evm_opts().gas_limit, 30_000_000);
    }

    #[test]
    fn parses_overrides() {
        let args = Gavel::parse_from([
            "gavel",
            "--contracts",
            "artifacts",
            "--gas-limit",
            "1000000",
            "--funding",
            "5",
            "--json",
        ]);
        assert_eq!(args.contracts, PathBuf::from("artifacts"));
        assert_eq!(args.gas_limit, 1_000_000);
        assert_eq!(args.funding, U256::from(5));
        assert!(args.json);
    }
}
