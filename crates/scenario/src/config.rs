use alloy_primitives::U256;
use std::path::PathBuf;

/// Configuration of the auction scenario.
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    /// Directory the contract artifacts are loaded from.
    pub contracts_dir: PathBuf,
    /// Name of the NFT contract artifact.
    pub nft_contract: String,
    /// Name of the auction contract artifact.
    pub auction_contract: String,
    /// Token URI passed to `mint`.
    pub token_uri: String,
    /// Starting price of the auction, in wei.
    pub starting_price: U256,
    /// Minimum bid increment, in wei.
    pub min_increment: U256,
    /// Timestamp the auction ends at, in seconds since the epoch.
    pub end_time: u64,
    /// Balance assigned to every funded scenario account, in wei.
    pub funding: U256,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            contracts_dir: "./contracts".into(),
            nft_contract: "AuctionNFT".into(),
            auction_contract: "Auction".into(),
            token_uri: "https://ipfs.io/ipfs/Qm".into(),
            starting_price: U256::from(1_000),
            min_increment: U256::from(100),
            // 100000 seconds past the default block timestamp
            end_time: 1_672_602_400,
            // 100 ETH
            funding: U256::from(100_000_000_000_000_000_000_u128),
        }
    }
}
