//! Well-known account addresses of the scenario.
//!
//! All addresses are above the precompile range; revm reserves `0x01`
//! through `0x0a`.

use alloy_primitives::{address, Address};

/// Account that deploys both contracts and signs the mint and auction
/// transactions.
pub const DEPLOYER: Address = address!("00000000000000000000000000000000000000ff");

/// Funded externally-owned account used for read-only queries.
pub const OPERATOR: Address = address!("0000000000000000000000000000000000000200");

/// Account the freshly minted token is assigned to.
pub const TOKEN_RECEIVER: Address = address!("0000000000000000000000000000000000000201");

/// First bidding account.
pub const BIDDER_ONE: Address = address!("0000000000000000000000000000000000000202");

/// Second bidding account.
pub const BIDDER_TWO: Address = address!("0000000000000000000000000000000000000203");

/// Accounts that receive funding before the scenario runs.
pub const FUNDED: [Address; 4] = [OPERATOR, TOKEN_RECEIVER, BIDDER_ONE, BIDDER_TWO];
