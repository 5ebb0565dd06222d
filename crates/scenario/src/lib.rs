//! The scripted auction scenario.
//!
//! Loads the NFT and auction contract artifacts, deploys both against an
//! in-memory EVM, and drives a fixed transaction sequence: mint a token,
//! transfer it to the auction contract, start an auction, and query the
//! resulting auction record. Every step is recorded in a serializable
//! report.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod addresses;

mod config;
pub use config::ScenarioConfig;

mod report;
pub use report::{ScenarioReport, StepReport};

mod runner;
pub use runner::{encode_constructor_call, AuctionScenario};
