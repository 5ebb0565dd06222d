//! Schema and loader for Hardhat compiler artifacts.
//!
//! An artifact is the JSON file a Solidity toolchain emits per compiled
//! contract: the ABI, the creation and runtime bytecode, and the library
//! link references for both. This crate deserializes that format into
//! [`ContractArtifact`] and locates artifacts on disk via [`ArtifactStore`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod artifact;
pub use artifact::{ContractArtifact, LinkReferences, Offsets};

mod error;
pub use error::ArtifactError;

mod store;
pub use store::ArtifactStore;
