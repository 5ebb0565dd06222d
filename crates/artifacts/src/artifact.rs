use crate::ArtifactError;
use alloy_json_abi::{Constructor, Event, Function, JsonAbi};
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

/// A byte range occupied by a library placeholder inside unlinked bytecode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offsets {
    /// Offset of the placeholder, in bytes.
    pub start: u32,
    /// Length of the placeholder, in bytes.
    pub length: u32,
}

/// Library link references: source file -> library name -> placeholder
/// locations.
pub type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<Offsets>>>;

/// A single contract's compiler output, as emitted by Hardhat.
///
/// Immutable after load; the loader performs no post-processing beyond
/// deserialization, so every field mirrors the source JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// Artifact format tag, e.g. `hh-sol-artifact-1`.
    #[serde(rename = "_format", default)]
    pub format: String,
    /// Name of the contract.
    pub contract_name: String,
    /// Name of the Solidity source file the contract was compiled from.
    pub source_name: String,
    /// The contract ABI.
    pub abi: JsonAbi,
    /// Creation (deployment) bytecode.
    pub bytecode: Bytes,
    /// Runtime bytecode.
    pub deployed_bytecode: Bytes,
    /// Link references of the creation bytecode.
    #[serde(default)]
    pub link_references: LinkReferences,
    /// Link references of the runtime bytecode.
    #[serde(default)]
    pub deployed_link_references: LinkReferences,
}

impl ContractArtifact {
    /// Reads and parses the artifact file at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|source| ArtifactError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_slice(&data)
            .map_err(|source| ArtifactError::Json { path: path.to_path_buf(), source })
    }

    /// Re-serializes just the ABI portion to a JSON string.
    ///
    /// Parsing the returned string yields an ABI equal to [`Self::abi`].
    pub fn abi_json(&self) -> Result<String, ArtifactError> {
        serde_json::to_string(&self.abi).map_err(|source| ArtifactError::AbiSerialization {
            contract: self.contract_name.clone(),
            source,
        })
    }

    /// Returns the function named `name`.
    ///
    /// If the ABI declares overloads, the first one is returned.
    pub fn function(&self, name: &str) -> Result<&Function, ArtifactError> {
        self.abi.function(name).and_then(|overloads| overloads.first()).ok_or_else(|| {
            ArtifactError::FunctionNotFound {
                contract: self.contract_name.clone(),
                function: name.to_string(),
            }
        })
    }

    /// Returns the overload of `name` that takes exactly `inputs` parameters.
    pub fn function_with_inputs(
        &self,
        name: &str,
        inputs: usize,
    ) -> Result<&Function, ArtifactError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.iter().find(|func| func.inputs.len() == inputs))
            .ok_or_else(|| ArtifactError::FunctionNotFound {
                contract: self.contract_name.clone(),
                function: format!("{name}/{inputs}"),
            })
    }

    /// Returns the constructor, if the contract declares one.
    pub fn constructor(&self) -> Option<&Constructor> {
        self.abi.constructor.as_ref()
    }

    /// Returns the event named `name`, if the ABI declares one.
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.abi.event(name).and_then(|overloads| overloads.first())
    }

    /// Whether the creation bytecode still references unlinked libraries.
    pub fn is_unlinked(&self) -> bool {
        !self.link_references.is_empty()
    }

    /// Names of the libraries the creation bytecode needs linked.
    pub fn unlinked_libraries(&self) -> Vec<String> {
        self.link_references.values().flat_map(|libs| libs.keys().cloned()).collect()
    }
}
