use std::{io, path::PathBuf};

/// Errors that can occur while loading or querying a contract artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The artifact file could not be opened or read.
    #[error("failed to read artifact at {}", path.display())]
    Io {
        /// Path of the artifact file.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The artifact file is not valid JSON, or does not match the Hardhat
    /// artifact schema.
    #[error("failed to parse artifact at {}", path.display())]
    Json {
        /// Path of the artifact file.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The ABI portion of an artifact could not be re-serialized.
    #[error("failed to serialize the ABI of `{contract}`")]
    AbiSerialization {
        /// Contract the ABI belongs to.
        contract: String,
        #[source]
        source: serde_json::Error,
    },
    /// A function was looked up by name but the ABI does not declare it.
    #[error("function `{function}` not found in the ABI of `{contract}`")]
    FunctionNotFound {
        /// Contract whose ABI was searched.
        contract: String,
        /// The requested function name.
        function: String,
    },
    /// The creation bytecode still contains unresolved library placeholders
    /// and cannot be deployed as-is.
    #[error("`{contract}` requires linking: {}", libraries.join(", "))]
    Unlinked {
        /// Contract whose bytecode is unlinked.
        contract: String,
        /// The libraries that need to be linked.
        libraries: Vec<String>,
    },
}
