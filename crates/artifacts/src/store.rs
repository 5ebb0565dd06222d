use crate::{ArtifactError, ContractArtifact};
use std::path::{Path, PathBuf};

/// Locates and loads contract artifacts below a root directory.
///
/// The artifact for contract `Name` is expected at `<root>/Name.json`. The
/// store performs no caching; every lookup re-reads the file.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory artifacts are loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path the artifact for `name` is expected at.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name).with_extension("json")
    }

    /// Loads the artifact for `name`.
    pub fn get(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let artifact = ContractArtifact::read(self.path(name))?;
        trace!(name, source = %artifact.source_name, "loaded artifact");
        Ok(artifact)
    }

    /// Loads the artifact for `name`, rejecting bytecode that still needs
    /// library linking.
    pub fn get_deployable(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
        let artifact = self.get(name)?;
        if artifact.is_unlinked() {
            return Err(ArtifactError::Unlinked {
                contract: artifact.contract_name,
                libraries: artifact.unlinked_libraries(),
            });
        }
        Ok(artifact)
    }
}
