//! Facet interfaces read from compiled contract artifacts.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alloy::json_abi::ContractObject;
use diamond_upgrade::{reader::ContractInterfaceProvider, FacetInterface};

/// Failure to obtain a facet interface from compiled artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// No `<name>.json` artifact exists under the artifacts root.
    #[error("artifact `{name}.json` not found under {}", root.display())]
    NotFound {
        /// Contract name.
        name: String,
        /// Artifacts root that was searched.
        root: PathBuf,
    },
    /// More than one artifact carries the contract name.
    #[error("artifact `{name}.json` is ambiguous: {paths:?}")]
    Ambiguous {
        /// Contract name.
        name: String,
        /// Every matching path.
        paths: Vec<PathBuf>,
    },
    /// The artifacts tree or file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The artifact is not valid JSON or carries a malformed ABI.
    #[error("failed to parse artifact {}", path.display())]
    Parse {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Reads facet interfaces from hardhat-style artifacts
/// (`<root>/**/<Name>.sol/<Name>.json`).
#[derive(Clone, Debug)]
pub struct ArtifactInterfaceProvider {
    root: PathBuf,
}

impl ArtifactInterfaceProvider {
    /// Creates a provider searching artifacts under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locates the artifact of contract `name`.
    ///
    /// # Errors
    ///
    /// If the artifact is missing, ambiguous or the tree is unreadable.
    pub fn artifact_path(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let file_name = format!("{name}.json");
        let mut paths = Vec::new();
        find_files(&self.root, &file_name, &mut paths)?;

        match paths.len() {
            0 => Err(ArtifactError::NotFound {
                name: name.to_owned(),
                root: self.root.clone(),
            }),
            1 => Ok(paths.remove(0)),
            _ => {
                paths.sort();
                Err(ArtifactError::Ambiguous { name: name.to_owned(), paths })
            }
        }
    }
}

impl ContractInterfaceProvider for ArtifactInterfaceProvider {
    type Error = ArtifactError;

    fn interface(
        &self,
        facet_name: &str,
    ) -> Result<FacetInterface, Self::Error> {
        let path = self.artifact_path(facet_name)?;
        let raw = fs::read_to_string(&path).map_err(|source| {
            ArtifactError::Io { path: path.clone(), source }
        })?;
        let artifact: ContractObject =
            serde_json::from_str(&raw).map_err(|source| {
                ArtifactError::Parse { path: path.clone(), source }
            })?;

        let interface: FacetInterface = artifact
            .abi
            .iter()
            .flat_map(|abi| abi.functions())
            .map(alloy::json_abi::Function::signature)
            .collect();

        tracing::debug!(
            facet = facet_name,
            path = %path.display(),
            functions = interface.signatures().len(),
            "loaded facet interface"
        );

        Ok(interface)
    }
}

/// Collects every file called `file_name` below `dir`, skipping `build-info`
/// and debug artifacts.
fn find_files(
    dir: &Path,
    file_name: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), ArtifactError> {
    let io_error =
        |source| ArtifactError::Io { path: dir.to_path_buf(), source };

    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            if path.file_name().is_some_and(|name| name == "build-info") {
                continue;
            }
            find_files(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|name| name == file_name) {
            found.push(path);
        }
    }

    Ok(())
}
