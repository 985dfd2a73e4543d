//! Persistence of deployment records, one JSON file per contract under a
//! per-chain directory

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use alloy::primitives::{Address, TxHash, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{constants::JSON_EXTENSION, errors::ScriptError, types::Deployment};

/// What is recorded about a deployed contract
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// The address of the contract
    pub address: Address,
    /// The constructor arguments, formatted for display
    #[serde(default)]
    pub args: Vec<String>,
    /// The keccak-256 hash of the creation bytecode and encoded arguments
    pub init_code_hash: B256,
    /// The hash of the deployment transaction
    #[serde(default)]
    pub transaction_hash: Option<TxHash>,
    /// The contract ABI
    #[serde(default)]
    pub abi: Value,
}

impl DeploymentRecord {
    /// Convert the record into a deployment handle
    pub fn into_deployment(self, name: &str, newly_deployed: bool) -> Deployment {
        Deployment {
            name: name.to_string(),
            address: self.address,
            args: self.args,
            transaction_hash: self.transaction_hash,
            newly_deployed,
        }
    }
}

/// The deployment records of a single chain
#[derive(Clone, Debug)]
pub struct DeploymentStore {
    /// The directory holding this chain's records
    dir: PathBuf,
}

impl DeploymentStore {
    /// The store for the given chain under the deployments root
    pub fn for_chain(root: impl AsRef<Path>, chain_id: u64) -> Self {
        Self {
            dir: root.as_ref().join(chain_id.to_string()),
        }
    }

    /// The directory holding this chain's records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The path of the record for the named contract
    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{JSON_EXTENSION}"))
    }

    /// Read the record for the named contract, `None` if nothing is recorded
    pub fn read(&self, name: &str) -> Result<Option<DeploymentRecord>, ScriptError> {
        let path = self.record_path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ScriptError::ReadDeployments(format!("{}: {e}", path.display())))
            },
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| ScriptError::ReadDeployments(format!("{}: {e}", path.display())))
    }

    /// Read the record for the named contract, failing if nothing is recorded
    pub fn require(&self, name: &str) -> Result<DeploymentRecord, ScriptError> {
        self.read(name)?
            .ok_or_else(|| ScriptError::MissingDeployment(name.to_string()))
    }

    /// Write the record for the named contract, replacing any previous one
    pub fn write(&self, name: &str, record: &DeploymentRecord) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| ScriptError::WriteDeployments(format!("{}: {e}", self.dir.display())))?;

        let path = self.record_path(name);
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| ScriptError::WriteDeployments(format!("{}: {e}", path.display())))
    }

    /// All records of this chain, sorted by contract name
    pub fn list(&self) -> Result<Vec<(String, DeploymentRecord)>, ScriptError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ScriptError::ReadDeployments(format!("{}: {e}", self.dir.display())))
            },
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
                .path();
            if path.extension().is_some_and(|ext| ext == JSON_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();

        names
            .into_iter()
            .map(|name| {
                let record = self.require(&name)?;
                Ok((name, record))
            })
            .collect()
    }
}
