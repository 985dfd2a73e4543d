//! Loading of compiled contract artifacts.
//!
//! Both the Hardhat layout (`"bytecode": "0x..."`) and the Foundry layout
//! (`"bytecode": { "object": "0x..." }`) are accepted.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::{constants::JSON_EXTENSION, errors::ScriptError};

/// A compiled contract, as needed to deploy it
#[derive(Clone, Debug, PartialEq)]
pub struct ContractArtifact {
    /// The contract name
    pub name: String,
    /// The contract ABI, kept as raw JSON for the deployment record
    pub abi: Value,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

/// The on-disk shape of an artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    /// Present in Hardhat artifacts only
    #[serde(default)]
    contract_name: Option<String>,
    /// The contract ABI
    abi: Value,
    /// The creation bytecode
    bytecode: RawBytecode,
}

/// Creation bytecode, either inline hex or a Foundry bytecode object
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat: a hex string
    Hex(String),
    /// Foundry: `{ "object": "0x...", ... }`
    Object {
        /// The hex-encoded bytecode
        object: String,
    },
}

impl ContractArtifact {
    /// Parse an artifact from its JSON contents
    pub fn from_json(name: &str, json: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: {e}")))?;

        let hex = match raw.bytecode {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        };
        if hex.contains("__$") {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name}: bytecode has unlinked library references"
            )));
        }

        let bytecode: Bytes = hex
            .parse()
            .map_err(|e| ScriptError::ArtifactParsing(format!("{name}: invalid bytecode: {e}")))?;
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{name}: no creation bytecode, is it abstract or an interface?"
            )));
        }

        Ok(Self {
            name: raw.contract_name.unwrap_or_else(|| name.to_string()),
            abi: raw.abi,
            bytecode,
        })
    }

    /// The number of constructor parameters declared in the ABI
    pub fn constructor_arity(&self) -> usize {
        self.abi
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item["type"] == "constructor")
                    .and_then(|ctor| ctor["inputs"].as_array())
                    .map(Vec::len)
            })
            .unwrap_or(0)
    }
}

/// A directory of compilation artifacts
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    /// The root of the artifacts directory
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store over the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the artifact for the named contract.
    ///
    /// Looks for `<dir>/<name>.json` first, then searches the directory tree,
    /// where Hardhat and Foundry nest artifacts under `<File>.sol/<name>.json`.
    pub fn load(&self, name: &str) -> Result<ContractArtifact, ScriptError> {
        let file_name = format!("{name}.{JSON_EXTENSION}");
        let direct = self.dir.join(&file_name);
        let path = if direct.is_file() {
            direct
        } else {
            find_file(&self.dir, &file_name)?.ok_or_else(|| {
                ScriptError::ReadArtifact(format!(
                    "no artifact named {file_name} under {}",
                    self.dir.display()
                ))
            })?
        };

        let json = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ReadArtifact(format!("{}: {e}", path.display())))?;
        ContractArtifact::from_json(name, &json)
    }
}

/// Depth-first search for a file with the given name
fn find_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, ScriptError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return Err(ScriptError::ReadArtifact(format!("{}: {e}", dir.display()))),
    };

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ReadArtifact(e.to_string()))?
            .path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name().is_some_and(|n| n == file_name) {
            return Ok(Some(path));
        }
    }

    // Sorted so the search is deterministic across platforms
    subdirs.sort();
    for subdir in subdirs {
        if let Some(found) = find_file(&subdir, file_name)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
