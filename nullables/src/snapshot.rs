//! JSON snapshot of the warehouse tables the reporting layer reads.

use serde::{Deserialize, Serialize};
use stakeview_store::{DelegationRecord, StoreError, ValidatorDescriptor, VoteRecord};
use std::path::Path;

/// All revisions of every table, as dumped from the indexer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub delegations: Vec<DelegationRecord>,
    #[serde(default)]
    pub votes: Vec<VoteRecord>,
    #[serde(default)]
    pub validators: Vec<ValidatorDescriptor>,
}

impl RecordSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Backend(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, StoreError> {
        serde_json::from_str(s).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
