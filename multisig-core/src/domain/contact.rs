use crate::foundation::{MultisigError, Prefix, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Known remote identifier, keyed by prefix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Prefix,
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oobi: Option<String>,
    /// Free-form attributes such as a group tag.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Contact {
    pub fn new(id: Prefix, alias: impl Into<String>) -> Self {
        Self { id, alias: alias.into(), oobi: None, metadata: Map::new() }
    }

    /// Copy every key of `snapshot` that is missing or different here.
    ///
    /// Returns the keys that had to be re-applied.
    pub fn merge_metadata(&mut self, snapshot: &Map<String, Value>) -> Vec<String> {
        let mut restored = Vec::new();
        for (key, value) in snapshot {
            if self.metadata.get(key) != Some(value) {
                self.metadata.insert(key.clone(), value.clone());
                restored.push(key.clone());
            }
        }
        restored
    }
}

/// Prefix an OOBI URL introduces: the path segment after `oobi`.
pub fn oobi_prefix(oobi: &str) -> Result<Prefix> {
    oobi.split('/')
        .skip_while(|segment| *segment != "oobi")
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .map(Prefix::new)
        .ok_or_else(|| MultisigError::InvalidArgument(format!("not an oobi url: {oobi}")))
}
