use crate::foundation::OperationName;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Handle to an asynchronous action on the identity service.
///
/// `done` flips from false to true exactly once. A done operation carries either a
/// `response` or an `error`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: OperationName,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OperationMetadata>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// Prerequisite that must complete before this operation can.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends: Option<Box<Operation>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    pub code: u16,
    pub message: String,
}

impl Operation {
    pub fn pending(name: impl Into<OperationName>) -> Self {
        Self { name: name.into(), done: false, error: None, response: None, metadata: None }
    }

    pub fn completed(name: impl Into<OperationName>, response: Value) -> Self {
        Self { name: name.into(), done: true, error: None, response: Some(response), metadata: None }
    }

    pub fn with_depends(mut self, depends: Operation) -> Self {
        self.metadata.get_or_insert_with(OperationMetadata::default).depends = Some(Box::new(depends));
        self
    }

    pub fn depends(&self) -> Option<&Operation> {
        self.metadata.as_ref().and_then(|meta| meta.depends.as_deref())
    }

    /// The operation kind, i.e. the part of the name before the first `.`.
    pub fn kind(&self) -> &str {
        self.name.split('.').next().unwrap_or_default()
    }
}
