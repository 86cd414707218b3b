use crate::domain::operation::Operation;
use crate::foundation::{MultisigError, Prefix, Result, Said};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Credential registry owned by a (possibly group) identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub name: String,
    pub regk: Prefix,
    /// Owner prefix.
    pub pre: Prefix,
}

#[derive(Clone, Debug)]
pub struct CreateRegistryArgs {
    /// Alias of the owning identifier.
    pub name: String,
    pub registry_name: String,
    /// Members of a group must all use the same nonce to converge on one registry.
    pub nonce: String,
}

/// Registry inception plus the anchoring event signed by this agent.
#[derive(Clone, Debug)]
pub struct RegistryResult {
    pub regser: Value,
    pub serder: Value,
    pub sigs: Vec<String>,
    pub op: Operation,
}

/// Credential content handed to `issue`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialData {
    /// Registry key.
    pub ri: Prefix,
    /// Schema SAID.
    pub s: String,
    /// Attributes; `i` is the holder.
    pub a: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<Value>,
}

impl CredentialData {
    /// Recover the issuance input from an embedded ACDC, as received in an `/multisig/iss` exchange.
    pub fn from_acdc(acdc: &Value) -> Result<Self> {
        let object = acdc.as_object().ok_or_else(|| MultisigError::InvalidArgument("embedded acdc is not an object".to_string()))?;
        let field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| MultisigError::InvalidArgument(format!("embedded acdc is missing '{name}'")))
        };
        let attributes = object
            .get("a")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| MultisigError::InvalidArgument("embedded acdc is missing 'a'".to_string()))?;
        Ok(Self { ri: Prefix::new(field("ri")?), s: field("s")?.to_string(), a: attributes, r: object.get("r").cloned() })
    }

    pub fn holder(&self) -> Option<&str> {
        self.a.get("i").and_then(Value::as_str)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.a.get("dt").and_then(Value::as_str)
    }
}

/// Result of issuing a credential: the ACDC, its `iss` event and the anchoring `ixn`.
#[derive(Clone, Debug)]
pub struct IssueResult {
    pub acdc: Value,
    pub iss: Value,
    pub anc: Value,
    pub sigs: Vec<String>,
    pub op: Operation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub sad: Value,
    pub status: CredentialStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Pending,
    Issued,
}

impl Credential {
    pub fn said(&self) -> Option<Said> {
        self.sad.get("d").and_then(Value::as_str).map(Said::new)
    }
}
