use crate::domain::operation::Operation;
use crate::foundation::{MultisigError, Prefix, Result, Said};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Snapshot of an identifier's key state as seen by one agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    #[serde(rename = "i")]
    pub prefix: Prefix,
    /// Sequence number, lowercase hex.
    #[serde(rename = "s")]
    pub sequence: String,
    #[serde(rename = "d")]
    pub digest: Said,
    /// Prior event digest; empty at inception.
    #[serde(rename = "p", default)]
    pub prior: String,
    #[serde(rename = "et")]
    pub event_type: String,
    #[serde(rename = "kt")]
    pub signing_threshold: String,
    #[serde(rename = "k")]
    pub keys: Vec<String>,
    #[serde(rename = "nt")]
    pub next_threshold: String,
    #[serde(rename = "n")]
    pub next_digests: Vec<String>,
    #[serde(rename = "bt")]
    pub witness_threshold: String,
    #[serde(rename = "b")]
    pub witnesses: Vec<String>,
    /// Latest establishment event.
    pub ee: EstablishmentState,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentState {
    #[serde(rename = "s")]
    pub sequence: String,
    #[serde(rename = "d")]
    pub digest: Said,
}

impl KeyState {
    pub fn sn(&self) -> Result<u64> {
        parse_hex_sn(&self.sequence)
    }

    pub fn threshold(&self) -> Result<usize> {
        parse_threshold(&self.signing_threshold)
    }
}

pub fn parse_hex_sn(value: &str) -> Result<u64> {
    u64::from_str_radix(value, 16).map_err(|err| MultisigError::InvalidArgument(format!("sequence number '{value}': {err}")))
}

pub fn parse_threshold(value: &str) -> Result<usize> {
    usize::from_str_radix(value, 16).map_err(|err| MultisigError::InvalidArgument(format!("threshold '{value}': {err}")))
}

/// Locally named identifier record ("habitat").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub prefix: Prefix,
    pub state: KeyState,
    #[serde(default = "default_transferable")]
    pub transferable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupInfo>,
}

fn default_transferable() -> bool {
    true
}

/// Group section of a group identifier record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// The local member identifier that signs on behalf of this agent.
    pub mhab: Box<Identifier>,
    pub keys: Vec<String>,
    pub ndigs: Vec<String>,
}

impl Identifier {
    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    /// The local identifier that contributes signatures: the member for a group, self otherwise.
    pub fn signing_member(&self) -> &Identifier {
        match &self.group {
            Some(group) => group.mhab.as_ref(),
            None => self,
        }
    }
}

/// Signing and rotation members of a group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Members {
    pub signing: Vec<Member>,
    pub rotation: Vec<Member>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub aid: Prefix,
    /// role -> endpoint id -> endpoint locations.
    #[serde(default)]
    pub ends: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Member {
    pub fn end_ids(&self, role: &str) -> Vec<Prefix> {
        self.ends.get(role).map(|ends| ends.keys().map(|eid| Prefix::new(eid.as_str())).collect()).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndRole {
    pub cid: Prefix,
    pub role: String,
    pub eid: Prefix,
}

/// Parameters of a new identifier; `group` turns it into a group inception.
#[derive(Clone, Debug, Default)]
pub struct CreateIdentifierArgs {
    pub transferable: bool,
    pub wits: Vec<String>,
    pub toad: usize,
    pub group: Option<GroupInceptArgs>,
}

#[derive(Clone, Debug)]
pub struct GroupInceptArgs {
    pub mhab: Identifier,
    pub isith: usize,
    pub nsith: usize,
    /// Signing member states, in member order.
    pub states: Vec<KeyState>,
    /// Rotation member states, in member order.
    pub rstates: Vec<KeyState>,
}

/// Member states for a group rotation; empty for a local rotation.
#[derive(Clone, Debug, Default)]
pub struct RotateArgs {
    pub states: Vec<KeyState>,
    pub rstates: Vec<KeyState>,
    /// Keeps the current thresholds when unset.
    pub isith: Option<usize>,
    pub nsith: Option<usize>,
}

/// A composed key event with this agent's signatures and the operation tracking it.
#[derive(Clone, Debug)]
pub struct EventResult {
    pub serder: Value,
    pub sigs: Vec<String>,
    pub op: Operation,
}

/// Request to countersign a group rotation received from another member.
#[derive(Clone, Debug)]
pub struct JoinGroupArgs {
    pub group_alias: String,
    pub mhab: Identifier,
    pub rot: Value,
    pub gid: Prefix,
    pub smids: Vec<Prefix>,
    pub rmids: Vec<Prefix>,
}
