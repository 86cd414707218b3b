//! Composition of the key events the group workflows produce.

use crate::domain::event::seal::SealEvent;
use crate::domain::event::{ACDC_PROTOCOL, KERI_PROTOCOL};
use crate::foundation::util::{saidify_fields, DUMMY_SAID};
use crate::foundation::{Prefix, Result, Said};
use serde_json::{json, Value};

/// Fill in the version string (with the serialized size) and the SAID fields.
pub fn versioned(protocol: &str, body: Value, labels: &[&str]) -> Result<(Said, Value)> {
    let mut sized = body;
    if let Some(object) = sized.as_object_mut() {
        object.insert("v".to_string(), Value::String(version_string(protocol, 0)));
        for label in labels {
            object.insert((*label).to_string(), Value::String(DUMMY_SAID.to_string()));
        }
    }
    let size = serde_json::to_vec(&sized)?.len();
    if let Some(object) = sized.as_object_mut() {
        object.insert("v".to_string(), Value::String(version_string(protocol, size)));
    }
    saidify_fields(&sized, labels)
}

pub fn version_string(protocol: &str, size: usize) -> String {
    format!("{protocol}10JSON{size:06x}_")
}

fn hex(value: usize) -> String {
    format!("{value:x}")
}

#[derive(Clone, Debug)]
pub struct InceptionParams {
    pub keys: Vec<String>,
    pub isith: usize,
    pub next_digests: Vec<String>,
    pub nsith: usize,
    pub wits: Vec<String>,
    pub toad: usize,
}

/// Inception event whose prefix is its own digest.
pub fn incept(params: &InceptionParams) -> Result<(Said, Value)> {
    let body = json!({
        "t": "icp",
        "s": "0",
        "kt": hex(params.isith),
        "k": params.keys,
        "nt": hex(params.nsith),
        "n": params.next_digests,
        "bt": hex(params.toad),
        "b": params.wits,
        "c": [],
        "a": [],
    });
    versioned(KERI_PROTOCOL, body, &["d", "i"])
}

#[derive(Clone, Debug)]
pub struct RotationParams {
    pub prefix: Prefix,
    pub sn: u64,
    pub prior: Said,
    pub keys: Vec<String>,
    pub isith: usize,
    pub next_digests: Vec<String>,
    pub nsith: usize,
    pub toad: usize,
}

pub fn rotate(params: &RotationParams) -> Result<(Said, Value)> {
    let body = json!({
        "t": "rot",
        "i": params.prefix,
        "s": format!("{:x}", params.sn),
        "p": params.prior,
        "kt": hex(params.isith),
        "k": params.keys,
        "nt": hex(params.nsith),
        "n": params.next_digests,
        "bt": hex(params.toad),
        "br": [],
        "ba": [],
        "a": [],
    });
    versioned(KERI_PROTOCOL, body, &["d"])
}

/// Interaction event anchoring `seals`.
pub fn interact(prefix: &Prefix, sn: u64, prior: &Said, seals: Vec<Value>) -> Result<(Said, Value)> {
    let body = json!({
        "t": "ixn",
        "i": prefix,
        "s": format!("{sn:x}"),
        "p": prior,
        "a": seals,
    });
    versioned(KERI_PROTOCOL, body, &["d"])
}

/// `/end/role/add` reply authorising `eid` in `role` for `cid`.
pub fn reply(cid: &Prefix, role: &str, eid: &Prefix, dt: &str) -> Result<(Said, Value)> {
    let body = json!({
        "t": "rpy",
        "dt": dt,
        "r": "/end/role/add",
        "a": { "cid": cid, "role": role, "eid": eid },
    });
    versioned(KERI_PROTOCOL, body, &["d"])
}

/// Credential registry inception (`vcp`); the registry key is its digest.
pub fn registry_incept(issuer: &Prefix, nonce: &str) -> Result<(Said, Value)> {
    let body = json!({
        "t": "vcp",
        "ii": issuer,
        "s": "0",
        "c": ["NB"],
        "bt": "0",
        "b": [],
        "n": nonce,
    });
    versioned(KERI_PROTOCOL, body, &["d", "i"])
}

/// Credential issuance (`iss`) in registry `regk`.
pub fn issue(credential: &Said, regk: &Prefix, dt: &str) -> Result<(Said, Value)> {
    let body = json!({
        "t": "iss",
        "i": credential,
        "s": "0",
        "ri": regk,
        "dt": dt,
    });
    versioned(KERI_PROTOCOL, body, &["d"])
}

/// ACDC body; the attribute block gets its own SAID first.
pub fn acdc(issuer: &Prefix, regk: &Prefix, schema: &str, attributes: &Value, rules: Option<&Value>) -> Result<(Said, Value)> {
    let (_, attributes) = saidify_fields(attributes, &["d"])?;
    let mut body = json!({
        "i": issuer,
        "ri": regk,
        "s": schema,
        "a": attributes,
    });
    if let (Some(rules), Some(object)) = (rules, body.as_object_mut()) {
        object.insert("r".to_string(), rules.clone());
    }
    versioned(ACDC_PROTOCOL, body, &["d"])
}

/// Seal anchoring event `d` at `s` of `i`.
pub fn anchor_seal(i: &str, s: &str, d: &Said) -> Value {
    SealEvent { i: Prefix::new(i), s: s.to_string(), d: d.clone() }.to_value()
}
