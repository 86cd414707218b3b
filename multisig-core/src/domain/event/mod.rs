//! Key events, seals and signature attachments.
//!
//! Events stay in their wire shape (`serde_json::Value`); the helpers here read the
//! handful of fields the orchestration layer cares about.

pub mod attachment;
pub mod builder;
pub mod seal;
pub mod state;

pub use attachment::{messagize, signature_counter};
pub use builder::{incept, interact, registry_incept, reply, rotate, InceptionParams, RotationParams};
pub use seal::SealEvent;
pub use state::next_state;

use crate::foundation::{MultisigError, Prefix, Result, Said};
use serde_json::Value;

pub const KERI_PROTOCOL: &str = "KERI";
pub const ACDC_PROTOCOL: &str = "ACDC";

pub fn field_str<'a>(event: &'a Value, field: &str) -> Result<&'a str> {
    event
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| MultisigError::InvalidArgument(format!("event is missing string field '{field}'")))
}

/// Event digest (`d`).
pub fn event_said(event: &Value) -> Result<Said> {
    field_str(event, "d").map(Said::new)
}

/// Controller prefix (`i`).
pub fn event_prefix(event: &Value) -> Result<Prefix> {
    field_str(event, "i").map(Prefix::new)
}

/// Event type (`t`), e.g. `icp`, `rot`, `ixn`, `rpy`.
pub fn event_ilk(event: &Value) -> Result<&str> {
    field_str(event, "t")
}

pub fn event_sn(event: &Value) -> Result<u64> {
    crate::domain::identifier::parse_hex_sn(field_str(event, "s")?)
}

pub fn string_list(event: &Value, field: &str) -> Vec<String> {
    event
        .get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}
