//! vLEI credential builders.

use crate::domain::registry::CredentialData;
use crate::foundation::constants::{QVI_SCHEMA_SAID, VLEI_ISSUANCE_DISCLAIMER, VLEI_USAGE_DISCLAIMER};
use crate::foundation::util::saidify;
use crate::foundation::{Prefix, Result};
use serde_json::{json, Map, Value};

#[derive(Clone, Debug)]
pub struct CredentialConfig {
    pub registry: Prefix,
    pub holder: Prefix,
    pub issuer: Prefix,
    pub timestamp: String,
    pub lei: String,
}

pub type QviCredentialConfig = CredentialConfig;

/// Qualified vLEI Issuer credential data.
pub fn qvi_credential(config: &QviCredentialConfig) -> Result<CredentialData> {
    let mut attributes = Map::new();
    attributes.insert("dt".to_string(), Value::String(config.timestamp.clone()));
    attributes.insert("i".to_string(), Value::String(config.holder.to_string()));
    attributes.insert("LEI".to_string(), Value::String(config.lei.clone()));

    let (_, rules) = saidify(
        &json!({
            "d": "",
            "usageDisclaimer": { "l": VLEI_USAGE_DISCLAIMER },
            "issuanceDisclaimer": { "l": VLEI_ISSUANCE_DISCLAIMER },
        }),
        "d",
    )?;

    Ok(CredentialData { ri: config.registry.clone(), s: QVI_SCHEMA_SAID.to_string(), a: attributes, r: Some(rules) })
}
