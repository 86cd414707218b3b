//! Self-addressing identifiers.
//!
//! A SAID is the Blake3-256 digest of a JSON body whose SAID fields were filled with a
//! placeholder of the final length. Rendered as 44 base64url characters led by the `E` code.

use crate::foundation::constants::{BLAKE3_DIGEST_CODE, SAID_LENGTH};
use crate::foundation::{MultisigError, Result, Said};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

/// Placeholder written into SAID fields before digesting.
pub const DUMMY_SAID: &str = "############################################";

pub fn digest_said(raw: &[u8]) -> Said {
    let hash = blake3::hash(raw);
    let mut padded = Vec::with_capacity(33);
    padded.push(0u8);
    padded.extend_from_slice(hash.as_bytes());
    let encoded = URL_SAFE_NO_PAD.encode(&padded);
    Said::new(format!("{BLAKE3_DIGEST_CODE}{}", &encoded[1..]))
}

/// Compute the SAID of `value` over `labels` and return it with the filled-in body.
///
/// Every label receives the same digest, which is how inception events make the
/// prefix equal to the event digest.
pub fn saidify_fields(value: &Value, labels: &[&str]) -> Result<(Said, Value)> {
    let mut sad = value.clone();
    let object = sad.as_object_mut().ok_or_else(|| MultisigError::InvalidArgument("only JSON objects can be saidified".to_string()))?;
    for label in labels {
        object.insert((*label).to_string(), Value::String(DUMMY_SAID.to_string()));
    }
    let raw = serde_json::to_vec(&sad)?;
    let said = digest_said(&raw);
    debug_assert_eq!(said.len(), SAID_LENGTH);
    if let Some(object) = sad.as_object_mut() {
        for label in labels {
            object.insert((*label).to_string(), Value::String(said.to_string()));
        }
    }
    Ok((said, sad))
}

pub fn saidify(value: &Value, label: &str) -> Result<(Said, Value)> {
    saidify_fields(value, &[label])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn said_has_code_and_length() {
        let said = digest_said(b"hello");
        assert_eq!(said.len(), SAID_LENGTH);
        assert!(said.starts_with('E'));
        assert_eq!(DUMMY_SAID.len(), SAID_LENGTH);
    }

    #[test]
    fn saidify_ignores_previous_said_value() {
        let (first, filled) = saidify(&json!({ "d": "", "x": 1 }), "d").unwrap();
        let (second, _) = saidify(&filled, "d").unwrap();
        assert_eq!(first, second);
        assert_eq!(filled["d"], first.as_str());
    }

    #[test]
    fn saidify_fields_sets_every_label() {
        let (said, sad) = saidify_fields(&json!({ "d": "", "i": "", "s": "0" }), &["d", "i"]).unwrap();
        assert_eq!(sad["i"], said.as_str());
        assert_eq!(sad["d"], sad["i"]);
    }

    #[test]
    fn saidify_rejects_non_objects() {
        assert!(saidify(&json!([1, 2]), "d").is_err());
    }
}
