use crate::domain::event::{event_ilk, event_prefix, event_said, field_str, string_list};
use crate::domain::identifier::{EstablishmentState, KeyState};
use crate::foundation::{MultisigError, Result};
use serde_json::Value;

/// Key state after applying `event` on top of `prior` (`None` for inception).
pub fn next_state(event: &Value, prior: Option<&KeyState>) -> Result<KeyState> {
    let ilk = event_ilk(event)?;
    let digest = event_said(event)?;
    let sequence = field_str(event, "s")?.to_string();
    match (ilk, prior) {
        ("icp", _) => Ok(KeyState {
            prefix: event_prefix(event)?,
            sequence: sequence.clone(),
            digest: digest.clone(),
            prior: String::new(),
            event_type: ilk.to_string(),
            signing_threshold: field_str(event, "kt")?.to_string(),
            keys: string_list(event, "k"),
            next_threshold: field_str(event, "nt")?.to_string(),
            next_digests: string_list(event, "n"),
            witness_threshold: field_str(event, "bt")?.to_string(),
            witnesses: string_list(event, "b"),
            ee: EstablishmentState { sequence, digest },
        }),
        ("rot", Some(prior)) => Ok(KeyState {
            prefix: prior.prefix.clone(),
            sequence: sequence.clone(),
            digest: digest.clone(),
            prior: prior.digest.to_string(),
            event_type: ilk.to_string(),
            signing_threshold: field_str(event, "kt")?.to_string(),
            keys: string_list(event, "k"),
            next_threshold: field_str(event, "nt")?.to_string(),
            next_digests: string_list(event, "n"),
            witness_threshold: field_str(event, "bt")?.to_string(),
            witnesses: prior.witnesses.clone(),
            ee: EstablishmentState { sequence, digest },
        }),
        ("ixn", Some(prior)) => Ok(KeyState {
            sequence,
            digest,
            prior: prior.digest.to_string(),
            event_type: ilk.to_string(),
            ..prior.clone()
        }),
        (other, _) => Err(MultisigError::InvalidArgument(format!("cannot derive key state from '{other}' event"))),
    }
}
