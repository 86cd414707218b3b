use crate::foundation::Prefix;
use std::collections::HashSet;

/// One member signature over a proposed group event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub member: Prefix,
    /// Position of the member's key in the event's key list.
    pub index: usize,
    /// The member's current key at signing time.
    pub key: String,
}

/// Returns true if at least `required` distinct members signed with the key the event lists for them.
///
/// A signature made with a key that differs from the event's entry at that index does
/// not count; this is how a proposal composed from stale key state fails to converge.
pub fn has_threshold(contributions: &[Contribution], event_keys: &[String], required: usize) -> bool {
    if required == 0 || contributions.len() < required {
        return false;
    }
    let valid: HashSet<&Prefix> = contributions
        .iter()
        .filter(|c| event_keys.get(c.index).map_or(false, |key| key == &c.key))
        .map(|c| &c.member)
        .collect();
    valid.len() >= required
}
