use crate::domain::identifier::Identifier;
use crate::foundation::{Prefix, Said};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a specific establishment event of an identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealEvent {
    pub i: Prefix,
    pub s: String,
    pub d: Said,
}

impl SealEvent {
    /// Seal to the latest establishment event of `hab`.
    pub fn latest_establishment(hab: &Identifier) -> Self {
        Self { i: hab.prefix.clone(), s: hab.state.ee.sequence.clone(), d: hab.state.ee.digest.clone() }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({ "i": self.i, "s": self.s, "d": self.d })
    }
}
