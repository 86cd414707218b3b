use crate::foundation::{Prefix, Said};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Exchange message routes used between group members.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Icp,
    Rot,
    Rpy,
    Vcp,
    Iss,
    Exn,
    IpexGrant,
    Unknown(String),
}

impl Route {
    pub fn as_str(&self) -> &str {
        match self {
            Route::Icp => "/multisig/icp",
            Route::Rot => "/multisig/rot",
            Route::Rpy => "/multisig/rpy",
            Route::Vcp => "/multisig/vcp",
            Route::Iss => "/multisig/iss",
            Route::Exn => "/multisig/exn",
            Route::IpexGrant => "/ipex/grant",
            Route::Unknown(route) => route,
        }
    }

    pub fn parse(route: &str) -> Self {
        match route {
            "/multisig/icp" => Route::Icp,
            "/multisig/rot" => Route::Rot,
            "/multisig/rpy" => Route::Rpy,
            "/multisig/vcp" => Route::Vcp,
            "/multisig/iss" => Route::Iss,
            "/multisig/exn" => Route::Exn,
            "/ipex/grant" => Route::IpexGrant,
            other => Route::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let route = String::deserialize(deserializer)?;
        Ok(Route::parse(&route))
    }
}

/// One embedded event and its attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct Embed {
    pub sad: Value,
    pub atc: String,
}

impl Embed {
    pub fn new(sad: Value, atc: impl Into<String>) -> Self {
        Self { sad, atc: atc.into() }
    }
}

/// What a member hands to the exchange service.
#[derive(Clone, Debug)]
pub struct ExchangeRequest {
    /// Alias of the local member identifier that signs the message.
    pub sender_alias: String,
    pub topic: String,
    pub route: Route,
    /// Header fields such as `gid`, `smids` and `rmids`.
    pub payload: Map<String, Value>,
    pub embeds: BTreeMap<String, Embed>,
    pub recipients: Vec<Prefix>,
}

/// `exn` envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeMessage {
    #[serde(rename = "d")]
    pub said: Said,
    /// Sender prefix.
    #[serde(rename = "i")]
    pub sender: Prefix,
    #[serde(rename = "dt")]
    pub timestamp: String,
    #[serde(rename = "r")]
    pub route: Route,
    #[serde(rename = "a", default)]
    pub payload: Map<String, Value>,
    /// Embedded events by label, plus their own `d` digest.
    #[serde(rename = "e", default)]
    pub embeds: Map<String, Value>,
}

/// Stored exchange as returned to recipients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub exn: ExchangeMessage,
    /// Attachment per embed label.
    #[serde(default)]
    pub pathed: BTreeMap<String, String>,
}

impl Exchange {
    pub fn route(&self) -> &Route {
        &self.exn.route
    }

    pub fn embed(&self, label: &str) -> Option<&Value> {
        self.exn.embeds.get(label)
    }

    pub fn header_prefixes(&self, field: &str) -> Vec<Prefix> {
        self.exn
            .payload
            .get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).map(Prefix::new).collect())
            .unwrap_or_default()
    }

    pub fn header_str(&self, field: &str) -> Option<&str> {
        self.exn.payload.get(field).and_then(Value::as_str)
    }
}
