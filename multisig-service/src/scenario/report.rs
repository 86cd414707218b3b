use multisig_core::domain::Contact;
use multisig_core::foundation::Prefix;
use serde::Serialize;
use std::collections::BTreeMap;

/// Final state of a scenario, keyed by member alias.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub group_prefixes: BTreeMap<String, Prefix>,
    pub registries: BTreeMap<String, usize>,
    pub credentials: BTreeMap<String, usize>,
    /// Contacts of the observing member, for the contact scenarios.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<Contact>,
}

impl ScenarioReport {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self { scenario: scenario.into(), ..Self::default() }
    }

    /// True when every member reports the same, non-empty set of group prefixes.
    pub fn converged(&self) -> bool {
        let mut prefixes = self.group_prefixes.values();
        match prefixes.next() {
            Some(first) => prefixes.all(|prefix| prefix == first),
            None => false,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "members={} converged={} registries={:?} credentials={:?} contacts={}",
            self.group_prefixes.len(),
            self.converged(),
            self.registries.values().collect::<Vec<_>>(),
            self.credentials.values().collect::<Vec<_>>(),
            self.contacts.len()
        )
    }
}
