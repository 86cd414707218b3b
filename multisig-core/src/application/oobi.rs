//! Contact discovery through OOBI URLs.

use crate::application::abort::AbortSignal;
use crate::application::awaiter::WaitOptions;
use crate::application::participant::Participant;
use crate::domain::{oobi_prefix, Contact};
use crate::foundation::constants::AGENT_ROLE;
use crate::foundation::{MultisigError, Prefix, Result};
use log::{info, warn};
use serde_json::{Map, Value};
use std::time::Duration;

impl Participant {
    /// First agent OOBI of `alias` (the local identifier by default).
    pub async fn generate_oobi(&self, alias: Option<&str>) -> Result<String> {
        let alias = alias.unwrap_or(self.alias());
        self.agent()
            .get_oobis(alias, AGENT_ROLE)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MultisigError::NoDiscoveryUri { alias: alias.to_string(), role: AGENT_ROLE.to_string() })
    }

    /// Resolve `oobi` into a contact whose earlier metadata is preserved.
    pub async fn resolve_oobi(&self, oobi: &str, alias: Option<&str>) -> Result<Contact> {
        let prefix = oobi_prefix(oobi)?;
        let snapshot = match self.agent().get_contact(&prefix).await {
            Ok(contact) => Some(contact.metadata),
            Err(MultisigError::NotFound { .. }) => None,
            Err(err) => return Err(err),
        };

        let op = self.agent().resolve_oobi(oobi, alias).await?;
        self.wait(op).await?;

        let mut contact = self.await_contact(&prefix).await?;
        if let Some(snapshot) = snapshot {
            let restored = contact.merge_metadata(&snapshot);
            if !restored.is_empty() {
                warn!("oobi: resolution dropped contact metadata prefix={} keys={:?}; restoring", prefix, restored);
                let info: Map<String, Value> =
                    restored.iter().filter_map(|key| snapshot.get(key).map(|value| (key.clone(), value.clone()))).collect();
                contact = self.agent().update_contact(&prefix, info).await?;
            }
        }
        info!("oobi: resolved prefix={} alias={} by={}", prefix, contact.alias, self.alias());
        Ok(contact)
    }

    /// Read the contact back through the awaiter until it is visible or the contact timeout passes.
    async fn await_contact(&self, prefix: &Prefix) -> Result<Contact> {
        let timeout = Duration::from_millis(self.config().contacts.visibility_timeout_ms);
        let options = WaitOptions::from_config(&self.config().wait).with_signal(AbortSignal::timeout(timeout));
        let what = format!("contact {prefix}");
        let lookup = self
            .awaiter()
            .poll_until(&what, &options, move || async move {
                match self.agent().get_contact(prefix).await {
                    Ok(contact) => Ok(Some(contact)),
                    Err(MultisigError::NotFound { .. }) => Ok(None),
                    Err(err) => Err(err),
                }
            })
            .await;
        match lookup {
            Err(MultisigError::Timeout { .. }) => Err(MultisigError::ContactNotVisible { prefix: prefix.to_string() }),
            other => other,
        }
    }

    /// Update a contact's metadata in place.
    pub async fn update_contact(&self, prefix: &Prefix, info: Map<String, Value>) -> Result<Contact> {
        self.agent().update_contact(prefix, info).await
    }

    pub async fn delete_contact(&self, prefix: &Prefix) -> Result<()> {
        self.agent().delete_contact(prefix).await
    }
}

/// Make every participant a contact of every other one.
pub async fn introduce(participants: &[&Participant]) -> Result<()> {
    for (i, resolver) in participants.iter().enumerate() {
        for (j, peer) in participants.iter().enumerate() {
            if i == j {
                continue;
            }
            let oobi = peer.generate_oobi(None).await?;
            resolver.resolve_oobi(&oobi, Some(peer.alias())).await?;
        }
    }
    Ok(())
}
