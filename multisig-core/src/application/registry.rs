//! Credential registries and credential issuance by (group) identifiers.

use crate::application::group::member_of;
use crate::application::participant::Participant;
use crate::domain::event::messagize;
use crate::domain::{CreateRegistryArgs, Credential, CredentialData, Embed, Exchange, Operation, Registry, Route};
use crate::foundation::{MultisigError, Result};
use log::info;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

impl Participant {
    /// Create a registry; group members converge on it by using the same nonce.
    pub async fn create_registry(&self, args: CreateRegistryArgs) -> Result<Operation> {
        let hab = self.agent().get_identifier(&args.name).await?;
        let registry_name = args.registry_name.clone();
        let result = self.agent().create_registry(args).await?;

        if hab.is_group() {
            let mhab = member_of(&hab)?;
            let recipients = self.list_other_members(&hab).await?;
            let mut embeds = BTreeMap::new();
            embeds.insert("vcp".to_string(), Embed::new(result.regser.clone(), ""));
            embeds.insert("anc".to_string(), Embed::new(result.serder.clone(), messagize(&result.sigs, None)));
            let mut payload = Map::new();
            payload.insert("gid".to_string(), json!(hab.prefix));
            self.broadcast(&mhab, Route::Vcp, payload, embeds, recipients).await?;
            info!("registry: proposed registry name={} group={}", registry_name, hab.prefix);
        }
        Ok(result.op)
    }

    /// Issue a credential; the returned operation depends on the anchoring event.
    pub async fn create_credential(&self, group_alias: &str, data: CredentialData) -> Result<Operation> {
        let hab = self.agent().get_identifier(group_alias).await?;
        let result = self.agent().issue_credential(group_alias, data).await?;

        if hab.is_group() {
            let mhab = member_of(&hab)?;
            let recipients = self.list_other_members(&hab).await?;
            let mut embeds = BTreeMap::new();
            embeds.insert("acdc".to_string(), Embed::new(result.acdc.clone(), ""));
            embeds.insert("iss".to_string(), Embed::new(result.iss.clone(), ""));
            embeds.insert("anc".to_string(), Embed::new(result.anc.clone(), messagize(&result.sigs, None)));
            let mut payload = Map::new();
            payload.insert("gid".to_string(), json!(hab.prefix));
            self.broadcast(&mhab, Route::Iss, payload, embeds, recipients).await?;
            info!(
                "registry: proposed credential said={} group={}",
                result.acdc.get("d").and_then(Value::as_str).unwrap_or_default(),
                hab.prefix
            );
        }
        Ok(result.op)
    }

    pub async fn get_registry(&self, owner: &str, name: &str) -> Result<Registry> {
        self.list_registries(owner)
            .await?
            .into_iter()
            .find(|registry| registry.name == name)
            .ok_or_else(|| MultisigError::not_found("registry", format!("{owner}/{name}")))
    }

    pub async fn list_registries(&self, owner: &str) -> Result<Vec<Registry>> {
        self.agent().list_registries(owner).await
    }

    pub async fn list_credentials(&self, owner: &str) -> Result<Vec<Credential>> {
        self.agent().list_credentials(owner).await
    }
}

/// Nonce of the registry proposed in a `/multisig/vcp` exchange.
///
/// Members that received the proposal reuse it to compose the identical registry.
pub fn registry_nonce(exchange: &Exchange) -> Result<String> {
    exchange
        .embed("vcp")
        .and_then(|vcp| vcp.get("n"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| MultisigError::InvalidArgument("registry exchange without a vcp nonce".to_string()))
}
