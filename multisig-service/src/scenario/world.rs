use futures_util::future::{join_all, try_join_all};
use log::{debug, info};
use multisig_core::application::{introduce, GroupArgs, Participant};
use multisig_core::domain::vlei::{qvi_credential, QviCredentialConfig};
use multisig_core::domain::{CreateRegistryArgs, CredentialData};
use multisig_core::foundation::util::create_timestamp;
use multisig_core::foundation::Prefix;
use multisig_core::infrastructure::agent::MemoryAgentHub;
use multisig_core::infrastructure::config::AppConfig;
use multisig_core::Result;
use std::sync::Arc;

pub const GROUP_ALIAS: &str = "multisig";
pub const REGISTRY_NAME: &str = "vLEI";
/// Legal entity identifier put into the demo QVI credential.
pub const DEMO_LEI: &str = "5493001KJTIIGC8Y1R17";

pub fn member_alias(idx: usize) -> String {
    format!("member{:02}", idx + 1)
}

/// One simulated agent hub plus the configuration its participants share.
pub struct ScenarioWorld {
    hub: MemoryAgentHub,
    config: AppConfig,
}

impl ScenarioWorld {
    pub fn new(config: AppConfig) -> Self {
        Self { hub: MemoryAgentHub::from_config(&config), config }
    }

    pub fn hub(&self) -> &MemoryAgentHub {
        &self.hub
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Boot a fresh agent and initialise `alias` on it.
    pub async fn participant(&self, alias: &str) -> Result<Participant> {
        let participant = Participant::with_config(alias, Arc::new(self.hub.boot(None)), self.config.clone());
        participant.init().await?;
        Ok(participant)
    }

    /// `count` participants named `member01`, `member02`, ... initialised concurrently.
    pub async fn participants(&self, count: usize) -> Result<Vec<Participant>> {
        try_join_all((0..count).map(|idx| async move { self.participant(&member_alias(idx)).await })).await
    }
}

pub fn signing_members(participants: &[&Participant]) -> Result<Vec<Prefix>> {
    participants.iter().map(|participant| participant.identifier().map(|hab| hab.prefix)).collect()
}

pub async fn introduce_all(participants: &[&Participant]) -> Result<()> {
    introduce(participants).await?;
    debug!("scenario: introduced members={}", participants.len());
    Ok(())
}

/// Every creator proposes the same inception and waits for the group to be accepted.
pub async fn form_group(creators: &[&Participant], smids: &[Prefix], isith: usize) -> Result<Prefix> {
    try_join_all(creators.iter().map(|participant| async move {
        let args = GroupArgs { smids: smids.to_vec(), isith, ..GroupArgs::default() };
        let op = participant.create_group(GROUP_ALIAS, args).await?;
        participant.wait(op).await
    }))
    .await?;
    let prefix = match creators.first() {
        Some(first) => first.agent().get_identifier(GROUP_ALIAS).await?.prefix,
        None => return Err(multisig_core::MultisigError::InvalidArgument("no group creators".to_string())),
    };
    info!("scenario: group formed prefix={} creators={}", prefix, creators.len());
    Ok(prefix)
}

/// Every member creates the group registry with the shared `nonce`.
pub async fn create_registry(members: &[&Participant], nonce: &str) -> Result<()> {
    try_join_all(members.iter().map(|participant| async move {
        let args = CreateRegistryArgs { name: GROUP_ALIAS.to_string(), registry_name: REGISTRY_NAME.to_string(), nonce: nonce.to_string() };
        let op = participant.create_registry(args).await?;
        participant.wait(op).await
    }))
    .await?;
    Ok(())
}

/// QVI credential issued by the group to `holder`; the timestamp is fixed once for all issuers.
pub async fn qvi_data(issuer: &Participant, holder: &Prefix) -> Result<CredentialData> {
    let group = issuer.agent().get_identifier(GROUP_ALIAS).await?;
    let registry = issuer.get_registry(GROUP_ALIAS, REGISTRY_NAME).await?;
    qvi_credential(&QviCredentialConfig {
        registry: registry.regk,
        holder: holder.clone(),
        issuer: group.prefix,
        timestamp: create_timestamp(),
        lei: DEMO_LEI.to_string(),
    })
}

/// Issue `data` from every member in `issuers` and wait for the credential.
pub async fn issue(issuers: &[&Participant], data: &CredentialData) -> Result<()> {
    let results = join_all(issuers.iter().map(|participant| async move {
        let op = participant.create_credential(GROUP_ALIAS, data.clone()).await?;
        participant.wait(op).await
    }))
    .await;
    results.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(())
}
