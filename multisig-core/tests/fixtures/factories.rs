#![allow(dead_code)]

use crate::fixtures::{TEST_GROUP_ALIAS, TEST_LEI, TEST_REGISTRY_NAME, TEST_TIMESTAMP};
use futures_util::future::join_all;
use multisig_core::application::{introduce, GroupArgs, Participant};
use multisig_core::domain::vlei::{qvi_credential, QviCredentialConfig};
use multisig_core::domain::{CreateRegistryArgs, CredentialData};
use multisig_core::foundation::util::random_nonce;
use multisig_core::foundation::Prefix;

pub fn member_alias(idx: usize) -> String {
    format!("member{:02}", idx + 1)
}

pub fn smids(participants: &[&Participant]) -> Vec<Prefix> {
    participants.iter().map(|p| p.identifier().expect("local identifier").prefix).collect()
}

pub fn refs(participants: &[Participant]) -> Vec<&Participant> {
    participants.iter().collect()
}

pub async fn introduce_all(participants: &[&Participant]) {
    introduce(participants).await.expect("introduce participants");
}

pub fn group_args(smids: Vec<Prefix>, isith: usize) -> GroupArgs {
    GroupArgs { smids, isith, ..GroupArgs::default() }
}

/// Every member in `creators` proposes the same inception and waits for it.
pub async fn form_group(creators: &[&Participant], smids: Vec<Prefix>, isith: usize) -> Prefix {
    let results = join_all(creators.iter().map(|p| {
        let args = group_args(smids.clone(), isith);
        async move {
            let op = p.create_group(TEST_GROUP_ALIAS, args).await?;
            p.wait(op).await
        }
    }))
    .await;
    for result in results {
        result.expect("group inception");
    }
    creators[0].agent().get_identifier(TEST_GROUP_ALIAS).await.expect("group identifier").prefix
}

pub async fn create_registry(members: &[&Participant], nonce: &str) {
    let results = join_all(members.iter().map(|p| async move {
        let args = CreateRegistryArgs {
            name: TEST_GROUP_ALIAS.to_string(),
            registry_name: TEST_REGISTRY_NAME.to_string(),
            nonce: nonce.to_string(),
        };
        let op = p.create_registry(args).await?;
        p.wait(op).await
    }))
    .await;
    for result in results {
        result.expect("registry inception");
    }
}

pub fn registry_nonce() -> String {
    random_nonce()
}

pub async fn qvi_data(issuer: &Participant, holder: &Prefix) -> CredentialData {
    let group = issuer.agent().get_identifier(TEST_GROUP_ALIAS).await.expect("group identifier");
    let registry = issuer.get_registry(TEST_GROUP_ALIAS, TEST_REGISTRY_NAME).await.expect("registry");
    qvi_credential(&QviCredentialConfig {
        registry: registry.regk,
        holder: holder.clone(),
        issuer: group.prefix,
        timestamp: TEST_TIMESTAMP.to_string(),
        lei: TEST_LEI.to_string(),
    })
    .expect("qvi credential")
}
