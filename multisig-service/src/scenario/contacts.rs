use super::report::ScenarioReport;
use super::world::ScenarioWorld;
use super::Scenario;
use log::info;
use multisig_core::Result;
use serde_json::{json, Map};

/// Tag a contact, let the agent overwrite it while resolving the peer again through its
/// bare controller OOBI, check the tag survives.
pub(super) async fn run_retention(world: &ScenarioWorld) -> Result<ScenarioReport> {
    let members = world.participants(2).await?;
    let (observer, peer) = (&members[0], &members[1]);
    let oobi = peer.generate_oobi(None).await?;

    let contact = observer.resolve_oobi(&oobi, Some(peer.alias())).await?;
    let mut info = Map::new();
    info.insert("group".to_string(), json!("multisig"));
    observer.update_contact(&contact.id, info).await?;

    world.hub().set_overwrite_contacts(true);
    let controller_oobi = format!("{}/oobi/{}", world.config().agent.agent_url(), contact.id);
    let again = observer.resolve_oobi(&controller_oobi, Some(peer.alias())).await?;
    info!("scenario: contact re-resolved prefix={} metadata_keys={}", again.id, again.metadata.len());

    let mut report = ScenarioReport::new(Scenario::Contacts.as_str());
    report.contacts = observer.list_contacts().await?;
    Ok(report)
}

/// Delete a contact and resolve it again; it comes back after the agent's visibility delay.
pub(super) async fn run_recreate(world: &ScenarioWorld) -> Result<ScenarioReport> {
    let members = world.participants(2).await?;
    let (observer, peer) = (&members[0], &members[1]);
    let oobi = peer.generate_oobi(None).await?;

    let contact = observer.resolve_oobi(&oobi, Some(peer.alias())).await?;
    observer.delete_contact(&contact.id).await?;
    let restored = observer.resolve_oobi(&oobi, Some(peer.alias())).await?;
    info!("scenario: contact re-created prefix={} alias={}", restored.id, restored.alias);

    let mut report = ScenarioReport::new(Scenario::ContactRecreate.as_str());
    report.contacts = observer.list_contacts().await?;
    Ok(report)
}
