use crate::fixtures::{introduce_all, refs, WorldBuilder, TEST_CONTACT_DELAY_MS};
use multisig_core::MultisigError;
use serde_json::{json, Map};

fn group_tag() -> Map<String, serde_json::Value> {
    let mut info = Map::new();
    info.insert("group".to_string(), json!("treasury"));
    info
}

#[tokio::test(start_paused = true)]
async fn test_contacts_when_everyone_is_introduced_then_each_sees_the_others() {
    let world = WorldBuilder::default().build();
    let members = world.participants(3).await;
    let members = refs(&members);
    introduce_all(&members).await;

    for member in &members {
        let contacts = member.list_contacts().await.expect("contacts");
        assert_eq!(contacts.len(), 2);
        assert!(contacts.iter().all(|contact| contact.alias != member.alias()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_contacts_when_resolved_again_then_metadata_is_kept() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let oobi = members[1].generate_oobi(None).await.expect("oobi");

    let contact = members[0].resolve_oobi(&oobi, Some("alice")).await.expect("resolve");
    members[0].update_contact(&contact.id, group_tag()).await.expect("update");

    let again = members[0].resolve_oobi(&oobi, Some("alice")).await.expect("resolve again");
    assert_eq!(again.alias, "alice");
    assert_eq!(again.metadata.get("group"), Some(&json!("treasury")));
}

#[tokio::test(start_paused = true)]
async fn test_contacts_when_same_peer_resolved_through_two_oobis_then_one_contact_keeps_metadata() {
    for world in [WorldBuilder::default().build(), WorldBuilder::default().overwrite_contacts().build()] {
        let members = world.participants(2).await;
        let agent_oobi = members[1].generate_oobi(None).await.expect("oobi");
        let contact = members[0].resolve_oobi(&agent_oobi, Some("alice")).await.expect("resolve");
        members[0].update_contact(&contact.id, group_tag()).await.expect("update");

        let controller_oobi = format!("{}/oobi/{}", world.config.agent.agent_url(), contact.id);
        assert_ne!(controller_oobi, agent_oobi);
        let again = members[0].resolve_oobi(&controller_oobi, Some("alice")).await.expect("resolve second oobi");

        assert_eq!(again.id, contact.id);
        assert_eq!(again.oobi.as_deref(), Some(controller_oobi.as_str()));
        assert_eq!(again.metadata.get("group"), Some(&json!("treasury")));
        assert_eq!(members[0].list_contacts().await.expect("contacts").len(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_contacts_when_agent_overwrites_on_resolve_then_metadata_is_restored() {
    let world = WorldBuilder::default().overwrite_contacts().build();
    let members = world.participants(2).await;
    let oobi = members[1].generate_oobi(None).await.expect("oobi");

    let contact = members[0].resolve_oobi(&oobi, Some("alice")).await.expect("resolve");
    members[0].update_contact(&contact.id, group_tag()).await.expect("update");

    let again = members[0].resolve_oobi(&oobi, None).await.expect("resolve again");
    assert_eq!(again.metadata.get("group"), Some(&json!("treasury")));
    let stored = members[0].agent().get_contact(&contact.id).await.expect("stored contact");
    assert_eq!(stored.metadata.get("group"), Some(&json!("treasury")));
}

#[tokio::test(start_paused = true)]
async fn test_contacts_when_deleted_and_resolved_then_visible_after_delay() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let oobi = members[1].generate_oobi(None).await.expect("oobi");
    let contact = members[0].resolve_oobi(&oobi, Some("alice")).await.expect("resolve");

    members[0].delete_contact(&contact.id).await.expect("delete");
    assert!(members[0].list_contacts().await.expect("contacts").is_empty());

    let started = tokio::time::Instant::now();
    let restored = members[0].resolve_oobi(&oobi, Some("alice")).await.expect("re-resolve");
    assert_eq!(restored.alias, "alice");
    assert!(restored.metadata.is_empty());
    assert!(started.elapsed().as_millis() >= u128::from(TEST_CONTACT_DELAY_MS));
}

#[tokio::test(start_paused = true)]
async fn test_contacts_when_visibility_exceeds_timeout_then_contact_not_visible() {
    let world = WorldBuilder::default().contact_visibility_delay_ms(2_000).contact_timeout_ms(300).build();
    let members = world.participants(2).await;
    let oobi = members[1].generate_oobi(None).await.expect("oobi");
    let contact = members[0].resolve_oobi(&oobi, Some("alice")).await.expect("resolve");
    members[0].delete_contact(&contact.id).await.expect("delete");

    let err = members[0].resolve_oobi(&oobi, Some("alice")).await.expect_err("not visible in time");
    assert!(matches!(err, MultisigError::ContactNotVisible { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_contacts_when_oobi_is_unknown_then_resolution_is_rejected() {
    let world = WorldBuilder::default().build();
    let member = world.participant("member01").await;
    let oobi = format!("{}/oobi/EUnknownPrefixUnknownPrefixUnknownPrefix000/agent", world.config.agent.agent_url());

    let err = member.resolve_oobi(&oobi, None).await.expect_err("unknown oobi");
    assert!(matches!(err, MultisigError::RemoteRejected { code: 404, .. }));
    assert!(member.list_contacts().await.expect("contacts").is_empty());
}
