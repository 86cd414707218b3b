use crate::fixtures::{
    create_registry, form_group, introduce_all, refs, smids, WorldBuilder, TEST_GROUP_ALIAS, TEST_OTHER_TIMESTAMP, TEST_TIMESTAMP,
};
use futures_util::future::join_all;
use multisig_core::application::{AbortSignal, Participant};
use multisig_core::domain::{CreateIdentifierArgs, CreateRegistryArgs, ProposalStatus};
use multisig_core::foundation::constants::AGENT_ROLE;
use multisig_core::infrastructure::agent::{IdentifierService, SessionService};
use multisig_core::MultisigError;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_group_agents_when_all_members_configure_then_every_agent_is_authorised() {
    let world = WorldBuilder::default().build();
    let members = world.participants(3).await;
    let members = refs(&members);
    introduce_all(&members).await;
    form_group(&members, smids(&members), 2).await;

    let results = join_all(members.iter().map(|member| async move {
        let ops = member.configure_group_agents(TEST_GROUP_ALIAS, TEST_TIMESTAMP).await?;
        member.awaiter().wait_all(ops, &member.wait_options()).await
    }))
    .await;
    for result in results {
        assert_eq!(result.expect("end roles").len(), 3);
    }

    let roles = members[0].list_end_roles(TEST_GROUP_ALIAS, Some(AGENT_ROLE)).await.expect("roles");
    assert_eq!(roles.len(), 3);
    let mut eids: Vec<_> = roles.into_iter().map(|role| role.eid).collect();
    let mut agents: Vec<_> = members.iter().map(|member| member.agent_id().expect("agent id")).collect();
    eids.sort();
    agents.sort();
    assert_eq!(eids, agents);
    assert!(members[1].generate_oobi(Some(TEST_GROUP_ALIAS)).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_group_agents_when_member_has_no_agent_role_then_no_agent_id() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let members_ref = refs(&members);
    introduce_all(&members_ref).await;

    let bare_agent = Arc::new(world.hub.boot(None));
    bare_agent.connect().await.expect("connect");
    let incept = bare_agent.create_identifier("member03", CreateIdentifierArgs::default()).await.expect("bare identifier");
    let bare = Participant::with_config("member03", bare_agent.clone(), world.config.clone());
    bare.wait(incept.op).await.expect("bare inception");
    bare.refresh_identifier().await.expect("refresh");
    let bare_prefix = bare.identifier().expect("bare identifier").prefix;
    assert!(matches!(bare.generate_oobi(None).await, Err(MultisigError::NoDiscoveryUri { .. })));

    let oobi = format!("{}/oobi/{}/agent/{}", world.config.agent.agent_url(), bare_prefix, bare_agent.prefix());
    for member in &members_ref {
        member.resolve_oobi(&oobi, Some("member03")).await.expect("resolve bare member");
    }

    let mut all = smids(&members_ref);
    all.push(bare_prefix.clone());
    form_group(&members_ref, all, 2).await;

    let err = members[0].configure_group_agents(TEST_GROUP_ALIAS, TEST_TIMESTAMP).await.expect_err("bare member has no agent");
    assert!(matches!(err, MultisigError::NoAgentId { .. }));
    assert!(members[0].list_end_roles(TEST_GROUP_ALIAS, None).await.expect("roles").is_empty());
    assert!(members[0].pending_proposals(TEST_GROUP_ALIAS).await.expect("pending").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_end_role_when_members_use_different_timestamps_then_proposals_split() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let members = refs(&members);
    introduce_all(&members).await;
    form_group(&members, smids(&members), 2).await;
    let agent_id = members[0].agent_id().expect("agent id");

    let first = members[0].add_end_role(TEST_GROUP_ALIAS, TEST_TIMESTAMP, &agent_id).await.expect("first proposal");
    members[1].add_end_role(TEST_GROUP_ALIAS, TEST_OTHER_TIMESTAMP, &agent_id).await.expect("second proposal");

    let err = members[0]
        .wait_with_signal(first, AbortSignal::timeout(Duration::from_secs(2)))
        .await
        .expect_err("split proposal never completes");
    assert!(matches!(err, MultisigError::Timeout { .. }));

    let split = members[0].split_proposals(TEST_GROUP_ALIAS).await.expect("split");
    assert_eq!(split.len(), 1);
    assert_eq!(split[0].1.len(), 2);
    let pending = members[1].pending_proposals(TEST_GROUP_ALIAS).await.expect("pending");
    assert!(pending.iter().all(|proposal| proposal.status == ProposalStatus::Escrowed && proposal.missing_signatures() == 1));
}

#[tokio::test(start_paused = true)]
async fn test_registry_when_nonces_differ_then_competing_anchor_is_superseded() {
    let world = WorldBuilder::default().build();
    let members = world.participants(3).await;
    let members = refs(&members);
    introduce_all(&members).await;
    form_group(&members, smids(&members), 2).await;

    for (member, nonce) in members[..2].iter().zip(["nonce-a", "nonce-b"]) {
        let args = CreateRegistryArgs { name: TEST_GROUP_ALIAS.to_string(), registry_name: "reg".to_string(), nonce: nonce.to_string() };
        member.create_registry(args).await.expect("registry proposal");
    }
    assert_eq!(members[0].split_proposals(TEST_GROUP_ALIAS).await.expect("split").len(), 1);

    create_registry(&members[2..], "nonce-a").await;
    let pending = members[0].pending_proposals(TEST_GROUP_ALIAS).await.expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, ProposalStatus::Superseded);
    assert_eq!(members[0].list_registries(TEST_GROUP_ALIAS).await.expect("registries").len(), 1);
}
