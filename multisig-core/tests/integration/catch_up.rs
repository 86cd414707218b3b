use crate::fixtures::{
    create_registry, form_group, introduce_all, qvi_data, refs, registry_nonce, smids, WorldBuilder, TEST_GROUP_ALIAS,
};
use futures_util::future::join_all;
use multisig_core::application::{AbortSignal, GroupRotationArgs, Participant};
use multisig_core::domain::{CredentialStatus, Route};
use multisig_core::MultisigError;

fn notification_signal(member: &Participant) -> AbortSignal {
    AbortSignal::timeout(member.config().notifications.timeout())
}

#[tokio::test(start_paused = true)]
async fn test_catch_up_when_member_missed_issuance_then_it_joins_the_same_credential() {
    let world = WorldBuilder::default().build();
    let members = world.participants(3).await;
    let members = refs(&members);
    introduce_all(&members).await;
    let group = form_group(&members, smids(&members), 2).await;
    create_registry(&members, &registry_nonce()).await;

    let holder = members[0].identifier().expect("holder").prefix;
    let data = qvi_data(members[0], &holder).await;
    let issued = join_all(members[..2].iter().map(|member| {
        let data = data.clone();
        async move {
            let op = member.create_credential(TEST_GROUP_ALIAS, data).await?;
            member.wait(op).await
        }
    }))
    .await;
    for result in issued {
        let op = result.expect("issuance");
        assert!(op.depends().map_or(false, |anchor| anchor.done));
    }

    let late = members[2];
    let op = late.catch_up(TEST_GROUP_ALIAS, &Route::Iss, &notification_signal(late)).await.expect("catch up");
    late.wait(op).await.expect("late issuance");

    for member in &members {
        let credentials = member.list_credentials(TEST_GROUP_ALIAS).await.expect("credentials");
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].status, CredentialStatus::Issued);
        assert_eq!(member.list_registries(TEST_GROUP_ALIAS).await.expect("registries").len(), 1);
    }
    assert_eq!(world.hub.accepted_events(&group).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_catch_up_when_route_is_not_joinable_then_unsupported_route() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let members = refs(&members);
    introduce_all(&members).await;
    form_group(&members[..1], smids(&members), 1).await;

    let err = members[1]
        .catch_up(TEST_GROUP_ALIAS, &Route::Icp, &notification_signal(members[1]))
        .await
        .expect_err("inception cannot be joined");
    assert!(matches!(err, MultisigError::UnsupportedRoute { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_catch_up_when_no_proposal_arrives_then_timeout() {
    let world = WorldBuilder::default().build();
    let member = world.participant("member01").await;

    let signal = AbortSignal::timeout(std::time::Duration::from_millis(500));
    let err = member.catch_up(TEST_GROUP_ALIAS, &Route::Rot, &signal).await.expect_err("nothing to join");
    assert!(matches!(err, MultisigError::Timeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_catch_up_when_group_rotates_in_new_member_then_all_share_rotated_state() {
    let world = WorldBuilder::default().build();
    let mut members = world.participants(3).await;
    let founders = refs(&members);
    introduce_all(&founders).await;
    let group = form_group(&founders, smids(&founders), 2).await;

    for member in &founders {
        member.rotate_identifier(member.alias()).await.expect("local rotation");
    }
    members.push(world.participant("member04").await);
    let members = refs(&members);
    introduce_all(&members).await;

    let all = smids(&members);
    let op = members[0]
        .rotate_group(TEST_GROUP_ALIAS, GroupRotationArgs { smids: Some(all.clone()), rmids: Some(all.clone()) })
        .await
        .expect("rotation proposal");

    let joined = join_all(members[1..].iter().map(|member| async move {
        let op = member.catch_up(TEST_GROUP_ALIAS, &Route::Rot, &notification_signal(member)).await?;
        member.wait(op).await
    }))
    .await;
    for result in joined {
        result.expect("rotation join");
    }
    members[0].wait(op).await.expect("rotation completes");

    for member in &members {
        let hab = member.agent().get_identifier(TEST_GROUP_ALIAS).await.expect("group");
        assert_eq!(hab.prefix, group);
        assert_eq!(hab.state.sn().expect("sn"), 1);
        assert_eq!(hab.state.keys.len(), 4);
        let signing = member.agent().members(TEST_GROUP_ALIAS).await.expect("members").signing;
        assert_eq!(signing.into_iter().map(|m| m.aid).collect::<Vec<_>>(), all);
    }
}
