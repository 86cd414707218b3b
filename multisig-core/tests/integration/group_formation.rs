use crate::fixtures::{form_group, group_args, introduce_all, refs, smids, WorldBuilder, TEST_GROUP_ALIAS};
use multisig_core::application::{GroupArgs, GroupRotationArgs};
use multisig_core::domain::{ProposalKind, Route};
use multisig_core::MultisigError;

#[tokio::test(start_paused = true)]
async fn test_group_inception_when_all_members_propose_then_prefixes_converge() {
    let world = WorldBuilder::default().build();
    let members = world.participants(3).await;
    let members = refs(&members);
    introduce_all(&members).await;

    let prefix = form_group(&members, smids(&members), 2).await;

    for member in &members {
        let group = member.agent().get_identifier(TEST_GROUP_ALIAS).await.expect("group");
        assert_eq!(group.prefix, prefix);
        assert!(group.is_group());
        assert_eq!(group.state.sn().expect("sn"), 0);
        assert!(member.pending_proposals(TEST_GROUP_ALIAS).await.expect("pending").is_empty());
    }
    assert_eq!(world.hub.accepted_events(&prefix).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_group_inception_when_member_proposes_late_then_it_joins_accepted_group() {
    let world = WorldBuilder::default().build();
    let members = world.participants(4).await;
    let members = refs(&members);
    introduce_all(&members).await;
    let all = smids(&members);

    let prefix = form_group(&members[..3], all.clone(), 3).await;

    let late = members[3];
    let op = late.create_group(TEST_GROUP_ALIAS, group_args(all, 3)).await.expect("late inception");
    let op = late.wait(op).await.expect("late inception completes");
    assert!(op.done);
    let group = late.agent().get_identifier(TEST_GROUP_ALIAS).await.expect("group");
    assert_eq!(group.prefix, prefix);
    assert_eq!(world.hub.accepted_events(&prefix).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_group_inception_when_threshold_met_early_then_every_late_member_converges() {
    for (size, isith) in [(2, 1), (3, 1), (4, 2)] {
        let world = WorldBuilder::default().build();
        let members = world.participants(size).await;
        let members = refs(&members);
        introduce_all(&members).await;
        let all = smids(&members);

        let prefix = form_group(&members[..isith], all.clone(), isith).await;
        for late in &members[isith..] {
            let op = late.create_group(TEST_GROUP_ALIAS, group_args(all.clone(), isith)).await.expect("late inception");
            late.wait(op).await.expect("late inception completes");
        }

        for member in &members {
            let group = member.agent().get_identifier(TEST_GROUP_ALIAS).await.expect("group");
            assert_eq!(group.prefix, prefix, "size={size} isith={isith} member={}", member.alias());
        }
        assert_eq!(world.hub.accepted_events(&prefix).len(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_group_inception_when_threshold_out_of_bounds_then_invalid_argument() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let members = refs(&members);
    introduce_all(&members).await;

    for isith in [0, 3, 5] {
        let err = members[0].create_group(TEST_GROUP_ALIAS, group_args(smids(&members), isith)).await.expect_err("bad isith");
        assert!(matches!(err, MultisigError::InvalidArgument(_)), "isith={isith}: {err}");
    }
    let err = members[0]
        .create_group(TEST_GROUP_ALIAS, GroupArgs { nsith: Some(0), ..group_args(smids(&members), 1) })
        .await
        .expect_err("bad nsith");
    assert!(matches!(err, MultisigError::InvalidArgument(_)));

    let missing = members[0].agent().get_identifier(TEST_GROUP_ALIAS).await.expect_err("nothing proposed");
    assert!(matches!(missing, MultisigError::NotFound { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_group_rotation_when_members_cannot_meet_threshold_then_invalid_argument() {
    let world = WorldBuilder::default().build();
    let members = world.participants(3).await;
    let members = refs(&members);
    introduce_all(&members).await;
    form_group(&members, smids(&members), 2).await;

    let args = GroupRotationArgs { smids: Some(smids(&members[..1])), rmids: None };
    let err = members[0].rotate_group(TEST_GROUP_ALIAS, args).await.expect_err("one signer for a threshold of two");
    assert!(matches!(err, MultisigError::InvalidArgument(_)));

    let args = GroupRotationArgs { smids: Some(Vec::new()), rmids: None };
    let err = members[0].rotate_group(TEST_GROUP_ALIAS, args).await.expect_err("no signers");
    assert!(matches!(err, MultisigError::InvalidArgument(_)));
    assert!(members[0].pending_proposals(TEST_GROUP_ALIAS).await.expect("pending").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_group_inception_when_single_member_proposes_then_escrowed_and_notified() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let members = refs(&members);
    introduce_all(&members).await;

    let op = members[0].create_group(TEST_GROUP_ALIAS, group_args(smids(&members), 2)).await.expect("proposal");
    assert!(!op.done);

    let pending = members[0].pending_proposals(TEST_GROUP_ALIAS).await.expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].kind, ProposalKind::Inception);
    assert_eq!(pending[0].missing_signatures(), 1);

    let signal = multisig_core::application::AbortSignal::timeout(world.config.notifications.timeout());
    let note = members[1].wait_notification(&Route::Icp, &signal).await.expect("icp notification");
    let exchange = members[1].get_exchange(&note.attrs.exchange).await.expect("exchange");
    assert_eq!(exchange.header_prefixes("smids"), smids(&members));
    assert!(exchange.embed("icp").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_group_inception_when_member_was_not_introduced_then_key_state_missing() {
    let world = WorldBuilder::default().build();
    let members = world.participants(2).await;
    let members = refs(&members);

    let err = members[0].create_group(TEST_GROUP_ALIAS, group_args(smids(&members), 2)).await.expect_err("no key state");
    assert!(matches!(err, MultisigError::NotFound { .. }));
}
