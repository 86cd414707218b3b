use multisig_core::domain::coordination::{has_threshold, split_proposals, Contribution};
use multisig_core::domain::{PendingProposal, ProposalKind, ProposalStatus, Route};
use multisig_core::foundation::{Prefix, Said};

fn keys(count: usize) -> Vec<String> {
    (0..count).map(|idx| format!("DKey{idx}")).collect()
}

fn contribution(idx: usize, key: &str) -> Contribution {
    Contribution { member: Prefix::new(format!("EMember{idx}")), index: idx, key: key.to_string() }
}

fn proposal(kind: ProposalKind, sn: u64, digest: &str) -> PendingProposal {
    PendingProposal {
        group: Prefix::new("EGroup"),
        kind,
        route: kind.default_route(),
        sn,
        digest: Said::new(digest),
        signers: vec![Prefix::new("EMember0")],
        threshold: 2,
        status: ProposalStatus::Escrowed,
    }
}

#[test]
fn test_threshold_when_two_of_three_sign_then_reached() {
    let keys = keys(3);
    let sigs = vec![contribution(0, &keys[0]), contribution(2, &keys[2])];
    assert!(has_threshold(&sigs, &keys, 2));
    assert!(!has_threshold(&sigs, &keys, 3));
}

#[test]
fn test_threshold_when_member_signs_with_rotated_key_then_not_counted() {
    let keys = keys(2);
    let sigs = vec![contribution(0, &keys[0]), contribution(1, "DKeyRotated")];
    assert!(!has_threshold(&sigs, &keys, 2));
}

#[test]
fn test_threshold_when_index_is_out_of_range_then_not_counted() {
    let keys = keys(2);
    let sigs = vec![contribution(0, &keys[0]), contribution(5, &keys[1])];
    assert!(!has_threshold(&sigs, &keys, 2));
}

#[test]
fn test_split_when_digests_differ_at_same_sn_then_reported() {
    let proposals = vec![
        proposal(ProposalKind::Interaction, 1, "EAnchorA"),
        proposal(ProposalKind::Interaction, 1, "EAnchorB"),
        proposal(ProposalKind::EndRole, 1, "EReply"),
    ];
    let split = split_proposals(&proposals);
    assert_eq!(split.len(), 1);
    assert_eq!(split[0].0, 1);
    assert_eq!(split[0].1, vec![Said::new("EAnchorA"), Said::new("EAnchorB")]);
}

#[test]
fn test_pending_proposal_when_one_signer_of_two_then_one_missing() {
    let pending = proposal(ProposalKind::Rotation, 1, "ERot");
    assert_eq!(pending.missing_signatures(), 1);
    assert_eq!(pending.route, Route::Rot);
}
