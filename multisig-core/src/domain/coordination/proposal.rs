use crate::domain::exchange::Route;
use crate::foundation::{Prefix, Said};
use serde::{Deserialize, Serialize};

/// What a group proposal establishes once it reaches its threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalKind {
    Inception,
    Rotation,
    Interaction,
    EndRole,
}

impl ProposalKind {
    /// Route the proposal is broadcast on. Interactions usually travel on the registry
    /// or issuance route of what they anchor instead.
    pub fn default_route(self) -> Route {
        match self {
            ProposalKind::Inception => Route::Icp,
            ProposalKind::Rotation => Route::Rot,
            ProposalKind::Interaction => Route::Exn,
            ProposalKind::EndRole => Route::Rpy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    /// Collecting signatures.
    Escrowed,
    /// Reached threshold and was accepted into the group's log.
    Accepted,
    /// Another proposal was accepted at the same sequence number; this one can never complete.
    Superseded,
}

/// Diagnostic view of a group event proposal held by the identity service.
///
/// Two members composing "the same" action from different inputs end up as two
/// proposals with different digests at the same sequence number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingProposal {
    pub group: Prefix,
    pub kind: ProposalKind,
    pub route: Route,
    pub sn: u64,
    pub digest: Said,
    pub signers: Vec<Prefix>,
    pub threshold: usize,
    pub status: ProposalStatus,
}

impl PendingProposal {
    pub fn missing_signatures(&self) -> usize {
        self.threshold.saturating_sub(self.signers.len())
    }
}

/// Proposals at the same sequence number with differing digests.
pub fn split_proposals(proposals: &[PendingProposal]) -> Vec<(u64, Vec<Said>)> {
    let mut by_sn: std::collections::BTreeMap<(u64, ProposalKind), Vec<Said>> = std::collections::BTreeMap::new();
    for proposal in proposals {
        by_sn.entry((proposal.sn, proposal.kind)).or_default().push(proposal.digest.clone());
    }
    by_sn.into_iter().filter(|(_, digests)| digests.len() > 1).map(|((sn, _), digests)| (sn, digests)).collect()
}
