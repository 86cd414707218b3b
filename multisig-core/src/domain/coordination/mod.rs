pub mod proposal;
pub mod threshold;

pub use proposal::{split_proposals, PendingProposal, ProposalKind, ProposalStatus};
pub use threshold::{has_threshold, Contribution};
