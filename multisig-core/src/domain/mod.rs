//! Domain layer: wire-shaped data and pure functions, no I/O.

pub mod contact;
pub mod coordination;
pub mod event;
pub mod exchange;
pub mod identifier;
pub mod notification;
pub mod operation;
pub mod registry;
pub mod vlei;

pub use contact::{oobi_prefix, Contact};
pub use coordination::{PendingProposal, ProposalKind, ProposalStatus};
pub use event::SealEvent;
pub use exchange::{Embed, Exchange, ExchangeMessage, ExchangeRequest, Route};
pub use identifier::{
    CreateIdentifierArgs, EndRole, EventResult, GroupInceptArgs, GroupInfo, Identifier, JoinGroupArgs, KeyState, Member, Members,
    RotateArgs,
};
pub use notification::{Note, NoteAttrs};
pub use operation::{Operation, OperationError, OperationMetadata};
pub use registry::{CreateRegistryArgs, Credential, CredentialData, CredentialStatus, IssueResult, Registry, RegistryResult};
