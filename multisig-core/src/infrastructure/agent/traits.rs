//! Capability surface of the identity agent consumed by the orchestration layer.
//!
//! Every method is a single request to the agent. Nothing here retries or waits for
//! an operation to finish; that is the awaiter's job.

use crate::domain::{
    Contact, CreateIdentifierArgs, CreateRegistryArgs, Credential, CredentialData, EndRole, EventResult, Exchange,
    ExchangeRequest, Identifier, IssueResult, JoinGroupArgs, KeyState, Members, Note, Operation, PendingProposal, Registry,
    RegistryResult, RotateArgs, SealEvent,
};
use crate::foundation::{NoteId, OperationName, Prefix, Result, Said};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Authenticated session with one agent.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn connect(&self) -> Result<()>;
    /// Prefix of the connected agent; `None` until [`SessionService::connect`] succeeds.
    fn agent_prefix(&self) -> Option<Prefix>;
}

#[async_trait]
pub trait IdentifierService: Send + Sync {
    async fn create_identifier(&self, alias: &str, args: CreateIdentifierArgs) -> Result<EventResult>;
    async fn get_identifier(&self, alias: &str) -> Result<Identifier>;
    async fn list_identifiers(&self) -> Result<Vec<Identifier>>;
    async fn rotate_identifier(&self, alias: &str, args: RotateArgs) -> Result<EventResult>;
    async fn add_end_role(&self, alias: &str, role: &str, eid: &Prefix, timestamp: Option<&str>) -> Result<EventResult>;
    async fn list_end_roles(&self, alias: &str, role: Option<&str>) -> Result<Vec<EndRole>>;
    async fn members(&self, alias: &str) -> Result<Members>;
}

#[async_trait]
pub trait KeyStateService: Send + Sync {
    /// Known states of `prefix`, current first; empty when the agent has never seen it.
    async fn get_key_states(&self, prefix: &Prefix) -> Result<Vec<KeyState>>;
    async fn query_key_state(&self, prefix: &Prefix, sn: Option<u64>, anchor: Option<SealEvent>) -> Result<Operation>;
}

#[async_trait]
pub trait OobiService: Send + Sync {
    async fn get_oobis(&self, alias: &str, role: &str) -> Result<Vec<String>>;
    async fn resolve_oobi(&self, oobi: &str, alias: Option<&str>) -> Result<Operation>;
}

#[async_trait]
pub trait ContactService: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<Contact>>;
    async fn get_contact(&self, prefix: &Prefix) -> Result<Contact>;
    /// Merge `info` into the contact's metadata.
    async fn update_contact(&self, prefix: &Prefix, info: Map<String, Value>) -> Result<Contact>;
    async fn delete_contact(&self, prefix: &Prefix) -> Result<()>;
}

#[async_trait]
pub trait ExchangeService: Send + Sync {
    async fn send_exchange(&self, request: ExchangeRequest) -> Result<Exchange>;
    async fn get_exchange(&self, said: &Said) -> Result<Exchange>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Notes in arrival order.
    async fn list_notifications(&self) -> Result<Vec<Note>>;
    async fn mark_notification(&self, id: &NoteId) -> Result<()>;
    async fn delete_notification(&self, id: &NoteId) -> Result<()>;
}

#[async_trait]
pub trait RegistryService: Send + Sync {
    async fn create_registry(&self, args: CreateRegistryArgs) -> Result<RegistryResult>;
    async fn list_registries(&self, owner_alias: &str) -> Result<Vec<Registry>>;
    async fn issue_credential(&self, alias: &str, data: CredentialData) -> Result<IssueResult>;
    async fn list_credentials(&self, owner_alias: &str) -> Result<Vec<Credential>>;
}

#[async_trait]
pub trait OperationService: Send + Sync {
    async fn get_operation(&self, name: &OperationName) -> Result<Operation>;
    async fn list_operations(&self) -> Result<Vec<Operation>>;
}

#[async_trait]
pub trait GroupService: Send + Sync {
    /// Countersign a group event composed by another member.
    async fn join_group(&self, args: JoinGroupArgs) -> Result<Operation>;
    /// Proposals for the group that have not been accepted.
    async fn pending_proposals(&self, group_alias: &str) -> Result<Vec<PendingProposal>>;
}

/// Everything a participant needs from its agent.
pub trait Agent:
    SessionService
    + IdentifierService
    + KeyStateService
    + OobiService
    + ContactService
    + ExchangeService
    + NotificationService
    + RegistryService
    + OperationService
    + GroupService
{
}

impl<T> Agent for T where
    T: SessionService
        + IdentifierService
        + KeyStateService
        + OobiService
        + ContactService
        + ExchangeService
        + NotificationService
        + RegistryService
        + OperationService
        + GroupService
{
}
