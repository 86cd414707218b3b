//! Application layer: orchestration of group actions on top of the agent capability traits.

pub mod abort;
pub mod awaiter;
pub mod group;
pub mod join;
pub mod oobi;
pub mod participant;
pub mod registry;
pub mod roles;

pub use abort::AbortSignal;
pub use awaiter::{backoff_delay_ms, OperationAwaiter, RetryObserver, WaitOptions};
pub use group::{GroupArgs, GroupRotationArgs};
pub use oobi::introduce;
pub use participant::Participant;
pub use registry::registry_nonce;
