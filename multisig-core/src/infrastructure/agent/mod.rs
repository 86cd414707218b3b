//! Identity agent access: the service traits and the in-process simulated agent.

pub mod memory;
pub mod traits;

pub use memory::{MemoryAgent, MemoryAgentHub};
pub use traits::{
    Agent, ContactService, ExchangeService, GroupService, IdentifierService, KeyStateService, NotificationService, OobiService,
    OperationService, RegistryService, SessionService,
};
