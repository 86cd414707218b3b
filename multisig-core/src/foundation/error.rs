use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Cancelled,
    Timeout,
    NoLocalIdentifier,
    NoAgentId,
    NoDiscoveryUri,
    UnsupportedRoute,
    NotFound,
    ContactNotVisible,
    InvalidArgument,
    TransportError,
    RemoteRejected,
    SerializationError,
    ConfigError,
    Message,
}

/// Caller-facing failure classes.
///
/// "Not ready" never appears here: an unfinished operation is retried by the
/// awaiter and is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Cancelled,
    Timeout,
    PreconditionMissing,
    Transport,
    RemoteRejected,
    Serialization,
    Config,
}

#[derive(Debug, Error)]
pub enum MultisigError {
    #[error("{operation} was aborted")]
    Cancelled { operation: String },

    #[error("{operation} timed out after {waited_ms}ms")]
    Timeout { operation: String, waited_ms: u64 },

    #[error("no local identifier for alias {alias}")]
    NoLocalIdentifier { alias: String },

    #[error("no agent id on member {member}")]
    NoAgentId { member: String },

    #[error("no oobi generated for alias={alias} role={role}")]
    NoDiscoveryUri { alias: String, role: String },

    #[error("do not know how to join {route} at the moment")]
    UnsupportedRoute { route: String },

    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    #[error("contact {prefix} not visible after resolution")]
    ContactNotVisible { prefix: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transport error during {operation}: {details}")]
    TransportError { operation: String, details: String },

    #[error("remote rejected {operation} (code {code}): {details}")]
    RemoteRejected { operation: String, code: u16, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, MultisigError>;

impl MultisigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MultisigError::Cancelled { .. } => ErrorCode::Cancelled,
            MultisigError::Timeout { .. } => ErrorCode::Timeout,
            MultisigError::NoLocalIdentifier { .. } => ErrorCode::NoLocalIdentifier,
            MultisigError::NoAgentId { .. } => ErrorCode::NoAgentId,
            MultisigError::NoDiscoveryUri { .. } => ErrorCode::NoDiscoveryUri,
            MultisigError::UnsupportedRoute { .. } => ErrorCode::UnsupportedRoute,
            MultisigError::NotFound { .. } => ErrorCode::NotFound,
            MultisigError::ContactNotVisible { .. } => ErrorCode::ContactNotVisible,
            MultisigError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            MultisigError::TransportError { .. } => ErrorCode::TransportError,
            MultisigError::RemoteRejected { .. } => ErrorCode::RemoteRejected,
            MultisigError::SerializationError { .. } => ErrorCode::SerializationError,
            MultisigError::ConfigError(_) => ErrorCode::ConfigError,
            MultisigError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            MultisigError::Cancelled { .. } => ErrorClass::Cancelled,
            MultisigError::Timeout { .. } => ErrorClass::Timeout,
            MultisigError::NoLocalIdentifier { .. }
            | MultisigError::NoAgentId { .. }
            | MultisigError::NoDiscoveryUri { .. }
            | MultisigError::UnsupportedRoute { .. }
            | MultisigError::NotFound { .. }
            | MultisigError::ContactNotVisible { .. }
            | MultisigError::InvalidArgument(_) => ErrorClass::PreconditionMissing,
            MultisigError::TransportError { .. } | MultisigError::Message(_) => ErrorClass::Transport,
            MultisigError::RemoteRejected { .. } => ErrorClass::RemoteRejected,
            MultisigError::SerializationError { .. } => ErrorClass::Serialization,
            MultisigError::ConfigError(_) => ErrorClass::Config,
        }
    }

    /// True for a deadline or explicit abort while waiting.
    pub fn is_abort(&self) -> bool {
        matches!(self.class(), ErrorClass::Cancelled | ErrorClass::Timeout)
    }

    pub fn not_found(kind: impl Into<String>, key: impl Into<String>) -> Self {
        MultisigError::NotFound { kind: kind.into(), key: key.into() }
    }

    pub fn no_local_identifier(alias: impl Into<String>) -> Self {
        MultisigError::NoLocalIdentifier { alias: alias.into() }
    }

    pub fn no_agent_id(member: impl Into<String>) -> Self {
        MultisigError::NoAgentId { member: member.into() }
    }

    pub fn unsupported_route(route: impl Into<String>) -> Self {
        MultisigError::UnsupportedRoute { route: route.into() }
    }

    pub fn transport(operation: impl Into<String>, details: impl Into<String>) -> Self {
        MultisigError::TransportError { operation: operation.into(), details: details.into() }
    }

    pub fn rejected(operation: impl Into<String>, code: u16, details: impl Into<String>) -> Self {
        MultisigError::RemoteRejected { operation: operation.into(), code, details: details.into() }
    }
}

impl From<serde_json::Error> for MultisigError {
    fn from(err: serde_json::Error) -> Self {
        MultisigError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<figment::Error> for MultisigError {
    fn from(err: figment::Error) -> Self {
        MultisigError::ConfigError(format!("config extraction failed: {err}"))
    }
}

impl From<io::Error> for MultisigError {
    fn from(err: io::Error) -> Self {
        MultisigError::TransportError { operation: "io".to_string(), details: err.to_string() }
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `MultisigError` variants at the call site to preserve context.
