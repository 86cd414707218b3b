use crate::foundation::constants::{
    DEFAULT_AGENT_HOSTNAME, DEFAULT_AGENT_PORT, DEFAULT_BOOT_PORT, DEFAULT_CONTACT_VISIBILITY_TIMEOUT_MS,
    DEFAULT_INCREASE_FACTOR, DEFAULT_MAX_SLEEP_MS, DEFAULT_MIN_SLEEP_MS, DEFAULT_NOTIFICATION_POLL_MS, DEFAULT_NOTIFICATION_TIMEOUT_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub agent: AgentConfig,
    pub witnesses: WitnessConfig,
    pub wait: WaitConfig,
    pub notifications: NotificationConfig,
    pub contacts: ContactConfig,
    pub simulation: SimulationConfig,
    pub log: LogConfig,
}

/// Location of the identity agent service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub hostname: String,
    pub agent_port: u16,
    pub boot_port: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { hostname: DEFAULT_AGENT_HOSTNAME.to_string(), agent_port: DEFAULT_AGENT_PORT, boot_port: DEFAULT_BOOT_PORT }
    }
}

impl AgentConfig {
    pub fn agent_url(&self) -> String {
        format!("http://{}:{}", self.hostname, self.agent_port)
    }

    pub fn boot_url(&self) -> String {
        format!("http://{}:{}", self.hostname, self.boot_port)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WitnessConfig {
    pub ids: Vec<String>,
    /// Receipt threshold; derived from `ids` when unset.
    pub toad: Option<usize>,
}

impl WitnessConfig {
    pub fn toad(&self) -> usize {
        self.toad.unwrap_or_else(|| default_toad(self.ids.len()))
    }
}

/// `min(n, max(n - 1, 0))`: tolerate one missing witness receipt.
pub fn default_toad(witness_count: usize) -> usize {
    witness_count.min(witness_count.saturating_sub(1))
}

/// Awaiter backoff and deadline defaults.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WaitConfig {
    pub min_sleep_ms: u64,
    pub max_sleep_ms: u64,
    pub increase_factor: u64,
    pub timeout_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            min_sleep_ms: DEFAULT_MIN_SLEEP_MS,
            max_sleep_ms: DEFAULT_MAX_SLEEP_MS,
            increase_factor: DEFAULT_INCREASE_FACTOR,
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
        }
    }
}

impl WaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    pub timeout_ms: u64,
    /// Pause between mailbox polls. Kept short: the outer deadline is the only backoff.
    pub poll_interval_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS, poll_interval_ms: DEFAULT_NOTIFICATION_POLL_MS }
    }
}

impl NotificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ContactConfig {
    /// How long a resolved contact may take to become readable.
    pub visibility_timeout_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self { visibility_timeout_ms: DEFAULT_CONTACT_VISIBILITY_TIMEOUT_MS }
    }
}

/// Behaviour knobs of the in-process simulated agent.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Time before a freshly created operation may report done.
    pub operation_latency_ms: u64,
    /// Delay between an exchange being sent and its notification becoming visible.
    pub notification_delay_ms: u64,
    /// Delay before a contact re-created after deletion becomes readable.
    pub contact_visibility_delay_ms: u64,
    /// Emulate an agent that replaces contact metadata on re-resolution.
    pub overwrite_contacts_on_resolve: bool,
}

impl SimulationConfig {
    pub fn operation_latency(&self) -> Duration {
        Duration::from_millis(self.operation_latency_ms)
    }

    pub fn notification_delay(&self) -> Duration {
        Duration::from_millis(self.notification_delay_ms)
    }

    pub fn contact_visibility_delay(&self) -> Duration {
        Duration::from_millis(self.contact_visibility_delay_ms)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub filters: String,
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filters: "info".to_string(), dir: None }
    }
}
