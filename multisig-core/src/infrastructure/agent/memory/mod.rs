//! In-process simulated identity agent.
//!
//! A [`MemoryAgentHub`] is one shared world (key event logs, proposal escrows, mailboxes,
//! exchanges); every [`MemoryAgent`] booted from it is one participant's agent. Group
//! events are only accepted once enough members contributed signatures, identical
//! proposals converge by digest, and timing knobs from [`SimulationConfig`] reproduce the
//! eventual consistency of a remote agent.

mod keys;
mod service;
mod state;

use crate::foundation::util::{digest_said, random_passcode};
use crate::foundation::Prefix;
use crate::infrastructure::config::{AgentConfig, AppConfig, SimulationConfig};
use log::info;
use parking_lot::Mutex;
use serde_json::Value;
use state::{AgentState, HubState};
use std::sync::Arc;

#[derive(Clone)]
pub struct MemoryAgentHub {
    state: Arc<Mutex<HubState>>,
}

impl MemoryAgentHub {
    pub fn new(agent: &AgentConfig, simulation: SimulationConfig) -> Self {
        Self { state: Arc::new(Mutex::new(HubState::new(simulation, agent.agent_url()))) }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.agent, config.simulation.clone())
    }

    /// Boot (or reopen, for a known passcode) an agent.
    pub fn boot(&self, passcode: Option<&str>) -> MemoryAgent {
        let passcode = passcode.map(str::to_string).unwrap_or_else(random_passcode);
        let mut state = self.state.lock();
        let prefix = match state.passcodes.get(&passcode) {
            Some(prefix) => prefix.clone(),
            None => {
                let prefix = Prefix::from_said(&digest_said(format!("agent:{passcode}").as_bytes()));
                state.passcodes.insert(passcode, prefix.clone());
                state.agents.insert(prefix.clone(), AgentState::new(prefix.clone()));
                info!("memory agent: booted agent={prefix}");
                prefix
            }
        };
        MemoryAgent { hub: self.clone(), prefix }
    }

    /// Toggle the emulated contact-overwrite fault.
    pub fn set_overwrite_contacts(&self, enabled: bool) {
        self.state.lock().config.overwrite_contacts_on_resolve = enabled;
    }

    /// Accepted events of `prefix`, oldest first.
    pub fn accepted_events(&self, prefix: &Prefix) -> Vec<Value> {
        self.state.lock().logs.get(prefix).map(|log| log.events.clone()).unwrap_or_default()
    }
}

impl Default for MemoryAgentHub {
    fn default() -> Self {
        Self::new(&AgentConfig::default(), SimulationConfig::default())
    }
}

/// One participant's agent inside a [`MemoryAgentHub`].
#[derive(Clone)]
pub struct MemoryAgent {
    hub: MemoryAgentHub,
    prefix: Prefix,
}

impl MemoryAgent {
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn hub(&self) -> &MemoryAgentHub {
        &self.hub
    }
}
