#![allow(dead_code)]

use crate::fixtures::{TEST_CONTACT_DELAY_MS, TEST_NOTIFICATION_DELAY_MS, TEST_OPERATION_LATENCY_MS};
use multisig_core::application::Participant;
use multisig_core::infrastructure::agent::MemoryAgentHub;
use multisig_core::infrastructure::config::{AppConfig, SimulationConfig};
use std::sync::Arc;

/// Simulated world: one hub plus the configuration every participant shares.
pub struct World {
    pub hub: MemoryAgentHub,
    pub config: AppConfig,
}

impl World {
    /// Boot a fresh agent and initialise `alias` on it.
    pub async fn participant(&self, alias: &str) -> Participant {
        let agent = Arc::new(self.hub.boot(None));
        let participant = Participant::with_config(alias, agent, self.config.clone());
        participant.init().await.expect("init participant");
        participant
    }

    pub async fn participants(&self, count: usize) -> Vec<Participant> {
        let mut participants = Vec::with_capacity(count);
        for idx in 0..count {
            participants.push(self.participant(&crate::fixtures::member_alias(idx)).await);
        }
        participants
    }
}

pub struct WorldBuilder {
    simulation: SimulationConfig,
    contact_timeout_ms: Option<u64>,
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                operation_latency_ms: TEST_OPERATION_LATENCY_MS,
                notification_delay_ms: TEST_NOTIFICATION_DELAY_MS,
                contact_visibility_delay_ms: TEST_CONTACT_DELAY_MS,
                overwrite_contacts_on_resolve: false,
            },
            contact_timeout_ms: None,
        }
    }
}

impl WorldBuilder {
    pub fn overwrite_contacts(mut self) -> Self {
        self.simulation.overwrite_contacts_on_resolve = true;
        self
    }

    pub fn contact_visibility_delay_ms(mut self, delay_ms: u64) -> Self {
        self.simulation.contact_visibility_delay_ms = delay_ms;
        self
    }

    pub fn contact_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.contact_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn build(self) -> World {
        let mut config = AppConfig::default();
        config.simulation = self.simulation;
        if let Some(timeout_ms) = self.contact_timeout_ms {
            config.contacts.visibility_timeout_ms = timeout_ms;
        }
        World { hub: MemoryAgentHub::from_config(&config), config }
    }
}
