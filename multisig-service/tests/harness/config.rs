use multisig_core::infrastructure::config::{AppConfig, SimulationConfig};

/// Configuration with agent latencies close to a local agent.
#[allow(dead_code)]
pub fn simulated_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.simulation = SimulationConfig {
        operation_latency_ms: 150,
        notification_delay_ms: 100,
        contact_visibility_delay_ms: 600,
        overwrite_contacts_on_resolve: false,
    };
    config
}
