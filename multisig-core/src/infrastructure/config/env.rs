//! Legacy environment variables understood by the identity agent tooling.

use crate::infrastructure::config::types::AppConfig;

/// Hostname of the identity agent (`localhost` when unset).
pub const AGENT_HOSTNAME_ENV: &str = "KERIA_HOSTNAME";
/// Witness prefixes separated by `;`.
pub const WITNESS_IDS_ENV: &str = "WITNESS_IDS";
/// Explicit config file path.
pub const CONFIG_PATH_ENV: &str = "MULTISIG_CONFIG_PATH";

pub fn apply_legacy_env(config: &mut AppConfig) {
    if let Some(hostname) = non_empty_env(AGENT_HOSTNAME_ENV) {
        config.agent.hostname = hostname;
    }
    if let Some(ids) = non_empty_env(WITNESS_IDS_ENV) {
        config.witnesses.ids = parse_witness_ids(&ids);
    }
}

pub fn parse_witness_ids(value: &str) -> Vec<String> {
    value.split(';').map(str::trim).filter(|id| !id.is_empty()).map(str::to_string).collect()
}

pub fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
