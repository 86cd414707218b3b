//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Profile overrides from `[profiles.<name>]`
//! 4. Environment variables (`MULTISIG_*` prefix, `__` nesting)
//! 5. Legacy agent variables (`KERIA_HOSTNAME`, `WITNESS_IDS`)

use crate::foundation::{MultisigError, Result};
use crate::infrastructure::config::env::apply_legacy_env;
use crate::infrastructure::config::types::AppConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::{Dict, Map};
use figment::{Figment, Profile};
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix for config overrides.
///
/// Example: `MULTISIG_WAIT__MAX_SLEEP_MS=500` -> `wait.max_sleep_ms`
const ENV_PREFIX: &str = "MULTISIG_";

#[derive(Debug, Default, Deserialize)]
struct ProfilesRaw {
    #[serde(default)]
    profiles: Option<Map<String, Dict>>,
}

/// Load configuration from compiled defaults and the environment only.
pub fn load_config_from_env() -> Result<AppConfig> {
    let mut config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    apply_legacy_env(&mut config);
    Ok(config)
}

/// Load configuration from a specific file path.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    info!("loading configuration path={}", path.display());
    let mut config: AppConfig = figment_base(path).merge(Env::prefixed(ENV_PREFIX).split("__")).extract()?;
    apply_legacy_env(&mut config);
    debug!("configuration loaded agent_url={} witnesses={}", config.agent.agent_url(), config.witnesses.ids.len());
    Ok(config)
}

/// Load configuration from a specific file path with `[profiles.<name>]` overrides.
pub fn load_config_from_file_with_profile(path: &Path, profile: &str) -> Result<AppConfig> {
    info!("loading configuration path={} profile={}", path.display(), profile);

    let raw: ProfilesRaw = figment_base(path).extract()?;
    let overrides = profile_overrides(&raw, profile)?;

    let mut config: AppConfig = figment_base(path)
        .merge(Serialized::from(overrides, Profile::Default))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| MultisigError::ConfigError(format!("config extraction failed for profile '{profile}': {e}")))?;
    apply_legacy_env(&mut config);

    debug!("configuration loaded profile={} agent_url={}", profile, config.agent.agent_url());
    Ok(config)
}

fn figment_base(path: &Path) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
    }
    figment
}

fn profile_overrides(raw: &ProfilesRaw, profile: &str) -> Result<Dict> {
    let profiles = raw.profiles.as_ref().ok_or_else(|| MultisigError::ConfigError("no profiles section in config".to_string()))?;
    profiles.get(profile).cloned().ok_or_else(|| MultisigError::ConfigError(format!("profile '{profile}' not found in config")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_minimal_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("multisig.toml");
        std::fs::write(
            &config_path,
            r#"
            [agent]
            hostname = "keria.internal"

            [wait]
            max_sleep_ms = 500
        "#,
        )
        .unwrap();

        let config = load_config_from_file(&config_path).unwrap();
        assert_eq!(config.agent.agent_url(), "http://keria.internal:3901");
        assert_eq!(config.wait.max_sleep_ms, 500);
        assert_eq!(config.wait.min_sleep_ms, 100);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.notifications.timeout_ms, 10_000);
        assert_eq!(config.agent.boot_url(), "http://localhost:3903");
    }

    #[test]
    fn test_load_with_profile() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("multisig.toml");
        std::fs::write(
            &config_path,
            r#"
            [simulation]
            notification_delay_ms = 50

            [profiles.flaky.simulation]
            notification_delay_ms = 2000
            overwrite_contacts_on_resolve = true
        "#,
        )
        .unwrap();

        let config = load_config_from_file_with_profile(&config_path, "flaky").unwrap();
        assert_eq!(config.simulation.notification_delay_ms, 2000);
        assert!(config.simulation.overwrite_contacts_on_resolve);
    }

    #[test]
    fn test_unknown_profile_is_an_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("multisig.toml");
        std::fs::write(&config_path, "[profiles.a.wait]\ntimeout_ms = 5\n").unwrap();

        let err = load_config_from_file_with_profile(&config_path, "b").unwrap_err();
        assert!(err.to_string().contains("profile 'b' not found"));
    }
}
