use multisig_core::infrastructure::config::{load_app_config, AGENT_HOSTNAME_ENV, CONFIG_PATH_ENV, WITNESS_IDS_ENV};
use multisig_core::MultisigError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

const CONFIG_TOML: &str = r#"
[agent]
hostname = "keria.internal"
agent_port = 4901
boot_port = 4903

[witnesses]
ids = ["BBilc4-L3tFUnfM_wJr4S4OJanAv_VmF_dJNN6vkf2Ha", "BLskRTInXnMxWaGqcpSyMgo0nYbalW99cGZESrz3zapM", "BIKKuvBwpmDVA4Ds-EpL5bt9OqPzWPja2LigFYZN2YfX"]

[wait]
timeout_ms = 30000

[profiles.fast.wait]
max_sleep_ms = 200

[profiles.fast.simulation]
operation_latency_ms = 5
"#;

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("multisig.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn test_config_loading_when_file_given_then_values_override_defaults() {
    let _guard = lock_env();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), CONFIG_TOML);

    let config = load_app_config(Some(&path), None).expect("load config");
    assert_eq!(config.agent.agent_url(), "http://keria.internal:4901");
    assert_eq!(config.witnesses.ids.len(), 3);
    assert_eq!(config.witnesses.toad(), 2);
    assert_eq!(config.wait.timeout_ms, 30_000);
    assert_eq!(config.wait.max_sleep_ms, 1_000);
}

#[test]
fn test_config_loading_when_profile_selected_then_profile_overrides_apply() {
    let _guard = lock_env();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), CONFIG_TOML);

    let config = load_app_config(Some(&path), Some("fast")).expect("load profile");
    assert_eq!(config.wait.max_sleep_ms, 200);
    assert_eq!(config.wait.timeout_ms, 30_000);
    assert_eq!(config.simulation.operation_latency_ms, 5);
    assert_eq!(config.agent.hostname, "keria.internal");
}

#[test]
fn test_config_loading_when_profile_missing_then_config_error() {
    let _guard = lock_env();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), CONFIG_TOML);

    let err = load_app_config(Some(&path), Some("slow")).expect_err("unknown profile");
    assert!(matches!(err, MultisigError::ConfigError(_)));
}

#[test]
fn test_config_loading_when_legacy_env_set_then_agent_and_witnesses_follow_env() {
    let _guard = lock_env();
    env::remove_var(CONFIG_PATH_ENV);
    env::set_var(AGENT_HOSTNAME_ENV, "keria");
    env::set_var(WITNESS_IDS_ENV, "BWit1;BWit2");

    let config = load_app_config(None, None);

    env::remove_var(AGENT_HOSTNAME_ENV);
    env::remove_var(WITNESS_IDS_ENV);

    let config = config.expect("load from env");
    assert_eq!(config.agent.hostname, "keria");
    assert_eq!(config.witnesses.ids, vec!["BWit1".to_string(), "BWit2".to_string()]);
    assert_eq!(config.witnesses.toad(), 1);
}

#[test]
fn test_config_loading_when_values_are_inconsistent_then_validation_fails() {
    let _guard = lock_env();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), "[wait]\nmin_sleep_ms = 5000\nmax_sleep_ms = 100\n");

    let err = load_app_config(Some(&path), None).expect_err("min above max");
    assert!(matches!(err, MultisigError::ConfigError(ref message) if message.contains("min_sleep_ms")));
}
