mod env;
mod loader;
mod types;
pub mod validation;

pub use env::{apply_legacy_env, parse_witness_ids, AGENT_HOSTNAME_ENV, CONFIG_PATH_ENV, WITNESS_IDS_ENV};
pub use loader::{load_config_from_env, load_config_from_file, load_config_from_file_with_profile};
pub use types::*;

use crate::foundation::{MultisigError, Result};
use std::path::Path;

/// Load and validate configuration; `path` falls back to `MULTISIG_CONFIG_PATH`, then to defaults + env.
pub fn load_app_config(path: Option<&Path>, profile: Option<&str>) -> Result<AppConfig> {
    let from_env = env::non_empty_env(CONFIG_PATH_ENV);
    let path = path.map(Path::to_path_buf).or_else(|| from_env.map(Into::into));
    let config = match (path, profile) {
        (Some(path), Some(profile)) => load_config_from_file_with_profile(&path, profile)?,
        (Some(path), None) => load_config_from_file(&path)?,
        (None, Some(profile)) => {
            return Err(MultisigError::ConfigError(format!("profile '{profile}' requires a config file")));
        }
        (None, None) => load_config_from_env()?,
    };
    config.validate().map_err(|errors| MultisigError::ConfigError(format!("validation failed: {:?}", errors)))?;
    Ok(config)
}
