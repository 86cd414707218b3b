#[path = "multisig-scenario/cli.rs"]
mod cli;

use crate::cli::Cli;
use log::{info, warn};
use multisig_core::infrastructure::config::load_app_config;
use multisig_core::infrastructure::logging::init_logger;
use multisig_service::run_scenario;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse_args();
    let config = load_app_config(args.config.as_deref(), args.profile.as_deref())?;
    let filters = args.log_level.clone().unwrap_or_else(|| config.log.filters.clone());
    init_logger(config.log.dir.as_deref(), &filters)?;

    let scenario = args.command.scenario();
    info!(
        "multisig-scenario starting scenario={} agent_url={} profile={}",
        scenario,
        config.agent.agent_url(),
        args.profile.as_deref().unwrap_or("-")
    );

    let report = match run_scenario(scenario, config).await {
        Ok(report) => report,
        Err(err) => {
            warn!("scenario failed scenario={} code={:?} error={}", scenario, err.code(), err);
            return Err(err.into());
        }
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
