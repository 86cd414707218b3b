use clap::{Parser, Subcommand};
use multisig_service::Scenario;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "multisig-scenario")]
#[command(about = "Run multisig group scenarios against the simulated identity agent", long_about = None)]
pub struct Cli {
    /// Path to configuration file (falls back to MULTISIG_CONFIG_PATH)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Apply `[profiles.<name>]` overrides from the configuration file
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Log filters, e.g. `debug` or `info,multisig_core::application=trace`
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Command {
    /// Third member joins a credential issuance it slept through
    CatchUp,
    /// Fourth member proposes an already accepted group inception
    LateJoin,
    /// Contact metadata survives an overwriting re-resolution
    Contacts,
    /// Deleted contact is resolved again
    ContactRecreate,
    /// Group rotates in a new signing member
    RotateIn,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Command {
    pub fn scenario(self) -> Scenario {
        match self {
            Command::CatchUp => Scenario::CatchUp,
            Command::LateJoin => Scenario::LateJoin,
            Command::Contacts => Scenario::Contacts,
            Command::ContactRecreate => Scenario::ContactRecreate,
            Command::RotateIn => Scenario::RotateIn,
        }
    }
}
