//! Scenario runner.
//!
//! Every scenario boots its own [`ScenarioWorld`], drives the participants through
//! the application layer and returns a [`ScenarioReport`] of what each member ended with.

mod catch_up;
mod contacts;
mod late_join;
mod report;
mod rotate_in;
mod world;

pub use report::ScenarioReport;
pub use world::{member_alias, ScenarioWorld, GROUP_ALIAS, REGISTRY_NAME};

use log::info;
use multisig_core::application::Participant;
use multisig_core::infrastructure::config::AppConfig;
use multisig_core::{MultisigError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// Two members issue a credential; the third catches up from its mailbox.
    CatchUp,
    /// A fourth member proposes the already accepted group inception.
    LateJoin,
    /// Contact metadata survives re-resolution by an overwriting agent.
    Contacts,
    /// A deleted contact is resolved again and becomes visible after a delay.
    ContactRecreate,
    /// A group rotates a new member in; every member joins the rotation.
    RotateIn,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [Scenario::CatchUp, Scenario::LateJoin, Scenario::Contacts, Scenario::ContactRecreate, Scenario::RotateIn];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::CatchUp => "catch-up",
            Scenario::LateJoin => "late-join",
            Scenario::Contacts => "contacts",
            Scenario::ContactRecreate => "contact-recreate",
            Scenario::RotateIn => "rotate-in",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = MultisigError;

    fn from_str(value: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == value)
            .ok_or_else(|| MultisigError::InvalidArgument(format!("unknown scenario '{value}'")))
    }
}

/// Run `scenario` in a fresh world built from `config`.
pub async fn run_scenario(scenario: Scenario, config: AppConfig) -> Result<ScenarioReport> {
    let world = ScenarioWorld::new(config);
    let started = Instant::now();
    info!("scenario: start name={scenario}");
    let report = match scenario {
        Scenario::CatchUp => catch_up::run(&world).await,
        Scenario::LateJoin => late_join::run(&world).await,
        Scenario::Contacts => contacts::run_retention(&world).await,
        Scenario::ContactRecreate => contacts::run_recreate(&world).await,
        Scenario::RotateIn => rotate_in::run(&world).await,
    }?;
    info!("scenario: done name={} elapsed_ms={} {}", scenario, started.elapsed().as_millis(), report.summary());
    Ok(report)
}

/// Group prefix, registry count and credential count of every member.
async fn collect_group_state(scenario: Scenario, members: &[&Participant]) -> Result<ScenarioReport> {
    let mut report = ScenarioReport::new(scenario.as_str());
    for member in members {
        let alias = member.alias().to_string();
        let group = member.agent().get_identifier(GROUP_ALIAS).await?;
        report.registries.insert(alias.clone(), member.list_registries(GROUP_ALIAS).await?.len());
        report.credentials.insert(alias.clone(), member.list_credentials(GROUP_ALIAS).await?.len());
        report.group_prefixes.insert(alias, group.prefix);
    }
    Ok(report)
}
