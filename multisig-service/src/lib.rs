//! End-to-end multisig scenarios driven against the in-process identity agent.

pub mod scenario;

pub use scenario::{run_scenario, Scenario, ScenarioReport, ScenarioWorld};
