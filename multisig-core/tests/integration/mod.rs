//! Participant-level integration tests against the simulated agent hub.

mod catch_up;
mod config_loading;
mod contacts;
mod group_formation;
mod roles;
