pub mod assertions;
pub mod config;
