//! different utility modules used throughout the project
/// quiz settings from TOML
pub mod config;
/// terminal logger setup
pub mod logger;
