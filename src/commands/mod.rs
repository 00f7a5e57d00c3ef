//! Command implementations for the CLI
//!
//! - start: Start the HTTP server
//! - stop: Stop a running instance
//! - reload: Make a running instance reload the tariff dataset
//! - test: Test configuration and dataset
//! - config: Configuration display and validation
//! - calculate: One-off bill calculation from a JSON file
//! - tariffs: Query the tariff dataset

pub mod calculate;
pub mod config;
pub mod reload;
pub mod start;
pub mod stop;
pub mod tariffs;
