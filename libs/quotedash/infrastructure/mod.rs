//! Infrastructure Layer
//!
//! Contains implementations of external interfaces (broker client, config, logging).
//! This layer depends on the domain layer but not on the application layer.

pub mod client;
pub mod config;
pub mod logging;

pub use client::{
    ClientError, MarketDataClient, MarketDataListener, SimulatedClient, SimulationConfig,
};
pub use config::{ConfigError, DashboardConfig};
pub use logging::init_tracing;
