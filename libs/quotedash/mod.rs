//! Quote dashboard library
//!
//! Terminal dashboard showing live order-book depth and trade ticks for a
//! single contract, fed by a broker market-data client.

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::dashboard::{ui, Dashboard, DashboardEvent, SessionState};
pub use domain::{BidAsk, BookLevel, Contract, HistoricalTick, QuoteChannel, SessionEvent, Tick, TickType};
pub use infrastructure::{
    init_tracing, ClientError, ConfigError, DashboardConfig, MarketDataClient, MarketDataListener,
    SimulatedClient, SimulationConfig,
};
