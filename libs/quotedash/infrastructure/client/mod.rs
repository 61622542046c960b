//! Market data client abstraction
//!
//! The broker SDK is an opaque collaborator: it owns the session, the wire
//! protocol and reconnection. The dashboard only sees this trait and pushes
//! arriving through a [`MarketDataListener`].

pub mod simulated;

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{BidAsk, Contract, HistoricalTick, QuoteChannel, SessionEvent, Tick};

pub use simulated::{SimulatedClient, SimulationConfig};

/// Errors surfaced by a market data client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Login rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Operation requires a logged-in session
    #[error("Not connected: {0}")]
    NotConnected(String),

    /// Contract not known to the broker
    #[error("Unknown contract: {0}")]
    UnknownContract(String),

    /// Request did not complete in time
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Generic error
    #[error("Error: {0}")]
    Other(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Push interface for real-time events.
///
/// Methods may be invoked from any thread; implementations must not touch
/// render state directly.
pub trait MarketDataListener: Send + Sync {
    /// Session or connection level event, raw values
    fn on_session_event(&self, event: SessionEvent);

    /// Trade tick for an equity or index
    fn on_tick_stk(&self, tick: Tick);

    /// Trade tick for a future or option
    fn on_tick_fop(&self, tick: Tick);

    /// Book update for an equity or index
    fn on_bidask_stk(&self, quote: BidAsk);

    /// Book update for a future or option
    fn on_bidask_fop(&self, quote: BidAsk);
}

/// Surface of the broker SDK consumed by the dashboard
pub trait MarketDataClient: Send + Sync {
    fn login(&self, person_id: &str, password: &str) -> Result<()>;

    fn list_contracts(&self) -> Result<Vec<Contract>>;

    /// Last `count` trades of `contract` on trading day `date`, oldest first
    fn fetch_recent_ticks(
        &self,
        contract: &Contract,
        date: NaiveDate,
        count: usize,
    ) -> Result<Vec<HistoricalTick>>;

    fn subscribe(&self, contract: &Contract, channel: QuoteChannel) -> Result<()>;

    fn unsubscribe(&self, contract: &Contract, channel: QuoteChannel) -> Result<()>;

    /// Register the receiver of push events, replacing any previous one
    fn set_listener(&self, listener: Arc<dyn MarketDataListener>);

    fn logout(&self) -> Result<()>;
}
