//! Domain Layer
//!
//! Contains pure market-data entities.
//! This layer has no dependencies on infrastructure or application layers.

pub mod contract;
pub mod quote;

pub use contract::{Contract, Exchange, QuoteCategory, SecurityType};
pub use quote::{
    BidAsk, BookLevel, BookSide, HistoricalTick, QuoteChannel, SessionEvent, Tick, TickType,
    BOOK_DEPTH,
};
