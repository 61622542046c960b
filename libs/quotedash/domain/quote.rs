//! Quote domain entities
//!
//! Prices use floats for readability, volumes are whole lots.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Number of price levels published per side
pub const BOOK_DEPTH: usize = 5;

// =============================================================================
// Book levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    Bid,
    Ask,
}

/// One price/volume pair at a depth rank
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub volume: u64,
}

impl BookLevel {
    pub fn new(price: f64, volume: u64) -> Self {
        Self { price, volume }
    }

    pub fn is_empty(&self) -> bool {
        self.volume == 0 && self.price == 0.0
    }
}

/// Top-of-book snapshot pushed on the BidAsk channel.
/// Both sides are ordered best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidAsk {
    pub code: String,
    pub datetime: NaiveDateTime,
    pub bid_price: [f64; BOOK_DEPTH],
    pub bid_volume: [u64; BOOK_DEPTH],
    pub ask_price: [f64; BOOK_DEPTH],
    pub ask_volume: [u64; BOOK_DEPTH],
}

impl BidAsk {
    pub fn bids(&self) -> [BookLevel; BOOK_DEPTH] {
        std::array::from_fn(|i| BookLevel::new(self.bid_price[i], self.bid_volume[i]))
    }

    pub fn asks(&self) -> [BookLevel; BOOK_DEPTH] {
        std::array::from_fn(|i| BookLevel::new(self.ask_price[i], self.ask_volume[i]))
    }

    pub fn best_bid(&self) -> f64 {
        self.bid_price[0]
    }

    pub fn best_ask(&self) -> f64 {
        self.ask_price[0]
    }
}

// =============================================================================
// Ticks
// =============================================================================

/// Aggressor side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TickType {
    #[default]
    Unknown,
    /// Trade lifted the offer
    Buy,
    /// Trade hit the bid
    Sell,
}

impl fmt::Display for TickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TickType::Unknown => "-",
            TickType::Buy => "BUY",
            TickType::Sell => "SELL",
        };
        f.write_str(s)
    }
}

/// A single executed trade pushed on the Tick channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub code: String,
    pub datetime: NaiveDateTime,
    pub close: f64,
    pub volume: u64,
    pub total_volume: u64,
    pub tick_type: TickType,
    /// Cumulative volume traded at the offer this session
    pub bid_side_total_vol: u64,
    /// Cumulative volume traded at the bid this session
    pub ask_side_total_vol: u64,
}

/// Row of a historical "last N ticks" query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTick {
    pub datetime: NaiveDateTime,
    pub close: f64,
    pub volume: u64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub tick_type: TickType,
}

// =============================================================================
// Session
// =============================================================================

/// Raw session/connection event from the broker, displayed verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub resp_code: i32,
    pub event_code: i32,
    pub info: String,
    pub event: String,
}

impl SessionEvent {
    pub fn new(resp_code: i32, event_code: i32, info: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            resp_code,
            event_code,
            info: info.into(),
            event: event.into(),
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response Code: {} | Event Code: {} | Info: {} | Event: {}",
            self.resp_code, self.event_code, self.info, self.event
        )
    }
}

/// Market-data feed kinds a contract can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteChannel {
    Tick,
    BidAsk,
}

impl QuoteChannel {
    pub const ALL: [QuoteChannel; 2] = [QuoteChannel::BidAsk, QuoteChannel::Tick];

    pub fn prefix(&self) -> &'static str {
        match self {
            QuoteChannel::Tick => "TIC",
            QuoteChannel::BidAsk => "QUO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bidask() -> BidAsk {
        BidAsk {
            code: "TXFJ1".to_string(),
            datetime: NaiveDate::from_ymd_opt(2021, 10, 4)
                .unwrap()
                .and_hms_milli_opt(20, 0, 45, 939)
                .unwrap(),
            bid_price: [16411.0, 16410.0, 16409.0, 16408.0, 16407.0],
            bid_volume: [2, 7, 7, 21, 9],
            ask_price: [16413.0, 16414.0, 16415.0, 16416.0, 16417.0],
            ask_volume: [8, 12, 19, 9, 12],
        }
    }

    #[test]
    fn test_bidask_accessors() {
        let q = sample_bidask();
        assert_eq!(q.best_bid(), 16411.0);
        assert_eq!(q.best_ask(), 16413.0);
        assert_eq!(q.bids()[3], BookLevel::new(16408.0, 21));
    }

    #[test]
    fn test_tick_type_display() {
        assert_eq!(TickType::Buy.to_string(), "BUY");
        assert_eq!(TickType::Sell.to_string(), "SELL");
        assert_eq!(TickType::default().to_string(), "-");
    }

    #[test]
    fn test_session_event_display_is_verbatim() {
        let ev = SessionEvent::new(0, 0, "Session up", "Session connect");
        assert_eq!(
            ev.to_string(),
            "Response Code: 0 | Event Code: 0 | Info: Session up | Event: Session connect"
        );
    }
}
