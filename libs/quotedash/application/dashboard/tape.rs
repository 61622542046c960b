//! Trade tape panel
//!
//! Rolling newest-first window of recent trades for the current contract.

use std::collections::VecDeque;

use chrono::NaiveDateTime;

use crate::domain::{BidAsk, Contract, HistoricalTick, Tick, TickType};

/// Default number of rows kept by the tape
pub const DEFAULT_TAPE_CAPACITY: usize = 15;

/// Aggressor of a trade given the best bid at the time.
///
/// A trade at or below the best bid hit the bid; anything above it lifted
/// the offer. Without a known bid the broker-reported side is kept.
pub fn classify(price: f64, best_bid: Option<f64>, reported: TickType) -> TickType {
    match best_bid {
        Some(bid) if price <= bid => TickType::Sell,
        Some(_) => TickType::Buy,
        None => reported,
    }
}

/// Immutable tape row
#[derive(Debug, Clone, PartialEq)]
pub struct TapeRow {
    pub datetime: NaiveDateTime,
    pub bid: Option<f64>,
    pub price: f64,
    pub ask: Option<f64>,
    pub volume: u64,
    pub aggressor: TickType,
}

impl TapeRow {
    pub fn from_tick(tick: &Tick, bid: Option<f64>, ask: Option<f64>) -> Self {
        Self {
            datetime: tick.datetime,
            bid,
            price: tick.close,
            ask,
            volume: tick.volume,
            aggressor: classify(tick.close, bid, tick.tick_type),
        }
    }

    pub fn from_history(tick: &HistoricalTick) -> Self {
        let bid = Some(tick.bid_price);
        Self {
            datetime: tick.datetime,
            bid,
            price: tick.close,
            ask: Some(tick.ask_price),
            volume: tick.volume,
            aggressor: classify(tick.close, bid, tick.tick_type),
        }
    }

    /// `HH:MM:SS.mmm`
    pub fn time_label(&self) -> String {
        self.datetime.format("%H:%M:%S%.3f").to_string()
    }
}

/// Fixed-capacity ring of rows, newest at the front
#[derive(Debug, Clone)]
pub struct TapeRing {
    rows: VecDeque<TapeRow>,
    capacity: usize,
}

impl TapeRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            rows: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert as newest, evicting the oldest row on overflow
    pub fn push_front(&mut self, row: TapeRow) {
        self.rows.push_front(row);
        self.rows.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn newest(&self) -> Option<&TapeRow> {
        self.rows.front()
    }

    pub fn oldest(&self) -> Option<&TapeRow> {
        self.rows.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TapeRow> {
        self.rows.iter()
    }
}

pub struct TradeTapePanel {
    contract: Option<Contract>,
    best_bid: Option<f64>,
    best_ask: Option<f64>,
    ring: TapeRing,
    dirty: bool,
    snapshot: Vec<TapeRow>,
}

impl TradeTapePanel {
    pub fn new(capacity: usize) -> Self {
        Self {
            contract: None,
            best_bid: None,
            best_ask: None,
            ring: TapeRing::new(capacity),
            dirty: true,
            snapshot: Vec::new(),
        }
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.best_bid
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.best_ask
    }

    pub fn ring(&self) -> &TapeRing {
        &self.ring
    }

    /// Replace all rows with `history`, given in either time order.
    ///
    /// The cached quote is reset to the newest historical bid/ask.
    pub fn seed(&mut self, history: Vec<HistoricalTick>) {
        let mut history = history;
        if history
            .first()
            .zip(history.last())
            .is_some_and(|(first, last)| first.datetime < last.datetime)
        {
            history.reverse();
        }
        // Stable: equal timestamps keep their newest-first order
        history.sort_by(|a, b| b.datetime.cmp(&a.datetime));

        self.ring.clear();
        for tick in history.iter().take(self.ring.capacity()).rev() {
            self.ring.push_front(TapeRow::from_history(tick));
        }

        self.best_bid = history.first().map(|t| t.bid_price);
        self.best_ask = history.first().map(|t| t.ask_price);
        self.dirty = true;
    }

    /// Switch to `contract` and seed from its history
    pub fn change_contract(&mut self, contract: Contract, history: Vec<HistoricalTick>) {
        self.contract = Some(contract);
        self.ring.clear();
        self.best_bid = None;
        self.best_ask = None;
        self.seed(history);
    }

    pub fn on_tick(&mut self, tick: &Tick) {
        self.ring
            .push_front(TapeRow::from_tick(tick, self.best_bid, self.best_ask));
        self.dirty = true;
    }

    /// Cache the top of book; rows are only added by trades
    pub fn on_bidask(&mut self, quote: &BidAsk) {
        self.best_bid = Some(quote.best_bid());
        self.best_ask = Some(quote.best_ask());
    }

    /// Rows newest first, recomputed only after a change
    pub fn render(&mut self) -> &[TapeRow] {
        if self.dirty {
            self.snapshot = self.ring.iter().cloned().collect();
            self.dirty = false;
        }
        &self.snapshot
    }
}
