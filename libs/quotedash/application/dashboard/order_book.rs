//! Order book panel
//!
//! Keeps the latest 5x2 depth snapshot and trade for the current contract
//! and derives the depth-bar geometry on demand.

use chrono::NaiveDateTime;

use super::bar::BarSpan;
use crate::domain::{BidAsk, BookLevel, BookSide, Contract, Tick, TickType, BOOK_DEPTH};

/// Rows in the depth table: asks on top, bids below
pub const BOOK_ROWS: usize = 2 * BOOK_DEPTH;

/// Ratio shown when nothing has traded on either side
pub const NEUTRAL_RATIO: f64 = 0.5;

/// Buy-side share of `buy + sell`, neutral when both are zero
pub fn buy_ratio(buy: u64, sell: u64) -> f64 {
    let total = buy + sell;
    if total == 0 {
        NEUTRAL_RATIO
    } else {
        buy as f64 / total as f64
    }
}

/// One rendered depth row
#[derive(Debug, Clone, PartialEq)]
pub struct DepthRow {
    pub side: BookSide,
    pub level: BookLevel,
    /// Volume from the best level up to and including this one
    pub cumulative: u64,
    pub bar: BarSpan,
}

/// Last trade line under the depth table
#[derive(Debug, Clone, PartialEq)]
pub struct LastTrade {
    pub datetime: NaiveDateTime,
    pub price: f64,
    pub volume: u64,
    pub tick_type: TickType,
}

/// Renderable state of the panel
#[derive(Debug, Clone, PartialEq)]
pub struct DepthSnapshot {
    pub title: String,
    pub rows: Vec<DepthRow>,
    pub bid_total: u64,
    pub ask_total: u64,
    /// Bid share of the resting volume
    pub total_bar: BarSpan,
    pub last_trade: Option<LastTrade>,
    /// Buy-side share of traded volume
    pub buy_ratio: f64,
    pub ratio_bar: BarSpan,
}

impl DepthSnapshot {
    fn empty() -> Self {
        Self {
            title: String::new(),
            rows: Vec::new(),
            bid_total: 0,
            ask_total: 0,
            total_bar: BarSpan::default(),
            last_trade: None,
            buy_ratio: NEUTRAL_RATIO,
            ratio_bar: BarSpan::new(1.0, 0.0, NEUTRAL_RATIO),
        }
    }
}

pub struct OrderBookPanel {
    contract: Option<Contract>,
    /// Best first
    asks: [BookLevel; BOOK_DEPTH],
    /// Best first
    bids: [BookLevel; BOOK_DEPTH],
    last_tick: Option<Tick>,
    dirty: bool,
    snapshot: DepthSnapshot,
}

impl OrderBookPanel {
    pub fn new() -> Self {
        Self {
            contract: None,
            asks: [BookLevel::default(); BOOK_DEPTH],
            bids: [BookLevel::default(); BOOK_DEPTH],
            last_tick: None,
            dirty: true,
            snapshot: DepthSnapshot::empty(),
        }
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_tick(&self) -> Option<&Tick> {
        self.last_tick.as_ref()
    }

    /// Replace all ten levels; both arrays are best first
    pub fn update_book(&mut self, asks: [BookLevel; BOOK_DEPTH], bids: [BookLevel; BOOK_DEPTH]) {
        self.asks = asks;
        self.bids = bids;
        self.dirty = true;
    }

    pub fn on_bidask(&mut self, quote: &BidAsk) {
        self.update_book(quote.asks(), quote.bids());
    }

    pub fn update_tick(&mut self, tick: Tick) {
        self.last_tick = Some(tick);
        self.dirty = true;
    }

    /// Switch to `contract`, dropping every level and trade of the previous one
    pub fn change_contract(&mut self, contract: Contract) {
        self.contract = Some(contract);
        self.asks = [BookLevel::default(); BOOK_DEPTH];
        self.bids = [BookLevel::default(); BOOK_DEPTH];
        self.last_tick = None;
        self.dirty = true;
    }

    /// Current snapshot, recomputed only after a change
    pub fn render(&mut self) -> &DepthSnapshot {
        if self.dirty {
            self.snapshot = self.compute();
            self.dirty = false;
        }
        &self.snapshot
    }

    fn compute(&self) -> DepthSnapshot {
        let mut ask_cum = [0u64; BOOK_DEPTH];
        let mut bid_cum = [0u64; BOOK_DEPTH];
        let mut acc_ask = 0;
        let mut acc_bid = 0;
        for i in 0..BOOK_DEPTH {
            acc_ask += self.asks[i].volume;
            acc_bid += self.bids[i].volume;
            ask_cum[i] = acc_ask;
            bid_cum[i] = acc_bid;
        }
        let ask_total = acc_ask;
        let bid_total = acc_bid;
        let scale = ask_total.max(bid_total) as f64;

        let mut rows = Vec::with_capacity(BOOK_ROWS);

        // Worst ask on top so the best ask sits just above the best bid
        for i in (0..BOOK_DEPTH).rev() {
            let cumulative = ask_cum[i];
            rows.push(DepthRow {
                side: BookSide::Ask,
                level: self.asks[i],
                cumulative,
                bar: BarSpan::new(scale, scale - cumulative as f64, scale),
            });
        }

        for i in 0..BOOK_DEPTH {
            let cumulative = bid_cum[i];
            rows.push(DepthRow {
                side: BookSide::Bid,
                level: self.bids[i],
                cumulative,
                bar: BarSpan::new(scale, 0.0, cumulative as f64),
            });
        }

        let (last_trade, ratio) = match &self.last_tick {
            Some(tick) => (
                Some(LastTrade {
                    datetime: tick.datetime,
                    price: tick.close,
                    volume: tick.volume,
                    tick_type: tick.tick_type,
                }),
                buy_ratio(tick.bid_side_total_vol, tick.ask_side_total_vol),
            ),
            None => (None, NEUTRAL_RATIO),
        };

        DepthSnapshot {
            title: self
                .contract
                .as_ref()
                .map(|c| c.symbol.clone())
                .unwrap_or_default(),
            rows,
            bid_total,
            ask_total,
            total_bar: BarSpan::new((bid_total + ask_total) as f64, 0.0, bid_total as f64),
            last_trade,
            buy_ratio: ratio,
            ratio_bar: BarSpan::new(1.0, 0.0, ratio),
        }
    }
}

impl Default for OrderBookPanel {
    fn default() -> Self {
        Self::new()
    }
}
