//! Common test utilities for dashboard integration tests
//!
//! Provides a recording fake broker and quote fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::{Mutex, RwLock};

use quotedash::domain::{
    BidAsk, Contract, Exchange, HistoricalTick, QuoteCategory, QuoteChannel, SessionEvent, Tick,
    TickType,
};
use quotedash::infrastructure::client::Result;
use quotedash::{ClientError, MarketDataClient, MarketDataListener};

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Broker double that records every call and lets tests push events
pub struct FakeClient {
    contracts: Vec<Contract>,
    history: Mutex<HashMap<String, std::result::Result<Vec<HistoricalTick>, String>>>,
    history_delay: Mutex<Option<Duration>>,
    listener: RwLock<Option<Arc<dyn MarketDataListener>>>,
    calls: Mutex<Vec<String>>,
    reject_login: bool,
}

impl FakeClient {
    pub fn new(contracts: Vec<Contract>) -> Self {
        Self {
            contracts,
            history: Mutex::new(HashMap::new()),
            history_delay: Mutex::new(None),
            listener: RwLock::new(None),
            calls: Mutex::new(Vec::new()),
            reject_login: false,
        }
    }

    pub fn rejecting_login(contracts: Vec<Contract>) -> Self {
        Self {
            reject_login: true,
            ..Self::new(contracts)
        }
    }

    pub fn set_history(&self, code: &str, ticks: Vec<HistoricalTick>) {
        self.history.lock().insert(code.to_string(), Ok(ticks));
    }

    pub fn fail_history(&self, code: &str, reason: &str) {
        self.history.lock().insert(code.to_string(), Err(reason.to_string()));
    }

    pub fn delay_history(&self, delay: Duration) {
        *self.history_delay.lock() = Some(delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn listener(&self) -> Arc<dyn MarketDataListener> {
        self.listener
            .read()
            .clone()
            .expect("listener registered")
    }

    fn category(&self, code: &str) -> QuoteCategory {
        self.contracts
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.quote_category())
            .unwrap_or(QuoteCategory::Stock)
    }

    /// Push a trade as the broker callback thread would
    pub fn push_tick(&self, tick: Tick) {
        match self.category(&tick.code) {
            QuoteCategory::Stock => self.listener().on_tick_stk(tick),
            QuoteCategory::FuturesOption => self.listener().on_tick_fop(tick),
        }
    }

    pub fn push_bidask(&self, quote: BidAsk) {
        match self.category(&quote.code) {
            QuoteCategory::Stock => self.listener().on_bidask_stk(quote),
            QuoteCategory::FuturesOption => self.listener().on_bidask_fop(quote),
        }
    }

    pub fn push_session(&self, event: SessionEvent) {
        self.listener().on_session_event(event);
    }
}

impl MarketDataClient for FakeClient {
    fn login(&self, person_id: &str, _password: &str) -> Result<()> {
        self.record(format!("login {}", person_id));
        if self.reject_login {
            return Err(ClientError::AuthenticationFailed("bad password".to_string()));
        }
        Ok(())
    }

    fn list_contracts(&self) -> Result<Vec<Contract>> {
        self.record("list_contracts".to_string());
        Ok(self.contracts.clone())
    }

    fn fetch_recent_ticks(
        &self,
        contract: &Contract,
        date: NaiveDate,
        count: usize,
    ) -> Result<Vec<HistoricalTick>> {
        self.record(format!("fetch {} {} {}", contract.code, date, count));
        if let Some(delay) = *self.history_delay.lock() {
            std::thread::sleep(delay);
        }
        match self.history.lock().get(&contract.code) {
            Some(Ok(ticks)) => Ok(ticks.clone()),
            Some(Err(reason)) => Err(ClientError::Other(reason.clone())),
            None => Ok(Vec::new()),
        }
    }

    fn subscribe(&self, contract: &Contract, channel: QuoteChannel) -> Result<()> {
        self.record(format!("subscribe {} {:?}", contract.code, channel));
        Ok(())
    }

    fn unsubscribe(&self, contract: &Contract, channel: QuoteChannel) -> Result<()> {
        self.record(format!("unsubscribe {} {:?}", contract.code, channel));
        Ok(())
    }

    fn set_listener(&self, listener: Arc<dyn MarketDataListener>) {
        *self.listener.write() = Some(listener);
    }

    fn logout(&self) -> Result<()> {
        self.record("logout".to_string());
        Ok(())
    }
}

pub mod fixtures {
    //! Test fixtures for common data types

    use super::*;

    pub fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 10, 4)
            .unwrap()
            .and_hms_opt(10, 10, 15)
            .unwrap()
    }

    /// `base_time() + secs`
    pub fn at(secs: i64) -> NaiveDateTime {
        base_time() + chrono::Duration::seconds(secs)
    }

    pub fn stock() -> Contract {
        Contract::stock(Exchange::TSE, "2330", "TSMC")
    }

    pub fn future() -> Contract {
        Contract::future("TXFJ1", "TXF202110", "TAIEX Futures 10", "TXF")
    }

    pub fn later_future() -> Contract {
        Contract::future("TXFK1", "TXF202111", "TAIEX Futures 11", "TXF")
    }

    pub fn tick(code: &str, secs: i64, close: f64, volume: u64) -> Tick {
        Tick {
            code: code.to_string(),
            datetime: at(secs),
            close,
            volume,
            total_volume: volume,
            tick_type: TickType::Buy,
            bid_side_total_vol: 3,
            ask_side_total_vol: 1,
        }
    }

    pub fn bidask(code: &str, best_bid: f64, best_ask: f64) -> BidAsk {
        BidAsk {
            code: code.to_string(),
            datetime: base_time(),
            bid_price: std::array::from_fn(|i| best_bid - i as f64),
            bid_volume: [2, 7, 7, 21, 9],
            ask_price: std::array::from_fn(|i| best_ask + i as f64),
            ask_volume: [8, 12, 19, 9, 12],
        }
    }

    /// `n` historical ticks at seconds `first..first+n`, oldest first
    pub fn history(first: i64, n: usize, close: f64) -> Vec<HistoricalTick> {
        (0..n as i64)
            .map(|i| HistoricalTick {
                datetime: at(first + i),
                close,
                volume: 1,
                bid_price: close - 1.0,
                ask_price: close + 1.0,
                tick_type: TickType::Buy,
            })
            .collect()
    }
}
