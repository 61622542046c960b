//! Simulated broker
//!
//! In-process stand-in for the broker SDK used in simulation mode. Quotes
//! follow a random walk per contract and are pushed from a tokio task, so
//! listeners see them on a runtime worker thread just like real callbacks.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ClientError, MarketDataClient, MarketDataListener, Result};
use crate::domain::{
    BidAsk, Contract, Exchange, HistoricalTick, QuoteCategory, QuoteChannel, SecurityType,
    SessionEvent, Tick, TickType,
};

/// Event code the broker uses to acknowledge (un)subscription
const EVENT_SUBSCRIPTION: i32 = 16;

/// Tuning for the simulated feed
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Time between generated quote batches
    pub quote_interval: Duration,
    /// Fixed RNG seed for reproducible feeds
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            quote_interval: Duration::from_millis(250),
            seed: None,
        }
    }
}

/// Random-walk state of one simulated contract
#[derive(Debug, Clone)]
struct SimBook {
    best_bid: f64,
    tick_size: f64,
    total_volume: u64,
    buy_volume: u64,
    sell_volume: u64,
}

impl SimBook {
    fn new(reference: f64, tick_size: f64) -> Self {
        Self {
            best_bid: reference,
            tick_size,
            total_volume: 0,
            buy_volume: 0,
            sell_volume: 0,
        }
    }

    fn best_ask(&self) -> f64 {
        self.best_bid + self.tick_size
    }

    fn drift(&mut self, rng: &mut StdRng) {
        let roll: f64 = rng.gen();
        if roll < 0.15 {
            self.best_bid -= self.tick_size;
        } else if roll > 0.85 {
            self.best_bid += self.tick_size;
        }
        if self.best_bid < self.tick_size {
            self.best_bid = self.tick_size;
        }
    }

    fn quote(&self, code: &str, now: NaiveDateTime, rng: &mut StdRng) -> BidAsk {
        BidAsk {
            code: code.to_string(),
            datetime: now,
            bid_price: std::array::from_fn(|i| self.best_bid - self.tick_size * i as f64),
            bid_volume: std::array::from_fn(|_| rng.gen_range(1..=30)),
            ask_price: std::array::from_fn(|i| self.best_ask() + self.tick_size * i as f64),
            ask_volume: std::array::from_fn(|_| rng.gen_range(1..=30)),
        }
    }

    fn trade(&mut self, code: &str, now: NaiveDateTime, rng: &mut StdRng) -> Tick {
        let volume = rng.gen_range(1..=10);
        let tick_type = if rng.gen_bool(0.5) {
            TickType::Buy
        } else {
            TickType::Sell
        };
        let close = match tick_type {
            TickType::Buy => self.best_ask(),
            _ => self.best_bid,
        };

        self.total_volume += volume;
        match tick_type {
            TickType::Buy => self.buy_volume += volume,
            _ => self.sell_volume += volume,
        }

        Tick {
            code: code.to_string(),
            datetime: now,
            close,
            volume,
            total_volume: self.total_volume,
            tick_type,
            bid_side_total_vol: self.buy_volume,
            ask_side_total_vol: self.sell_volume,
        }
    }
}

struct SimState {
    logged_in: bool,
    subscriptions: HashSet<(String, QuoteChannel)>,
    books: HashMap<String, SimBook>,
    rng: StdRng,
}

/// State shared between the client handle and its feed task
struct Shared {
    contracts: Vec<Contract>,
    listener: RwLock<Option<Arc<dyn MarketDataListener>>>,
    state: Mutex<SimState>,
    running: AtomicBool,
}

impl Shared {
    fn emit_session(&self, event: SessionEvent) {
        if let Some(listener) = self.listener.read().as_ref() {
            listener.on_session_event(event);
        }
    }

    fn contract(&self, code: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.code == code)
    }

    /// Generate one batch of quotes for every active subscription.
    ///
    /// Events are dispatched while the state lock is held so an unsubscribe
    /// returning means no further event for that feed will be produced.
    fn step(&self) {
        let mut state = self.state.lock();
        if !state.logged_in || state.subscriptions.is_empty() {
            return;
        }

        let listener = match self.listener.read().clone() {
            Some(l) => l,
            None => return,
        };

        let now = Local::now().naive_local();
        let mut codes: Vec<String> = state.subscriptions.iter().map(|(c, _)| c.clone()).collect();
        codes.sort();
        codes.dedup();

        let SimState {
            subscriptions,
            books,
            rng,
            ..
        } = &mut *state;

        for code in codes {
            let Some(contract) = self.contract(&code) else {
                continue;
            };
            let Some(book) = books.get_mut(&code) else {
                continue;
            };
            let category = contract.quote_category();

            if subscriptions.contains(&(code.clone(), QuoteChannel::BidAsk)) {
                book.drift(rng);
                let quote = book.quote(&code, now, rng);
                match category {
                    QuoteCategory::Stock => listener.on_bidask_stk(quote),
                    QuoteCategory::FuturesOption => listener.on_bidask_fop(quote),
                }
            }

            if subscriptions.contains(&(code.clone(), QuoteChannel::Tick)) && rng.gen_bool(0.6) {
                let tick = book.trade(&code, now, rng);
                match category {
                    QuoteCategory::Stock => listener.on_tick_stk(tick),
                    QuoteCategory::FuturesOption => listener.on_tick_fop(tick),
                }
            }
        }
    }
}

/// Contract catalog with reference price and tick size
fn catalog() -> Vec<(Contract, f64, f64)> {
    vec![
        (Contract::stock(Exchange::TSE, "2330", "TSMC"), 600.0, 1.0),
        (Contract::stock(Exchange::TSE, "2317", "Hon Hai"), 105.0, 0.5),
        (Contract::stock(Exchange::TSE, "2609", "Yang Ming"), 140.0, 0.5),
        (Contract::stock(Exchange::OTC, "6488", "GlobalWafers"), 650.0, 1.0),
        (Contract::future("TXFJ1", "TXF202110", "TAIEX Futures 10", "TXF"), 16411.0, 1.0),
        (Contract::future("TXFK1", "TXF202111", "TAIEX Futures 11", "TXF"), 16420.0, 1.0),
        (Contract::future("TXFR1", "TXFR1", "TAIEX Futures R1", "TXF"), 16411.0, 1.0),
        (Contract::future("MXFJ1", "MXF202110", "Mini TAIEX Futures 10", "MXF"), 16411.0, 1.0),
        (
            Contract::new(
                Exchange::TAIFEX,
                "TXO16400J1",
                "TXO20211016400C",
                "TAIEX Option 10 16400C",
                "TXO",
                SecurityType::Option,
            ),
            185.0,
            1.0,
        ),
    ]
}

/// In-process broker for simulation mode
pub struct SimulatedClient {
    runtime: Handle,
    config: SimulationConfig,
    shared: Arc<Shared>,
    feed_task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedClient {
    pub fn new(runtime: Handle, config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let entries = catalog();
        let books = entries
            .iter()
            .map(|(c, price, tick)| (c.code.clone(), SimBook::new(*price, *tick)))
            .collect();
        let contracts = entries.into_iter().map(|(c, _, _)| c).collect();

        let shared = Arc::new(Shared {
            contracts,
            listener: RwLock::new(None),
            state: Mutex::new(SimState {
                logged_in: false,
                subscriptions: HashSet::new(),
                books,
                rng,
            }),
            running: AtomicBool::new(false),
        });

        Self {
            runtime,
            config,
            shared,
            feed_task: Mutex::new(None),
        }
    }

    /// Number of active (contract, channel) subscriptions
    pub fn subscription_count(&self) -> usize {
        self.shared.state.lock().subscriptions.len()
    }

    fn ensure_logged_in(&self) -> Result<()> {
        if self.shared.state.lock().logged_in {
            Ok(())
        } else {
            Err(ClientError::NotConnected("login required".to_string()))
        }
    }

    fn known(&self, contract: &Contract) -> Result<()> {
        if self.shared.contract(&contract.code).is_some() {
            Ok(())
        } else {
            Err(ClientError::UnknownContract(contract.code.clone()))
        }
    }

    fn spawn_feed(&self) {
        self.shared.running.store(true, Ordering::Release);
        let shared = Arc::clone(&self.shared);
        let interval = self.config.quote_interval;

        let handle = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            while shared.running.load(Ordering::Acquire) {
                ticker.tick().await;
                shared.step();
            }
            debug!("[SimBroker] Feed task stopped");
        });

        *self.feed_task.lock() = Some(handle);
    }
}

impl MarketDataClient for SimulatedClient {
    fn login(&self, person_id: &str, password: &str) -> Result<()> {
        if person_id.is_empty() || password.is_empty() {
            return Err(ClientError::AuthenticationFailed(
                "person_id and password are required".to_string(),
            ));
        }

        {
            let mut state = self.shared.state.lock();
            if state.logged_in {
                return Ok(());
            }
            state.logged_in = true;
        }

        info!("[SimBroker] Logged in as {}", person_id);
        self.shared
            .emit_session(SessionEvent::new(0, 0, "Session up", "Session connect"));
        self.spawn_feed();
        Ok(())
    }

    fn list_contracts(&self) -> Result<Vec<Contract>> {
        self.ensure_logged_in()?;
        Ok(self.shared.contracts.clone())
    }

    fn fetch_recent_ticks(
        &self,
        contract: &Contract,
        date: NaiveDate,
        count: usize,
    ) -> Result<Vec<HistoricalTick>> {
        self.ensure_logged_in()?;
        self.known(contract)?;

        let mut state = self.shared.state.lock();
        let SimState { books, rng, .. } = &mut *state;
        let Some(book) = books.get(&contract.code) else {
            return Err(ClientError::UnknownContract(contract.code.clone()));
        };

        let now = Local::now().naive_local();
        let mut ts = if date == now.date() {
            now
        } else {
            date.and_hms_opt(13, 45, 0).unwrap_or(now)
        };

        let mut best_bid = book.best_bid;
        let mut ticks = Vec::with_capacity(count);
        for _ in 0..count {
            let tick_type = if rng.gen_bool(0.5) {
                TickType::Buy
            } else {
                TickType::Sell
            };
            let ask = best_bid + book.tick_size;
            ticks.push(HistoricalTick {
                datetime: ts,
                close: if tick_type == TickType::Buy { ask } else { best_bid },
                volume: rng.gen_range(1..=10),
                bid_price: best_bid,
                ask_price: ask,
                tick_type,
            });

            ts -= chrono::Duration::milliseconds(rng.gen_range(100..3000));
            if rng.gen_bool(0.2) {
                best_bid += if rng.gen_bool(0.5) { book.tick_size } else { -book.tick_size };
            }
        }

        // Broker returns oldest first
        ticks.reverse();
        debug!(
            "[SimBroker] Served {} historical ticks for {} on {}",
            ticks.len(),
            contract.code,
            date
        );
        Ok(ticks)
    }

    fn subscribe(&self, contract: &Contract, channel: QuoteChannel) -> Result<()> {
        self.ensure_logged_in()?;
        self.known(contract)?;

        let inserted = self
            .shared
            .state
            .lock()
            .subscriptions
            .insert((contract.code.clone(), channel));
        if !inserted {
            warn!("[SimBroker] {} already subscribed", contract.topic(channel.prefix()));
        }

        self.shared.emit_session(SessionEvent::new(
            200,
            EVENT_SUBSCRIPTION,
            contract.topic(channel.prefix()),
            "Subscribe or Unsubscribe ok",
        ));
        Ok(())
    }

    fn unsubscribe(&self, contract: &Contract, channel: QuoteChannel) -> Result<()> {
        self.ensure_logged_in()?;

        self.shared
            .state
            .lock()
            .subscriptions
            .remove(&(contract.code.clone(), channel));

        self.shared.emit_session(SessionEvent::new(
            200,
            EVENT_SUBSCRIPTION,
            contract.topic(channel.prefix()),
            "Subscribe or Unsubscribe ok",
        ));
        Ok(())
    }

    fn set_listener(&self, listener: Arc<dyn MarketDataListener>) {
        *self.shared.listener.write() = Some(listener);
    }

    fn logout(&self) -> Result<()> {
        {
            let mut state = self.shared.state.lock();
            if !state.logged_in {
                return Ok(());
            }
            state.logged_in = false;
            state.subscriptions.clear();
        }

        self.shared.running.store(false, Ordering::Release);
        if let Some(task) = self.feed_task.lock().take() {
            task.abort();
        }

        info!("[SimBroker] Logged out");
        Ok(())
    }
}

impl Drop for SimulatedClient {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(task) = self.feed_task.lock().take() {
            task.abort();
        }
    }
}
