//! Top-level dashboard controller
//!
//! Owns the broker session and the panels, wires queued callback events to
//! the panels and sequences contract switches.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use crossbeam_channel::Receiver;
use tokio::runtime::Handle;
use tracing::{debug, info, trace, warn};

use super::events::{event_queue, DashboardEvent};
use super::order_book::OrderBookPanel;
use super::selector::ContractSelector;
use super::status::StatusPanel;
use super::tape::TradeTapePanel;
use crate::domain::{Contract, HistoricalTick, QuoteChannel, SecurityType};
use crate::infrastructure::{DashboardConfig, MarketDataClient};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Connected,
    Shutdown,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "Unauthenticated",
            SessionState::Authenticating => "Authenticating...",
            SessionState::Connected => "Connected",
            SessionState::Shutdown => "Shutdown",
        }
    }
}

/// Start of the derivatives night session in UTC (14:45 Taipei)
fn night_session_start() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 45, 0).unwrap_or(NaiveTime::MIN)
}

/// Trading day to query history for.
///
/// Futures trade a night session that belongs to the next trading day, so
/// after the cutoff the next calendar day is queried. Every other security
/// type uses today's date.
pub fn query_date(contract: &Contract, now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    if contract.security_type == SecurityType::Future && now.time() > night_session_start() {
        today + Duration::days(1)
    } else {
        today
    }
}

/// Contract shown at startup: the preferred code when listed, else the
/// smallest futures symbol, else the smallest symbol overall
pub fn pick_default(contracts: &[Contract], preferred: Option<&str>) -> Option<Contract> {
    if let Some(code) = preferred {
        if let Some(c) = contracts.iter().find(|c| c.code == code) {
            return Some(c.clone());
        }
        warn!("[Dashboard] Configured contract {} not listed", code);
    }

    contracts
        .iter()
        .filter(|c| c.security_type == SecurityType::Future)
        .min_by(|a, b| a.symbol.cmp(&b.symbol))
        .or_else(|| contracts.iter().min_by(|a, b| a.symbol.cmp(&b.symbol)))
        .cloned()
}

pub struct Dashboard {
    client: Arc<dyn MarketDataClient>,
    runtime: Handle,
    config: DashboardConfig,
    events: Receiver<DashboardEvent>,
    state: SessionState,
    contract: Option<Contract>,
    /// Feeds currently subscribed, in subscription order
    feeds: Vec<(Contract, QuoteChannel)>,
    pending_switch: Option<Contract>,
    pub order_book: OrderBookPanel,
    pub tape: TradeTapePanel,
    pub selector: ContractSelector,
    pub status: StatusPanel,
    pub should_quit: bool,
}

impl Dashboard {
    /// Create the dashboard and register its listener with `client`
    pub fn new(client: Arc<dyn MarketDataClient>, runtime: Handle, config: DashboardConfig) -> Self {
        let (listener, events) = event_queue();
        client.set_listener(listener);

        Self {
            client,
            runtime,
            events,
            state: SessionState::Unauthenticated,
            contract: None,
            feeds: Vec::new(),
            pending_switch: None,
            order_book: OrderBookPanel::new(),
            tape: TradeTapePanel::new(config.tape_capacity),
            selector: ContractSelector::new(),
            status: StatusPanel::default(),
            should_quit: false,
            config,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_switch.is_some()
    }

    /// Log in and queue the default contract.
    ///
    /// Loading happens in [`Dashboard::process_pending`], so the caller can
    /// draw the loading notice before the history query blocks.
    pub fn start(&mut self) -> Result<()> {
        self.state = SessionState::Authenticating;
        info!("[Dashboard] Logging in as {}...", self.config.person_id);
        if let Err(e) = self
            .client
            .login(&self.config.person_id, &self.config.password)
        {
            self.state = SessionState::Unauthenticated;
            return Err(e).context("login failed");
        }
        self.state = SessionState::Connected;

        let contracts = self
            .client
            .list_contracts()
            .context("failed to list contracts")?;
        info!("[Dashboard] {} contracts available", contracts.len());
        self.selector.set_contracts(&contracts);

        let contract = pick_default(&contracts, self.config.default_contract.as_deref())
            .context("broker returned no contracts")?;
        info!("[Dashboard] Default contract {}", contract);

        self.request_switch(contract);
        Ok(())
    }

    /// Queue a switch; the caller draws once so the loading notice shows
    /// before [`Dashboard::process_pending`] blocks on the history query
    pub fn request_switch(&mut self, contract: Contract) {
        if self.contract.as_ref().map(|c| &c.code) == Some(&contract.code) {
            return;
        }
        self.status
            .set_notice(format!("Loading ticks for {}...", contract.symbol));
        self.pending_switch = Some(contract);
    }

    pub fn process_pending(&mut self) -> Result<()> {
        match self.pending_switch.take() {
            // First load after login has no feeds to release
            Some(contract) if self.contract.is_none() => self.load(contract),
            Some(contract) => self.switch_contract(contract),
            None => Ok(()),
        }
    }

    /// Replace the displayed contract.
    ///
    /// Old feeds are unsubscribed and queued events dropped before the panels
    /// are reset, and new feeds are subscribed only after reseeding.
    pub fn switch_contract(&mut self, contract: Contract) -> Result<()> {
        if self.contract.as_ref().map(|c| &c.code) == Some(&contract.code) {
            debug!("[Dashboard] {} already displayed", contract.code);
            return Ok(());
        }

        info!("[Dashboard] Switching to {}", contract);
        self.unsubscribe_all();
        self.discard_queued();
        self.load(contract)
    }

    /// Reset panels to `contract`, seed history and subscribe
    fn load(&mut self, contract: Contract) -> Result<()> {
        self.status
            .set_notice(format!("Loading ticks for {}...", contract.symbol));

        let history = self.fetch_history(&contract);
        self.contract = Some(contract.clone());
        self.order_book.change_contract(contract.clone());
        self.tape.change_contract(contract.clone(), history);
        self.selector.mark_active(&contract.code);

        if self.tape.is_empty() {
            if self.status.notice().map_or(true, |n| n.starts_with("Loading")) {
                self.status
                    .set_notice(format!("No recent ticks for {}", contract.symbol));
            }
        } else {
            self.status.clear_notice();
        }

        self.subscribe(&contract)
    }

    fn fetch_history(&mut self, contract: &Contract) -> Vec<HistoricalTick> {
        let date = query_date(contract, Utc::now());
        let count = self.tape.capacity();
        let timeout = self.config.history_timeout();
        let client = Arc::clone(&self.client);
        let target = contract.clone();

        debug!(
            "[Dashboard] Fetching last {} ticks of {} for {}",
            count, contract.code, date
        );

        let result = self.runtime.block_on(async move {
            tokio::time::timeout(
                timeout,
                tokio::task::spawn_blocking(move || client.fetch_recent_ticks(&target, date, count)),
            )
            .await
        });

        match result {
            Ok(Ok(Ok(ticks))) => {
                debug!("[Dashboard] Got {} historical ticks", ticks.len());
                ticks
            }
            Ok(Ok(Err(e))) => {
                warn!("[Dashboard] Historical ticks for {} failed: {}", contract.code, e);
                self.status.set_notice(format!("History unavailable: {}", e));
                Vec::new()
            }
            Ok(Err(e)) => {
                warn!("[Dashboard] Historical tick task failed: {}", e);
                self.status.set_notice("History unavailable");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    "[Dashboard] Historical ticks for {} timed out after {:?}",
                    contract.code, timeout
                );
                self.status
                    .set_notice(format!("History timed out after {}s", timeout.as_secs()));
                Vec::new()
            }
        }
    }

    fn subscribe(&mut self, contract: &Contract) -> Result<()> {
        for channel in QuoteChannel::ALL {
            self.client
                .subscribe(contract, channel)
                .with_context(|| format!("failed to subscribe {:?} for {}", channel, contract.code))?;
            self.feeds.push((contract.clone(), channel));
        }
        Ok(())
    }

    fn unsubscribe_all(&mut self) {
        for (contract, channel) in std::mem::take(&mut self.feeds) {
            if let Err(e) = self.client.unsubscribe(&contract, channel) {
                warn!(
                    "[Dashboard] Unsubscribe {:?} for {} failed: {}",
                    channel, contract.code, e
                );
            }
        }
    }

    /// Drop queued market data, keeping session events
    fn discard_queued(&mut self) {
        let mut dropped = 0;
        for event in self.events.try_iter() {
            match event {
                DashboardEvent::Session(ev) => self.status.on_session_event(&ev),
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!("[Dashboard] Discarded {} queued events", dropped);
        }
    }

    /// Apply every queued event; returns how many were taken off the queue
    pub fn drain_events(&mut self) -> usize {
        let events: Vec<DashboardEvent> = self.events.try_iter().collect();
        let count = events.len();
        for event in events {
            self.apply(event);
        }
        count
    }

    /// Route one event to the panels.
    ///
    /// Market data for anything but the current contract is discarded.
    pub fn apply(&mut self, event: DashboardEvent) {
        if let DashboardEvent::Session(ev) = &event {
            self.status.on_session_event(ev);
            return;
        }

        let current = match &self.contract {
            Some(c) => c.code.as_str(),
            None => return,
        };
        if event.code() != Some(current) {
            trace!("[Dashboard] Stale event for {:?} discarded", event.code());
            return;
        }

        match event {
            DashboardEvent::Tick { category, tick } => {
                trace!("[Dashboard] {:?} tick {} x {}", category, tick.close, tick.volume);
                self.tape.on_tick(&tick);
                self.order_book.update_tick(tick);
            }
            DashboardEvent::BidAsk { category, quote } => {
                trace!("[Dashboard] {:?} quote {}/{}", category, quote.best_bid(), quote.best_ask());
                self.order_book.on_bidask(&quote);
                self.tape.on_bidask(&quote);
            }
            DashboardEvent::Session(_) => {}
        }
    }

    /// Unsubscribe every feed, then release the session
    pub fn shutdown(&mut self) {
        if self.state == SessionState::Shutdown {
            return;
        }
        info!("[Dashboard] Shutting down...");

        self.unsubscribe_all();
        if self.state == SessionState::Connected {
            if let Err(e) = self.client.logout() {
                warn!("[Dashboard] Logout failed: {}", e);
            }
        }
        self.pending_switch = None;
        self.state = SessionState::Shutdown;
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}
