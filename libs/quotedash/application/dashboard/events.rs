//! Callback-to-UI handoff
//!
//! Broker callbacks run on foreign threads. [`QueueListener`] turns each one
//! into a [`DashboardEvent`] on a channel drained by the UI loop, which is
//! the only place panel state is mutated.

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::trace;

use crate::domain::{BidAsk, QuoteCategory, SessionEvent, Tick};
use crate::infrastructure::MarketDataListener;

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    Session(SessionEvent),
    Tick {
        category: QuoteCategory,
        tick: Tick,
    },
    BidAsk {
        category: QuoteCategory,
        quote: BidAsk,
    },
}

impl DashboardEvent {
    /// Contract code of a market-data event
    pub fn code(&self) -> Option<&str> {
        match self {
            DashboardEvent::Session(_) => None,
            DashboardEvent::Tick { tick, .. } => Some(&tick.code),
            DashboardEvent::BidAsk { quote, .. } => Some(&quote.code),
        }
    }
}

/// Listener that only enqueues
pub struct QueueListener {
    tx: Sender<DashboardEvent>,
}

impl QueueListener {
    fn send(&self, event: DashboardEvent) {
        // Receiver gone means the dashboard is shutting down
        if self.tx.send(event).is_err() {
            trace!("[Dashboard] Event dropped, queue closed");
        }
    }
}

impl MarketDataListener for QueueListener {
    fn on_session_event(&self, event: SessionEvent) {
        self.send(DashboardEvent::Session(event));
    }

    fn on_tick_stk(&self, tick: Tick) {
        self.send(DashboardEvent::Tick {
            category: QuoteCategory::Stock,
            tick,
        });
    }

    fn on_tick_fop(&self, tick: Tick) {
        self.send(DashboardEvent::Tick {
            category: QuoteCategory::FuturesOption,
            tick,
        });
    }

    fn on_bidask_stk(&self, quote: BidAsk) {
        self.send(DashboardEvent::BidAsk {
            category: QuoteCategory::Stock,
            quote,
        });
    }

    fn on_bidask_fop(&self, quote: BidAsk) {
        self.send(DashboardEvent::BidAsk {
            category: QuoteCategory::FuturesOption,
            quote,
        });
    }
}

/// Create a listener and the receiving end of its queue
pub fn event_queue() -> (Arc<QueueListener>, Receiver<DashboardEvent>) {
    let (tx, rx) = unbounded();
    (Arc::new(QueueListener { tx }), rx)
}
