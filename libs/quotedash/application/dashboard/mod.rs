//! Quote dashboard
//!
//! Live order-book depth and trade tape for one contract at a time.

pub mod bar;
pub mod controller;
pub mod events;
pub mod order_book;
pub mod selector;
pub mod status;
pub mod tape;
pub mod ui;

pub use bar::BarSpan;
pub use controller::{pick_default, query_date, Dashboard, SessionState};
pub use events::{event_queue, DashboardEvent, QueueListener};
pub use order_book::{buy_ratio, DepthRow, DepthSnapshot, LastTrade, OrderBookPanel, NEUTRAL_RATIO};
pub use selector::{ContractSelector, SelectorEntry};
pub use status::StatusPanel;
pub use tape::{classify, TapeRing, TapeRow, TradeTapePanel, DEFAULT_TAPE_CAPACITY};
