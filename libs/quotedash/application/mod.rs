//! Application Layer
//!
//! Contains the dashboard use case: panels, controller and UI.
//! This layer depends on domain and infrastructure layers.

pub mod dashboard;

pub use dashboard::{Dashboard, SessionState};
