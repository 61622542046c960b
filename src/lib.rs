//! SJTop - Main Library
//!
//! Terminal dashboard for live market quotes.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for the binary (config path resolution)
//! - **quotedash**: Panels, controller, broker client and UI (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,no_run
//! use sjtop::bin_common::resolve_config_path;
//! use sjtop::quotedash::Dashboard;
//! ```

// Re-export workspace library for convenience
pub use quotedash;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{parse_args, resolve_config_path, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
}
