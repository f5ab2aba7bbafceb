//! # clams-dashboard - EU-CLAMS Stats Dashboard
//!
//! A terminal client for the EU-CLAMS statistics service. It polls the
//! service's JSON API and keeps an in-memory page of totals, category
//! tables and the latest Globals/HOFs up to date.
//!
//! ## Features
//!
//! - Three independent requests per refresh (`/api/stats`, `/api/globals`,
//!   `/api/hofs`); one failing endpoint never blocks the others
//! - Cancellable poller that never overlaps refresh cycles
//! - Persistent dark-mode preference
//! - Interactive TUI and a one-shot plain-text mode
//!
//! ## Usage
//!
//! ```bash
//! clams-dashboard watch --server http://127.0.0.1:8080
//! clams-dashboard once --limit 5
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use clams_dashboard::{DashboardClient, HttpFetcher, MemoryStore};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new("http://127.0.0.1:8080", Some(Duration::from_secs(30)))?;
//! let client = DashboardClient::new(Arc::new(fetcher), Arc::new(MemoryStore::new()));
//!
//! let report = client.refresh()?.settle().await;
//! println!("all rendered: {}", report.all_rendered());
//! # Ok(())
//! # }
//! ```

// Core library modules
pub mod client;
pub mod dashboard;
pub mod document;
pub mod errors;
pub mod model;
pub mod preference;
pub mod render;

// CLI module (config and the `once` command)
pub mod cli;

// TUI module (for the `watch` command)
pub mod tui;

// Re-export commonly used types
pub use client::{Endpoint, Fetch, HttpFetcher};
pub use dashboard::{
    CycleReport, DashboardClient, EndpointOutcome, PollHandle, RefreshCycle,
    DEFAULT_REFRESH_INTERVAL,
};
pub use document::{Document, SharedDocument};
pub use errors::{DashboardError, FetchError, StoreError};
pub use model::{CategoryCounts, Record, RecordList, StatsSnapshot, Timestamp};
pub use preference::{FileStore, KeyValueStore, MemoryStore};
pub use render::RecordKind;
