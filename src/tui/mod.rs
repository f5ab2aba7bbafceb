//! TUI module for displaying the stats dashboard.
//!
//! This module provides a terminal-based view of the EU-CLAMS
//! statistics, refreshed in the background by the dashboard poller.

mod app;
mod ui;

pub use app::{run_dashboard, Action, App};
pub use ui::Palette;
