//! CLI support: configuration, client wiring and the `once` command.

mod config;

pub use config::{Config, ConfigError, PollingConfig, ServerConfig, StorageConfig};

use crate::client::HttpFetcher;
use crate::dashboard::{CycleReport, DashboardClient};
use crate::document::{ids, Document, Table};
use crate::errors::FetchError;
use crate::preference::{FileStore, KeyValueStore, MemoryStore};
use std::io::{self, Write};
use std::sync::Arc;

/// Open the preference store, falling back to memory if the file is unusable
pub fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    let Some(path) = config.storage_path() else {
        tracing::warn!("No config directory available, preferences will not persist");
        return Arc::new(MemoryStore::new());
    };

    match FileStore::open(&path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot open preference store");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Wire an HTTP-backed client from configuration
pub fn build_client(config: &Config) -> Result<DashboardClient, FetchError> {
    let fetcher = HttpFetcher::new(config.server.url.clone(), config.request_timeout())?;
    tracing::info!(server = %fetcher.base_url(), "Using stats service");

    Ok(DashboardClient::new(Arc::new(fetcher), open_store(config))
        .with_record_limit(config.polling.record_limit))
}

/// Run a single refresh cycle and print the resulting page
pub async fn run_once(
    config: Config,
    out: &mut impl Write,
) -> Result<CycleReport, Box<dyn std::error::Error>> {
    let client = build_client(&config)?;
    client.initialize();

    let report = client.refresh()?.settle().await;
    for (endpoint, outcome) in report.outcomes() {
        if !outcome.is_rendered() {
            tracing::warn!(endpoint = %endpoint, "No fresh data");
        }
    }

    let document = client.document();
    let doc = document.read().map_err(|e| e.to_string())?;
    write_document(&doc, out)?;
    Ok(report)
}

/// Plain-text rendering of the dashboard page
pub fn write_document(doc: &Document, out: &mut impl Write) -> io::Result<()> {
    let text = |id: &str| doc.text(id).unwrap_or_default();

    let icon = doc.toggle().map(|t| t.icon).unwrap_or_default();
    writeln!(out, "EU-CLAMS Stats {}", icon)?;
    writeln!(out, "Last updated:  {}", text(ids::LAST_UPDATED))?;
    writeln!(out)?;
    writeln!(out, "Total Globals: {}", text(ids::TOTAL_GLOBALS))?;
    writeln!(out, "Total HOFs:    {}", text(ids::TOTAL_HOFS))?;
    writeln!(out, "Total Value:   {}", text(ids::TOTAL_VALUE))?;
    match text(ids::HIGHEST_VALUE_ITEM) {
        "" => writeln!(out, "Highest Value: {}", text(ids::HIGHEST_VALUE))?,
        item => writeln!(out, "Highest Value: {} ({})", text(ids::HIGHEST_VALUE), item)?,
    }

    for (title, id) in [
        ("Globals by Type", ids::GLOBALS_BY_TYPE),
        ("Globals by Location", ids::GLOBALS_BY_LOCATION),
        ("Latest Globals", ids::LATEST_GLOBALS),
        ("Latest HOFs", ids::LATEST_HOFS),
    ] {
        writeln!(out)?;
        writeln!(out, "{}", title)?;
        if let Some(table) = doc.table(id) {
            write_table(table, out)?;
        }
    }
    Ok(())
}

fn write_table(table: &Table, out: &mut impl Write) -> io::Result<()> {
    let mut widths: Vec<usize> = Vec::new();
    for row in table.rows() {
        // Spanning cells do not take part in column sizing
        if row.cells().iter().any(|c| c.col_span > 1) {
            continue;
        }
        for (i, cell) in row.cells().iter().enumerate() {
            let len = cell.text.chars().count();
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    for row in table.rows() {
        let mut line = String::from(" ");
        for (i, cell) in row.cells().iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(0);
            line.push(' ');
            line.push_str(&format!("{:<width$}", cell.text, width = width));
            line.push(' ');
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
