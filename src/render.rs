// Rendering Module
// Writes decoded stats and record lists into the dashboard document.

use crate::document::{ids, Document};
use crate::errors::DashboardError;
use crate::model::{format_fixed2, CategoryCounts, RecordList, StatsSnapshot};
use chrono::TimeZone;
use std::fmt;

/// Style class of the placeholder cell shown for empty record tables
pub const NO_DATA_CLASS: &str = "no-data";

/// Columns of a record table (timestamp, type, target, value)
pub const RECORD_COLUMNS: u16 = 4;

/// Which record table a list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Global,
    Hof,
}

impl RecordKind {
    pub fn table_id(self) -> &'static str {
        match self {
            RecordKind::Global => ids::LATEST_GLOBALS,
            RecordKind::Hof => ids::LATEST_HOFS,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            RecordKind::Global => "No global data available",
            RecordKind::Hof => "No HOF data available",
        }
    }
}

/// Write a stats snapshot into the scalar fields and category tables.
///
/// Scalars are written first; a missing element stops the render at that
/// point and leaves the remaining elements untouched.
pub fn render_stats(doc: &mut Document, stats: &StatsSnapshot) -> Result<(), DashboardError> {
    doc.set_text(ids::TOTAL_GLOBALS, stats.total_globals.to_string())?;
    doc.set_text(ids::TOTAL_HOFS, stats.total_hofs.to_string())?;
    doc.set_text(ids::TOTAL_VALUE, format_fixed2(stats.total_value))?;
    doc.set_text(ids::HIGHEST_VALUE, format_fixed2(stats.highest_value))?;

    // Optional element, not every page template has it
    if doc.contains(ids::HIGHEST_VALUE_ITEM) {
        let item = stats.highest_value_item.clone().unwrap_or_default();
        doc.set_text(ids::HIGHEST_VALUE_ITEM, item)?;
    }

    fill_counts(doc, ids::GLOBALS_BY_TYPE, &stats.by_type)?;
    fill_counts(doc, ids::GLOBALS_BY_LOCATION, &stats.by_location)?;
    Ok(())
}

fn fill_counts(doc: &mut Document, id: &str, counts: &CategoryCounts) -> Result<(), DashboardError> {
    let table = doc.table_mut(id)?;
    table.clear();
    for (name, count) in counts.iter() {
        let row = table.insert_row();
        row.insert_cell(name);
        row.insert_cell(count.to_string());
    }
    Ok(())
}

/// Rebuild a record table from a list of Globals or HOFs.
///
/// Timestamps are formatted in `tz`.
pub fn render_records<Tz: TimeZone>(
    doc: &mut Document,
    kind: RecordKind,
    records: RecordList,
    tz: &Tz,
) -> Result<(), DashboardError>
where
    Tz::Offset: fmt::Display,
{
    let table = doc.table_mut(kind.table_id())?;
    table.clear();

    let records = records.into_records();
    if records.is_empty() {
        let cell = table.insert_row().insert_cell(kind.placeholder());
        cell.col_span = RECORD_COLUMNS;
        cell.class = Some(NO_DATA_CLASS.to_string());
        return Ok(());
    }

    for record in &records {
        let row = table.insert_row();
        row.insert_cell(record.timestamp_in(tz));
        row.insert_cell(record.kind.as_str());
        row.insert_cell(record.target.as_str());
        row.insert_cell(record.value_text());
    }
    Ok(())
}
