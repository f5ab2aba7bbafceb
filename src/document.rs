//! In-memory page model the dashboard renders into.
//!
//! Elements are addressed by string id, mirroring the host page template
//! the stats service ships. All text is stored as plain text; nothing is
//! ever parsed as markup.

use crate::errors::DashboardError;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

/// Element ids of the dashboard page contract
pub mod ids {
    pub const TOTAL_GLOBALS: &str = "total-globals";
    pub const TOTAL_HOFS: &str = "total-hofs";
    pub const TOTAL_VALUE: &str = "total-value";
    pub const HIGHEST_VALUE: &str = "highest-value";
    pub const HIGHEST_VALUE_ITEM: &str = "highest-value-item";
    pub const GLOBALS_BY_TYPE: &str = "globals-by-type";
    pub const GLOBALS_BY_LOCATION: &str = "globals-by-location";
    pub const LATEST_GLOBALS: &str = "latest-globals";
    pub const LATEST_HOFS: &str = "latest-hofs";
    pub const LAST_UPDATED: &str = "last-updated";
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub col_span: u16,
    pub class: Option<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            class: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<Cell>,
}

impl TableRow {
    /// Append a cell and return it for further styling
    pub fn insert_cell(&mut self, text: impl Into<String>) -> &mut Cell {
        self.cells.push(Cell::new(text));
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell texts, handy for assertions and plain-text output
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<TableRow>,
}

impl Table {
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn insert_row(&mut self) -> &mut TableRow {
        self.rows.push(TableRow::default());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Text(String),
    Table(Table),
}

/// The dark-mode toggle control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    pub icon: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: HashMap<String, Element>,
    root_classes: BTreeSet<String>,
    toggle: Option<ToggleControl>,
}

impl Document {
    /// Empty page with no elements
    pub fn new() -> Self {
        Self::default()
    }

    /// The host page: every element the dashboard writes to
    pub fn dashboard_page() -> Self {
        let mut doc = Self::new();
        for id in [
            ids::TOTAL_GLOBALS,
            ids::TOTAL_HOFS,
            ids::TOTAL_VALUE,
            ids::HIGHEST_VALUE,
            ids::HIGHEST_VALUE_ITEM,
            ids::LAST_UPDATED,
        ] {
            doc.insert(id, Element::Text(String::new()));
        }
        for id in [
            ids::GLOBALS_BY_TYPE,
            ids::GLOBALS_BY_LOCATION,
            ids::LATEST_GLOBALS,
            ids::LATEST_HOFS,
        ] {
            doc.insert(id, Element::Table(Table::default()));
        }
        doc
    }

    pub fn insert(&mut self, id: impl Into<String>, element: Element) {
        self.elements.insert(id.into(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.elements.get(id) {
            Some(Element::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        match self.elements.get(id) {
            Some(Element::Table(table)) => Some(table),
            _ => None,
        }
    }

    /// Replace the text content of a text element
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> Result<(), DashboardError> {
        match self.elements.get_mut(id) {
            Some(Element::Text(content)) => {
                *content = text.into();
                Ok(())
            }
            Some(_) => Err(DashboardError::WrongElementKind {
                id: id.to_string(),
                expected: "text element",
            }),
            None => Err(DashboardError::MissingElement(id.to_string())),
        }
    }

    pub fn table_mut(&mut self, id: &str) -> Result<&mut Table, DashboardError> {
        match self.elements.get_mut(id) {
            Some(Element::Table(table)) => Ok(table),
            Some(_) => Err(DashboardError::WrongElementKind {
                id: id.to_string(),
                expected: "table",
            }),
            None => Err(DashboardError::MissingElement(id.to_string())),
        }
    }

    pub fn add_root_class(&mut self, class: &str) {
        self.root_classes.insert(class.to_string());
    }

    /// Flip a root class, returning whether it is now present
    pub fn toggle_root_class(&mut self, class: &str) -> bool {
        if self.root_classes.remove(class) {
            false
        } else {
            self.root_classes.insert(class.to_string());
            true
        }
    }

    pub fn has_root_class(&self, class: &str) -> bool {
        self.root_classes.contains(class)
    }

    pub fn set_toggle(&mut self, toggle: ToggleControl) {
        self.toggle = Some(toggle);
    }

    pub fn toggle(&self) -> Option<&ToggleControl> {
        self.toggle.as_ref()
    }

    pub fn toggle_mut(&mut self) -> Option<&mut ToggleControl> {
        self.toggle.as_mut()
    }
}

/// Document handle shared between refresh tasks and the UI
pub type SharedDocument = Arc<RwLock<Document>>;

/// Create a shared handle around the dashboard page
pub fn new_shared_document() -> SharedDocument {
    Arc::new(RwLock::new(Document::dashboard_page()))
}
