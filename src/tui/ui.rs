//! TUI rendering logic using Ratatui.

use super::app::App;
use crate::document::{ids, Document, Table as PageTable};
use crate::preference::DARK_MODE_CLASS;
use crate::render::NO_DATA_CLASS;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use std::sync::PoisonError;

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub value: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                background: Color::Rgb(0x12, 0x14, 0x18),
                text: Color::Rgb(0xe6, 0xed, 0xf7),
                muted: Color::Rgb(0x7f, 0x8b, 0xa0),
                accent: Color::Rgb(0x5c, 0xb0, 0xff),
                value: Color::Rgb(0x3f, 0xb6, 0x8b),
                border: Color::Rgb(0x3a, 0x44, 0x55),
            }
        } else {
            Self {
                background: Color::Rgb(0xf8, 0xfb, 0xff),
                text: Color::Rgb(0x0c, 0x16, 0x25),
                muted: Color::Rgb(0x5b, 0x66, 0x78),
                accent: Color::Rgb(0x25, 0x63, 0xeb),
                value: Color::Rgb(0x0e, 0xa6, 0x6c),
                border: Color::Rgb(0xc4, 0xcc, 0xd8),
            }
        }
    }
}

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let doc = app.document.read().unwrap_or_else(PoisonError::into_inner);
    let palette = Palette::for_mode(doc.has_root_class(DARK_MODE_CLASS));

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),      // Header
            Constraint::Length(3),      // Totals
            Constraint::Percentage(40), // By type / by location
            Constraint::Min(6),         // Latest globals / HOFs
            Constraint::Length(1),      // Footer
        ])
        .split(f.area());

    draw_header(f, app, &doc, &palette, chunks[0]);
    draw_totals(f, &doc, &palette, chunks[1]);
    draw_counts_row(f, &doc, &palette, chunks[2]);
    draw_records_row(f, &doc, &palette, chunks[3]);
    draw_footer(f, &palette, chunks[4]);
}

fn themed_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(palette.accent).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
}

fn draw_header(f: &mut Frame, app: &App, doc: &Document, palette: &Palette, area: Rect) {
    let last_updated = match doc.text(ids::LAST_UPDATED) {
        Some("") | None => "never".to_string(),
        Some(stamp) => stamp.to_string(),
    };

    let status = if app.polling_stopped {
        Span::styled("● STOPPED", Style::default().fg(Color::Red).bold())
    } else {
        Span::styled("● POLLING", Style::default().fg(palette.value).bold())
    };

    let toggle = doc.toggle().map(|t| t.icon).unwrap_or_default();

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "  EU-CLAMS Stats  ",
            Style::default().fg(palette.accent).bold(),
        ),
        Span::raw(" │ "),
        status,
        Span::raw(" │ "),
        Span::styled(app.server_url.clone(), Style::default().fg(palette.muted)),
        Span::raw(" │ Last updated: "),
        Span::styled(last_updated, Style::default().fg(palette.text)),
        Span::raw(" │ "),
        Span::raw(toggle),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent)),
    );

    f.render_widget(header, area);
}

fn draw_totals(f: &mut Frame, doc: &Document, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let highest = match doc.text(ids::HIGHEST_VALUE_ITEM) {
        Some(item) if !item.is_empty() => format!(
            "{} ({})",
            doc.text(ids::HIGHEST_VALUE).unwrap_or_default(),
            item
        ),
        _ => doc.text(ids::HIGHEST_VALUE).unwrap_or_default().to_string(),
    };

    let fields = [
        (" Total Globals ", doc.text(ids::TOTAL_GLOBALS).unwrap_or_default().to_string()),
        (" Total HOFs ", doc.text(ids::TOTAL_HOFS).unwrap_or_default().to_string()),
        (" Total Value ", doc.text(ids::TOTAL_VALUE).unwrap_or_default().to_string()),
        (" Highest Value ", highest),
    ];

    for ((title, value), chunk) in fields.into_iter().zip(chunks.iter()) {
        let widget = Paragraph::new(Span::styled(
            value,
            Style::default().fg(palette.value).bold(),
        ))
        .block(themed_block(title, palette));
        f.render_widget(widget, *chunk);
    }
}

fn draw_counts_row(f: &mut Frame, doc: &Document, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let widths = [Constraint::Percentage(70), Constraint::Percentage(30)];
    draw_page_table(
        f,
        doc.table(ids::GLOBALS_BY_TYPE),
        &["Type", "Count"],
        &widths,
        themed_block(" Globals by Type ", palette),
        palette,
        chunks[0],
    );
    draw_page_table(
        f,
        doc.table(ids::GLOBALS_BY_LOCATION),
        &["Location", "Count"],
        &widths,
        themed_block(" Globals by Location ", palette),
        palette,
        chunks[1],
    );
}

fn draw_records_row(f: &mut Frame, doc: &Document, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let widths = [
        Constraint::Length(19),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
        Constraint::Percentage(20),
    ];
    let header = ["Time", "Type", "Target", "Value"];
    draw_page_table(
        f,
        doc.table(ids::LATEST_GLOBALS),
        &header,
        &widths,
        themed_block(" Latest Globals ", palette),
        palette,
        chunks[0],
    );
    draw_page_table(
        f,
        doc.table(ids::LATEST_HOFS),
        &header,
        &widths,
        themed_block(" Latest HOFs ", palette),
        palette,
        chunks[1],
    );
}

fn draw_page_table(
    f: &mut Frame,
    table: Option<&PageTable>,
    header: &[&str],
    widths: &[Constraint],
    block: Block,
    palette: &Palette,
    area: Rect,
) {
    let rows: Vec<Row> = table
        .map(|t| t.rows())
        .unwrap_or_default()
        .iter()
        .map(|row| {
            let cells: Vec<Cell> = row
                .cells()
                .iter()
                .map(|cell| {
                    let style = if cell.class.as_deref() == Some(NO_DATA_CLASS) {
                        Style::default()
                            .fg(palette.muted)
                            .add_modifier(Modifier::ITALIC)
                    } else {
                        Style::default().fg(palette.text)
                    };
                    Cell::from(cell.text.clone()).style(style)
                })
                .collect();
            Row::new(cells)
        })
        .collect();

    let header = Row::new(header.iter().map(|h| Cell::from(*h)).collect::<Vec<_>>())
        .style(Style::default().fg(palette.muted).bold());

    let widget = Table::new(rows, widths.to_vec()).header(header).block(block);
    f.render_widget(widget, area);
}

fn draw_footer(f: &mut Frame, palette: &Palette, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw(" Quit  "),
        Span::styled(" r ", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw(" Refresh  "),
        Span::styled(" d ", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw(" Dark mode  "),
    ]))
    .style(Style::default().fg(palette.muted));

    f.render_widget(footer, area);
}
