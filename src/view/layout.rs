//! Table layout and rendering.
//!
//! [`TableLayout`] is computed once per frame from the area, the column set
//! and the current order. The same value drives the ratatui `Table` widths
//! and answers hit-tests afterwards, so what the user clicks is exactly what
//! was drawn.

use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row as TableRow, Table},
    Frame,
};

use crate::model::{Bounds, ColumnName, ColumnSet, Position, RowGeometry, RowHit, RowId};
use crate::state::SortableList;
use crate::view::styles::TableStyles;

/// Gap between columns, in cells.
pub const COLUMN_SPACING: u16 = 1;

/// Horizontal extent of one rendered column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpan {
    /// Column drawn here.
    pub name: ColumnName,
    /// Left edge.
    pub x: u16,
    /// Width in cells.
    pub width: u16,
}

/// Where the header, columns and visible rows were drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    header: Rect,
    columns: Vec<ColumnSpan>,
    rows: Vec<RowHit>,
    first_row: usize,
    /// The last list row is drawn with a free line under it.
    room_below_last: bool,
}

impl TableLayout {
    /// Lay out `ids` (the full current order) in `area`, starting at row
    /// `scroll`. Line one is the header; each row takes one line.
    pub fn compute(area: Rect, columns: &ColumnSet, ids: &[RowId], scroll: usize) -> Self {
        let header = Rect::new(area.x, area.y, area.width, area.height.min(1));

        let right = area.x.saturating_add(area.width);
        let mut spans = Vec::with_capacity(columns.len());
        let mut x = area.x;
        for column in columns.iter() {
            if x >= right {
                break;
            }
            let width = column.width_hint.min(right - x);
            spans.push(ColumnSpan {
                name: column.name.clone(),
                x,
                width,
            });
            x = x.saturating_add(width).saturating_add(COLUMN_SPACING);
        }

        let first_row = scroll.min(ids.len());
        let capacity = usize::from(rows_capacity(area.height));
        let rows: Vec<RowHit> = ids
            .iter()
            .skip(first_row)
            .take(capacity)
            .zip(area.y.saturating_add(1)..)
            .map(|(id, y)| RowHit {
                id: id.clone(),
                bounds: Bounds::new(area.x, y, area.width, 1),
            })
            .collect();
        let room_below_last =
            !rows.is_empty() && first_row + rows.len() == ids.len() && rows.len() < capacity;

        Self {
            header,
            columns: spans,
            rows,
            first_row,
            room_below_last,
        }
    }

    /// Header line.
    pub fn header_area(&self) -> Rect {
        self.header
    }

    /// Column spans left to right; columns that did not fit are absent.
    pub fn columns(&self) -> &[ColumnSpan] {
        &self.columns
    }

    /// Visible rows top to bottom.
    pub fn rows(&self) -> &[RowHit] {
        &self.rows
    }

    /// Store index of the first visible row.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Header column under `pos`.
    pub fn column_at(&self, pos: Position) -> Option<&ColumnName> {
        let header = Bounds::new(
            self.header.x,
            self.header.y,
            self.header.width,
            self.header.height,
        );
        if !header.contains(pos) {
            return None;
        }
        self.columns
            .iter()
            .find(|span| pos.x >= span.x && pos.x < span.x.saturating_add(span.width))
            .map(|span| &span.name)
    }
}

impl RowGeometry for TableLayout {
    fn row_at(&self, pos: Position) -> Option<RowHit> {
        if let Some(hit) = self.rows.iter().find(|hit| hit.bounds.contains(pos)) {
            return Some(hit.clone());
        }
        // One-line rows are all upper half; the free line under the last row
        // acts as its lower half so a drag can reach the end of the list.
        let last = self.rows.last().filter(|_| self.room_below_last)?;
        let bounds = Bounds {
            height: 2,
            ..last.bounds
        };
        bounds.contains(pos).then(|| RowHit {
            id: last.id.clone(),
            bounds,
        })
    }
}

/// Rows that fit in a table area of `height` lines (one goes to the header).
pub fn rows_capacity(height: u16) -> u16 {
    height.saturating_sub(1)
}

/// One-line feedback shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Neutral information.
    Info(String),
    /// A rejected operation.
    Error(String),
}

/// Everything a frame needs.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// The model.
    pub list: &'a SortableList,
    /// Cursor row index.
    pub cursor: Option<usize>,
    /// First visible row index.
    pub scroll: usize,
    /// Status bar message.
    pub message: Option<&'a StatusMessage>,
    /// Styles.
    pub styles: &'a TableStyles,
}

/// Split the frame into table and status areas.
pub fn split_frame(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table (header + rows)
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1])
}

/// Render the whole screen and return the layout used for it.
pub fn render_frame(frame: &mut Frame, ctx: &FrameContext<'_>) -> TableLayout {
    let (table_area, status_area) = split_frame(frame.area());
    let ids = ctx.list.ids();
    let layout = TableLayout::compute(table_area, ctx.list.store().columns(), &ids, ctx.scroll);

    render_table(frame, table_area, &layout, ctx);
    render_status_bar(frame, status_area, ctx);
    layout
}

fn render_table(frame: &mut Frame, area: Rect, layout: &TableLayout, ctx: &FrameContext<'_>) {
    let sort = ctx.list.sort_state();
    let styles = ctx.styles;

    let header_cells = layout.columns().iter().map(|span| {
        if sort.is_active(&span.name) {
            Cell::from(format!("{} {}", span.name, sort.direction.indicator()))
                .style(styles.active_header)
        } else {
            Cell::from(span.name.to_string()).style(styles.header)
        }
    });
    let header = TableRow::new(header_cells);

    let store = ctx.list.store();
    let dragged = ctx.list.drag_session().map(|s| &s.dragged_row_id);
    let rows = layout.rows().iter().enumerate().filter_map(|(offset, hit)| {
        let row = store.get(&hit.id)?;
        let index = layout.first_row() + offset;
        let cells = layout.columns().iter().map(|span| {
            Cell::from(row.cell(&span.name).map(|v| v.to_string()).unwrap_or_default())
        });
        let style = styles.row_style(row, ctx.cursor == Some(index), dragged == Some(&hit.id));
        Some(TableRow::new(cells).style(style))
    });

    let widths: Vec<Constraint> = layout
        .columns()
        .iter()
        .map(|span| Constraint::Length(span.width))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start);
    frame.render_widget(table, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &FrameContext<'_>) {
    let list = ctx.list;
    let sort = list.sort_state();

    let sort_text = match &sort.column {
        Some(column) => format!("sort: {} {}", column, sort.direction.indicator()),
        None => "sort: none".to_string(),
    };
    let drag_text = match list.drag_session() {
        Some(session) => format!("dragging {}", session.dragged_row_id),
        None => "idle".to_string(),
    };

    let mut spans = vec![Span::styled(
        format!(" {} rows | {} | {}", list.len(), sort_text, drag_text),
        ctx.styles.status,
    )];
    match ctx.message {
        Some(StatusMessage::Info(text)) => {
            spans.push(Span::styled(format!(" | {}", text), ctx.styles.status));
        }
        Some(StatusMessage::Error(text)) => {
            spans.push(Span::styled(format!(" | {}", text), ctx.styles.error));
        }
        None => {}
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
