//! Table styling.
//!
//! Rows carry free-form tags; a handful of well-known tags get a colour.
//! Everything else renders plain.

use ratatui::style::{Color, Modifier, Style};

use crate::model::Row;

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Colours are disabled when the `NO_COLOR` environment variable is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Read `NO_COLOR` from the environment.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os("NO_COLOR").is_none())
    }

    /// Explicit setting.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== TableStyles =====

/// Styles for every part of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStyles {
    colors: bool,
    /// Header cells.
    pub header: Style,
    /// The active sort column's header cell.
    pub active_header: Style,
    /// Row under the keyboard cursor.
    pub cursor: Style,
    /// Row being dragged.
    pub dragged: Style,
    /// Status line.
    pub status: Style,
    /// Error text in the status line.
    pub error: Style,
}

impl TableStyles {
    /// Styles honouring `NO_COLOR`.
    pub fn new() -> Self {
        Self::with_color_config(ColorConfig::from_env())
    }

    /// Styles for an explicit colour setting.
    ///
    /// Without colours, emphasis falls back to modifiers so the cursor and
    /// the dragged row stay visible.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        if config.colors_enabled() {
            Self {
                colors: true,
                header: bold.fg(Color::Cyan),
                active_header: bold.fg(Color::Yellow),
                cursor: Style::default().bg(Color::DarkGray),
                dragged: bold.fg(Color::Black).bg(Color::Yellow),
                status: Style::default().fg(Color::Gray),
                error: Style::default().fg(Color::Red),
            }
        } else {
            Self {
                colors: false,
                header: bold,
                active_header: bold.add_modifier(Modifier::UNDERLINED),
                cursor: Style::default().add_modifier(Modifier::REVERSED),
                dragged: bold.add_modifier(Modifier::REVERSED),
                status: Style::default(),
                error: bold,
            }
        }
    }

    /// Style for a tag, if it is one we know.
    pub fn tag_style(&self, tag: &str) -> Option<Style> {
        if !self.colors {
            return None;
        }
        let style = match tag {
            "urgent" | "error" | "blocked" => Style::default().fg(Color::Red),
            "warning" | "pending" => Style::default().fg(Color::Yellow),
            "done" | "ok" => Style::default().fg(Color::Green),
            "muted" | "archived" => Style::default().add_modifier(Modifier::DIM),
            _ => return None,
        };
        Some(style)
    }

    /// Style for a whole row.
    ///
    /// Dragged beats cursor beats tags; the first known tag wins.
    pub fn row_style(&self, row: &Row, is_cursor: bool, is_dragged: bool) -> Style {
        if is_dragged {
            return self.dragged;
        }
        let base = row
            .tags()
            .iter()
            .find_map(|t| self.tag_style(t))
            .unwrap_or_default();
        if is_cursor {
            base.patch(self.cursor)
        } else {
            base
        }
    }
}

impl Default for TableStyles {
    fn default() -> Self {
        Self::new()
    }
}
