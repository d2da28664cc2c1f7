//! Screen geometry shared between the drag controller and the renderer.
//!
//! The core never measures anything itself: the presentation layer answers
//! "which row is under this position" through [`RowGeometry`].

use super::identifiers::RowId;

/// Pointer position in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl Position {
    /// Create a position.
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// On-screen rectangle of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: u16,
    /// Top edge.
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Bounds {
    /// Create bounds.
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether a position lies inside these bounds.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.x < self.x.saturating_add(self.width)
            && pos.y >= self.y
            && pos.y < self.y.saturating_add(self.height)
    }

    /// Whether `pos` falls in the upper half of these bounds.
    ///
    /// A row one cell tall is entirely upper half.
    pub fn is_upper_half(&self, pos: Position) -> bool {
        let offset = u32::from(pos.y.saturating_sub(self.y));
        offset * 2 < u32::from(self.height)
    }
}

/// A geometry hit: the row under a position and its bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHit {
    /// Row under the pointer.
    pub id: RowId,
    /// Where that row is drawn.
    pub bounds: Bounds,
}

/// "Row at position" query answered by the presentation layer.
pub trait RowGeometry {
    /// The row whose bounds contain `pos`, if any.
    fn row_at(&self, pos: Position) -> Option<RowHit>;
}

impl<F> RowGeometry for F
where
    F: Fn(Position) -> Option<RowHit>,
{
    fn row_at(&self, pos: Position) -> Option<RowHit> {
        self(pos)
    }
}
