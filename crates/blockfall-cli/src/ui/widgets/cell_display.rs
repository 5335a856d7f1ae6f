use blockfall_engine::{Cell, PieceKind};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::style;

/// Renders one playfield cell as a 2×1 terminal block.
#[derive(Debug)]
pub(crate) struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub(crate) const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub(crate) fn width() -> u16 {
        2
    }

    pub(crate) fn height() -> u16 {
        1
    }

    pub(crate) fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell {
            Cell::Empty => {
                if show_dots {
                    Self::new(style::EMPTY_DOT, ".")
                } else {
                    Self::new(style::EMPTY, "")
                }
            }
            Cell::Ghost => Self::new(style::GHOST, "[]"),
            Cell::Piece(kind) => {
                let style = match kind {
                    PieceKind::I => style::I_CELL,
                    PieceKind::O => style::O_CELL,
                    PieceKind::S => style::S_CELL,
                    PieceKind::Z => style::Z_CELL,
                    PieceKind::J => style::J_CELL,
                    PieceKind::L => style::L_CELL,
                    PieceKind::T => style::T_CELL,
                };
                Self::new(style, "")
            }
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // A Paragraph fills the whole area, not just the symbol cells.
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
