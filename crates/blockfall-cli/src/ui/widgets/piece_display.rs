use blockfall_engine::{Cell, PieceKind, Rotation};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Renders a single piece kind in its spawn orientation, trimmed to its
/// bounding box. Used for the HOLD panel and the NEXT stack.
#[derive(Debug)]
pub(crate) struct PieceDisplay<'a> {
    kind: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub(crate) fn new() -> Self {
        Self {
            kind: None,
            block: None,
        }
    }

    pub(crate) fn kind(self, kind: PieceKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    pub(crate) fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub(crate) fn width(&self) -> u16 {
        // Widest piece (I) spans 4 cells.
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        // Tallest spawn orientation spans 2 rows.
        2 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(kind) = self.kind else {
            // Nothing held yet; leave the panel blank.
            return;
        };

        let offsets: Vec<(usize, usize)> =
            kind.occupied_offsets(Rotation::default()).collect();
        let min_x = offsets.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let max_x = offsets.iter().map(|&(x, _)| x).max().unwrap_or(0);
        let min_y = offsets.iter().map(|&(_, y)| y).min().unwrap_or(0);
        let max_y = offsets.iter().map(|&(_, y)| y).max().unwrap_or(0);
        let cols = (max_x - min_x + 1) as u16;
        let rows = (max_y - min_y + 1) as u16;

        let piece_area = area.centered(
            Constraint::Length(cols * CellDisplay::width()),
            Constraint::Length(rows * CellDisplay::height()),
        );
        let horizontal =
            Layout::horizontal((0..cols).map(|_| Constraint::Length(CellDisplay::width())));
        let vertical =
            Layout::vertical((0..rows).map(|_| Constraint::Length(CellDisplay::height())));

        let occupied_display = CellDisplay::from_cell(Cell::Piece(kind), false);
        let empty_display = CellDisplay::from_cell(Cell::Empty, false);

        for (y, row_area) in piece_area.layout_vec(&vertical).into_iter().enumerate() {
            for (x, cell_area) in row_area.layout_vec(&horizontal).into_iter().enumerate() {
                if offsets.contains(&(x + min_x, y + min_y)) {
                    Widget::render(&occupied_display, cell_area, buf);
                } else {
                    Widget::render(&empty_display, cell_area, buf);
                }
            }
        }
    }
}
