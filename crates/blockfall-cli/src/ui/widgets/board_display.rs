use std::iter;

use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Cell, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Renders the playfield with optional ghost and active-piece overlays.
///
/// The overlays are painted onto a cloned snapshot; the authoritative board
/// is never touched.
#[derive(Debug)]
pub(crate) struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    active_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub(crate) fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            active_piece: None,
            block: None,
        }
    }

    pub(crate) fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub(crate) fn active_piece(self, piece: Piece) -> Self {
        Self {
            active_piece: Some(piece),
            ..self
        }
    }

    pub(crate) fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub(crate) fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub(crate) fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut board = self.board.clone();
        if let Some(ghost) = self.ghost {
            board.fill_piece_as(&ghost, Cell::Ghost);
        }
        if let Some(piece) = self.active_piece {
            board.fill_piece(&piece);
        }

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, board.rows()) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                let cell_display = CellDisplay::from_cell(*cell, true);
                cell_display.render(grid_cell, buf);
            }
        }
    }
}
