use std::collections::VecDeque;

use rand::Rng as _;

use crate::{
    HoldLockedError, PieceCollisionError, SpawnCollisionError,
    core::{
        board::Board,
        kicks,
        piece::{Piece, PieceKind},
    },
};

use super::piece_bag::{BagSeed, PieceBag};

/// Single-turn playfield state: board, active piece, preview queue, and the
/// hold slot.
///
/// The field owns every mutation of the board and the active piece. Blocked
/// moves and rotations are rejections, not errors — the piece is left exactly
/// as it was and the caller decides whether anything happened.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    active_piece: Piece,
    next_queue: VecDeque<PieceKind>,
    held_piece: Option<PieceKind>,
    can_hold: bool,
    bag: PieceBag,
}

impl GameField {
    /// Creates a field with a random piece sequence.
    ///
    /// `preview_count` is the length of the next-piece queue, clamped to at
    /// least 1.
    #[must_use]
    pub fn new(preview_count: usize) -> Self {
        Self::with_seed(preview_count, rand::rng().random())
    }

    /// Like [`Self::new`], but with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(preview_count: usize, seed: BagSeed) -> Self {
        let mut bag = PieceBag::with_seed(seed);
        let active_piece = Piece::spawn(bag.pop_next());
        let next_queue = bag.queue(preview_count.max(1)).into();
        Self {
            board: Board::new(),
            active_piece,
            next_queue,
            held_piece: None,
            can_hold: true,
            bag,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.active_piece
    }

    /// Replaces the active piece, rejecting colliding placements.
    pub fn set_active_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.can_place(&piece) {
            return Err(PieceCollisionError);
        }
        self.active_piece = piece;
        Ok(())
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held_piece
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Iterates the upcoming piece kinds, nearest first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.next_queue.iter().copied()
    }

    /// The active piece at its hard-drop landing position (ghost target).
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        self.active_piece.dropped(&self.board)
    }

    /// Attempts to translate the active piece by `(dx, dy)`.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        let moved = self.active_piece.translated(dx, dy);
        if !self.board.can_place(&moved) {
            return Err(PieceCollisionError);
        }
        self.active_piece = moved;
        Ok(())
    }

    /// Attempts an SRS rotation of the active piece.
    pub fn try_rotate(&mut self, clockwise: bool) -> Result<(), PieceCollisionError> {
        let rotated = kicks::try_rotate(&self.board, &self.active_piece, clockwise)
            .ok_or(PieceCollisionError)?;
        self.active_piece = rotated;
        Ok(())
    }

    /// Attempts to hold the active piece.
    ///
    /// The first hold stores the active kind and spawns the queue head; later
    /// holds swap with the stored kind. Only one hold is allowed per lock.
    pub fn try_hold(&mut self) -> Result<(), HoldLockedError> {
        if !self.can_hold {
            return Err(HoldLockedError);
        }
        let current = self.active_piece.kind();
        self.active_piece = match self.held_piece.replace(current) {
            Some(held) => Piece::spawn(held),
            None => Piece::spawn(self.pop_next()),
        };
        self.can_hold = false;
        Ok(())
    }

    /// Relocates the active piece to its hard-drop landing position.
    pub fn hard_drop_active(&mut self) {
        self.active_piece = self.drop_position();
    }

    /// Locks the active piece into the board.
    ///
    /// Writes the piece, clears complete rows, then spawns the next piece
    /// from the queue (refilling the tail from the bag). Returns the cleared
    /// row count together with the spawn outcome: a colliding spawn is the
    /// top-out condition and leaves the hold lock untouched, otherwise the
    /// hold becomes available again.
    pub fn lock_active(&mut self) -> (usize, Result<(), SpawnCollisionError>) {
        self.board.fill_piece(&self.active_piece);
        let cleared = self.board.clear_complete_rows();

        self.active_piece = Piece::spawn(self.pop_next());
        if self.board.is_spawn_blocked(&self.active_piece) {
            return (cleared, Err(SpawnCollisionError));
        }

        self.can_hold = true;
        (cleared, Ok(()))
    }

    fn pop_next(&mut self) -> PieceKind {
        let kind = self
            .next_queue
            .pop_front()
            .expect("next queue is never empty");
        self.next_queue.push_back(self.bag.pop_next());
        kind
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
