//! Super Rotation System wall kicks.
//!
//! When a rotation would collide, a short list of translation offsets is
//! tried in order and the first legal placement wins. The I-piece has its own
//! table; J, L, S, T, and Z share one; the O-piece never rotates.

use crate::core::{
    board::Board,
    piece::{Piece, PieceKind, Rotation},
};

/// Kick offset in board coordinates (x grows right, y grows down).
type KickOffset = (i32, i32);

const NO_KICK: [KickOffset; 1] = [(0, 0)];

/// Kicks for J, L, S, T, and Z pieces, keyed by (from, to) rotation index.
fn jlstz_kicks(from: usize, to: usize) -> &'static [KickOffset] {
    match (from, to) {
        (0, 1) => &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        (1, 0) => &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        (1, 2) => &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        (2, 1) => &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        (2, 3) => &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        (3, 2) => &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        (3, 0) => &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        (0, 3) => &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        // Same-rotation transitions never occur; fall back to no offset.
        _ => &NO_KICK,
    }
}

/// Kicks for the I-piece, which moves further along its long axis.
fn i_kicks(from: usize, to: usize) -> &'static [KickOffset] {
    match (from, to) {
        (0, 1) => &[(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        (1, 0) => &[(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        (1, 2) => &[(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        (2, 1) => &[(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        (2, 3) => &[(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        (3, 2) => &[(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        (3, 0) => &[(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        (0, 3) => &[(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        _ => &NO_KICK,
    }
}

fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [KickOffset] {
    match kind {
        PieceKind::I => i_kicks(from.index(), to.index()),
        _ => jlstz_kicks(from.index(), to.index()),
    }
}

/// Attempts an SRS rotation of `piece` on `board`.
///
/// The O-piece is returned unchanged (rotation is a successful no-op for a
/// square). Otherwise every kick offset for the transition is tried in table
/// order against the rotated matrix; the first legal placement is returned.
/// `None` means the rotation is blocked and the caller must leave the piece
/// exactly as it was.
#[must_use]
pub fn try_rotate(board: &Board, piece: &Piece, clockwise: bool) -> Option<Piece> {
    if piece.kind() == PieceKind::O {
        return Some(*piece);
    }

    let from = piece.rotation();
    let to = if clockwise { from.cw() } else { from.ccw() };
    let rotated = piece.with_rotation(to);

    kick_offsets(piece.kind(), from, to)
        .iter()
        .map(|&(dx, dy)| rotated.translated(dx, dy))
        .find(|candidate| board.can_place(candidate))
}
