use crate::core::board::Board;

/// Spawn column of a piece's 4×4 bounding box (middle-top of a 10-wide board).
pub const SPAWN_X: i32 = 3;
/// Spawn row of a piece's 4×4 bounding box.
pub const SPAWN_Y: i32 = 0;

/// A falling piece (tetromino) with kind, position, and rotation state.
///
/// Pieces are immutable values: movement and rotation return new `Piece`
/// instances, and the occupied-cell matrix is always the canonical one for
/// the current `(kind, rotation)` pair — it is never mutated independently.
///
/// Position is the top-left of the 4×4 bounding box in board coordinates and
/// may be negative while a piece is spawning or being kick-tested; a piece at
/// rest always has all occupied cells inside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    position: Position,
    rotation: Rotation,
}

impl Piece {
    /// Creates a piece of the given kind at the spawn position, rotation 0.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            position: Position::new(SPAWN_X, SPAWN_Y),
            rotation: Rotation::default(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// The canonical occupancy matrix for the current kind and rotation.
    #[must_use]
    pub fn shape(&self) -> &'static PieceShape {
        self.kind.shape(self.rotation)
    }

    /// Iterates the board coordinates of all occupied cells.
    #[expect(clippy::cast_possible_wrap)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (px, py) = (self.position.x(), self.position.y());
        self.kind
            .occupied_offsets(self.rotation)
            .map(move |(dx, dy)| (px + dx as i32, py + dy as i32))
    }

    /// Returns the piece translated by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.translated(dx, dy),
            ..*self
        }
    }

    /// Returns the piece with a different rotation state, position unchanged.
    #[must_use]
    pub fn with_rotation(&self, rotation: Rotation) -> Self {
        Self { rotation, ..*self }
    }

    /// Returns the piece at the lowest legal position straight below — the
    /// hard-drop landing and ghost-preview target.
    ///
    /// Pure query: already-landed pieces map to themselves.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while board.can_move(&dropped, 0, 1) {
            dropped = dropped.translated(0, 1);
        }
        dropped
    }
}

/// Position of a piece's bounding box in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation state of a piece: 0 (spawn), 1 (90° CW), 2 (180°), 3 (270° CW).
///
/// [`cw`](Self::cw) and [`ccw`](Self::ccw) are pure index transforms modulo
/// 4; they do not check placement legality.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rotation(u8);

impl Rotation {
    /// Number of rotation states.
    pub const COUNT: usize = 4;

    #[must_use]
    pub const fn cw(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn ccw(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the kind of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All piece kinds, in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
        Self::T,
    ];

    /// The canonical occupancy matrix for this kind at the given rotation.
    #[must_use]
    pub fn shape(self, rotation: Rotation) -> &'static PieceShape {
        &SHAPES[self as usize][rotation.index()]
    }

    /// Iterates the occupied offsets within the 4×4 bounding box.
    pub fn occupied_offsets(self, rotation: Rotation) -> impl Iterator<Item = (usize, usize)> {
        self.shape(rotation)
            .iter()
            .enumerate()
            .flat_map(|(dy, row)| {
                row.iter()
                    .enumerate()
                    .filter_map(move |(dx, &cell)| cell.then_some((dx, dy)))
            })
    }

    /// Returns the single-character representation of this kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from its single-character representation.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Occupancy matrix of a piece within its 4×4 bounding box.
pub type PieceShape = [[bool; 4]; 4];

/// Canonical shape tables, indexed by kind then rotation state.
///
/// These are hand-written rather than generated: the O-piece has four
/// identical states, and I/S/Z alternate between two shapes (rotations 0≡2
/// and 1≡3), which is the standard behavior and not expressible as a uniform
/// 90° rotation of a single base matrix.
const SHAPES: [[PieceShape; Rotation::COUNT]; PieceKind::LEN] = {
    const X: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];

    const I_H: PieceShape = [EEEE, [X, X, X, X], EEEE, EEEE];
    const I_V: PieceShape = [[E, E, X, E], [E, E, X, E], [E, E, X, E], [E, E, X, E]];
    const O_0: PieceShape = [EEEE, [E, X, X, E], [E, X, X, E], EEEE];
    const S_H: PieceShape = [EEEE, [E, X, X, E], [X, X, E, E], EEEE];
    const S_V: PieceShape = [EEEE, [E, X, E, E], [E, X, X, E], [E, E, X, E]];
    const Z_H: PieceShape = [EEEE, [X, X, E, E], [E, X, X, E], EEEE];
    const Z_V: PieceShape = [EEEE, [E, E, X, E], [E, X, X, E], [E, X, E, E]];
    const J_0: PieceShape = [EEEE, [X, E, E, E], [X, X, X, E], EEEE];
    const J_1: PieceShape = [EEEE, [E, X, X, E], [E, X, E, E], [E, X, E, E]];
    const J_2: PieceShape = [EEEE, EEEE, [X, X, X, E], [E, E, X, E]];
    const J_3: PieceShape = [EEEE, [E, X, E, E], [E, X, E, E], [X, X, E, E]];
    const L_0: PieceShape = [EEEE, [E, E, X, E], [X, X, X, E], EEEE];
    const L_1: PieceShape = [EEEE, [E, X, E, E], [E, X, E, E], [E, X, X, E]];
    const L_2: PieceShape = [EEEE, EEEE, [X, X, X, E], [X, E, E, E]];
    const L_3: PieceShape = [EEEE, [X, X, E, E], [E, X, E, E], [E, X, E, E]];
    const T_0: PieceShape = [EEEE, [E, X, E, E], [X, X, X, E], EEEE];
    const T_1: PieceShape = [EEEE, [E, X, E, E], [E, X, X, E], [E, X, E, E]];
    const T_2: PieceShape = [EEEE, EEEE, [X, X, X, E], [E, X, E, E]];
    const T_3: PieceShape = [EEEE, [E, X, E, E], [X, X, E, E], [E, X, E, E]];

    [
        [I_H, I_V, I_H, I_V],
        [O_0, O_0, O_0, O_0],
        [S_H, S_V, S_H, S_V],
        [Z_H, Z_V, Z_H, Z_V],
        [J_0, J_1, J_2, J_3],
        [L_0, L_1, L_2, L_3],
        [T_0, T_1, T_2, T_3],
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in rotations() {
                assert_eq!(
                    kind.occupied_offsets(rotation).count(),
                    4,
                    "{kind:?} {rotation:?}"
                );
            }
        }
    }

    #[test]
    fn o_piece_shapes_are_identical() {
        let base = PieceKind::O.shape(Rotation::default());
        for rotation in rotations() {
            assert_eq!(PieceKind::O.shape(rotation), base);
        }
    }

    #[test]
    fn i_s_z_alternate_between_two_shapes() {
        let [r0, r1, r2, r3] = rotations();
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            assert_eq!(kind.shape(r0), kind.shape(r2), "{kind:?}");
            assert_eq!(kind.shape(r1), kind.shape(r3), "{kind:?}");
            assert_ne!(kind.shape(r0), kind.shape(r1), "{kind:?}");
        }
    }

    #[test]
    fn rotation_index_cycles() {
        let mut rotation = Rotation::default();
        for _ in 0..4 {
            rotation = rotation.cw();
        }
        assert_eq!(rotation, Rotation::default());

        assert_eq!(Rotation::default().ccw(), Rotation::default().cw().cw().cw());
    }

    #[test]
    fn spawn_position_and_rotation() {
        let piece = Piece::spawn(PieceKind::J);
        assert_eq!(piece.position(), Position::new(SPAWN_X, SPAWN_Y));
        assert_eq!(piece.rotation(), Rotation::default());
    }

    #[test]
    fn occupied_cells_follow_position() {
        let piece = Piece::spawn(PieceKind::I);
        let cells: Vec<_> = piece.occupied_cells().collect();
        assert_eq!(cells, vec![(3, 1), (4, 1), (5, 1), (6, 1)]);

        let moved: Vec<_> = piece.translated(-1, 2).occupied_cells().collect();
        assert_eq!(moved, vec![(2, 3), (3, 3), (4, 3), (5, 3)]);
    }

    #[test]
    fn dropped_is_idempotent() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::L);
        let landed = piece.dropped(&board);
        assert_eq!(landed, landed.dropped(&board));
        assert!(board.can_place(&landed));
        assert!(!board.can_move(&landed, 0, 1));
    }

    #[test]
    fn char_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
    }

    fn rotations() -> [Rotation; 4] {
        let r0 = Rotation::default();
        [r0, r0.cw(), r0.cw().cw(), r0.cw().cw().cw()]
    }
}
