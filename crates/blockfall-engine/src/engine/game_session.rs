use std::time::Duration;

use arrayvec::ArrayVec;

use crate::{
    core::piece::{Piece, PieceKind},
    engine::{
        game_field::GameField,
        game_stats::{GameStats, SessionSummary},
        piece_bag::BagSeed,
    },
};

/// Fixed simulation timestep (60 Hz).
pub const TICK: Duration = Duration::from_micros(16_667);

/// Gravity interval at level 1.
const BASE_DROP_INTERVAL_MS: f64 = 1000.0;
/// Per-level speed-up factor.
const DROP_SPEED_FACTOR: f64 = 0.9;
/// Fastest gravity interval.
const MIN_DROP_INTERVAL_MS: f64 = 50.0;

/// Time between gravity steps for the given level.
///
/// `max(50ms, 1000ms × 0.9^(level − 1))`: monotonically decreasing with a
/// floor so high levels stay playable.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn drop_interval(level: usize) -> Duration {
    let millis =
        (BASE_DROP_INTERVAL_MS * DROP_SPEED_FACTOR.powf(level.saturating_sub(1) as f64))
            .max(MIN_DROP_INTERVAL_MS);
    Duration::from_secs_f64(millis / 1000.0)
}

/// Lifecycle state of a session.
///
/// `Menu` and `GameOver` run no simulation; `Paused` freezes gravity and all
/// command effects except resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Discrete commands accepted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateCw,
    RotateCcw,
    HardDrop,
    Hold,
    PauseToggle,
    Restart,
    Tick,
}

/// What a command did to the session, reported back to the caller.
///
/// The engine never talks to audio, rendering, or storage itself — it
/// describes state transitions as values and collaborators dispatch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Moved,
    Rotated,
    Held,
    Locked { cleared: usize },
    LevelUp { level: usize },
    GameOver,
}

/// Events produced by a single command (a lock can report at most a `Locked`,
/// a `LevelUp`, and a `GameOver` together).
pub type GameEvents = ArrayVec<GameEvent, 4>;

/// Externally supplied session configuration.
///
/// Board dimensions are fixed; the ghost-piece toggle is a display concern
/// and lives with the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Level the session starts at (clamped to ≥ 1).
    pub start_level: usize,
    /// Length of the next-piece preview queue (clamped to ≥ 1).
    pub preview_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_level: 1,
            preview_count: 3,
        }
    }
}

/// A complete game session: playfield, statistics, lifecycle state, and the
/// fixed-timestep gravity timer.
///
/// Sessions are plain values owned by the caller; independent sessions never
/// share state. Every mutation goes through [`apply`](Self::apply) or one of
/// the explicit lifecycle transitions, all of which complete synchronously.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    field: GameField,
    stats: GameStats,
    status: GameStatus,
    drop_timer: Duration,
    elapsed: Duration,
    summary: Option<SessionSummary>,
}

impl GameSession {
    /// Creates a session in the menu state with a random piece sequence.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::build(config, GameField::new(config.preview_count))
    }

    /// Like [`Self::new`], but with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: BagSeed) -> Self {
        Self::build(config, GameField::with_seed(config.preview_count, seed))
    }

    fn build(config: GameConfig, field: GameField) -> Self {
        Self {
            config,
            field,
            stats: GameStats::new(config.start_level),
            status: GameStatus::Menu,
            drop_timer: Duration::ZERO,
            elapsed: Duration::ZERO,
            summary: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Wall-clock play time, derived from the number of elapsed ticks.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.elapsed
    }

    /// The end-of-session summary; present once the session is over.
    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.field.active_piece()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.field.held_piece()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.field.next_pieces()
    }

    /// Ghost-preview target for the active piece.
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        self.field.drop_position()
    }

    /// Starts play from the menu with a fresh field.
    pub fn start(&mut self) {
        if self.status.is_menu() {
            self.reset();
            self.status = GameStatus::Playing;
        }
    }

    /// Abandons a paused or finished session, returning to the menu.
    pub fn abandon(&mut self) {
        if self.status.is_paused() || self.status.is_game_over() {
            self.status = GameStatus::Menu;
        }
    }

    /// Restarts with a fresh field, statistics, and piece sequence.
    pub fn restart(&mut self) {
        self.reset();
        self.status = GameStatus::Playing;
    }

    fn reset(&mut self) {
        self.field = GameField::new(self.config.preview_count);
        self.stats = GameStats::new(self.config.start_level);
        self.drop_timer = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.summary = None;
    }

    /// Applies a command, returning the events it produced.
    ///
    /// Commands outside the `Playing` state are no-ops, with two exceptions:
    /// `PauseToggle` resumes a paused session and `Restart` restarts a
    /// finished one. Blocked moves and rotations are silent rejections.
    pub fn apply(&mut self, command: Command) -> GameEvents {
        let mut events = GameEvents::new();
        match self.status {
            GameStatus::Playing => {}
            GameStatus::Paused => {
                if command == Command::PauseToggle {
                    self.status = GameStatus::Playing;
                }
                return events;
            }
            GameStatus::GameOver => {
                if command == Command::Restart {
                    self.restart();
                }
                return events;
            }
            GameStatus::Menu => return events,
        }

        match command {
            Command::MoveLeft => {
                if self.field.try_move(-1, 0).is_ok() {
                    events.push(GameEvent::Moved);
                }
            }
            Command::MoveRight => {
                if self.field.try_move(1, 0).is_ok() {
                    events.push(GameEvent::Moved);
                }
            }
            Command::MoveDown => {
                if self.field.try_move(0, 1).is_ok() {
                    events.push(GameEvent::Moved);
                }
            }
            Command::RotateCw => {
                if self.field.try_rotate(true).is_ok() {
                    events.push(GameEvent::Rotated);
                }
            }
            Command::RotateCcw => {
                if self.field.try_rotate(false).is_ok() {
                    events.push(GameEvent::Rotated);
                }
            }
            Command::Hold => {
                if self.field.try_hold().is_ok() {
                    events.push(GameEvent::Held);
                }
            }
            Command::HardDrop => {
                self.field.hard_drop_active();
                self.lock_active(&mut events);
            }
            Command::PauseToggle => self.status = GameStatus::Paused,
            Command::Restart => self.restart(),
            Command::Tick => self.tick(&mut events),
        }
        events
    }

    /// Advances the gravity accumulator by one fixed timestep.
    fn tick(&mut self, events: &mut GameEvents) {
        self.elapsed += TICK;
        self.drop_timer += TICK;
        if self.drop_timer < drop_interval(self.stats.level()) {
            return;
        }
        if self.field.try_move(0, 1).is_ok() {
            self.drop_timer = Duration::ZERO;
        } else {
            self.lock_active(events);
        }
    }

    /// Lock procedure: board write, line clear, counters, score/level, next
    /// spawn, top-out check.
    fn lock_active(&mut self, events: &mut GameEvents) {
        let kind = self.field.active_piece().kind();
        let level_before = self.stats.level();

        let (cleared, spawn) = self.field.lock_active();
        self.stats.record_lock(kind, cleared);
        self.drop_timer = Duration::ZERO;
        events.push(GameEvent::Locked { cleared });

        let level = self.stats.level();
        if level > level_before {
            events.push(GameEvent::LevelUp { level });
        }

        if spawn.is_err() {
            self.status = GameStatus::GameOver;
            self.summary = Some(self.stats.summary(self.elapsed.as_secs()));
            events.push(GameEvent::GameOver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        board::{BOARD_WIDTH, Board, Cell},
        piece::Rotation,
    };

    fn seed(byte: u8) -> BagSeed {
        format!("{byte:02x}").repeat(16).parse().unwrap()
    }

    fn playing_session() -> GameSession {
        let mut session = GameSession::with_seed(GameConfig::default(), seed(0x21));
        session.start();
        session
    }

    /// Ticks the session exactly often enough to trigger one gravity step.
    fn ticks_per_gravity_step(session: &GameSession) -> u32 {
        let interval = drop_interval(session.stats().level());
        let mut ticks = 0;
        let mut timer = Duration::ZERO;
        while timer < interval {
            timer += TICK;
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn drop_interval_follows_level_curve() {
        assert_eq!(drop_interval(1), Duration::from_millis(1000));
        assert_eq!(drop_interval(2), Duration::from_millis(900));
        assert!(drop_interval(5) < drop_interval(4));
        // Deep levels bottom out at the floor.
        assert_eq!(drop_interval(50), Duration::from_millis(50));
    }

    #[test]
    fn session_starts_in_menu_and_ignores_commands() {
        let mut session = GameSession::with_seed(GameConfig::default(), seed(0x01));
        assert!(session.status().is_menu());
        let piece = session.active_piece();
        assert!(session.apply(Command::MoveLeft).is_empty());
        assert!(session.apply(Command::Tick).is_empty());
        assert_eq!(session.active_piece(), piece);
        assert!(session.status().is_menu());
    }

    #[test]
    fn start_transitions_menu_to_playing() {
        let mut session = GameSession::with_seed(GameConfig::default(), seed(0x02));
        session.start();
        assert!(session.status().is_playing());
        // Starting again is a no-op once playing.
        session.start();
        assert!(session.status().is_playing());
    }

    #[test]
    fn move_commands_emit_moved_events() {
        let mut session = playing_session();
        let x_before = session.active_piece().position().x();
        let events = session.apply(Command::MoveLeft);
        assert_eq!(events.as_slice(), [GameEvent::Moved]);
        assert_eq!(session.active_piece().position().x(), x_before - 1);
    }

    #[test]
    fn blocked_moves_are_silent_no_ops() {
        let mut session = playing_session();
        // Run into the left wall; eventually moves stop producing events.
        for _ in 0..BOARD_WIDTH {
            session.apply(Command::MoveLeft);
        }
        let piece = session.active_piece();
        assert!(session.apply(Command::MoveLeft).is_empty());
        assert_eq!(session.active_piece(), piece);
    }

    #[test]
    fn rotate_commands_emit_rotated_events() {
        let mut session = playing_session();
        let events = session.apply(Command::RotateCw);
        assert_eq!(events.as_slice(), [GameEvent::Rotated]);
    }

    #[test]
    fn pause_freezes_everything_but_resume() {
        let mut session = playing_session();
        session.apply(Command::PauseToggle);
        assert!(session.status().is_paused());

        let piece = session.active_piece();
        assert!(session.apply(Command::MoveLeft).is_empty());
        assert!(session.apply(Command::Tick).is_empty());
        assert_eq!(session.active_piece(), piece);
        assert_eq!(session.duration(), Duration::ZERO);

        session.apply(Command::PauseToggle);
        assert!(session.status().is_playing());
    }

    #[test]
    fn gravity_moves_piece_after_the_level_interval() {
        let mut session = playing_session();
        let y_before = session.active_piece().position().y();
        let ticks = ticks_per_gravity_step(&session);
        for _ in 0..ticks - 1 {
            assert!(session.apply(Command::Tick).is_empty());
        }
        let events = session.apply(Command::Tick);
        assert!(events.is_empty());
        assert_eq!(session.active_piece().position().y(), y_before + 1);
    }

    #[test]
    fn hard_drop_locks_and_spawns_next() {
        let mut session = playing_session();
        let next = session.next_pieces().next().unwrap();
        let events = session.apply(Command::HardDrop);
        assert_eq!(events.as_slice(), [GameEvent::Locked { cleared: 0 }]);
        assert_eq!(session.active_piece().kind(), next);
        assert_eq!(session.stats().pieces().total(), 1);
    }

    #[test]
    fn hold_is_usable_once_per_lock() {
        let mut session = playing_session();
        let active = session.active_piece().kind();
        let events = session.apply(Command::Hold);
        assert_eq!(events.as_slice(), [GameEvent::Held]);
        assert_eq!(session.held_piece(), Some(active));
        assert!(session.apply(Command::Hold).is_empty());

        session.apply(Command::HardDrop);
        assert_eq!(session.apply(Command::Hold).as_slice(), [GameEvent::Held]);
    }

    #[test]
    fn lock_clearing_a_row_updates_score_and_counters() {
        let mut session = playing_session();
        // Bottom row lacks only the last column; drop a vertical I into it.
        let mut board = Board::new();
        for x in 0..9 {
            board.set_cell(x, 19, Cell::Piece(PieceKind::L));
        }
        set_field_state(
            &mut session,
            board,
            Piece::spawn(PieceKind::I)
                .with_rotation(Rotation::default().cw())
                .translated(4, 0),
        );

        let events = session.apply(Command::HardDrop);
        assert_eq!(events.as_slice(), [GameEvent::Locked { cleared: 1 }]);
        assert_eq!(session.stats().score(), 40);
        assert_eq!(session.stats().lines(), 1);
        assert_eq!(session.stats().line_clears().single, 1);
        assert!(session.field().board().is_cell_empty(0, 19));
    }

    #[test]
    fn level_up_is_reported_when_lines_cross_the_threshold() {
        let mut session = playing_session();
        // Nine lines done; the next single crosses into level 2.
        for _ in 0..9 {
            lock_one_line(&mut session);
            let _ = session.apply(Command::HardDrop);
        }
        assert_eq!(session.stats().lines(), 9);

        lock_one_line(&mut session);
        let events = session.apply(Command::HardDrop);
        assert!(events.contains(&GameEvent::Locked { cleared: 1 }), "{events:?}");
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }), "{events:?}");
        assert_eq!(session.stats().level(), 2);
    }

    #[test]
    fn top_out_transitions_to_game_over_with_summary() {
        let mut session = playing_session();
        let mut board = Board::new();
        // Fill the spawn rows (column 0 open so nothing clears).
        for y in 1..4 {
            for x in 1..BOARD_WIDTH as i32 {
                board.set_cell(x, y, Cell::Piece(PieceKind::Z));
            }
        }
        set_field_state(
            &mut session,
            board,
            Piece::spawn(PieceKind::O).translated(-3, 15),
        );

        let events = session.apply(Command::HardDrop);
        assert!(events.contains(&GameEvent::GameOver), "{events:?}");
        assert!(session.status().is_game_over());

        let summary = session.summary().expect("summary present after game over");
        assert_eq!(summary.pieces.count(PieceKind::O), 1);
        assert_eq!(summary.lines, 0);

        // Frozen: nothing but restart reacts.
        assert!(session.apply(Command::MoveLeft).is_empty());
        assert!(session.apply(Command::Tick).is_empty());
    }

    #[test]
    fn restart_resets_the_session() {
        let mut session = playing_session();
        session.apply(Command::HardDrop);
        session.apply(Command::Hold);
        session.apply(Command::Restart);

        assert!(session.status().is_playing());
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().pieces().total(), 0);
        assert_eq!(session.held_piece(), None);
        assert_eq!(session.duration(), Duration::ZERO);
        assert!(session.summary().is_none());
        assert_eq!(session.field().board(), &Board::new());
    }

    #[test]
    fn abandon_returns_to_menu_from_paused() {
        let mut session = playing_session();
        session.apply(Command::PauseToggle);
        session.abandon();
        assert!(session.status().is_menu());

        // Abandon does nothing mid-play.
        let mut session = playing_session();
        session.abandon();
        assert!(session.status().is_playing());
    }

    /// Swaps in a prepared board and active piece, keeping queue and bag.
    fn set_field_state(session: &mut GameSession, board: Board, active: Piece) {
        *session.field.board_mut() = board;
        session
            .field
            .set_active_piece(active)
            .expect("test piece placeable");
    }

    /// Prepares the board so the next hard drop clears exactly one line: the
    /// bottom row lacks only the last column and a vertical I hovers over it.
    fn lock_one_line(session: &mut GameSession) {
        let mut board = Board::new();
        for x in 0..9 {
            board.set_cell(x, 19, Cell::Piece(PieceKind::L));
        }
        set_field_state(
            session,
            board,
            Piece::spawn(PieceKind::I)
                .with_rotation(Rotation::default().cw())
                .translated(4, 0),
        );
    }
}
