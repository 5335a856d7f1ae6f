//! Game engine logic and state management.
//!
//! The core data structures from [`crate::core`] are orchestrated here into
//! playable sessions:
//!
//! - [`GameField`] — single-turn playfield state (board, active piece, next
//!   queue, hold slot)
//! - [`GameSession`] — the command-driven state machine with statistics and
//!   the fixed-timestep gravity timer
//! - [`GameStats`] — score, level, lines, and per-piece / per-clear counters
//! - [`PieceBag`] — 7-bag piece generation with an injectable seed
//!
//! A session is driven entirely by [`Command`] values plus a 60 Hz tick, and
//! answers with [`GameEvent`] values; collaborators (rendering, audio,
//! storage) react to those events and read snapshots, never mutating engine
//! state directly.

pub use self::{game_field::*, game_session::*, game_stats::*, piece_bag::*};

mod game_field;
mod game_session;
mod game_stats;
mod piece_bag;
