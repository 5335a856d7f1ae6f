use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap as _};

use crate::PieceKind;

/// Score values for simultaneous line clears, multiplied by the level at the
/// time of the lock. Index is the number of lines cleared (0-4).
const LINE_SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1200];

/// Lines required to advance one level.
const LINES_PER_LEVEL: usize = 10;

/// Session statistics: score, level, lines, and per-piece / per-clear-size
/// counters.
///
/// The level is derived from total cleared lines (one level per ten lines),
/// floored at the configured starting level. Scoring is the classic table —
/// no combo, back-to-back, or spin bonuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    start_level: usize,
    lines: usize,
    pieces: PieceCounts,
    line_clears: LineClearCounts,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GameStats {
    /// Creates a statistics tracker with all counters at zero.
    ///
    /// `start_level` is clamped to at least 1.
    #[must_use]
    pub fn new(start_level: usize) -> Self {
        Self {
            score: 0,
            start_level: start_level.max(1),
            lines: 0,
            pieces: PieceCounts::default(),
            line_clears: LineClearCounts::default(),
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level: one per ten cleared lines, never below the start level.
    #[must_use]
    pub fn level(&self) -> usize {
        self.start_level.max(self.lines / LINES_PER_LEVEL + 1)
    }

    /// Total lines cleared over the session.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub const fn pieces(&self) -> &PieceCounts {
        &self.pieces
    }

    #[must_use]
    pub const fn line_clears(&self) -> &LineClearCounts {
        &self.line_clears
    }

    /// Updates the counters for a locked piece.
    ///
    /// The score delta is `LINE_SCORE_TABLE[cleared] × level`, using the
    /// level in effect before the cleared lines are added.
    pub fn record_lock(&mut self, kind: PieceKind, cleared: usize) {
        debug_assert!(cleared <= 4, "a single lock clears at most 4 lines");
        self.pieces.record(kind);
        self.line_clears.record(cleared);
        self.score += LINE_SCORE_TABLE[cleared] * self.level();
        self.lines += cleared;
    }

    /// Builds the end-of-session summary handed to persistence collaborators.
    #[must_use]
    pub fn summary(&self, duration_seconds: u64) -> SessionSummary {
        SessionSummary {
            score: self.score,
            level: self.level(),
            lines: self.lines,
            duration_seconds,
            pieces: self.pieces,
            line_clears: self.line_clears,
        }
    }
}

/// End-of-session record: final score, level, lines, duration, and the
/// per-piece / per-clear-size counters.
///
/// Produced when the session transitions to game over and handed to the
/// persistence collaborator; the engine itself never writes it anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: usize,
    pub level: usize,
    pub lines: usize,
    pub duration_seconds: u64,
    pub pieces: PieceCounts,
    pub line_clears: LineClearCounts,
}

/// Number of locked pieces per piece kind.
///
/// Serializes as a map keyed by the piece letter (`{"I": 3, "O": 1, ...}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieceCounts([usize; PieceKind::LEN]);

impl PieceCounts {
    #[must_use]
    pub fn count(&self, kind: PieceKind) -> usize {
        self.0[kind as usize]
    }

    /// Total number of locked pieces.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    fn record(&mut self, kind: PieceKind) {
        self.0[kind as usize] += 1;
    }
}

impl Serialize for PieceCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(PieceKind::LEN))?;
        for kind in PieceKind::ALL {
            map.serialize_entry(&kind.as_char(), &self.count(kind))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PieceCounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = std::collections::BTreeMap::<char, usize>::deserialize(deserializer)?;
        let mut counts = Self::default();
        for (key, count) in entries {
            let kind = PieceKind::from_char(key)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown piece kind: {key}")))?;
            counts.0[kind as usize] = count;
        }
        Ok(counts)
    }
}

/// Number of line clears by clear size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClearCounts {
    pub single: usize,
    pub double: usize,
    pub triple: usize,
    pub tetris: usize,
}

impl LineClearCounts {
    fn record(&mut self, cleared: usize) {
        match cleared {
            1 => self.single += 1,
            2 => self.double += 1,
            3 => self.triple += 1,
            4 => self.tetris += 1,
            // Locks without a clear are not counted.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_advances_every_ten_lines() {
        let mut stats = GameStats::new(1);
        assert_eq!(stats.level(), 1);

        for _ in 0..5 {
            stats.record_lock(PieceKind::T, 2);
        }
        assert_eq!(stats.lines(), 10);
        assert_eq!(stats.level(), 2);

        // 25 cumulative lines: floor(25 / 10) + 1 = 3.
        for _ in 0..5 {
            stats.record_lock(PieceKind::T, 3);
        }
        assert_eq!(stats.lines(), 25);
        assert_eq!(stats.level(), 3);
    }

    #[test]
    fn level_never_drops_below_start_level() {
        let stats = GameStats::new(5);
        assert_eq!(stats.level(), 5);
        assert_eq!(GameStats::new(0).level(), 1);
    }

    #[test]
    fn double_clear_at_level_three_scores_three_hundred() {
        let mut stats = GameStats::new(3);
        stats.record_lock(PieceKind::S, 2);
        assert_eq!(stats.score(), 100 * 3);
    }

    #[test]
    fn score_delta_uses_level_before_the_clear() {
        let mut stats = GameStats::new(1);
        for _ in 0..4 {
            stats.record_lock(PieceKind::I, 2);
        }
        // 8 lines, still level 1: 4 doubles at 100 each.
        assert_eq!(stats.score(), 400);

        // This double crosses 10 lines but is still scored at level 1.
        stats.record_lock(PieceKind::I, 2);
        assert_eq!(stats.score(), 500);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn counters_track_pieces_and_clear_sizes() {
        let mut stats = GameStats::new(1);
        stats.record_lock(PieceKind::I, 0);
        stats.record_lock(PieceKind::I, 1);
        stats.record_lock(PieceKind::T, 4);

        assert_eq!(stats.pieces().count(PieceKind::I), 2);
        assert_eq!(stats.pieces().count(PieceKind::T), 1);
        assert_eq!(stats.pieces().total(), 3);

        let clears = stats.line_clears();
        assert_eq!(clears.single, 1);
        assert_eq!(clears.double, 0);
        assert_eq!(clears.tetris, 1);
    }

    #[test]
    fn summary_serializes_with_named_keys() {
        let mut stats = GameStats::new(1);
        stats.record_lock(PieceKind::J, 1);
        stats.record_lock(PieceKind::J, 4);

        let summary = stats.summary(90);
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["score"], 40 + 1200);
        assert_eq!(json["pieces"]["J"], 2);
        assert_eq!(json["pieces"]["I"], 0);
        assert_eq!(json["line_clears"]["single"], 1);
        assert_eq!(json["line_clears"]["tetris"], 1);
        assert_eq!(json["duration_seconds"], 90);

        let parsed: SessionSummary = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, summary);
    }
}
