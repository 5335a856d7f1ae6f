use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use blockfall_engine::SessionSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single finished-game record as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ScoreRecord {
    pub(crate) recorded_at: DateTime<Utc>,
    pub(crate) summary: SessionSummary,
}

/// Persistence collaborator for session summaries.
///
/// Each finished game becomes one timestamped JSON file in the score
/// directory. Failures here are reported to the caller and never affect the
/// in-memory session — the engine state stays authoritative.
#[derive(Debug, Clone)]
pub(crate) struct ScoreStore {
    dir: PathBuf,
}

impl ScoreStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writes a summary as `game_{timestamp}.json`, creating the directory
    /// if needed. Returns the path of the new record.
    pub(crate) fn save(&self, summary: &SessionSummary) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create directory {}", self.dir.display()))?;

        let recorded_at = Utc::now();
        let filename = format!("game_{}.json", recorded_at.format("%Y%m%d_%H%M%S%3f"));
        let path = self.dir.join(filename);
        let record = ScoreRecord {
            recorded_at,
            summary: *summary,
        };

        let file = File::create(&path)
            .with_context(|| format!("failed to create file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &record)
            .with_context(|| format!("failed to write JSON to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush output to {}", path.display()))?;

        Ok(path)
    }

    /// Reads every record in the score directory, newest first.
    ///
    /// A missing directory reads as an empty list — no game has been
    /// recorded yet.
    pub(crate) fn load_all(&self) -> anyhow::Result<Vec<ScoreRecord>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read directory {}", self.dir.display()));
            }
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to read directory {}", self.dir.display()))?
                .path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let file = File::open(&path)
                .with_context(|| format!("failed to open file {}", path.display()))?;
            let record = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse record {}", path.display()))?;
            records.push(record);
        }
        records.sort_by(|a: &ScoreRecord, b: &ScoreRecord| b.recorded_at.cmp(&a.recorded_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{GameStats, PieceKind};

    use super::*;

    fn temp_store(tag: &str) -> ScoreStore {
        let dir = std::env::temp_dir().join(format!(
            "blockfall-score-store-{tag}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        ScoreStore::new(dir)
    }

    fn sample_summary(locks: usize) -> SessionSummary {
        let mut stats = GameStats::new(1);
        for _ in 0..locks {
            stats.record_lock(PieceKind::T, 1);
        }
        stats.summary(120)
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store("round-trip");
        let summary = sample_summary(3);

        let path = store.save(&summary).unwrap();
        assert!(path.exists());

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].summary, summary);

        fs::remove_dir_all(store.dir).unwrap();
    }

    #[test]
    fn load_orders_newest_first() {
        let store = temp_store("ordering");
        store.save(&sample_summary(1)).unwrap();
        // Keep the two record timestamps (and filenames) distinct.
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.save(&sample_summary(2)).unwrap();

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].recorded_at >= records[1].recorded_at);

        fs::remove_dir_all(store.dir).unwrap();
    }

    #[test]
    fn missing_directory_reads_as_empty() {
        let store = temp_store("missing");
        assert_eq!(store.load_all().unwrap(), Vec::new());
    }
}
