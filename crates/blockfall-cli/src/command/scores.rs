use std::path::PathBuf;

use crate::score_store::ScoreStore;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// Directory containing finished-game records
    #[clap(long, default_value = "./data/scores/")]
    score_dir: PathBuf,
    /// Maximum number of results to show
    #[clap(long, default_value_t = 10)]
    limit: usize,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let records = ScoreStore::new(arg.score_dir.clone()).load_all()?;
    if records.is_empty() {
        println!("no recorded games in {}", arg.score_dir.display());
        return Ok(());
    }

    println!(
        "{:<20} {:>8} {:>6} {:>6} {:>7} {:>7}",
        "DATE", "SCORE", "LEVEL", "LINES", "TIME", "TETRIS"
    );
    for record in records.iter().take(arg.limit) {
        let summary = &record.summary;
        println!(
            "{:<20} {:>8} {:>6} {:>6} {:>7} {:>7}",
            record.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            summary.score,
            summary.level,
            summary.lines,
            format_duration(summary.duration_seconds),
            summary.line_clears.tetris,
        );
    }
    Ok(())
}

fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(61), "1:01");
        assert_eq!(format_duration(3600), "60:00");
    }
}
