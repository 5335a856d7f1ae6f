use std::path::PathBuf;

use blockfall_engine::{BagSeed, GameConfig};

use crate::{command::play::app::PlayApp, score_store::ScoreStore, tui::Tui};

mod app;
mod screen;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Starting level (1-based)
    #[clap(long, default_value_t = 1)]
    start_level: usize,
    /// Number of upcoming pieces shown in the NEXT panel
    #[clap(long, default_value_t = 3)]
    preview: usize,
    /// Hide the ghost piece (landing preview)
    #[clap(long)]
    no_ghost: bool,
    /// Hex seed for a deterministic piece sequence (32 hex characters)
    #[clap(long)]
    seed: Option<BagSeed>,
    /// Directory where finished-game records are written
    #[clap(long, default_value = "./data/scores/")]
    score_dir: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            start_level: 1,
            preview: 3,
            no_ghost: false,
            seed: None,
            score_dir: PathBuf::from("./data/scores/"),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = GameConfig {
        start_level: arg.start_level.max(1),
        preview_count: arg.preview.clamp(1, 7),
    };
    let store = ScoreStore::new(arg.score_dir.clone());

    let mut app = PlayApp::new(config, arg.seed, !arg.no_ghost, store);
    Tui::new().run(&mut app)
}
