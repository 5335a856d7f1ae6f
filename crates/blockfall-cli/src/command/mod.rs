use clap::{Parser, Subcommand};

use self::{play::PlayArg, scores::ScoresArg};

mod play;
mod scores;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play an interactive session in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// List recorded game results
    Scores(#[clap(flatten)] ScoresArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg),
        Mode::Scores(arg) => scores::run(&arg),
    }
}
