use blockfall_engine::{BagSeed, GameConfig};
use crossterm::event::Event;
use ratatui::Frame;

use crate::{
    command::play::screen::PlayScreen,
    score_store::ScoreStore,
    tui::{App, Tui},
};

const FPS: u64 = 60;

#[derive(Debug)]
pub(crate) struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub(crate) fn new(
        config: GameConfig,
        seed: Option<BagSeed>,
        show_ghost: bool,
        store: ScoreStore,
    ) -> Self {
        Self {
            screen: PlayScreen::new(config, seed, show_ghost, store),
        }
    }
}

impl App for PlayApp {
    #[expect(clippy::cast_precision_loss)]
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS as f64);
    }

    fn should_exit(&self) -> bool {
        self.screen.is_exiting()
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        self.screen.handle_event(&event);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, _tui: &mut Tui) {
        self.screen.update();
    }
}
