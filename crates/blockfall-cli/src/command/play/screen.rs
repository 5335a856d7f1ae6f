use blockfall_engine::{BagSeed, Command, GameConfig, GameEvent, GameSession, GameStatus};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{score_store::ScoreStore, ui::widgets::SessionDisplay};

#[derive(Debug)]
pub(crate) struct PlayScreen {
    session: GameSession,
    show_ghost: bool,
    store: ScoreStore,
    save_note: Option<String>,
    is_exiting: bool,
}

impl PlayScreen {
    pub(crate) fn new(
        config: GameConfig,
        seed: Option<BagSeed>,
        show_ghost: bool,
        store: ScoreStore,
    ) -> Self {
        let session = match seed {
            Some(seed) => GameSession::with_seed(config, seed),
            None => GameSession::new(config),
        };
        Self {
            session,
            show_ghost,
            store,
            save_note: None,
            is_exiting: false,
        }
    }

    pub(crate) fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub(crate) fn update(&mut self) {
        if self.session.status().is_playing() {
            self.dispatch(Command::Tick);
        }
    }

    pub(crate) fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };

        match self.session.status() {
            GameStatus::Menu => match key.code {
                KeyCode::Enter | KeyCode::Char('s') => self.session.start(),
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            },
            GameStatus::Playing => match key.code {
                KeyCode::Left => self.dispatch(Command::MoveLeft),
                KeyCode::Right => self.dispatch(Command::MoveRight),
                KeyCode::Down => self.dispatch(Command::MoveDown),
                KeyCode::Up => self.dispatch(Command::HardDrop),
                KeyCode::Char('z') => self.dispatch(Command::RotateCcw),
                KeyCode::Char('x') => self.dispatch(Command::RotateCw),
                KeyCode::Char('c') => self.dispatch(Command::Hold),
                KeyCode::Char('p') => self.dispatch(Command::PauseToggle),
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            },
            GameStatus::Paused => match key.code {
                KeyCode::Char('p') => self.dispatch(Command::PauseToggle),
                KeyCode::Esc => self.session.abandon(),
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            },
            GameStatus::GameOver => match key.code {
                KeyCode::Char('r') => {
                    self.save_note = None;
                    self.dispatch(Command::Restart);
                }
                KeyCode::Esc => self.session.abandon(),
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            },
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        if self.session.status().is_menu() {
            self.draw_menu(frame);
            return;
        }

        let session_display = SessionDisplay::new(&self.session, self.show_ghost);
        let help_text = match self.session.status() {
            GameStatus::Playing => {
                "← → (Move) | ↓ (Soft Drop) | ↑ (Hard Drop) | Z X (Rotate) | C (Hold) | P (Pause) | Q (Quit)"
            }
            GameStatus::Paused => "P (Resume) | Esc (Menu) | Q (Quit)",
            GameStatus::GameOver => "R (Restart) | Esc (Menu) | Q (Quit)",
            GameStatus::Menu => unreachable!("menu draws its own screen"),
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        let save_note = Text::from(self.save_note.as_deref().unwrap_or_default())
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, note_area, help_area] = Layout::vertical([
            Constraint::Length(23),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas::<3>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(save_note, note_area);
        frame.render_widget(help_text, help_area);
    }

    fn draw_menu(&self, frame: &mut Frame<'_>) {
        let lines = [
            "B L O C K F A L L",
            "",
            "Enter / S  Start game",
            "Q          Quit",
        ];
        let text = Text::from(lines.join("\n")).centered();
        let [area] = Layout::vertical([Constraint::Length(4)])
            .flex(ratatui::layout::Flex::Center)
            .areas::<1>(frame.area());
        frame.render_widget(text, area);
    }

    /// Applies a command and reacts to the events it produced.
    ///
    /// On game over the session summary is handed to the score store; a
    /// failed write is surfaced as a note but never touches the session.
    fn dispatch(&mut self, command: Command) {
        let events = self.session.apply(command);
        if events.contains(&GameEvent::GameOver) {
            self.persist_summary();
        }
    }

    fn persist_summary(&mut self) {
        let Some(summary) = self.session.summary() else {
            return;
        };
        self.save_note = Some(match self.store.save(summary) {
            Ok(path) => format!("saved result to {}", path.display()),
            Err(err) => format!("failed to save result: {err:#}"),
        });
    }
}
