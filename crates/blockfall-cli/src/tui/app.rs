use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications driven by [`Tui::run`].
pub(crate) trait App {
    /// Initializes the application; use this to configure the tick rate.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the screen (called whenever state may have changed).
    fn draw(&self, frame: &mut Frame);

    /// Advances application logic (called once per tick).
    fn update(&mut self, tui: &mut Tui);
}
