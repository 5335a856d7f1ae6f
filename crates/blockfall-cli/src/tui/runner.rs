use std::time::Duration;

use crate::tui::{
    App,
    event_loop::{EventLoop, TuiEvent},
};

/// TUI application runtime.
///
/// Owns the event loop and executes applications implementing [`App`] inside
/// a ratatui terminal session.
#[derive(Default, Debug)]
pub(crate) struct Tui {
    events: EventLoop,
}

impl Tui {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub(crate) fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Runs the application until [`App::should_exit`] returns true.
    ///
    /// `Tick` events call [`App::update`], `Render` events draw a frame, and
    /// terminal events go to [`App::handle_event`].
    pub(crate) fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
