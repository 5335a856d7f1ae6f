use std::time::{Duration, Instant};

use crossterm::event;

/// Events delivered to TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// Application logic update timing (based on the tick interval).
    Tick,
    /// Screen render timing (after a tick or terminal event).
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(event::Event),
}

/// Event loop state.
///
/// Produces ticks at a fixed interval, renders whenever state may have
/// changed, and forwards terminal events as they arrive. Without a tick
/// interval set, only terminal events wake the loop.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            // Initial render is required on startup.
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Returns the next event, blocking until a tick is due or a terminal
    /// event occurs.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let timeout = self.tick_interval.map_or(
                Duration::from_millis(250),
                |interval| (self.last_tick + interval).saturating_duration_since(now),
            );
            if !event::poll(timeout)? {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }
}
