use std::time::{Duration, Instant};

use crate::canvas::Canvas;
use crate::engine::Engine;
use crate::error::RenderError;
use crate::paint::repaint;
use crate::view::ViewState;

pub const DEFAULT_TICK_DELAY: Duration = Duration::from_millis(50);
/// About one 60 Hz frame. Shorter delays are raised to this so the event
/// loop always has a future deadline to sleep until.
pub const MIN_TICK_DELAY: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The deadline has not been reached yet.
    NotDue,
    /// Paused: the tick was consumed without touching the engine.
    Idle,
    /// One generation advanced and the canvas repainted.
    Advanced,
    Stopped,
}

/// Paces generations with a fixed delay between ticks.
///
/// The event loop sleeps until [`RenderLoop::next_deadline`] and then calls
/// [`RenderLoop::tick`]; nothing here spins.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    tick_delay: Duration,
    next_tick: Instant,
    stopped: bool,
}

impl RenderLoop {
    pub fn new(tick_delay: Duration, now: Instant) -> Self {
        let tick_delay = tick_delay.max(MIN_TICK_DELAY);
        Self {
            tick_delay,
            next_tick: now + tick_delay,
            stopped: false,
        }
    }

    pub fn tick_delay(&self) -> Duration {
        self.tick_delay
    }

    /// A shorter delay pulls the pending deadline in; a longer one applies
    /// from the next tick.
    pub fn set_tick_delay(&mut self, tick_delay: Duration, now: Instant) {
        self.tick_delay = tick_delay.max(MIN_TICK_DELAY);
        self.next_tick = self.next_tick.min(now + self.tick_delay);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        (!self.stopped).then_some(self.next_tick)
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn tick<E, C>(
        &mut self,
        now: Instant,
        engine: &mut E,
        canvas: &mut C,
        view: &ViewState,
    ) -> Result<TickOutcome, RenderError>
    where
        E: Engine + ?Sized,
        C: Canvas + ?Sized,
    {
        if self.stopped {
            return Ok(TickOutcome::Stopped);
        }
        if now < self.next_tick {
            return Ok(TickOutcome::NotDue);
        }
        self.next_tick = now + self.tick_delay;

        if view.paused {
            return Ok(TickOutcome::Idle);
        }
        engine.advance_generation();
        repaint(canvas, &*engine, view)?;
        Ok(TickOutcome::Advanced)
    }
}
