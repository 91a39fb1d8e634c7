use std::time::{Duration, Instant};

use egui::Color32;

use crate::bitfield::CellBuffer;
use crate::canvas::PixelCanvas;
use crate::engine::Engine;
use crate::error::RenderError;
use crate::input::{dispatch, map_pointer_to_cell, CanvasRect, EngineMutation, Modifiers};
use crate::paint::repaint;
use crate::render_loop::{RenderLoop, TickOutcome};
use crate::view::{LoopState, ViewState};

/// UI control hooks. Each one repaints exactly once after taking effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    TogglePause,
    Reset,
    Clear,
    Step,
    SetCellSize(u32),
    SetTickDelay(Duration),
    SetGridColor(Color32),
    SetDeadColor(Color32),
    SetAliveColor(Color32),
}

/// Engine, view settings, canvas and pacing for one grid.
///
/// Knows nothing about windows or the GPU; the presenter polls
/// [`Session::take_dirty`] to decide when to re-upload the canvas.
pub struct Session<E> {
    engine: E,
    view: ViewState,
    canvas: PixelCanvas,
    render_loop: RenderLoop,
    generation: u64,
    dirty: bool,
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E, view: ViewState, tick_delay: Duration, now: Instant) -> Result<Self, RenderError> {
        let (width, height) = engine.dimensions();
        let (canvas_width, canvas_height) = view.canvas_size(width, height);
        let mut session = Self {
            engine,
            view,
            canvas: PixelCanvas::new(canvas_width, canvas_height),
            render_loop: RenderLoop::new(tick_delay, now),
            generation: 0,
            dirty: false,
        };
        session.repaint()?;
        Ok(session)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn loop_state(&self) -> LoopState {
        self.view.loop_state()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn live_cells(&self) -> Result<usize, RenderError> {
        let (width, height) = self.engine.dimensions();
        Ok(CellBuffer::new(self.engine.cells(), width, height)?.live_count())
    }

    /// True once after any repaint.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome, RenderError> {
        let outcome = self
            .render_loop
            .tick(now, &mut self.engine, &mut self.canvas, &self.view)?;
        if outcome == TickOutcome::Advanced {
            self.generation += 1;
            self.dirty = true;
        }
        Ok(outcome)
    }

    /// Maps a pointer click onto the grid, applies the matching mutation and
    /// repaints without waiting for the next tick.
    pub fn click(
        &mut self,
        pointer: (f64, f64),
        rect: &CanvasRect,
        modifiers: Modifiers,
    ) -> Result<EngineMutation, RenderError> {
        let coord = map_pointer_to_cell(
            pointer,
            rect,
            self.canvas.size(),
            self.view.cell_pixel_size,
            self.engine.dimensions(),
        );
        let mutation = dispatch(coord, modifiers);
        mutation.apply(&mut self.engine);
        self.repaint()?;
        Ok(mutation)
    }

    pub fn apply_control(&mut self, event: ControlEvent) -> Result<(), RenderError> {
        match event {
            ControlEvent::TogglePause => {
                let state = self.view.toggle_pause();
                log::info!("Loop {:?}", state);
            }
            ControlEvent::Reset => {
                self.engine.reset_to_seed();
                self.generation = 0;
                log::info!("Grid reset to a random seed");
            }
            ControlEvent::Clear => {
                self.engine.clear_all();
                self.generation = 0;
                log::info!("Grid cleared");
            }
            ControlEvent::Step => {
                self.engine.advance_generation();
                self.generation += 1;
            }
            ControlEvent::SetCellSize(requested) => {
                let (width, height) = self.engine.dimensions();
                let applied = self.view.set_cell_pixel_size(requested, width, height);
                let (canvas_width, canvas_height) = self.view.canvas_size(width, height);
                self.canvas.resize(canvas_width, canvas_height);
                log::info!("Cell size {} px, canvas {}x{}", applied, canvas_width, canvas_height);
            }
            ControlEvent::SetTickDelay(delay) => {
                self.render_loop.set_tick_delay(delay, Instant::now());
                log::info!("Tick delay {} ms", self.render_loop.tick_delay().as_millis());
            }
            ControlEvent::SetGridColor(color) => self.view.grid_color = color,
            ControlEvent::SetDeadColor(color) => self.view.dead_color = color,
            ControlEvent::SetAliveColor(color) => self.view.alive_color = color,
        }
        self.repaint()
    }

    pub fn repaint(&mut self) -> Result<(), RenderError> {
        repaint(&mut self.canvas, &self.engine, &self.view)?;
        self.dirty = true;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_loop::MIN_TICK_DELAY;
    use crate::universe::Universe;

    const ORIGIN_RECT: CanvasRect = CanvasRect { left: 0.0, top: 0.0, width: 769.0, height: 385.0 };

    fn session() -> Session<Universe> {
        let start = Instant::now();
        Session::new(Universe::new(128, 64), ViewState::default(), Duration::ZERO, start).unwrap()
    }

    /// Engine whose buffer is one byte short.
    struct Truncated(Universe);

    impl Engine for Truncated {
        fn dimensions(&self) -> (u32, u32) {
            self.0.dimensions()
        }
        fn advance_generation(&mut self) {}
        fn reset_to_seed(&mut self) {}
        fn clear_all(&mut self) {}
        fn toggle_cell(&mut self, _row: u32, _col: u32) {}
        fn stamp_glider(&mut self, _row: u32, _col: u32) {}
        fn stamp_pulsar(&mut self, _row: u32, _col: u32) {}
        fn cells(&self) -> &[u8] {
            let cells = self.0.cells();
            &cells[..cells.len() - 1]
        }
    }

    #[test]
    fn canvas_matches_default_grid() {
        let session = session();
        assert_eq!(session.canvas().size(), (769, 385));
    }

    #[test]
    fn click_toggles_and_repaints_immediately() {
        let mut session = session();
        session.take_dirty();

        let mutation = session.click((0.0, 0.0), &ORIGIN_RECT, Modifiers::default()).unwrap();
        assert_eq!(mutation, EngineMutation::ToggleCell { row: 0, col: 0 });
        assert!(session.engine().is_alive(0, 0));
        assert!(session.take_dirty());
        assert_eq!(session.canvas().pixel(1, 1), session.view().alive_color);
    }

    #[test]
    fn control_click_stamps_glider_at_clamped_corner() {
        let mut session = session();
        let control = Modifiers { control: true, shift: true };
        let mutation = session.click((5000.0, 5000.0), &ORIGIN_RECT, control).unwrap();
        assert_eq!(mutation, EngineMutation::StampGlider { row: 63, col: 127 });
        assert_eq!(session.live_cells(), Ok(5));
    }

    #[test]
    fn cell_size_change_resizes_canvas() {
        let mut session = session();
        session.apply_control(ControlEvent::SetCellSize(2)).unwrap();
        assert_eq!(session.canvas().size(), (3 * 128 + 1, 3 * 64 + 1));
        assert_eq!(session.view().cell_pixel_size, 2);
    }

    #[test]
    fn color_change_repaints() {
        let mut session = session();
        session.apply_control(ControlEvent::SetDeadColor(Color32::WHITE)).unwrap();
        assert_eq!(session.canvas().pixel(1, 1), Color32::WHITE);
        session.apply_control(ControlEvent::SetGridColor(Color32::RED)).unwrap();
        assert_eq!(session.canvas().pixel(0, 0), Color32::RED);
    }

    #[test]
    fn pause_twice_resumes_advancing() {
        let mut session = session();
        session.apply_control(ControlEvent::TogglePause).unwrap();
        assert_eq!(session.loop_state(), LoopState::Paused);
        assert_eq!(session.tick(Instant::now() + MIN_TICK_DELAY), Ok(TickOutcome::Idle));
        assert_eq!(session.generation(), 0);

        session.apply_control(ControlEvent::TogglePause).unwrap();
        assert_eq!(session.loop_state(), LoopState::Running);
        assert_eq!(session.tick(Instant::now() + 2 * MIN_TICK_DELAY), Ok(TickOutcome::Advanced));
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn step_and_clear_track_generation() {
        let mut session = session();
        session.apply_control(ControlEvent::Step).unwrap();
        session.apply_control(ControlEvent::Step).unwrap();
        assert_eq!(session.generation(), 2);
        session.apply_control(ControlEvent::Clear).unwrap();
        assert_eq!(session.generation(), 0);
        assert_eq!(session.live_cells(), Ok(0));
    }

    #[test]
    fn short_buffer_fails_hard() {
        let engine = Truncated(Universe::new(16, 16));
        let result = Session::new(engine, ViewState::default(), Duration::ZERO, Instant::now());
        assert!(matches!(
            result,
            Err(RenderError::BufferTooShort { expected: 32, actual: 31, .. })
        ));
    }

    #[test]
    fn stop_ends_ticking() {
        let mut session = session();
        session.stop();
        assert_eq!(session.render_loop().next_deadline(), None);
        assert_eq!(session.tick(Instant::now()), Ok(TickOutcome::Stopped));
    }
}
