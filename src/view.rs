use egui::Color32;

use crate::canvas::canvas_size;

pub const MIN_CELL_SIZE: u32 = 1;
pub const MAX_CELL_SIZE: u32 = 32;
/// Largest canvas side the presenter can upload (`wgpu::Limits::default()`).
pub const MAX_CANVAS_SIDE: u32 = 8192;

pub const DEFAULT_CELL_SIZE: u32 = 5;
pub const DEFAULT_GRID_COLOR: Color32 = Color32::from_rgb(0x36, 0x00, 0x2d);
pub const DEFAULT_DEAD_COLOR: Color32 = Color32::from_rgb(0x36, 0x00, 0x2d);
pub const DEFAULT_ALIVE_COLOR: Color32 = Color32::from_rgb(0x42, 0x87, 0xf5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
}

/// User-adjustable drawing parameters, read by every repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub cell_pixel_size: u32,
    pub grid_color: Color32,
    pub dead_color: Color32,
    pub alive_color: Color32,
    pub paused: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            cell_pixel_size: DEFAULT_CELL_SIZE,
            grid_color: DEFAULT_GRID_COLOR,
            dead_color: DEFAULT_DEAD_COLOR,
            alive_color: DEFAULT_ALIVE_COLOR,
            paused: false,
        }
    }
}

impl ViewState {
    pub fn loop_state(&self) -> LoopState {
        if self.paused {
            LoopState::Paused
        } else {
            LoopState::Running
        }
    }

    pub fn toggle_pause(&mut self) -> LoopState {
        self.paused = !self.paused;
        self.loop_state()
    }

    pub fn canvas_size(&self, grid_width: u32, grid_height: u32) -> (u32, u32) {
        canvas_size(grid_width, grid_height, self.cell_pixel_size)
    }

    /// Sets the cell size, clamped so the canvas stays uploadable.
    /// Returns the size actually applied.
    pub fn set_cell_pixel_size(&mut self, requested: u32, grid_width: u32, grid_height: u32) -> u32 {
        let upper = max_cell_pixel_size(grid_width, grid_height);
        self.cell_pixel_size = requested.clamp(MIN_CELL_SIZE, upper);
        self.cell_pixel_size
    }
}

/// Largest cell size whose canvas fits in `MAX_CANVAS_SIDE`, capped at `MAX_CELL_SIZE`.
pub fn max_cell_pixel_size(grid_width: u32, grid_height: u32) -> u32 {
    let longest = grid_width.max(grid_height).max(1);
    let fits = ((MAX_CANVAS_SIDE - 1) / longest).saturating_sub(1);
    fits.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE)
}
