use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use egui::Color32;

use crate::view::{ViewState, MAX_CANVAS_SIDE, MAX_CELL_SIZE, MIN_CELL_SIZE};

#[derive(Parser, Debug, Clone)]
#[command(name = "life-canvas", version, about = "Interactive Game of Life grid")]
pub struct Config {
    /// Grid width in cells.
    #[arg(long, env = "LIFE_WIDTH", default_value_t = 128, value_parser = clap::value_parser!(u32).range(1..=4095))]
    pub width: u32,

    /// Grid height in cells.
    #[arg(long, env = "LIFE_HEIGHT", default_value_t = 64, value_parser = clap::value_parser!(u32).range(1..=4095))]
    pub height: u32,

    /// Cell edge length in canvas pixels.
    #[arg(long, env = "LIFE_CELL_SIZE", default_value_t = 5)]
    pub cell_size: u32,

    /// Delay between generations, in milliseconds (at least one frame).
    #[arg(long, env = "LIFE_TICK_MS", default_value_t = 50, value_parser = clap::value_parser!(u64).range(16..))]
    pub tick_ms: u64,

    #[arg(long, env = "LIFE_GRID_COLOR", default_value = "#36002d", value_parser = parse_color)]
    pub grid_color: Color32,

    /// Background color of dead cells.
    #[arg(long, env = "LIFE_DEAD_COLOR", default_value = "#36002d", value_parser = parse_color)]
    pub dead_color: Color32,

    /// Foreground color of live cells.
    #[arg(long, env = "LIFE_ALIVE_COLOR", default_value = "#4287f5", value_parser = parse_color)]
    pub alive_color: Color32,

    /// Seed for grid resets; random when omitted.
    #[arg(long, env = "LIFE_SEED")]
    pub seed: Option<u64>,

    /// Start with the simulation paused.
    #[arg(long, env = "LIFE_PAUSED")]
    pub paused: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CELL_SIZE..=MAX_CELL_SIZE).contains(&self.cell_size) {
            bail!("cell size {} outside {}..={}", self.cell_size, MIN_CELL_SIZE, MAX_CELL_SIZE);
        }
        let (w, h) = self.view_state().canvas_size(self.width, self.height);
        if w > MAX_CANVAS_SIDE || h > MAX_CANVAS_SIDE {
            bail!("canvas {}x{} px exceeds the {} px texture limit; lower --cell-size", w, h, MAX_CANVAS_SIDE);
        }
        Ok(())
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            cell_pixel_size: self.cell_size,
            grid_color: self.grid_color,
            dead_color: self.dead_color,
            alive_color: self.alive_color,
            paused: self.paused,
        }
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Accepts `#rrggbb` or `rrggbb`.
fn parse_color(s: &str) -> Result<Color32, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected a #rrggbb color, got {s:?}"));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
    Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
