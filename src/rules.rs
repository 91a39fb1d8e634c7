//! Rules module for the bundled Game of Life engine
//!
//! Holds the transition rule, the stampable patterns, and the packed-bit
//! helpers the [`crate::universe::Universe`] is built from.
mod patterns;

pub use patterns::Pattern;

/// Game of Life standard rules:
/// 1. Any live cell with fewer than two live neighbors dies (underpopulation)
/// 2. Any live cell with two or three live neighbors lives (survival)
/// 3. Any live cell with more than three live neighbors dies (overpopulation)
/// 4. Any dead cell with exactly three live neighbors becomes alive (reproduction)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    /// Minimum neighbors for a live cell to survive
    pub survival_min: u32,
    /// Maximum neighbors for a live cell to survive
    pub survival_max: u32,
    /// Number of neighbors for a dead cell to become alive
    pub birth_count: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        // Classic Conway's Game of Life rules
        Self {
            survival_min: 2,
            survival_max: 3,
            birth_count: 3,
        }
    }
}

impl GameRules {
    pub fn next_state(&self, alive: bool, neighbors: u32) -> bool {
        if alive {
            (self.survival_min..=self.survival_max).contains(&neighbors)
        } else {
            neighbors == self.birth_count
        }
    }
}

#[inline]
pub fn get_bit(cells: &[u8], idx: usize) -> bool {
    cells[idx / 8] & (1 << (idx % 8)) != 0
}

#[inline]
pub fn set_bit(cells: &mut [u8], idx: usize, alive: bool) {
    let mask = 1u8 << (idx % 8);
    if alive {
        cells[idx / 8] |= mask;
    } else {
        cells[idx / 8] &= !mask;
    }
}

/// Wraps `row + delta_row, col + delta_col` around the torus.
pub fn wrap(row: u32, col: u32, delta_row: i32, delta_col: i32, width: u32, height: u32) -> (u32, u32) {
    let r = (row as i64 + delta_row as i64).rem_euclid(height as i64) as u32;
    let c = (col as i64 + delta_col as i64).rem_euclid(width as i64) as u32;
    (r, c)
}

/// Count live neighbors of `(row, col)` with wrapping boundaries.
pub fn count_neighbors(cells: &[u8], row: u32, col: u32, width: u32, height: u32) -> u32 {
    let mut count = 0;
    for delta_row in -1..=1 {
        for delta_col in -1..=1 {
            // Skip the cell itself
            if delta_row == 0 && delta_col == 0 {
                continue;
            }
            let (r, c) = wrap(row, col, delta_row, delta_col, width, height);
            if get_bit(cells, (r * width + c) as usize) {
                count += 1;
            }
        }
    }
    count
}

/// Apply the rules to `input` for one generation, writing into `output`.
pub fn apply_rules(input: &[u8], output: &mut [u8], width: u32, height: u32, rules: &GameRules) {
    let size = (width as usize * height as usize).div_ceil(8);
    assert!(input.len() >= size);
    assert!(output.len() >= size);

    output[..size].fill(0);
    for row in 0..height {
        for col in 0..width {
            let idx = (row * width + col) as usize;
            let neighbors = count_neighbors(input, row, col, width, height);
            if rules.next_state(get_bit(input, idx), neighbors) {
                set_bit(output, idx, true);
            }
        }
    }
}
