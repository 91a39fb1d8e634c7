use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitfield::packed_len;
use crate::engine::Engine;
use crate::rules::{apply_rules, get_bit, set_bit, wrap, GameRules, Pattern};

/// Toroidal Game of Life grid stored one bit per cell.
pub struct Universe {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    scratch: Vec<u8>,
    rules: GameRules,
    rng: StdRng,
}

impl Universe {
    /// An all-dead universe seeded from OS entropy.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// An all-dead universe whose resets are reproducible.
    pub fn seeded(width: u32, height: u32, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u32, height: u32, rng: StdRng) -> Self {
        assert!(width > 0 && height > 0, "universe must be at least 1x1");
        let len = packed_len(width, height);
        Self {
            width,
            height,
            cells: vec![0; len],
            scratch: vec![0; len],
            rules: GameRules::default(),
            rng,
        }
    }

    fn index(&self, row: u32, col: u32) -> usize {
        assert!(row < self.height && col < self.width, "cell ({row}, {col}) outside {}x{}", self.width, self.height);
        row as usize * self.width as usize + col as usize
    }

    fn stamp(&mut self, row: u32, col: u32, pattern: Pattern) {
        let (r0, r1, c0, c1) = pattern.footprint();
        for dr in r0..=r1 {
            for dc in c0..=c1 {
                let (r, c) = wrap(row, col, dr, dc, self.width, self.height);
                let idx = self.index(r, c);
                set_bit(&mut self.cells, idx, false);
            }
        }
        for &(dr, dc) in pattern.offsets() {
            let (r, c) = wrap(row, col, dr, dc, self.width, self.height);
            let idx = self.index(r, c);
            set_bit(&mut self.cells, idx, true);
        }
    }

    /// Clears the bits past `width * height` in the last byte.
    fn clear_padding(&mut self) {
        let rest = (self.width as usize * self.height as usize) % 8;
        if rest != 0 {
            if let Some(last) = self.cells.last_mut() {
                *last &= (1u8 << rest) - 1;
            }
        }
    }
}

#[cfg(test)]
impl Universe {
    /// Sets each listed `(row, col)` alive.
    pub(crate) fn set_cells(&mut self, cells: &[(u32, u32)]) {
        for &(row, col) in cells {
            let idx = self.index(row, col);
            set_bit(&mut self.cells, idx, true);
        }
    }

    pub(crate) fn is_alive(&self, row: u32, col: u32) -> bool {
        get_bit(&self.cells, self.index(row, col))
    }

    pub(crate) fn live_cells(&self) -> usize {
        self.cells.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl Engine for Universe {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn advance_generation(&mut self) {
        apply_rules(&self.cells, &mut self.scratch, self.width, self.height, &self.rules);
        std::mem::swap(&mut self.cells, &mut self.scratch);
    }

    fn reset_to_seed(&mut self) {
        self.rng.fill(&mut self.cells[..]);
        self.clear_padding();
    }

    fn clear_all(&mut self) {
        self.cells.fill(0);
    }

    fn toggle_cell(&mut self, row: u32, col: u32) {
        let idx = self.index(row, col);
        let alive = get_bit(&self.cells, idx);
        set_bit(&mut self.cells, idx, !alive);
    }

    fn stamp_glider(&mut self, row: u32, col: u32) {
        self.stamp(row, col, Pattern::Glider);
    }

    fn stamp_pulsar(&mut self, row: u32, col: u32) {
        self.stamp(row, col, Pattern::Pulsar);
    }

    fn cells(&self) -> &[u8] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_matches_packing() {
        assert_eq!(Universe::new(128, 64).cells().len(), 1024);
        assert_eq!(Universe::new(3, 3).cells().len(), 2);
    }

    #[test]
    fn toggle_flips_one_cell() {
        let mut universe = Universe::new(8, 8);
        universe.toggle_cell(2, 5);
        assert!(universe.is_alive(2, 5));
        assert_eq!(universe.live_cells(), 1);
        universe.toggle_cell(2, 5);
        assert_eq!(universe.live_cells(), 0);
    }

    #[test]
    fn glider_overwrites_its_footprint() {
        let mut universe = Universe::new(8, 8);
        universe.set_cells(&[(4, 4), (3, 3)]);
        universe.stamp_glider(4, 4);
        // Anchor and (3, 3) are not part of the glider, so they are cleared.
        assert!(!universe.is_alive(4, 4));
        assert!(!universe.is_alive(3, 3));
        for (r, c) in [(3, 5), (4, 3), (4, 5), (5, 4), (5, 5)] {
            assert!(universe.is_alive(r, c), "({r}, {c}) should be alive");
        }
        assert_eq!(universe.live_cells(), 5);
    }

    #[test]
    fn pulsar_wraps_at_corner() {
        let mut universe = Universe::new(20, 20);
        universe.stamp_pulsar(0, 0);
        assert_eq!(universe.live_cells(), 48);
        assert!(universe.is_alive(14, 16)); // (-6, -4)
    }

    #[test]
    fn pulsar_has_period_three() {
        let mut universe = Universe::new(20, 20);
        universe.stamp_pulsar(10, 10);
        let start = universe.cells().to_vec();
        universe.advance_generation();
        assert_ne!(universe.cells(), &start[..]);
        universe.advance_generation();
        universe.advance_generation();
        assert_eq!(universe.cells(), &start[..]);
    }

    #[test]
    fn seeded_resets_are_reproducible() {
        let mut a = Universe::seeded(13, 7, 42);
        let mut b = Universe::seeded(13, 7, 42);
        a.reset_to_seed();
        b.reset_to_seed();
        assert_eq!(a.cells(), b.cells());
        // 91 cells: the top five bits of the last byte are padding.
        assert_eq!(a.cells()[11] & 0b1111_1000, 0);
    }

    #[test]
    fn clear_kills_everything() {
        let mut universe = Universe::seeded(16, 16, 7);
        universe.reset_to_seed();
        universe.clear_all();
        assert_eq!(universe.live_cells(), 0);
    }
}
