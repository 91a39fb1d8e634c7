//! Packed cell buffer decoding.
//!
//! The engine stores one cell per bit, eight cells per byte, least significant
//! bit first. Cell `(row, col)` lives at flat index `row * width + col`.

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Dead,
    Alive,
}

/// Number of bytes needed to pack `width * height` cells.
pub fn packed_len(width: u32, height: u32) -> usize {
    (width as usize * height as usize).div_ceil(8)
}

/// True when the bit for `flat_index` is clear.
///
/// Panics if `flat_index / 8` is past the end of `buffer`.
#[inline]
pub fn cell_is_dead(buffer: &[u8], flat_index: usize) -> bool {
    let mask = 1u8 << (flat_index % 8);
    buffer[flat_index / 8] & mask != mask
}

#[inline]
pub fn decode(buffer: &[u8], flat_index: usize) -> CellState {
    if cell_is_dead(buffer, flat_index) {
        CellState::Dead
    } else {
        CellState::Alive
    }
}

/// A length-checked, read-only view of an engine's packed buffer.
///
/// Borrowing the engine for the lifetime of the view means it has to be
/// fetched again after any mutation.
#[derive(Debug, Clone, Copy)]
pub struct CellBuffer<'a> {
    bytes: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> CellBuffer<'a> {
    pub fn new(bytes: &'a [u8], width: u32, height: u32) -> Result<Self, RenderError> {
        let expected = packed_len(width, height);
        if bytes.len() < expected {
            return Err(RenderError::BufferTooShort {
                expected,
                actual: bytes.len(),
                width,
                height,
            });
        }
        Ok(Self { bytes, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn flat_index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    #[inline]
    pub fn get(&self, row: u32, col: u32) -> CellState {
        debug_assert!(row < self.height && col < self.width, "cell ({row}, {col}) outside grid");
        decode(self.bytes, self.flat_index(row, col))
    }

    /// Live cells among the first `width * height` bits; padding is ignored.
    pub fn live_count(&self) -> usize {
        let cells = self.width as usize * self.height as usize;
        let full = cells / 8;
        let whole: usize = self.bytes[..full].iter().map(|b| b.count_ones() as usize).sum();
        let rest = cells % 8;
        if rest == 0 {
            whole
        } else {
            let mask = (1u8 << rest) - 1;
            whole + (self.bytes[full] & mask).count_ones() as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn low_two_bits_decode_alive_rest_dead() {
        let buffer = [0b0000_0011u8];
        assert_eq!(decode(&buffer, 0), CellState::Alive);
        assert_eq!(decode(&buffer, 1), CellState::Alive);
        for i in 2..8 {
            assert_eq!(decode(&buffer, i), CellState::Dead, "index {i} should be dead");
            assert!(cell_is_dead(&buffer, i));
        }
    }

    #[test]
    fn indices_span_bytes_lsb_first() {
        let buffer = [0u8, 0b1000_0000, 0b0000_0001];
        assert_eq!(decode(&buffer, 15), CellState::Alive);
        assert_eq!(decode(&buffer, 16), CellState::Alive);
        assert_eq!(decode(&buffer, 14), CellState::Dead);
        assert_eq!(decode(&buffer, 17), CellState::Dead);
    }

    #[test]
    #[should_panic]
    fn index_past_buffer_panics() {
        let buffer = [0xffu8];
        decode(&buffer, 8);
    }

    #[test]
    fn packed_len_rounds_up() {
        assert_eq!(packed_len(128, 64), 1024);
        assert_eq!(packed_len(3, 3), 2);
        assert_eq!(packed_len(1, 1), 1);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let bytes = [0u8; 1];
        let err = CellBuffer::new(&bytes, 3, 3).unwrap_err();
        assert_eq!(
            err,
            RenderError::BufferTooShort { expected: 2, actual: 1, width: 3, height: 3 }
        );
    }

    #[test]
    fn row_major_lookup() {
        // 3x3 grid, cell (1, 2) is flat index 5.
        let bytes = [0b0010_0000u8, 0];
        let view = CellBuffer::new(&bytes, 3, 3).unwrap();
        assert_eq!(view.get(1, 2), CellState::Alive);
        assert_eq!(view.get(2, 1), CellState::Dead);
    }

    #[test]
    fn live_count_ignores_padding() {
        // 9 cells: byte 0 full, one bit used from byte 1.
        let bytes = [0xffu8, 0xff];
        let view = CellBuffer::new(&bytes, 3, 3).unwrap();
        assert_eq!(view.live_count(), 9);
    }

    proptest! {
        #[test]
        fn decode_depends_only_on_its_own_bit(
            bytes in proptest::collection::vec(any::<u8>(), 1..32),
            index_seed in any::<usize>(),
            flip_seed in any::<usize>(),
        ) {
            let bits = bytes.len() * 8;
            let index = index_seed % bits;
            let flip = flip_seed % bits;
            prop_assume!(flip != index);

            let before = decode(&bytes, index);
            let mut flipped = bytes.clone();
            flipped[flip / 8] ^= 1 << (flip % 8);
            prop_assert_eq!(decode(&flipped, index), before);
        }

        #[test]
        fn flipping_own_bit_flips_state(
            bytes in proptest::collection::vec(any::<u8>(), 1..32),
            index_seed in any::<usize>(),
        ) {
            let index = index_seed % (bytes.len() * 8);
            let mut flipped = bytes.clone();
            flipped[index / 8] ^= 1 << (index % 8);
            prop_assert_ne!(decode(&flipped, index), decode(&bytes, index));
        }
    }
}
