/// The simulation the canvas draws.
///
/// Cell state is exposed as a packed bit buffer (see [`crate::bitfield`]).
/// Every mutating call takes `&mut self`, so a slice obtained from
/// [`Engine::cells`] can never be held across a mutation.
pub trait Engine {
    /// `(width, height)` in cells. Fixed for the lifetime of the engine.
    fn dimensions(&self) -> (u32, u32);

    fn advance_generation(&mut self);

    /// Replaces the grid with a fresh random seed.
    fn reset_to_seed(&mut self);

    fn clear_all(&mut self);

    fn toggle_cell(&mut self, row: u32, col: u32);

    fn stamp_glider(&mut self, row: u32, col: u32);

    fn stamp_pulsar(&mut self, row: u32, col: u32);

    /// Packed cells, `ceil(width * height / 8)` bytes, LSB first.
    fn cells(&self) -> &[u8];
}
