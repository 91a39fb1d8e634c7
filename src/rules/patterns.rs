/// Patterns that can be stamped onto the grid from a pointer click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// A diagonal spaceship
    Glider,
    /// A period-3 oscillator
    Pulsar,
}

const GLIDER: &[(i32, i32)] = &[(-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

const PULSAR: &[(i32, i32)] = &[
    // Outer bars
    (-6, -4), (-6, -3), (-6, -2), (-6, 2), (-6, 3), (-6, 4),
    (6, -4), (6, -3), (6, -2), (6, 2), (6, 3), (6, 4),
    (-4, -6), (-3, -6), (-2, -6), (2, -6), (3, -6), (4, -6),
    (-4, 6), (-3, 6), (-2, 6), (2, 6), (3, 6), (4, 6),
    // Inner bars
    (-4, -1), (-3, -1), (-2, -1), (2, -1), (3, -1), (4, -1),
    (-4, 1), (-3, 1), (-2, 1), (2, 1), (3, 1), (4, 1),
    (-1, -4), (-1, -3), (-1, -2), (1, -4), (1, -3), (1, -2),
    (-1, 2), (-1, 3), (-1, 4), (1, 2), (1, 3), (1, 4),
];

impl Pattern {
    /// Live cells as `(row, col)` offsets from the anchor cell.
    pub fn offsets(&self) -> &'static [(i32, i32)] {
        match self {
            Pattern::Glider => GLIDER,
            Pattern::Pulsar => PULSAR,
        }
    }

    /// Inclusive offset bounds `(min_row, max_row, min_col, max_col)` the
    /// stamp overwrites.
    pub fn footprint(&self) -> (i32, i32, i32, i32) {
        match self {
            Pattern::Glider => (-1, 1, -1, 1),
            Pattern::Pulsar => (-6, 6, -6, 6),
        }
    }
}
