use thiserror::Error;

/// Fatal conditions raised while drawing the grid.
///
/// Both variants mean the engine and the renderer disagree about the grid's
/// geometry. Nothing here is retried: the caller logs and stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The packed buffer is smaller than `ceil(width * height / 8)` bytes.
    #[error("cell buffer holds {actual} bytes but a {width}x{height} grid needs {expected}")]
    BufferTooShort {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },
    /// The canvas backing size does not match the current cell pitch.
    #[error("canvas is {}x{} px but the view needs {}x{} px", actual.0, actual.1, expected.0, expected.1)]
    CanvasMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}
