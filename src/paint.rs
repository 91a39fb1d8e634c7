use egui::Color32;

use crate::bitfield::{CellBuffer, CellState};
use crate::canvas::{canvas_size, Canvas};
use crate::engine::Engine;
use crate::error::RenderError;
use crate::view::ViewState;

/// Draws the grid line overlay: `width + 1` vertical and `height + 1`
/// horizontal boundaries, each exactly once.
///
/// Must run before [`draw_cells`]; the cell pass does not clear the canvas.
pub fn draw_grid<C: Canvas + ?Sized>(
    canvas: &mut C,
    width: u32,
    height: u32,
    cell_pixel_size: u32,
    grid_color: Color32,
) {
    let pitch = cell_pixel_size + 1;
    let bottom = pitch * height + 1;
    let right = pitch * width + 1;

    for i in 0..=width {
        canvas.stroke_vertical(i * pitch + 1, 0, bottom, grid_color);
    }
    for j in 0..=height {
        canvas.stroke_horizontal(j * pitch + 1, 0, right, grid_color);
    }
}

/// Fills every cell square, row-major, with its alive or dead color.
pub fn draw_cells<C: Canvas + ?Sized>(
    canvas: &mut C,
    cells: &CellBuffer<'_>,
    cell_pixel_size: u32,
    alive_color: Color32,
    dead_color: Color32,
) {
    let pitch = cell_pixel_size + 1;
    for row in 0..cells.height() {
        for col in 0..cells.width() {
            let fill = match cells.get(row, col) {
                CellState::Alive => alive_color,
                CellState::Dead => dead_color,
            };
            canvas.fill_rect(col * pitch + 1, row * pitch + 1, cell_pixel_size, cell_pixel_size, fill);
        }
    }
}

/// Full repaint: grid, then cells, from a fresh buffer view.
pub fn repaint<E, C>(canvas: &mut C, engine: &E, view: &ViewState) -> Result<(), RenderError>
where
    E: Engine + ?Sized,
    C: Canvas + ?Sized,
{
    let (width, height) = engine.dimensions();
    let expected = canvas_size(width, height, view.cell_pixel_size);
    let actual = (canvas.width(), canvas.height());
    if expected != actual {
        return Err(RenderError::CanvasMismatch { expected, actual });
    }

    let cells = CellBuffer::new(engine.cells(), width, height)?;
    draw_grid(canvas, width, height, view.cell_pixel_size, view.grid_color);
    draw_cells(canvas, &cells, view.cell_pixel_size, view.alive_color, view.dead_color);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;
    use crate::universe::Universe;
    use proptest::prelude::*;

    const GRID: Color32 = Color32::from_rgb(10, 10, 10);
    const ALIVE: Color32 = Color32::from_rgb(200, 0, 0);
    const DEAD: Color32 = Color32::from_rgb(0, 0, 200);

    fn view() -> ViewState {
        ViewState {
            cell_pixel_size: 3,
            grid_color: GRID,
            dead_color: DEAD,
            alive_color: ALIVE,
            paused: false,
        }
    }

    #[test]
    fn grid_lines_sit_between_cells() {
        let (w, h) = canvas_size(4, 2, 3);
        let mut canvas = PixelCanvas::new(w, h);
        draw_grid(&mut canvas, 4, 2, 3, GRID);

        for x in [0, 4, 8, 12, 16] {
            for y in 0..h {
                assert_eq!(canvas.pixel(x, y), GRID, "column {x} row {y}");
            }
        }
        for y in [0, 4, 8] {
            for x in 0..w {
                assert_eq!(canvas.pixel(x, y), GRID, "row {y} column {x}");
            }
        }
        assert_ne!(canvas.pixel(1, 1), GRID);
    }

    #[test]
    fn cells_fill_their_squares() {
        let mut universe = Universe::new(4, 2);
        universe.set_cells(&[(1, 2)]);
        let view = view();
        let (w, h) = view.canvas_size(4, 2);
        let mut canvas = PixelCanvas::new(w, h);
        repaint(&mut canvas, &universe, &view).unwrap();

        // Cell (1, 2) covers x 9..12, y 5..8.
        for y in 5..8 {
            for x in 9..12 {
                assert_eq!(canvas.pixel(x, y), ALIVE);
            }
        }
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(canvas.pixel(x, y), DEAD);
            }
        }
        assert_eq!(canvas.pixel(8, 5), GRID);
    }

    #[test]
    fn wrong_canvas_size_is_fatal() {
        let universe = Universe::new(4, 2);
        let mut canvas = PixelCanvas::new(10, 10);
        let err = repaint(&mut canvas, &universe, &view()).unwrap_err();
        assert_eq!(
            err,
            RenderError::CanvasMismatch { expected: (17, 9), actual: (10, 10) }
        );
    }

    proptest! {
        #[test]
        fn draw_grid_is_idempotent(
            width in 1u32..24,
            height in 1u32..24,
            cell in 1u32..6,
            rgb in any::<(u8, u8, u8)>(),
        ) {
            let color = Color32::from_rgb(rgb.0, rgb.1, rgb.2);
            let (w, h) = canvas_size(width, height, cell);
            let mut canvas = PixelCanvas::new(w, h);
            draw_grid(&mut canvas, width, height, cell, color);
            let once = canvas.clone();
            draw_grid(&mut canvas, width, height, cell, color);
            prop_assert_eq!(canvas, once);
        }
    }
}
