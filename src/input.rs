use crate::engine::Engine;
use crate::error::RenderError;
use crate::state::State;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton},
    keyboard::ModifiersState,
};

/// Where the canvas is displayed, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    /// Largest rect with the canvas aspect ratio that fits the surface, centered.
    pub fn fit(canvas_width: u32, canvas_height: u32, surface_width: u32, surface_height: u32) -> Self {
        let (cw, ch) = (canvas_width.max(1) as f64, canvas_height.max(1) as f64);
        let (sw, sh) = (surface_width as f64, surface_height as f64);
        let scale = (sw / cw).min(sh / ch);
        let (width, height) = (cw * scale, ch * scale);
        Self {
            left: (sw - width) / 2.0,
            top: (sh - height) / 2.0,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCoord {
    pub row: u32,
    pub col: u32,
}

/// Converts a pointer position into the grid cell under it.
///
/// The canvas may be displayed at a different size than its backing
/// resolution, so the pointer is first scaled into canvas pixels. The result
/// is clamped into the grid on every side.
pub fn map_pointer_to_cell(
    pointer: (f64, f64),
    rect: &CanvasRect,
    canvas_px: (u32, u32),
    cell_pixel_size: u32,
    grid: (u32, u32),
) -> GridCoord {
    let scale_x = scale(canvas_px.0, rect.width);
    let scale_y = scale(canvas_px.1, rect.height);

    let canvas_x = (pointer.0 - rect.left) * scale_x;
    let canvas_y = (pointer.1 - rect.top) * scale_y;

    let pitch = (cell_pixel_size + 1) as f64;
    GridCoord {
        row: clamp_axis((canvas_y / pitch).floor(), grid.1),
        col: clamp_axis((canvas_x / pitch).floor(), grid.0),
    }
}

fn scale(backing: u32, displayed: f64) -> f64 {
    if displayed > 0.0 {
        backing as f64 / displayed
    } else {
        1.0
    }
}

fn clamp_axis(cell: f64, cells: u32) -> u32 {
    let last = cells.saturating_sub(1);
    if cell.is_nan() || cell <= 0.0 {
        0
    } else if cell >= last as f64 {
        last
    } else {
        cell as u32
    }
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            control: state.control_key(),
            shift: state.shift_key(),
        }
    }
}

/// The one engine call a click resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMutation {
    ToggleCell { row: u32, col: u32 },
    StampGlider { row: u32, col: u32 },
    StampPulsar { row: u32, col: u32 },
}

impl EngineMutation {
    pub fn apply<E: Engine + ?Sized>(self, engine: &mut E) {
        match self {
            EngineMutation::ToggleCell { row, col } => engine.toggle_cell(row, col),
            EngineMutation::StampGlider { row, col } => engine.stamp_glider(row, col),
            EngineMutation::StampPulsar { row, col } => engine.stamp_pulsar(row, col),
        }
    }
}

/// Control wins over shift; no modifier toggles.
pub fn dispatch(coord: GridCoord, modifiers: Modifiers) -> EngineMutation {
    let GridCoord { row, col } = coord;
    if modifiers.control {
        EngineMutation::StampGlider { row, col }
    } else if modifiers.shift {
        EngineMutation::StampPulsar { row, col }
    } else {
        EngineMutation::ToggleCell { row, col }
    }
}

pub fn handle_modifiers(state: &mut State, modifiers: ModifiersState) {
    state.modifiers = modifiers.into();
}

pub fn handle_cursor_move(state: &mut State, position: PhysicalPosition<f64>) {
    state.cursor_pos = Some(position);
}

pub fn handle_cursor_left(state: &mut State) {
    state.cursor_pos = None;
}

pub fn handle_mouse_input(state: &mut State, button: MouseButton, element_state: ElementState) -> Result<(), RenderError> {
    if button != MouseButton::Left || element_state != ElementState::Pressed {
        return Ok(());
    }
    let Some(position) = state.cursor_pos else {
        return Ok(());
    };

    let rect = state.canvas_rect();
    let mutation = state.session.click((position.x, position.y), &rect, state.modifiers)?;
    log::debug!("Click at [{:.1}, {:.1}] -> {:?}", position.x, position.y, mutation);
    state.window.request_redraw();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CANVAS: (u32, u32) = (769, 385);
    const GRID: (u32, u32) = (128, 64);

    fn identity_rect() -> CanvasRect {
        CanvasRect { left: 0.0, top: 0.0, width: 769.0, height: 385.0 }
    }

    #[test]
    fn origin_maps_to_first_cell() {
        let coord = map_pointer_to_cell((0.0, 0.0), &identity_rect(), CANVAS, 5, GRID);
        assert_eq!(coord, GridCoord { row: 0, col: 0 });
    }

    #[test]
    fn far_bottom_right_clamps_to_last_cell() {
        let coord = map_pointer_to_cell((1e9, 1e9), &identity_rect(), CANVAS, 5, GRID);
        assert_eq!(coord, GridCoord { row: 63, col: 127 });
    }

    #[test]
    fn left_of_canvas_clamps_to_zero() {
        let coord = map_pointer_to_cell((-40.0, 100.0), &identity_rect(), CANVAS, 5, GRID);
        assert_eq!(coord, GridCoord { row: 16, col: 0 });
    }

    #[test]
    fn displayed_size_is_scaled_back_to_canvas_pixels() {
        // Canvas shown at half size, offset by (10, 20).
        let rect = CanvasRect { left: 10.0, top: 20.0, width: 384.5, height: 192.5 };
        // Window (10 + 15, 20 + 9) is canvas (30, 18): pitch 6 gives row 3, col 5.
        let coord = map_pointer_to_cell((25.0, 29.0), &rect, CANVAS, 5, GRID);
        assert_eq!(coord, GridCoord { row: 3, col: 5 });
    }

    #[test]
    fn fit_letterboxes_wide_surface() {
        let rect = CanvasRect::fit(100, 50, 400, 100);
        assert_eq!(rect, CanvasRect { left: 100.0, top: 0.0, width: 200.0, height: 100.0 });
    }

    #[test]
    fn control_beats_shift() {
        let coord = GridCoord { row: 3, col: 4 };
        let both = Modifiers { control: true, shift: true };
        assert_eq!(dispatch(coord, both), EngineMutation::StampGlider { row: 3, col: 4 });
        let shift = Modifiers { control: false, shift: true };
        assert_eq!(dispatch(coord, shift), EngineMutation::StampPulsar { row: 3, col: 4 });
        assert_eq!(dispatch(coord, Modifiers::default()), EngineMutation::ToggleCell { row: 3, col: 4 });
    }

    #[test]
    fn modifiers_from_winit_state() {
        let state = ModifiersState::CONTROL | ModifiersState::ALT;
        assert_eq!(Modifiers::from(state), Modifiers { control: true, shift: false });
    }

    proptest! {
        #[test]
        fn mapped_cell_is_always_in_bounds(
            x in -1e7f64..1e7,
            y in -1e7f64..1e7,
            width in 1u32..300,
            height in 1u32..300,
            cell in 1u32..20,
            shrink in 0.1f64..4.0,
        ) {
            let canvas = crate::canvas::canvas_size(width, height, cell);
            let rect = CanvasRect {
                left: 7.0,
                top: 3.0,
                width: canvas.0 as f64 * shrink,
                height: canvas.1 as f64 * shrink,
            };
            let coord = map_pointer_to_cell((x, y), &rect, canvas, cell, (width, height));
            prop_assert!(coord.row < height);
            prop_assert!(coord.col < width);
        }

        #[test]
        fn dispatch_fires_exactly_the_priority_branch(
            control in any::<bool>(),
            shift in any::<bool>(),
            row in 0u32..100,
            col in 0u32..100,
        ) {
            let mutation = dispatch(GridCoord { row, col }, Modifiers { control, shift });
            let expected = match (control, shift) {
                (true, _) => EngineMutation::StampGlider { row, col },
                (false, true) => EngineMutation::StampPulsar { row, col },
                (false, false) => EngineMutation::ToggleCell { row, col },
            };
            prop_assert_eq!(mutation, expected);
        }
    }
}
