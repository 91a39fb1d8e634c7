use std::time::Duration;

use egui::Color32;

use crate::engine::Engine;
use crate::render_loop::MIN_TICK_DELAY;
use crate::session::{ControlEvent, Session};
use crate::view::{max_cell_pixel_size, LoopState, MIN_CELL_SIZE};

const MAX_TICK_MS: u64 = 1000;

/// Menu button plus the collapsible control panel.
///
/// Widgets only read the session; the returned events are applied by the
/// caller once the egui frame has ended.
pub fn draw_controls<E: Engine>(
    ctx: &egui::Context,
    session: &Session<E>,
    menu_open: &mut bool,
) -> Vec<ControlEvent> {
    let mut events = Vec::new();

    egui::Area::new(egui::Id::new("menu_button_area"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(5.0, 5.0))
        .show(ctx, |ui| {
            if ui.button("☰").clicked() {
                *menu_open = !*menu_open;
            }
        });

    if !*menu_open {
        return events;
    }

    let panel_frame = egui::Frame {
        fill: Color32::from_rgba_unmultiplied(25, 25, 25, 200),
        ..egui::Frame::side_top_panel(&ctx.style())
    };

    egui::SidePanel::left("side_panel")
        .frame(panel_frame)
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.add_space(24.0);
            ui.heading("Game of Life");
            ui.separator();

            ui.horizontal(|ui| {
                let label = match session.loop_state() {
                    LoopState::Running => "Pause",
                    LoopState::Paused => "Play",
                };
                if ui.button(label).clicked() {
                    events.push(ControlEvent::TogglePause);
                }
                if ui.button("Next").clicked() {
                    events.push(ControlEvent::Step);
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    events.push(ControlEvent::Reset);
                }
                if ui.button("Clear").clicked() {
                    events.push(ControlEvent::Clear);
                }
            });
            ui.separator();

            let view = session.view();
            let (width, height) = session.engine().dimensions();

            let mut cell_size = view.cell_pixel_size;
            let max_size = max_cell_pixel_size(width, height);
            if ui
                .add(egui::Slider::new(&mut cell_size, MIN_CELL_SIZE..=max_size).text("Cell size"))
                .changed()
            {
                events.push(ControlEvent::SetCellSize(cell_size));
            }

            let mut tick_ms = session.render_loop().tick_delay().as_millis() as u64;
            let min_ms = MIN_TICK_DELAY.as_millis() as u64;
            if ui
                .add(egui::Slider::new(&mut tick_ms, min_ms..=MAX_TICK_MS).text("Delay (ms)"))
                .changed()
            {
                events.push(ControlEvent::SetTickDelay(Duration::from_millis(tick_ms)));
            }
            ui.separator();

            color_row(ui, "Grid", view.grid_color, ControlEvent::SetGridColor, &mut events);
            color_row(ui, "Background", view.dead_color, ControlEvent::SetDeadColor, &mut events);
            color_row(ui, "Foreground", view.alive_color, ControlEvent::SetAliveColor, &mut events);
            ui.separator();

            ui.label(format!("Grid: {}x{}", width, height));
            ui.label(format!("Generation: {}", session.generation()));
            ui.label(format!(
                "Live Cells: {}",
                session.live_cells().map_or_else(|_| "N/A".to_string(), |count| count.to_string())
            ));
            ui.separator();
            ui.label("Click: toggle cell");
            ui.label("Ctrl+click: glider");
            ui.label("Shift+click: pulsar");
        });

    events
}

fn color_row(
    ui: &mut egui::Ui,
    label: &str,
    current: Color32,
    event: fn(Color32) -> ControlEvent,
    events: &mut Vec<ControlEvent>,
) {
    ui.horizontal(|ui| {
        let mut color = current;
        if ui.color_edit_button_srgba(&mut color).changed() {
            events.push(event(color));
        }
        ui.label(label);
    });
}
