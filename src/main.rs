use life_canvas::config::Config;
use life_canvas::error::RenderError;
use life_canvas::state::State;
use life_canvas::{input, ui};

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

async fn run(event_loop: EventLoop<()>, window: Arc<Window>, config: Config) -> Result<()> {
    let mut state = State::new(window, &config).await?;

    event_loop.run(move |event, window_target| {
        match event {
            Event::WindowEvent { window_id, ref event }
                if window_id == state.window.id() =>
            {
                // Pass window-specific events to egui_winit FIRST
                let response = state.egui_winit_state.on_window_event(&state.window, event);

                if response.repaint {
                    state.window.request_redraw();
                }

                // Resizes always reach the canvas, even when egui also uses them.
                let consumed_by_egui = response.consumed && !matches!(event, WindowEvent::Resized(_));
                if consumed_by_egui {
                    return;
                }

                let result = match event {
                    WindowEvent::CloseRequested => {
                        state.session.stop();
                        window_target.exit();
                        Ok(())
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(*new_size);
                        state.window.request_redraw();
                        Ok(())
                    }
                    WindowEvent::ModifiersChanged(modifiers) => {
                        input::handle_modifiers(&mut state, modifiers.state());
                        Ok(())
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        input::handle_cursor_move(&mut state, *position);
                        Ok(())
                    }
                    WindowEvent::CursorLeft { .. } => {
                        input::handle_cursor_left(&mut state);
                        Ok(())
                    }
                    WindowEvent::MouseInput { state: element_state, button, .. } => {
                        input::handle_mouse_input(&mut state, *button, *element_state)
                    }
                    WindowEvent::RedrawRequested => redraw(&mut state),
                    _ => Ok(()),
                };

                if let Err(err) = result {
                    log::error!("Stopping: {err}");
                    state.session.stop();
                    window_target.exit();
                }
            }
            Event::AboutToWait => {
                if let Err(err) = state.on_tick(Instant::now()) {
                    log::error!("Stopping: {err}");
                    state.session.stop();
                    window_target.exit();
                    return;
                }
                // Sleep until the next generation is due.
                match state.session.render_loop().next_deadline() {
                    Some(deadline) => window_target.set_control_flow(ControlFlow::WaitUntil(deadline)),
                    None => window_target.exit(),
                }
            }
            _ => (),
        }
    })
    .context("event loop failed")?;
    Ok(())
}

/// Draws the canvas, then the egui controls on top, then applies whatever
/// the controls asked for.
fn redraw(state: &mut State) -> Result<(), RenderError> {
    let output_frame = match state.render() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::OutOfMemory) => {
            log::warn!("Skipping frame due to surface error.");
            state.window.request_redraw();
            return Ok(());
        }
        Err(err @ (wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Outdated)) => {
            log::warn!("Skipping frame due to surface {:?}", err);
            state.window.request_redraw();
            return Ok(());
        }
    };
    let output_view = output_frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let raw_input = state.egui_winit_state.take_egui_input(&state.window);
    state.egui_ctx.begin_frame(raw_input);
    let events = ui::draw_controls(&state.egui_ctx, &state.session, &mut state.menu_open);
    let full_output = state.egui_ctx.end_frame();

    let paint_jobs = state.egui_ctx.tessellate(full_output.shapes, state.window.scale_factor() as f32);
    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [state.config.width, state.config.height],
        pixels_per_point: state.window.scale_factor() as f32,
    };

    let mut encoder = state.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("egui Encoder"),
    });
    for (id, image_delta) in &full_output.textures_delta.set {
        state.egui_renderer.update_texture(&state.device, &state.queue, *id, image_delta);
    }
    let _tdelta = state.egui_renderer.update_buffers(
        &state.device,
        &state.queue,
        &mut encoder,
        &paint_jobs,
        &screen_descriptor,
    );
    state.egui_winit_state.handle_platform_output(&state.window, full_output.platform_output);

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    // Keep the canvas drawn underneath
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        state.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
    }

    for id in &full_output.textures_delta.free {
        state.egui_renderer.free_texture(id);
    }

    state.queue.submit(Some(encoder.finish()));
    output_frame.present();

    state.apply_controls(events)
}

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();
    config.validate()?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;

    let (canvas_width, canvas_height) = config.view_state().canvas_size(config.width, config.height);
    let initial_size = winit::dpi::PhysicalSize::new(canvas_width, canvas_height);

    let window = Arc::new(
        winit::window::WindowBuilder::new()
            .with_title("Game of Life")
            .with_inner_size(initial_size)
            .build(&event_loop)
            .context("failed to create window")?,
    );

    pollster::block_on(run(event_loop, window, config))
}
