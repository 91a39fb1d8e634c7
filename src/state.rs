use crate::config::Config;
use crate::engine::Engine;
use crate::error::RenderError;
use crate::input::{CanvasRect, Modifiers};
use crate::render::{
    create_canvas_sampler, create_render_bind_group_layout, create_render_pipeline, draw_canvas, CanvasTexture,
};
use crate::session::{ControlEvent, Session};
use crate::universe::Universe;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use winit::{dpi::PhysicalPosition, window::Window};

// GUI Imports
use egui::Context as EguiContext;
use egui_wgpu::Renderer as EguiWgpuRenderer;
use egui_winit::State as EguiWinitState;

pub struct State {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    pub render_pipeline: wgpu::RenderPipeline,
    pub render_bind_group_layout: wgpu::BindGroupLayout,
    pub canvas_sampler: wgpu::Sampler,
    pub canvas_texture: CanvasTexture,

    pub session: Session<Universe>,
    pub cursor_pos: Option<PhysicalPosition<f64>>,
    pub modifiers: Modifiers,

    // GUI state
    pub egui_ctx: EguiContext,
    pub egui_winit_state: EguiWinitState,
    pub egui_renderer: EguiWgpuRenderer,
    pub menu_open: bool,
}

impl State {
    pub async fn new(window: Arc<Window>, app_config: &Config) -> Result<Self> {
        let size = window.inner_size();

        let mut universe = match app_config.seed {
            Some(seed) => Universe::seeded(app_config.width, app_config.height, seed),
            None => Universe::new(app_config.width, app_config.height),
        };
        universe.reset_to_seed();
        let session = Session::new(universe, app_config.view_state(), app_config.tick_delay(), Instant::now())?;

        log::info!("Initializing wgpu...");

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .context("failed to find an appropriate adapter")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let render_bind_group_layout = create_render_bind_group_layout(&device);
        let render_pipeline = create_render_pipeline(&device, &render_bind_group_layout, config.format);
        let canvas_sampler = create_canvas_sampler(&device);
        let (canvas_width, canvas_height) = session.canvas().size();
        let canvas_texture = CanvasTexture::new(
            &device,
            &render_bind_group_layout,
            &canvas_sampler,
            canvas_width,
            canvas_height,
        );

        log::info!("Initializing egui...");
        let egui_ctx = EguiContext::default();
        let egui_winit_state = EguiWinitState::new(egui_ctx.clone(), egui_ctx.viewport_id(), &window, None, None);
        let egui_renderer = EguiWgpuRenderer::new(&device, config.format, None, 1);

        log::info!(
            "wgpu initialized: grid {}x{}, canvas {}x{} px",
            app_config.width,
            app_config.height,
            canvas_width,
            canvas_height
        );

        let mut state = Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            render_pipeline,
            render_bind_group_layout,
            canvas_sampler,
            canvas_texture,
            session,
            cursor_pos: None,
            modifiers: Modifiers::default(),
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            menu_open: false,
        };
        state.sync_canvas_texture();
        Ok(state)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            log::info!("Reconfigured surface to: {}x{}", new_size.width, new_size.height);
        } else {
            log::warn!("Ignoring resize to zero dimensions: {}x{}", new_size.width, new_size.height);
        }
    }

    /// Where the canvas is shown inside the window, in physical pixels.
    pub fn canvas_rect(&self) -> CanvasRect {
        let (width, height) = self.session.canvas().size();
        CanvasRect::fit(width, height, self.config.width, self.config.height)
    }

    /// Runs the render loop if its deadline passed and schedules a redraw
    /// when the canvas changed.
    pub fn on_tick(&mut self, now: Instant) -> Result<(), RenderError> {
        self.session.tick(now)?;
        if self.sync_canvas_texture() {
            self.window.request_redraw();
        }
        Ok(())
    }

    pub fn apply_controls(&mut self, events: Vec<ControlEvent>) -> Result<(), RenderError> {
        if events.is_empty() {
            return Ok(());
        }
        for event in events {
            self.session.apply_control(event)?;
        }
        // The frame being presented was drawn before these took effect.
        self.window.request_redraw();
        Ok(())
    }

    /// Re-uploads the canvas if it was repainted since the last upload,
    /// recreating the texture when the cell size changed its dimensions.
    /// Returns whether anything was uploaded.
    pub fn sync_canvas_texture(&mut self) -> bool {
        if !self.session.take_dirty() {
            return false;
        }
        let canvas = self.session.canvas();
        if !self.canvas_texture.matches(canvas) {
            let (width, height) = canvas.size();
            self.canvas_texture = CanvasTexture::new(
                &self.device,
                &self.render_bind_group_layout,
                &self.canvas_sampler,
                width,
                height,
            );
        }
        self.canvas_texture.upload(&self.queue, canvas);
        true
    }

    /// Draw the canvas. Returns the surface texture for egui to draw on.
    pub fn render(&mut self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.sync_canvas_texture();

        let output_frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost) => {
                log::warn!("Surface lost, recreating...");
                self.resize(self.size);
                return Err(wgpu::SurfaceError::Lost);
            }
            Err(e) => {
                log::error!("Failed to acquire next swap chain texture: {:?}", e);
                return Err(e);
            }
        };

        let output_view = output_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });
        let rect = self.canvas_rect();
        draw_canvas(&mut encoder, &output_view, &self.render_pipeline, &self.canvas_texture, &rect);
        self.queue.submit(Some(encoder.finish()));

        // Return the frame so egui can render to it
        Ok(output_frame)
    }
}
