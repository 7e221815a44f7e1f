use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

// Import from the library crate
use naves::{config, controller, logging, model, ui, view};

use config::AppConfig;
use controller::input::native;
use controller::{FrameLoop, FrameOutput, InputEvent, InputState};
use model::mesh::resolve_mesh_paths;
use model::MeshStore;
use naves::error::AppError;
use view::{GpuContext, GpuMeshStore, SceneRenderer};

/// Window, GPU and egui resources. Created once the event loop is running.
struct GpuState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SceneRenderer,
    meshes: Option<GpuMeshStore>,

    // egui
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl GpuState {
    fn new(event_loop: &ActiveEventLoop, config: &AppConfig, mesh_store: &MeshStore) -> Result<Self, AppError> {
        let window_attributes = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        let gpu = pollster::block_on(GpuContext::new(window.clone(), size.width, size.height))?;
        let renderer = SceneRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.format,
            gpu.config.width,
            gpu.config.height,
            config,
        )?;
        let meshes = GpuMeshStore::upload(mesh_store, &gpu.device);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.format,
            egui_wgpu::RendererOptions::default(),
        );

        grab_cursor(&window);

        Ok(Self {
            window,
            gpu,
            renderer,
            meshes: Some(meshes),
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) -> bool {
        if !self.gpu.resize(new_size.width, new_size.height) {
            return false;
        }
        self.renderer.resize(&self.gpu.device, new_size.width, new_size.height);
        true
    }

    fn render(&mut self, frame: &FrameOutput, fps: f32, frame_loop: &FrameLoop) -> Result<(), wgpu::SurfaceError> {
        let Some(meshes) = self.meshes.as_ref() else {
            return Ok(());
        };

        let output = self.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_hud(ctx, fps, &frame_loop.state, &frame_loop.camera);
        });
        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point,
        };

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        // Upload egui textures
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &primitives,
            &screen_descriptor,
        );

        self.renderer
            .draw_scene(&mut encoder, &view, &self.gpu.queue, frame, meshes);

        // HUD on top
        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Hide the cursor and keep it in the window. Not every platform can lock it.
fn grab_cursor(window: &Window) {
    if let Err(err) = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
    {
        warn!("Could not grab cursor: {}", err);
    }
    window.set_cursor_visible(false);
}

struct App {
    config: AppConfig,
    mesh_store: MeshStore,
    gpu_state: Option<GpuState>,
    frame_loop: FrameLoop,
    input_state: InputState,

    // Frame timing
    fps: ui::FpsCounter,
    last_frame_time: Instant,

    init_error: Option<AppError>,
}

impl App {
    fn new(config: AppConfig, mesh_store: MeshStore) -> Self {
        let frame_loop = FrameLoop::new(&config, config.window.width, config.window.height);
        Self {
            config,
            mesh_store,
            gpu_state: None,
            frame_loop,
            input_state: InputState::new(),
            fps: ui::FpsCounter::new(),
            last_frame_time: Instant::now(),
            init_error: None,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;
        self.fps.tick(dt);

        let frame = self.frame_loop.update(&mut self.input_state, dt);
        if frame.exit_requested {
            info!("Exit key pressed, exiting.");
            event_loop.exit();
            return;
        }

        let Some(state) = self.gpu_state.as_mut() else {
            return;
        };
        match state.render(&frame, self.fps.fps(), &self.frame_loop) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Out of GPU memory, exiting.");
                event_loop.exit();
            }
            Err(e) => warn!("Skipping frame: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu_state.is_some() {
            return;
        }
        match GpuState::new(event_loop, &self.config, &self.mesh_store) {
            Ok(state) => {
                let size = state.window.inner_size();
                self.frame_loop.resize(size.width, size.height);
                self.last_frame_time = Instant::now();
                self.gpu_state = Some(state);
            }
            Err(err) => {
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.gpu_state {
            state.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.gpu_state.as_mut() else {
            return;
        };

        // The HUD is display-only; egui sees every event but never swallows input
        let _ = state.egui_state.on_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting.");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if state.resize(physical_size) {
                    self.frame_loop
                        .resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = native::keyboard_event_to_input(&event) {
                    self.input_state.process_event(&input);
                }
            }
            WindowEvent::Focused(false) => {
                self.input_state.process_event(&InputEvent::FocusLost);
            }
            WindowEvent::Focused(true) => grab_cursor(&state.window),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input_state
                .process_event(&native::mouse_motion_to_input(delta));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(meshes) = self.gpu_state.as_mut().and_then(|state| state.meshes.take()) {
            meshes.release();
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    // Relative mesh paths are taken from the config file's directory
    let base = config_path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let mesh_paths = resolve_mesh_paths(&config.meshes, base);
    let mesh_store = MeshStore::load(&mesh_paths).context("failed to load meshes")?;
    for (id, mesh) in mesh_store.iter() {
        info!("Loaded {} ({} vertices)", id.label(), mesh.vertex_count());
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, mesh_store);
    event_loop.run_app(&mut app).context("event loop error")?;

    if let Some(err) = app.init_error.take() {
        return Err(anyhow::Error::new(err).context("failed to initialize graphics"));
    }

    info!("Shut down cleanly");
    Ok(())
}

fn main() {
    logging::init();
    info!("naves starting...");

    if let Err(err) = run() {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(-1);
    }
}
