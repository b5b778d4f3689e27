use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

// Import from the library crate
use bouncing_ball::{
    config::Config, error::AppError, logging, ui, utils,
    model, view, controller,
};

use controller::input::native;
use controller::{FrameLoopContext, InputState, KeyBindings, Simulation};
use model::load_obj;
use view::{render, GpuContext, RenderState};

/// Everything that exists once the window is up
struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    render_state: RenderState,
    frame_loop: FrameLoopContext,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    show_overlay: bool,
}

fn load_mesh(device: &wgpu::Device, path: &Path, label: &str) -> Result<utils::MeshBuffer, AppError> {
    let mesh = load_obj(path).map_err(|source| AppError::Mesh {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), triangles = mesh.triangle_count(), "mesh loaded");
    Ok(mesh.upload(device, label))
}

impl AppState {
    fn new(event_loop: &ActiveEventLoop, config: &Config) -> Result<Self, AppError> {
        let window_attributes = Window::default_attributes()
            .with_title("Bouncing Ball")
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let device = gpu.device.as_ref();

        let plane_mesh = load_mesh(device, &config.plane_mesh, "plane_mesh")?;
        let ball_mesh = load_mesh(device, &config.sphere_mesh, "ball_mesh")?;
        let texture = view::load_texture(device, &gpu.queue, &config.texture)?;

        let simulation = Simulation::new(config.physics(), config.camera());
        let scene = &simulation.scene;

        let scene_resources = render::create_scene_resources(device, scene.light_position, texture);
        let object_layout = render::create_object_layout(device);
        let plane_object = render::create_object_resources(device, &object_layout, &scene.plane, "plane_object");
        let ball_object = render::create_object_resources(device, &object_layout, &scene.ball, "ball_object");
        let pipeline = render::create_scene_pipeline(
            device,
            gpu.format,
            &scene_resources.bind_group_layout,
            &object_layout,
        );
        let (depth_texture, depth_view) =
            render::create_depth_texture(device, gpu.config.width, gpu.config.height);

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
            device,
            gpu.format,
            egui_wgpu::RendererOptions::default(),
        );

        let render_state = RenderState {
            pipeline,
            scene_resources,
            plane_mesh,
            ball_mesh,
            plane_object,
            ball_object,
            depth_texture,
            depth_view,
            egui_renderer,
        };

        let frame_loop = FrameLoopContext::new(
            simulation,
            InputState::new(KeyBindings::default()),
            Instant::now(),
        );

        Ok(Self {
            window,
            gpu,
            render_state,
            frame_loop,
            egui_ctx,
            egui_state,
            show_overlay: !config.no_overlay,
        })
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.gpu.resize(size.width, size.height);
        self.render_state.resize(&self.gpu.device, size.width, size.height);
    }

    fn overlay_frame(&mut self) -> ui::OverlayFrame {
        let stats = ui::OverlayStats::capture(&self.frame_loop.simulation, self.frame_loop.last_dt);
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let output = self.egui_ctx.run(raw_input, |ctx| ui::build_ui(ctx, &stats));
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        let pixels_per_point = output.pixels_per_point;
        let primitives = self.egui_ctx.tessellate(output.shapes, pixels_per_point);
        ui::OverlayFrame {
            primitives,
            textures_delta: output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
                pixels_per_point,
            },
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let transforms = self.frame_loop.update(Instant::now());
        self.render_state
            .write_uniforms(&self.gpu.queue, &transforms, &self.frame_loop.simulation.scene);

        let overlay = if self.show_overlay { Some(self.overlay_frame()) } else { None };
        match self
            .render_state
            .draw_frame(&self.gpu.device, &self.gpu.queue, &self.gpu.surface, overlay)
        {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => tracing::warn!(error = ?e, "frame skipped"),
        }
    }
}

struct App {
    config: Config,
    state: Option<AppState>,
    error: Option<AppError>,
}

impl App {
    fn new(config: Config) -> Self {
        Self { config, state: None, error: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match AppState::new(event_loop, &self.config) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else { return };
        if window_id != state.window.id() {
            return;
        }

        let response = state.egui_state.on_window_event(&state.window, &event);
        if let Some(input) = native::window_event_to_input(&event) {
            let input_state = &mut state.frame_loop.input_state;
            if !response.consumed || input_state.bypasses_overlay(&input) {
                input_state.process_event(&input);
            }
        }
        if state.frame_loop.input_state.quit_requested {
            tracing::info!("quit requested");
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => state.resize(physical_size),
            WindowEvent::RedrawRequested => state.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

fn run(config: Config) -> Result<(), AppError> {
    config.validate()?;
    tracing::info!(?config, "starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let config = Config::parse();
    logging::init();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
