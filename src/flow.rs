//! Application event loop.
//!
//! [`run`] opens a window, loads the configured level and then drives one
//! frame per redraw:
//! 1. Upload the camera's view and projection to the camera uniform
//! 2. Start a new frame on the backend and on the scene
//! 3. Let the scene issue its draw calls (all areas, or a portal flood)
//! 4. Replay the recorded draws into a render pass and present
//!
//! Arrow keys walk and turn, `L` toggles wireframe, `Escape` quits.

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    config::ViewerConfig,
    context::Context,
    data_structures::scene::Scene,
    gfx::wgpu_backend::WgpuBackend,
    pipelines::area::AreaPipelines,
    render::{FrameResources, draw_frame},
    resources::TextureManager,
};

/// Everything that exists once the window and the level are up.
pub struct AppState {
    pub(crate) ctx: Context,
    backend: WgpuBackend,
    textures: TextureManager,
    pipelines: AreaPipelines,
    scene: Scene,
    wireframe: bool,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        let mut backend = WgpuBackend::new(&ctx.device);
        let mut textures = TextureManager::new(&ctx.device, &ctx.queue);
        let pipelines = AreaPipelines::new(
            &ctx.device,
            ctx.config.format,
            textures.layout(),
            &ctx.camera.bind_group_layout,
        );

        let mut scene = Scene::load(&config.level, &mut textures, &mut backend)
            .await?
            .with_traversal(config.traversal);
        scene.bind_program(&pipelines.fill_program(), &mut backend);
        log::info!(
            "Level {} ready: {} areas, {} textures",
            config.level,
            scene.area_count(),
            textures.len()
        );

        Ok(Self {
            ctx,
            backend,
            textures,
            pipelines,
            scene,
            wireframe: false,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> bool {
        if key == KeyCode::KeyL {
            self.toggle_wireframe();
            return true;
        }
        self.ctx
            .camera
            .controller
            .handle_key(key, &mut self.ctx.camera.camera)
    }

    fn toggle_wireframe(&mut self) {
        let program = if self.wireframe {
            Some(self.pipelines.fill_program())
        } else {
            self.pipelines.wireframe_program()
        };
        match program {
            Some(program) => {
                self.scene.bind_program(&program, &mut self.backend);
                self.wireframe = !self.wireframe;
                log::debug!("Wireframe {}", if self.wireframe { "on" } else { "off" });
            }
            None => log::warn!("Wireframe is not supported by this adapter"),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        self.ctx.camera.write(&self.ctx.queue, &self.ctx.projection);

        self.backend.begin_frame();
        self.scene.begin_frame();
        let eye = self.ctx.camera.camera.eye;
        let areas = self.scene.render(eye, &mut self.backend);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        let resources = FrameResources {
            pipelines: &self.pipelines,
            textures: &self.textures,
            camera_bind_group: &self.ctx.camera.bind_group,
        };
        let draws = draw_frame(
            &mut encoder,
            &view,
            &self.ctx.depth_texture.view,
            self.ctx.clear_colour,
            &self.backend,
            &resources,
        );
        log::trace!("{} areas, {} draws", areas, draws);

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        self.scene.release(&mut self.backend);
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: ViewerConfig,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
    last_time: Instant,
}

impl App {
    fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            config,
            state: None,
            error: None,
            last_time: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes().with_title("portal-view");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        match self
            .async_runtime
            .block_on(AppState::new(window, &self.config))
        {
            Ok(mut state) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        match event {
            WindowEvent::CloseRequested => {
                state.release();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    state.release();
                    event_loop.exit();
                } else if state.handle_key(code) {
                    state.ctx.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                match state.render() {
                    Ok(()) => log::trace!("Frame took {:?}", dt),
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.release();
        }
    }
}

/// Opens the viewer window and blocks until it is closed.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
