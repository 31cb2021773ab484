//! Core engine implementation
//!
//! [`Engine`] owns the window, the scene, the waypoints and the input
//! dispatcher, and drives them from [`Engine::run`].

use crate::{
    application::Application,
    config::{ConfigError, EngineConfig},
    foundation::{logging, math::Vec3, time::Timer},
    input::{handlers, InputDispatcher, InputEvent, LoopControl},
    render::{self, Camera, GraphicsApi, RenderError, VertexArray, Window, WindowError},
    scene::{Scene, WaypointSet},
};
use std::rc::Rc;
use thiserror::Error;

/// Main engine struct
///
/// The engine coordinates all subsystems and manages the main loop. Fields
/// drop top to bottom, so everything holding GL objects goes before the
/// window.
pub struct Engine {
    scene: Scene,
    waypoints: WaypointSet,
    input: InputDispatcher,
    vertex_array: VertexArray,
    api: Rc<dyn GraphicsApi>,
    camera: Camera,
    timer: Timer,
    control: LoopControl,
    config: EngineConfig,
    window: Window,
}

impl Engine {
    /// Open the window and set up GL state, scene and input
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        logging::init(&config.log_level);
        log::info!("Initializing engine...");

        let window = Window::new(&config.window)?;
        let api: Rc<dyn GraphicsApi> = window.api();
        render::init_gl_state(api.as_ref(), &config.renderer);

        let (width, height) = window.framebuffer_size();
        api.set_viewport(0, 0, width as i32, height as i32);

        let vertex_array = VertexArray::new(Rc::clone(&api))?;
        vertex_array.bind();

        let mut input = InputDispatcher::new();
        if config.quit_on_escape {
            input.add_key_callback(handlers::quit_on_escape);
        }

        let camera = Camera::perspective(
            Vec3::new(4.0, 3.0, 3.0),
            45.0,
            width as f32 / height.max(1) as f32,
            0.1,
            100.0,
        );

        Ok(Self {
            scene: Scene::new(Rc::clone(&api)),
            waypoints: WaypointSet::new(),
            input,
            vertex_array,
            api,
            camera,
            timer: Timer::new(),
            control: LoopControl::default(),
            config,
            window,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Each frame: poll events, dispatch input, update the application,
    /// process waypoints, clear, render, swap.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");

        while !engine.window.should_close() {
            for event in engine.window.poll_events() {
                engine.input.dispatch(&event, &mut engine.control);
                if let InputEvent::FramebufferResized { width, height } = event {
                    engine.resize(width, height);
                }
                app.handle_event(&mut engine, &event)
                    .map_err(|e| EngineError::ApplicationError(format!("App event: {}", e)))?;
            }
            if engine.control.close_requested() {
                engine.window.set_should_close(true);
            }

            engine.timer.update();
            let delta_time = engine.timer.delta_time();

            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            engine.waypoints.process(&mut engine.scene);

            engine.api.clear();
            app.render(&mut engine)
                .map_err(|e| EngineError::ApplicationError(format!("App render: {}", e)))?;
            engine.window.swap_buffers();
        }

        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            engine.timer.frame_count(),
            engine.timer.average_fps()
        );
        Ok(())
    }

    fn resize(&mut self, width: i32, height: i32) {
        log::debug!("Framebuffer resized to {}x{}", width, height);
        self.api.set_viewport(0, 0, width, height);
        if width > 0 && height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }
    }

    /// Draw every scene root with the engine camera; returns the draw count
    pub fn render(&mut self) -> usize {
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix();
        self.vertex_array.bind();
        self.scene.render_roots(&view, &projection)
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.control.request_close();
        self.window.set_should_close(true);
    }

    /// The scene tree
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene tree
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Waypoints checked every frame
    pub fn waypoints(&self) -> &WaypointSet {
        &self.waypoints
    }

    /// Mutable access to the waypoints
    pub fn waypoints_mut(&mut self) -> &mut WaypointSet {
        &mut self.waypoints
    }

    /// Scene and waypoints together, for wiring actions to new components
    pub fn scene_and_waypoints_mut(&mut self) -> (&mut Scene, &mut WaypointSet) {
        (&mut self.scene, &mut self.waypoints)
    }

    /// Input callbacks and key bindings
    pub fn input_mut(&mut self) -> &mut InputDispatcher {
        &mut self.input
    }

    /// Camera supplying V and P
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The graphics API, for creating shaders and textures
    pub fn api(&self) -> Rc<dyn GraphicsApi> {
        Rc::clone(&self.api)
    }

    /// Configuration the engine was started with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Duration of the last frame in milliseconds
    pub fn ms_per_frame(&self) -> f64 {
        self.timer.ms_per_frame()
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Frame timing
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Cursor position in screen coordinates
    pub fn cursor_position(&self) -> (f64, f64) {
        self.window.cursor_position()
    }

    /// Window size in screen coordinates
    pub fn window_size(&self) -> (u32, u32) {
        self.window.size()
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected before start-up
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Window or context creation failed
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// GL object creation failed
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Application callback failed
    #[error("Application error: {0}")]
    ApplicationError(String),
}
