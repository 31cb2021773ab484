//! Window management using GLFW
//!
//! Creates an OpenGL 3.3 core context, loads it through `glow` and turns the
//! GLFW event queue into [`InputEvent`]s.

#![allow(unsafe_code)]

use super::gl_backend::GlowApi;
use crate::config::WindowConfig;
use crate::input::InputEvent;
use glfw::Context;
use std::rc::Rc;
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// `glfwInit` failed
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// No window or context with the requested hints
    #[error("Window creation failed for {width}x{height} with OpenGL {major}.{minor} core")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested context major version
        major: u32,
        /// Requested context minor version
        minor: u32,
    },
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {:?}: {}", error, description);
}

/// GLFW window owning the current OpenGL context
pub struct Window {
    // Declared first so the GL wrapper drops while the context is alive
    api: Rc<GlowApi>,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    glfw: glfw::Glfw,
}

impl Window {
    /// Open a window and make its context current on this thread
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(log_glfw_error)
            .map_err(|e| WindowError::InitializationFailed(format!("{:?}", e)))?;

        let (major, minor) = config.gl_version;
        glfw.window_hint(glfw::WindowHint::Samples(Some(config.samples)));
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed {
                width: config.width,
                height: config.height,
                major,
                minor,
            })?;

        window.make_current();
        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        // SAFETY: the context was made current above and stays current for
        // as long as `Window` (and therefore `api`) lives.
        let api = unsafe { GlowApi::from_loader(|name| window.get_proc_address(name) as *const _) };

        window.set_key_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_close_polling(true);

        log::info!(
            "Opened {}x{} window \"{}\" (OpenGL {}.{} core, {}x MSAA)",
            config.width,
            config.height,
            config.title,
            major,
            minor,
            config.samples
        );

        Ok(Self {
            api: Rc::new(api),
            window,
            events,
            glfw,
        })
    }

    /// The GL entry points for this window's context
    pub fn api(&self) -> Rc<GlowApi> {
        Rc::clone(&self.api)
    }

    /// Whether the user or a callback asked to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Set or clear the close flag
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Process pending events and return the ones the scene loop cares about
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| InputEvent::from_glfw(&event))
            .collect()
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Window size in screen coordinates
    pub fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// Cursor position relative to the top-left corner of the content area
    pub fn cursor_position(&self) -> (f64, f64) {
        self.window.get_cursor_pos()
    }

    /// Seconds since GLFW was initialised
    pub fn time(&self) -> f64 {
        self.glfw.get_time()
    }
}
