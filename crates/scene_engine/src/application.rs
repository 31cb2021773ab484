//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::engine::{Engine, EngineError};
use crate::input::InputEvent;
use crate::scene::SceneError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait and hand it to [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the window and GL context exist. Build the scene,
    /// register waypoints and bind keys here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before waypoints are processed.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Render the application
    ///
    /// Called after the framebuffer is cleared. The default draws every root
    /// of the scene with the engine camera.
    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render();
        Ok(())
    }

    /// Handle an input event
    ///
    /// Called for every event after the engine's input callbacks have seen it.
    fn handle_event(&mut self, _engine: &mut Engine, _event: &InputEvent) -> Result<(), AppError> {
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once after the main loop exits, while the GL context is still
    /// alive.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene construction or update failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
