//! # Scene Engine
//!
//! A small OpenGL scene graph built on GLFW and `glow`.
//!
//! ## Features
//!
//! - **Scene Graph**: groups and renderable components with model matrices
//! - **Lighting**: ambient colour plus up to eight point lights, pushed down the tree
//! - **Waypoints**: spherical triggers that run actions on nearby components
//! - **Assets**: Wavefront OBJ meshes, DXT-compressed DDS and PNG textures
//! - **Input**: GLFW key and mouse events routed to registered callbacks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let shader = ShaderProgram::colour_shader(engine.api())
//!             .map_err(|e| AppError::Custom(e.to_string()))?;
//!         let scene = engine.scene_mut();
//!         let cube = scene.create_component();
//!         scene.try_component_mut(cube)?.set_mesh(&MeshData::cube())?;
//!         scene.set_shader(cube, shader)?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::new("My scene");
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod input;
pub mod scene;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use config::EngineConfig;
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineConfig, EngineError,
        config::{Config, RendererConfig, WindowConfig},
        foundation::{
            math::{Mat4, Mat4Ext, Vec3},
            time::Timer,
        },
        assets::{ObjLoader, ObjOptions},
        render::{Camera, GraphicsApi, Lighting, MeshData, PointLight, ShaderProgram, Texture},
        input::{Action, InputEvent, KeyCode, KeyEvent, LoopControl, MouseButton},
        scene::{Component, NodeId, Scene, SceneError, Trigger, Waypoint, WaypointSet},
    };
}
