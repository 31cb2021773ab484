//! # Rendering
//!
//! Thin RAII wrappers over the OpenGL objects a scene needs, behind the
//! [`GraphicsApi`] trait.
//!
//! ## Architecture
//!
//! - **backend**: the [`GraphicsApi`] seam and typed GL handles
//! - **gl_backend** / **headless**: a real `glow` context and a call recorder
//! - **buffer**, **texture**, **shader**: GPU resources, deleted on drop
//! - **camera**, **lighting**, **mesh**: plain data feeding the uniforms
//! - **window**: GLFW window and context creation

pub mod backend;
pub mod gl_backend;
pub mod headless;

pub mod buffer;
pub mod texture;
pub mod shader;

pub mod camera;
pub mod lighting;
pub mod mesh;

pub mod window;

pub use backend::{
    BackendResult, BufferHandle, GraphicsApi, ProgramHandle, RenderError, ShaderHandle,
    ShaderStage, TextureHandle, UniformLocation, UniformValue, VertexArrayHandle,
};
pub use buffer::{Buffer, VertexArray};
pub use camera::Camera;
pub use gl_backend::GlowApi;
pub use headless::HeadlessApi;
pub use lighting::{Lighting, PointLight, MAX_POINT_LIGHTS};
pub use mesh::MeshData;
pub use shader::{ShaderError, ShaderProgram};
pub use texture::{Texture, TextureError};
pub use window::{Window, WindowError, WindowResult};

use crate::config::RendererConfig;

/// One-time GL state: clear colour and depth testing
pub fn init_gl_state(api: &dyn GraphicsApi, config: &RendererConfig) {
    api.set_clear_colour(config.clear_colour);
    if config.depth_test {
        api.enable_depth_test();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::GlCall;

    #[test]
    fn test_init_gl_state() {
        let api = HeadlessApi::new();
        init_gl_state(&api, &RendererConfig::default());
        assert_eq!(
            api.calls(),
            vec![GlCall::ClearColour([0.0, 0.0, 0.4, 0.0]), GlCall::EnableDepthTest]
        );
    }
}
