//! Graphics API abstraction
//!
//! [`GraphicsApi`] lists every OpenGL entry point the scene graph touches.
//! Resources and components only ever talk to the GPU through this trait, so
//! the same code drives a real context ([`super::GlowApi`]) or the recording
//! [`super::HeadlessApi`] used by tests.

use std::num::NonZeroU32;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// The driver refused to create an object
    #[error("Failed to create {what}: {message}")]
    ResourceCreation {
        /// Kind of object (buffer, texture, ...)
        what: &'static str,
        /// Driver message
        message: String,
    },
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wrap a raw, non-zero GL object name
            pub fn from_raw(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            /// The raw GL object name
            pub fn raw(self) -> NonZeroU32 {
                self.0
            }
        }
    };
}

gpu_handle!(
    /// Vertex buffer object
    BufferHandle
);
gpu_handle!(
    /// Vertex array object
    VertexArrayHandle
);
gpu_handle!(
    /// 2D texture object
    TextureHandle
);
gpu_handle!(
    /// Single compiled shader stage
    ShaderHandle
);
gpu_handle!(
    /// Linked shader program
    ProgramHandle
);

/// Location of a uniform inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

/// Uniform payloads used by the fixed shader interface
#[derive(Debug, Clone, Copy)]
pub enum UniformValue<'a> {
    /// Column-major 4x4 matrix
    Mat4(&'a [f32; 16]),
    /// Single vec3
    Vec3(&'a [f32; 3]),
    /// `vec3[]`
    Vec3Array(&'a [[f32; 3]]),
    /// `float[]`
    FloatArray(&'a [f32]),
    /// `int` or sampler unit
    Int(i32),
}

/// Every graphics call the library issues
///
/// Methods take `&self`: OpenGL state lives in the context, not in Rust
/// values, and resources keep an `Rc<dyn GraphicsApi>` so they can free
/// themselves on drop.
pub trait GraphicsApi {
    /// Generate a buffer name
    fn create_buffer(&self) -> BackendResult<BufferHandle>;

    /// Bind as `ARRAY_BUFFER` and upload with `STATIC_DRAW`
    fn upload_array_buffer(&self, buffer: BufferHandle, data: &[u8]);

    /// Delete a buffer
    fn delete_buffer(&self, buffer: BufferHandle);

    /// Generate a vertex array name
    fn create_vertex_array(&self) -> BackendResult<VertexArrayHandle>;

    /// Bind (or unbind with `None`) a vertex array
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);

    /// Delete a vertex array
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    /// Enable attribute `index` and point it at tightly packed floats in `buffer`
    fn enable_attribute(&self, index: u32, buffer: BufferHandle, components: i32);

    /// Disable attribute `index`
    fn disable_attribute(&self, index: u32);

    /// Generate a texture name
    fn create_texture(&self) -> BackendResult<TextureHandle>;

    /// Upload one pre-compressed mip level to a 2D texture
    fn upload_compressed_level(
        &self,
        texture: TextureHandle,
        internal_format: u32,
        level: i32,
        width: u32,
        height: u32,
        data: &[u8],
    );

    /// Upload RGBA8 pixels to level 0 and generate the mip chain
    fn upload_rgba8(&self, texture: TextureHandle, width: u32, height: u32, data: &[u8]);

    /// Make `unit` active and bind `texture` to `TEXTURE_2D`
    fn bind_texture(&self, unit: u32, texture: TextureHandle);

    /// Delete a texture
    fn delete_texture(&self, texture: TextureHandle);

    /// Compile one stage; the error carries the driver's info log
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String>;

    /// Link stages into a program; the error carries the driver's info log
    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle, String>;

    /// Delete a shader stage
    fn delete_shader(&self, shader: ShaderHandle);

    /// Delete a program
    fn delete_program(&self, program: ProgramHandle);

    /// Make `program` current
    fn use_program(&self, program: ProgramHandle);

    /// Look up a uniform by name; `None` when the program does not use it
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Upload a uniform on the current program
    fn set_uniform(&self, location: UniformLocation, value: UniformValue<'_>);

    /// `glDrawArrays(GL_TRIANGLES, first, count)`
    fn draw_triangles(&self, first: i32, count: i32);

    /// Set the colour used by [`GraphicsApi::clear`]
    fn set_clear_colour(&self, rgba: [f32; 4]);

    /// Clear colour and depth buffers
    fn clear(&self);

    /// Enable depth testing with `LESS`
    fn enable_depth_test(&self);

    /// Set the viewport rectangle
    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32);
}
