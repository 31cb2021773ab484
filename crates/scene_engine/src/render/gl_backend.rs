//! OpenGL backend through `glow`
//!
//! Every call assumes the context that created the [`GlowApi`] is current on
//! the calling thread; [`crate::render::Window`] guarantees that by making it
//! current before constructing the API and never releasing it.

#![allow(unsafe_code)]

use super::backend::{
    BackendResult, BufferHandle, GraphicsApi, ProgramHandle, RenderError, ShaderHandle,
    ShaderStage, TextureHandle, UniformLocation, UniformValue, VertexArrayHandle,
};
use glow::HasContext;

/// [`GraphicsApi`] implementation over a live OpenGL 3.3 core context
pub struct GlowApi {
    gl: glow::Context,
}

impl GlowApi {
    /// Load GL entry points through `loader` (usually GLFW's `get_proc_address`)
    ///
    /// # Safety
    ///
    /// The context the loader resolves against must be current on this thread
    /// for the whole lifetime of the returned value.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const std::os::raw::c_void,
    {
        let gl = glow::Context::from_loader_function(loader);
        log::info!(
            "OpenGL context: {} ({})",
            gl.get_parameter_string(glow::VERSION),
            gl.get_parameter_string(glow::RENDERER)
        );
        Self { gl }
    }
}

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

impl GraphicsApi for GlowApi {
    fn create_buffer(&self) -> BackendResult<BufferHandle> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|message| RenderError::ResourceCreation { what: "buffer", message })?;
        Ok(BufferHandle::from_raw(buffer.0))
    }

    fn upload_array_buffer(&self, buffer: BufferHandle, data: &[u8]) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.raw())));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer.raw())) }
    }

    fn create_vertex_array(&self) -> BackendResult<VertexArrayHandle> {
        let vao = unsafe { self.gl.create_vertex_array() }
            .map_err(|message| RenderError::ResourceCreation { what: "vertex array", message })?;
        Ok(VertexArrayHandle::from_raw(vao.0))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        unsafe {
            self.gl
                .bind_vertex_array(vertex_array.map(|v| glow::NativeVertexArray(v.raw())));
        }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(vertex_array.raw())) }
    }

    fn enable_attribute(&self, index: u32, buffer: BufferHandle, components: i32) {
        unsafe {
            self.gl.enable_vertex_attrib_array(index);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(glow::NativeBuffer(buffer.raw())));
            self.gl
                .vertex_attrib_pointer_f32(index, components, glow::FLOAT, false, 0, 0);
        }
    }

    fn disable_attribute(&self, index: u32) {
        unsafe { self.gl.disable_vertex_attrib_array(index) }
    }

    fn create_texture(&self) -> BackendResult<TextureHandle> {
        let texture = unsafe { self.gl.create_texture() }
            .map_err(|message| RenderError::ResourceCreation { what: "texture", message })?;
        Ok(TextureHandle::from_raw(texture.0))
    }

    fn upload_compressed_level(
        &self,
        texture: TextureHandle,
        internal_format: u32,
        level: i32,
        width: u32,
        height: u32,
        data: &[u8],
    ) {
        unsafe {
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(glow::NativeTexture(texture.raw())));
            self.gl.compressed_tex_image_2d(
                glow::TEXTURE_2D,
                level,
                internal_format as i32,
                width as i32,
                height as i32,
                0,
                data.len() as i32,
                data,
            );
        }
    }

    fn upload_rgba8(&self, texture: TextureHandle, width: u32, height: u32, data: &[u8]) {
        unsafe {
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(glow::NativeTexture(texture.raw())));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(data),
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
        }
    }

    fn bind_texture(&self, unit: u32, texture: TextureHandle) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(glow::NativeTexture(texture.raw())));
        }
    }

    fn delete_texture(&self, texture: TextureHandle) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture.raw())) }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle, String> {
        unsafe {
            let shader = self.gl.create_shader(stage_enum(stage))?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            let info_log = self.gl.get_shader_info_log(shader);
            if !self.gl.get_shader_compile_status(shader) {
                self.gl.delete_shader(shader);
                return Err(info_log);
            }
            if !info_log.trim().is_empty() {
                log::warn!("{:?} shader compiled with messages:\n{}", stage, info_log.trim_end());
            }
            Ok(ShaderHandle::from_raw(shader.0))
        }
    }

    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle, String> {
        unsafe {
            let program = self.gl.create_program()?;
            for shader in shaders {
                self.gl.attach_shader(program, glow::NativeShader(shader.raw()));
            }
            self.gl.link_program(program);
            for shader in shaders {
                self.gl.detach_shader(program, glow::NativeShader(shader.raw()));
            }

            let info_log = self.gl.get_program_info_log(program);
            if !self.gl.get_program_link_status(program) {
                self.gl.delete_program(program);
                return Err(info_log);
            }
            if !info_log.trim().is_empty() {
                log::warn!("Program linked with messages:\n{}", info_log.trim_end());
            }
            Ok(ProgramHandle::from_raw(program.0))
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader.raw())) }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program.raw())) }
    }

    fn use_program(&self, program: ProgramHandle) {
        unsafe { self.gl.use_program(Some(glow::NativeProgram(program.raw()))) }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        unsafe {
            self.gl
                .get_uniform_location(glow::NativeProgram(program.raw()), name)
                .map(|location| UniformLocation(location.0))
        }
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue<'_>) {
        let location = glow::NativeUniformLocation(location.0);
        unsafe {
            match value {
                UniformValue::Mat4(m) => {
                    self.gl.uniform_matrix_4_f32_slice(Some(&location), false, m);
                }
                UniformValue::Vec3(v) => {
                    self.gl.uniform_3_f32(Some(&location), v[0], v[1], v[2]);
                }
                UniformValue::Vec3Array(values) => {
                    self.gl
                        .uniform_3_f32_slice(Some(&location), bytemuck::cast_slice(values));
                }
                UniformValue::FloatArray(values) => {
                    self.gl.uniform_1_f32_slice(Some(&location), values);
                }
                UniformValue::Int(i) => {
                    self.gl.uniform_1_i32(Some(&location), i);
                }
            }
        }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) }
    }

    fn set_clear_colour(&self, rgba: [f32; 4]) {
        unsafe { self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) }
    }

    fn enable_depth_test(&self) {
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LESS);
        }
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }
}
