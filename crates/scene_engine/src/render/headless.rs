//! Recording backend that needs no GPU
//!
//! [`HeadlessApi`] hands out fresh object names, remembers uniform names per
//! program and appends every call to a log. Tests assert against the log;
//! tools can use it to exercise a scene without opening a window.

use super::backend::{
    BackendResult, BufferHandle, GraphicsApi, ProgramHandle, ShaderHandle, ShaderStage,
    TextureHandle, UniformLocation, UniformValue, VertexArrayHandle,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

/// Owned copy of a uniform upload
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedUniform {
    /// Column-major matrix
    Mat4([f32; 16]),
    /// vec3
    Vec3([f32; 3]),
    /// vec3 array
    Vec3Array(Vec<[f32; 3]>),
    /// float array
    FloatArray(Vec<f32>),
    /// int / sampler
    Int(i32),
}

impl From<UniformValue<'_>> for RecordedUniform {
    fn from(value: UniformValue<'_>) -> Self {
        match value {
            UniformValue::Mat4(m) => Self::Mat4(*m),
            UniformValue::Vec3(v) => Self::Vec3(*v),
            UniformValue::Vec3Array(v) => Self::Vec3Array(v.to_vec()),
            UniformValue::FloatArray(v) => Self::FloatArray(v.to_vec()),
            UniformValue::Int(i) => Self::Int(i),
        }
    }
}

/// One recorded graphics call; object names are raw `u32`s
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateBuffer(u32),
    UploadArrayBuffer { buffer: u32, bytes: usize },
    DeleteBuffer(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    EnableAttribute { index: u32, buffer: u32, components: i32 },
    DisableAttribute(u32),
    CreateTexture(u32),
    UploadCompressed { texture: u32, format: u32, level: i32, width: u32, height: u32, bytes: usize },
    UploadRgba8 { texture: u32, width: u32, height: u32 },
    BindTexture { unit: u32, texture: u32 },
    DeleteTexture(u32),
    CompileShader { stage: ShaderStage, shader: u32 },
    LinkProgram(u32),
    DeleteShader(u32),
    DeleteProgram(u32),
    UseProgram(u32),
    SetUniform { name: String, value: RecordedUniform },
    DrawTriangles { first: i32, count: i32 },
    ClearColour([f32; 4]),
    Clear,
    EnableDepthTest,
    Viewport { x: i32, y: i32, width: i32, height: i32 },
}

/// [`GraphicsApi`] that records calls instead of issuing them
#[derive(Default)]
pub struct HeadlessApi {
    next_name: Cell<u32>,
    calls: RefCell<Vec<GlCall>>,
    uniform_names: RefCell<HashMap<u32, String>>,
    uniform_by_program: RefCell<HashMap<(u32, String), u32>>,
    missing_uniforms: RefCell<HashSet<String>>,
    compile_failure: RefCell<Option<String>>,
}

impl HeadlessApi {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following shader compilation fail with `info_log`
    pub fn fail_compilation(&self, info_log: impl Into<String>) {
        *self.compile_failure.borrow_mut() = Some(info_log.into());
    }

    /// Pretend programs do not declare `name`
    pub fn hide_uniform(&self, name: impl Into<String>) {
        self.missing_uniforms.borrow_mut().insert(name.into());
    }

    /// Snapshot of the call log
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls (object names keep counting)
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Uploads recorded for the uniform `name`, oldest first
    pub fn uniform_uploads(&self, name: &str) -> Vec<RecordedUniform> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                GlCall::SetUniform { name: n, value } if n == name => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of draw calls recorded
    pub fn draw_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, GlCall::DrawTriangles { .. }))
            .count()
    }

    /// Buffers created but not yet deleted
    pub fn live_buffers(&self) -> usize {
        self.balance(
            |c| matches!(c, GlCall::CreateBuffer(_)),
            |c| matches!(c, GlCall::DeleteBuffer(_)),
        )
    }

    /// Textures created but not yet deleted
    pub fn live_textures(&self) -> usize {
        self.balance(
            |c| matches!(c, GlCall::CreateTexture(_)),
            |c| matches!(c, GlCall::DeleteTexture(_)),
        )
    }

    /// Programs linked but not yet deleted
    pub fn live_programs(&self) -> usize {
        self.balance(
            |c| matches!(c, GlCall::LinkProgram(_)),
            |c| matches!(c, GlCall::DeleteProgram(_)),
        )
    }

    fn balance(&self, created: impl Fn(&GlCall) -> bool, deleted: impl Fn(&GlCall) -> bool) -> usize {
        let calls = self.calls.borrow();
        let made = calls.iter().filter(|c| created(c)).count();
        let freed = calls.iter().filter(|c| deleted(c)).count();
        made.saturating_sub(freed)
    }

    fn record(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn fresh_name(&self) -> NonZeroU32 {
        let next = self.next_name.get() + 1;
        self.next_name.set(next);
        NonZeroU32::MIN.saturating_add(next - 1)
    }
}

impl GraphicsApi for HeadlessApi {
    fn create_buffer(&self) -> BackendResult<BufferHandle> {
        let name = self.fresh_name();
        self.record(GlCall::CreateBuffer(name.get()));
        Ok(BufferHandle::from_raw(name))
    }

    fn upload_array_buffer(&self, buffer: BufferHandle, data: &[u8]) {
        self.record(GlCall::UploadArrayBuffer { buffer: buffer.raw().get(), bytes: data.len() });
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.record(GlCall::DeleteBuffer(buffer.raw().get()));
    }

    fn create_vertex_array(&self) -> BackendResult<VertexArrayHandle> {
        let name = self.fresh_name();
        self.record(GlCall::CreateVertexArray(name.get()));
        Ok(VertexArrayHandle::from_raw(name))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.record(GlCall::BindVertexArray(vertex_array.map(|v| v.raw().get())));
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.record(GlCall::DeleteVertexArray(vertex_array.raw().get()));
    }

    fn enable_attribute(&self, index: u32, buffer: BufferHandle, components: i32) {
        self.record(GlCall::EnableAttribute { index, buffer: buffer.raw().get(), components });
    }

    fn disable_attribute(&self, index: u32) {
        self.record(GlCall::DisableAttribute(index));
    }

    fn create_texture(&self) -> BackendResult<TextureHandle> {
        let name = self.fresh_name();
        self.record(GlCall::CreateTexture(name.get()));
        Ok(TextureHandle::from_raw(name))
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
        self.record(GlCall::UploadCompressed {
            texture: texture.raw().get(),
            format: internal_format,
            level,
            width,
            height,
            bytes: data.len(),
        });
    }

    fn upload_rgba8(&self, texture: TextureHandle, width: u32, height: u32, _data: &[u8]) {
        self.record(GlCall::UploadRgba8 { texture: texture.raw().get(), width, height });
    }

    fn bind_texture(&self, unit: u32, texture: TextureHandle) {
        self.record(GlCall::BindTexture { unit, texture: texture.raw().get() });
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.record(GlCall::DeleteTexture(texture.raw().get()));
    }

    fn compile_shader(&self, stage: ShaderStage, _source: &str) -> Result<ShaderHandle, String> {
        if let Some(info_log) = self.compile_failure.borrow().clone() {
            return Err(info_log);
        }
        let name = self.fresh_name();
        self.record(GlCall::CompileShader { stage, shader: name.get() });
        Ok(ShaderHandle::from_raw(name))
    }

    fn link_program(&self, _shaders: &[ShaderHandle]) -> Result<ProgramHandle, String> {
        let name = self.fresh_name();
        self.record(GlCall::LinkProgram(name.get()));
        Ok(ProgramHandle::from_raw(name))
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.record(GlCall::DeleteShader(shader.raw().get()));
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.record(GlCall::DeleteProgram(program.raw().get()));
    }

    fn use_program(&self, program: ProgramHandle) {
        self.record(GlCall::UseProgram(program.raw().get()));
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        if self.missing_uniforms.borrow().contains(name) {
            return None;
        }
        let key = (program.raw().get(), name.to_string());
        if let Some(&location) = self.uniform_by_program.borrow().get(&key) {
            return Some(UniformLocation(location));
        }

        let location = self.fresh_name().get();
        self.uniform_by_program.borrow_mut().insert(key, location);
        self.uniform_names.borrow_mut().insert(location, name.to_string());
        Some(UniformLocation(location))
    }

    fn set_uniform(&self, location: UniformLocation, value: UniformValue<'_>) {
        let name = self
            .uniform_names
            .borrow()
            .get(&location.0)
            .cloned()
            .unwrap_or_else(|| format!("<location {}>", location.0));
        self.record(GlCall::SetUniform { name, value: value.into() });
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(GlCall::DrawTriangles { first, count });
    }

    fn set_clear_colour(&self, rgba: [f32; 4]) {
        self.record(GlCall::ClearColour(rgba));
    }

    fn clear(&self) {
        self.record(GlCall::Clear);
    }

    fn enable_depth_test(&self) {
        self.record(GlCall::EnableDepthTest);
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport { x, y, width, height });
    }
}
