//! GPU buffer and vertex array wrappers
//!
//! Both types own their GL object and delete it when dropped.

use super::backend::{BackendResult, BufferHandle, GraphicsApi, VertexArrayHandle};
use std::rc::Rc;

/// Array buffer holding tightly packed `f32` attributes
///
/// The GL name is generated on the first upload, so an empty buffer costs
/// nothing.
pub struct Buffer {
    api: Rc<dyn GraphicsApi>,
    handle: Option<BufferHandle>,
    components: i32,
    len: usize,
}

impl Buffer {
    /// Create an empty buffer whose vertices have `components` floats each
    pub fn new(api: Rc<dyn GraphicsApi>, components: i32) -> Self {
        Self {
            api,
            handle: None,
            components,
            len: 0,
        }
    }

    /// Replace the contents with `data`
    pub fn upload(&mut self, data: &[f32]) -> BackendResult<()> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = self.api.create_buffer()?;
                self.handle = Some(handle);
                handle
            }
        };
        self.api.upload_array_buffer(handle, bytemuck::cast_slice(data));
        self.len = data.len();
        Ok(())
    }

    /// Point vertex attribute `index` at this buffer; no-op while empty
    pub fn bind_attribute(&self, index: u32) -> bool {
        match self.handle {
            Some(handle) if self.len > 0 => {
                self.api.enable_attribute(index, handle, self.components);
                true
            }
            _ => false,
        }
    }

    /// Floats per vertex
    pub fn components(&self) -> i32 {
        self.components
    }

    /// Number of floats uploaded
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been uploaded
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of whole vertices uploaded
    pub fn vertex_count(&self) -> usize {
        self.len / self.components.max(1) as usize
    }

    /// The GL buffer, once created
    pub fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.api.delete_buffer(handle);
        }
    }
}

/// Vertex array object
///
/// A core profile context refuses to draw without one bound; the engine
/// creates a single VAO and binds it for the whole session.
pub struct VertexArray {
    api: Rc<dyn GraphicsApi>,
    handle: VertexArrayHandle,
}

impl VertexArray {
    /// Generate a vertex array
    pub fn new(api: Rc<dyn GraphicsApi>) -> BackendResult<Self> {
        let handle = api.create_vertex_array()?;
        Ok(Self { api, handle })
    }

    /// Bind this vertex array
    pub fn bind(&self) {
        self.api.bind_vertex_array(Some(self.handle));
    }

    /// Unbind any vertex array
    pub fn unbind(&self) {
        self.api.bind_vertex_array(None);
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.api.delete_vertex_array(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::{GlCall, HeadlessApi};

    #[test]
    fn test_buffer_is_created_lazily() {
        let api = Rc::new(HeadlessApi::new());
        let mut buffer = Buffer::new(api.clone(), 3);
        assert!(buffer.handle().is_none());
        assert!(!buffer.bind_attribute(0));
        assert!(api.calls().is_empty());

        buffer.upload(&[0.0; 9]).unwrap();
        assert_eq!(buffer.vertex_count(), 3);
        assert_eq!(api.live_buffers(), 1);

        let name = buffer.handle().unwrap().raw().get();
        assert!(api.calls().contains(&GlCall::UploadArrayBuffer { buffer: name, bytes: 36 }));
    }

    #[test]
    fn test_reupload_reuses_name() {
        let api = Rc::new(HeadlessApi::new());
        let mut buffer = Buffer::new(api.clone(), 2);
        buffer.upload(&[1.0, 2.0]).unwrap();
        buffer.upload(&[1.0, 2.0, 3.0, 4.0]).unwrap();

        let creates = api.calls().iter().filter(|c| matches!(c, GlCall::CreateBuffer(_))).count();
        assert_eq!(creates, 1);
        assert_eq!(buffer.vertex_count(), 2);
    }

    #[test]
    fn test_drop_releases_gpu_objects() {
        let api = Rc::new(HeadlessApi::new());
        {
            let mut buffer = Buffer::new(api.clone(), 3);
            buffer.upload(&[0.0; 3]).unwrap();
            let vao = VertexArray::new(api.clone()).unwrap();
            vao.bind();
        }
        assert_eq!(api.live_buffers(), 0);
        assert!(api.calls().iter().any(|c| matches!(c, GlCall::DeleteVertexArray(_))));
    }
}
