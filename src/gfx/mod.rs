//! The narrow graphics interface the scene code draws through.
//!
//! Areas never talk to wgpu directly. They create and delete buffers and
//! issue bind/draw calls on a [`GraphicsBackend`], which keeps the area logic
//! testable against a recording mock and lets [`wgpu_backend::WgpuBackend`]
//! turn the calls into a replayable command list for a render pass.

pub mod wgpu_backend;

use crate::data_structures::vertex::Vertex;

/// A GPU buffer owned by the backend. Zero is the "unallocated" sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

impl BufferHandle {
    pub const UNALLOCATED: Self = Self(0);

    pub fn is_allocated(self) -> bool {
        self != Self::UNALLOCATED
    }
}

/// A texture resolved through a [`crate::resources::TextureProvider`]. Zero is never handed out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Float32,
}

/// Layout of one vertex attribute inside a bound vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    pub kind: AttributeKind,
    pub stride: u32,
    pub offset: u32,
}

/// A linked shader program: its handle and the names of the inputs it exposes.
#[derive(Clone, Debug, Default)]
pub struct ShaderProgram {
    pub handle: ProgramHandle,
    attributes: Vec<(String, u32)>,
    uniforms: Vec<(String, u32)>,
}

impl ShaderProgram {
    pub fn new(handle: ProgramHandle) -> Self {
        Self {
            handle,
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, location: u32) -> Self {
        self.attributes.push((name.to_string(), location));
        self
    }

    pub fn with_uniform(mut self, name: &str, location: u32) -> Self {
        self.uniforms.push((name.to_string(), location));
        self
    }

    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        lookup(&self.attributes, name)
    }

    pub fn uniform_location(&self, name: &str) -> Option<u32> {
        lookup(&self.uniforms, name)
    }
}

fn lookup(table: &[(String, u32)], name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(entry, _)| entry == name)
        .map(|(_, location)| *location)
}

/// Buffer management and immediate-style draw calls.
///
/// Deleting [`BufferHandle::UNALLOCATED`] is a no-op by convention.
pub trait GraphicsBackend {
    fn create_vertex_buffer(&mut self, label: &str, vertices: &[Vertex]) -> BufferHandle;
    fn create_index_buffer(&mut self, label: &str, indices: &[u32]) -> BufferHandle;
    fn delete_buffer(&mut self, buffer: BufferHandle);

    fn use_program(&mut self, program: ProgramHandle);
    /// Points the sampler uniform at `location` to texture unit `unit`.
    fn set_sampler_unit(&mut self, location: u32, unit: u32);

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);
    fn bind_vertex_buffer(&mut self, buffer: BufferHandle);
    fn vertex_attribute(&mut self, attribute: VertexAttribute);
    fn bind_index_buffer(&mut self, buffer: BufferHandle);
    /// Indexed triangle list over the first `index_count` indices of the bound index buffer.
    fn draw_indexed(&mut self, index_count: u32);
}
