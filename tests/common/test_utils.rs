#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use portal_view::{
    data_structures::vertex::Vertex,
    error::{Result, ViewerError},
    gfx::{BufferHandle, GraphicsBackend, ProgramHandle, TextureHandle, VertexAttribute},
    proc::TokenStream,
    resources::TextureProvider,
};

/// Every call a [`MockBackend`] received, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateVertexBuffer(BufferHandle),
    CreateIndexBuffer(BufferHandle),
    DeleteBuffer(BufferHandle),
    UseProgram(ProgramHandle),
    SetSamplerUnit { location: u32, unit: u32 },
    BindTexture { unit: u32, texture: TextureHandle },
    BindVertexBuffer(BufferHandle),
    VertexAttribute(VertexAttribute),
    BindIndexBuffer(BufferHandle),
    DrawIndexed(u32),
}

/// Records calls and tracks which buffers are alive.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: Vec<Call>,
    next_handle: u32,
    live: HashSet<BufferHandle>,
    pub double_frees: usize,
    pub vertices: HashMap<BufferHandle, Vec<Vertex>>,
    pub indices: HashMap<BufferHandle, Vec<u32>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> BufferHandle {
        self.next_handle += 1;
        let handle = BufferHandle(self.next_handle);
        self.live.insert(handle);
        handle
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::DrawIndexed(_)))
            .count()
    }

    pub fn created_buffers(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::CreateVertexBuffer(_) | Call::CreateIndexBuffer(_)))
            .count()
    }

    pub fn live_buffers(&self) -> usize {
        self.live.len()
    }

    pub fn bound_textures(&self) -> Vec<TextureHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::BindTexture { texture, .. } => Some(*texture),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl GraphicsBackend for MockBackend {
    fn create_vertex_buffer(&mut self, _label: &str, vertices: &[Vertex]) -> BufferHandle {
        let handle = self.allocate();
        self.vertices.insert(handle, vertices.to_vec());
        self.calls.push(Call::CreateVertexBuffer(handle));
        handle
    }

    fn create_index_buffer(&mut self, _label: &str, indices: &[u32]) -> BufferHandle {
        let handle = self.allocate();
        self.indices.insert(handle, indices.to_vec());
        self.calls.push(Call::CreateIndexBuffer(handle));
        handle
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(Call::DeleteBuffer(buffer));
        if !buffer.is_allocated() {
            return;
        }
        if !self.live.remove(&buffer) {
            self.double_frees += 1;
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(Call::UseProgram(program));
    }

    fn set_sampler_unit(&mut self, location: u32, unit: u32) {
        self.calls.push(Call::SetSamplerUnit { location, unit });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.calls.push(Call::BindTexture { unit, texture });
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(Call::BindVertexBuffer(buffer));
    }

    fn vertex_attribute(&mut self, attribute: VertexAttribute) {
        self.calls.push(Call::VertexAttribute(attribute));
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(Call::BindIndexBuffer(buffer));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.calls.push(Call::DrawIndexed(index_count));
    }
}

/// Hands out a handle per distinct name; names in `missing` fail to resolve.
#[derive(Debug, Default)]
pub struct MockTextures {
    handles: HashMap<String, TextureHandle>,
    missing: HashSet<String>,
    pub requests: Vec<String>,
}

impl MockTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` is the full file name, extension included.
    pub fn missing(mut self, name: &str) -> Self {
        self.missing.insert(name.to_string());
        self
    }

    pub fn handle(&self, name: &str) -> Option<TextureHandle> {
        self.handles.get(name).copied()
    }
}

impl TextureProvider for MockTextures {
    fn resolve(&mut self, name: &str) -> Result<TextureHandle> {
        self.requests.push(name.to_string());
        if self.missing.contains(name) {
            return Err(ViewerError::resolution(name, "not found"));
        }
        let next = TextureHandle(self.handles.len() as u32 + 1);
        Ok(*self.handles.entry(name.to_string()).or_insert(next))
    }
}

/// A value in a [`Tokens`] stream.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i32),
    Float(f32),
    Str(&'static str),
}

/// A pre-typed token stream, for feeding `ModelArea::load` without text.
#[derive(Debug, Default)]
pub struct Tokens {
    values: std::collections::VecDeque<Value>,
}

impl Tokens {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    fn next(&mut self) -> Result<Value> {
        self.values
            .pop_front()
            .ok_or_else(|| ViewerError::malformed("unexpected end of input"))
    }
}

impl TokenStream for Tokens {
    fn next_int(&mut self) -> Result<i32> {
        match self.next()? {
            Value::Int(i) => Ok(i),
            other => Err(ViewerError::malformed(format!("expected int, found {other:?}"))),
        }
    }

    fn next_float(&mut self) -> Result<f32> {
        match self.next()? {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f32),
            other => Err(ViewerError::malformed(format!("expected float, found {other:?}"))),
        }
    }

    fn next_string(&mut self) -> Result<String> {
        match self.next()? {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(ViewerError::malformed(format!("expected string, found {other:?}"))),
        }
    }
}

/// Tokens of one surface: `texture`, a triangle per three vertices, indices `0..n`.
pub fn triangle_surface(texture: &'static str, triangles: u32) -> Vec<Value> {
    let num_verts = (triangles * 3) as i32;
    let mut values = vec![Value::Str(texture), Value::Int(num_verts), Value::Int(num_verts)];
    for i in 0..num_verts {
        let x = i as f32;
        values.extend([
            Value::Float(x),
            Value::Float(0.0),
            Value::Float(0.0),
            Value::Float(x / 4.0),
            Value::Float(0.5),
            Value::Float(0.0),
            Value::Float(0.0),
            Value::Float(1.0),
        ]);
    }
    values.extend((0..num_verts).map(Value::Int));
    values
}

/// Tokens of an area body: surface count followed by the given surfaces.
pub fn area_tokens(surfaces: Vec<Vec<Value>>) -> Tokens {
    let mut values = vec![Value::Int(surfaces.len() as i32)];
    for surface in surfaces {
        values.extend(surface);
    }
    Tokens::new(values)
}

/// The image extension the loader appends on this platform.
pub fn tex(name: &str) -> String {
    format!("{}{}", name, portal_view::resources::platform_texture_extension())
}
