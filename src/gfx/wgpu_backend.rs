//! [`GraphicsBackend`] on top of wgpu.
//!
//! Buffers live in a slot arena; handle `n` is slot `n - 1` and freed slots
//! are reused. Bind and draw calls update a small "currently bound" state and
//! every draw snapshots it into a [`DrawCommand`].

use wgpu::util::DeviceExt;

use crate::{
    data_structures::vertex::Vertex,
    gfx::{BufferHandle, GraphicsBackend, ProgramHandle, TextureHandle, VertexAttribute},
    render::{DrawCommand, FrameResources},
};

#[derive(Clone, Copy, Debug, Default)]
struct Bound {
    program: ProgramHandle,
    texture: TextureHandle,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
}

pub struct WgpuBackend {
    device: wgpu::Device,
    buffers: Vec<Option<wgpu::Buffer>>,
    free: Vec<usize>,
    bound: Bound,
    commands: Vec<DrawCommand>,
    layout_warned: bool,
}

impl WgpuBackend {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            device: device.clone(),
            buffers: Vec::new(),
            free: Vec::new(),
            bound: Bound::default(),
            commands: Vec::new(),
            layout_warned: false,
        }
    }

    /// Drops the commands recorded for the previous frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        let index = (handle.0 as usize).checked_sub(1)?;
        self.buffers.get(index)?.as_ref()
    }

    fn insert(&mut self, buffer: wgpu::Buffer) -> BufferHandle {
        let index = match self.free.pop() {
            Some(index) => {
                self.buffers[index] = Some(buffer);
                index
            }
            None => {
                self.buffers.push(Some(buffer));
                self.buffers.len() - 1
            }
        };
        BufferHandle(index as u32 + 1)
    }

    fn create_buffer(&mut self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> BufferHandle {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            });
        self.insert(buffer)
    }

    /// Issues the recorded commands into `render_pass`. Returns how many draws were issued.
    pub fn replay(&self, render_pass: &mut wgpu::RenderPass<'_>, resources: &FrameResources<'_>) -> usize {
        let mut current_program = None;
        let mut issued = 0;
        for command in &self.commands {
            let Some(pipeline) = resources.pipelines.pipeline(command.program) else {
                log::warn!("No pipeline for {:?}, skipping draw", command.program);
                continue;
            };
            let Some(texture) = resources.textures.bind_group(command.texture) else {
                log::warn!("No texture bound for draw ({:?}), skipping", command.texture);
                continue;
            };
            let (Some(vertices), Some(indices)) = (
                self.buffer(command.vertex_buffer),
                self.buffer(command.index_buffer),
            ) else {
                log::warn!("Draw references a deleted buffer, skipping");
                continue;
            };

            if current_program != Some(command.program) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, resources.camera_bind_group, &[]);
                current_program = Some(command.program);
            }
            render_pass.set_bind_group(0, texture, &[]);
            render_pass.set_vertex_buffer(0, vertices.slice(..));
            render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..command.index_count, 0, 0..1);
            issued += 1;
        }
        issued
    }
}

impl GraphicsBackend for WgpuBackend {
    fn create_vertex_buffer(&mut self, label: &str, vertices: &[Vertex]) -> BufferHandle {
        self.create_buffer(label, bytemuck::cast_slice(vertices), wgpu::BufferUsages::VERTEX)
    }

    fn create_index_buffer(&mut self, label: &str, indices: &[u32]) -> BufferHandle {
        self.create_buffer(label, bytemuck::cast_slice(indices), wgpu::BufferUsages::INDEX)
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if !buffer.is_allocated() {
            return;
        }
        let index = buffer.0 as usize - 1;
        match self.buffers.get_mut(index).and_then(Option::take) {
            Some(released) => {
                released.destroy();
                self.free.push(index);
            }
            None => log::warn!("{:?} deleted twice", buffer),
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.bound.program = program;
    }

    fn set_sampler_unit(&mut self, location: u32, unit: u32) {
        // Texture and sampler always sit in bind group 0.
        if location != 0 || unit != 0 {
            log::warn!("Sampler at location {} on unit {} is not supported", location, unit);
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if unit != 0 {
            log::warn!("Only texture unit 0 is supported, got {}", unit);
            return;
        }
        self.bound.texture = texture;
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) {
        self.bound.vertex_buffer = buffer;
    }

    fn vertex_attribute(&mut self, attribute: VertexAttribute) {
        let expected = Vertex::attributes(0, 1, 2);
        if !expected.contains(&attribute) && !self.layout_warned {
            log::warn!(
                "{:?} does not match the pipeline vertex layout {:?}",
                attribute,
                expected
            );
            self.layout_warned = true;
        }
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) {
        self.bound.index_buffer = buffer;
    }

    fn draw_indexed(&mut self, index_count: u32) {
        if index_count == 0 {
            return;
        }
        if !self.bound.vertex_buffer.is_allocated() || !self.bound.index_buffer.is_allocated() {
            log::warn!("draw_indexed without bound buffers");
            return;
        }
        self.commands.push(DrawCommand {
            program: self.bound.program,
            texture: self.bound.texture,
            vertex_buffer: self.bound.vertex_buffer,
            index_buffer: self.bound.index_buffer,
            index_count,
        });
    }
}
