//! Recorded draw calls and the resources needed to replay them.
//!
//! The scene draws through [`crate::gfx::GraphicsBackend`] outside of any
//! render pass. [`crate::gfx::wgpu_backend::WgpuBackend`] turns those calls
//! into a list of [`DrawCommand`]s, which are replayed once the frame's
//! `wgpu::RenderPass` exists.
//!
//! # Key types
//!
//! - [`DrawCommand`] is one indexed draw with the state it was issued under
//! - [`FrameResources`] holds the GPU objects a replay resolves handles against
//! - [`draw_frame`] opens the frame's render pass and replays into it

use crate::{
    gfx::{BufferHandle, ProgramHandle, TextureHandle, wgpu_backend::WgpuBackend},
    pipelines::area::AreaPipelines,
    resources::TextureManager,
};

/// One `draw_indexed` call with the bound program, texture and buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub program: ProgramHandle,
    pub texture: TextureHandle,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub index_count: u32,
}

/// Pipelines, texture bind groups and the camera bind group of a frame.
///
/// Bind group 0 is the surface texture, bind group 1 the camera.
pub struct FrameResources<'a> {
    pub pipelines: &'a AreaPipelines,
    pub textures: &'a TextureManager,
    pub camera_bind_group: &'a wgpu::BindGroup,
}

/// Clears `target` and `depth` and replays the backend's commands into them.
///
/// Returns the number of draws issued.
pub fn draw_frame(
    encoder: &mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    clear_colour: wgpu::Color,
    backend: &WgpuBackend,
    resources: &FrameResources<'_>,
) -> usize {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear_colour),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        ..Default::default()
    });
    backend.replay(&mut render_pass, resources)
}
