//! The interleaved vertex format of level geometry.

use std::mem;

use crate::gfx::{AttributeKind, VertexAttribute};

/// Position, texture coordinate and normal: eight floats, 32 bytes.
///
/// Uploaded as is, so the field order is the GPU layout.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const STRIDE: u32 = mem::size_of::<Vertex>() as u32;
    pub const POSITION_OFFSET: u32 = 0;
    pub const TEX_COORDS_OFFSET: u32 = mem::size_of::<[f32; 3]>() as u32;
    pub const NORMAL_OFFSET: u32 = mem::size_of::<[f32; 5]>() as u32;

    /// Attribute descriptions for the given shader locations, in
    /// position / texcoord / normal order.
    pub fn attributes(position: u32, tex_coords: u32, normal: u32) -> [VertexAttribute; 3] {
        let attribute = |location, components, offset| VertexAttribute {
            location,
            components,
            kind: AttributeKind::Float32,
            stride: Self::STRIDE,
            offset,
        };
        [
            attribute(position, 3, Self::POSITION_OFFSET),
            attribute(tex_coords, 2, Self::TEX_COORDS_OFFSET),
            attribute(normal, 3, Self::NORMAL_OFFSET),
        ]
    }

    /// The buffer layout the area pipelines are built with.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
