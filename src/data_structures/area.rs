//! Areas, their surfaces and the portals between them.
//!
//! An area owns its surfaces and the GPU buffers behind them. Portals only
//! name the neighbour by [`AreaId`]; the areas themselves live in the
//! [`crate::data_structures::scene::Scene`] arena, so cyclic portal graphs need
//! no shared ownership.

use crate::{
    data_structures::vertex::Vertex,
    error::{Result, ViewerError},
    gfx::{BufferHandle, GraphicsBackend, ProgramHandle, ShaderProgram, TextureHandle},
    math::Vector3,
    proc::TokenStream,
    resources::{TextureProvider, platform_texture_extension},
};

/// Index of an area in the scene arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AreaId(pub usize);

/// Frame token. An area is "rendered" iff it was drawn in the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frame(pub u64);

impl Frame {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// One texture-grouped batch of indexed triangles.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub texture: TextureHandle,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub num_verts: u32,
    pub num_indexes: u32,
}

impl Surface {
    fn release(&mut self, gfx: &mut dyn GraphicsBackend) {
        for buffer in [&mut self.vertex_buffer, &mut self.index_buffer] {
            if buffer.is_allocated() {
                gfx.delete_buffer(*buffer);
                *buffer = BufferHandle::UNALLOCATED;
            }
        }
    }

    fn is_allocated(&self) -> bool {
        self.vertex_buffer.is_allocated() || self.index_buffer.is_allocated()
    }
}

/// A one-way opening from the owning area into `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    pub target: AreaId,
    pub winding: Vec<Vector3>,
}

impl Portal {
    pub fn new(target: AreaId, winding: Vec<Vector3>) -> Self {
        Self { target, winding }
    }

    /// Average of the winding points.
    pub fn center(&self) -> Vector3 {
        if self.winding.is_empty() {
            return Vector3::ZERO;
        }
        let sum = self
            .winding
            .iter()
            .fold(Vector3::ZERO, |acc, point| acc + *point);
        sum * (1.0 / self.winding.len() as f32)
    }
}

/// Shader input locations an area draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramBinding {
    pub program: ProgramHandle,
    pub position: u32,
    pub tex_coords: u32,
    pub normal: u32,
    pub sampler: u32,
}

impl Default for ProgramBinding {
    fn default() -> Self {
        Self {
            program: ProgramHandle::default(),
            position: 0,
            tex_coords: 1,
            normal: 2,
            sampler: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct ModelArea {
    name: String,
    surfaces: Vec<Surface>,
    portals: Vec<Portal>,
    binding: ProgramBinding,
    last_rendered: Option<Frame>,
}

impl ModelArea {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surfaces: Vec::new(),
            portals: Vec::new(),
            binding: ProgramBinding::default(),
            last_rendered: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn binding(&self) -> ProgramBinding {
        self.binding
    }

    /// Reads the area's surfaces and uploads them.
    ///
    /// Expects `numSurfaces`, then per surface: texture name, vertex count,
    /// index count, the vertices (`x y z s t nx ny nz`) and the indices.
    /// Every buffer this call created is released again if it fails.
    pub fn load(
        &mut self,
        tokens: &mut impl TokenStream,
        textures: &mut dyn TextureProvider,
        gfx: &mut dyn GraphicsBackend,
    ) -> Result<()> {
        if self.surfaces.iter().any(Surface::is_allocated) {
            log::warn!(
                "Area {} is loaded again without being released first.",
                self.name
            );
        }
        let first_new = self.surfaces.len();
        let loaded = self.load_surfaces(tokens, textures, gfx);
        if loaded.is_err() {
            for surface in &mut self.surfaces[first_new..] {
                surface.release(gfx);
            }
            self.surfaces.truncate(first_new);
        }
        loaded
    }

    fn load_surfaces(
        &mut self,
        tokens: &mut impl TokenStream,
        textures: &mut dyn TextureProvider,
        gfx: &mut dyn GraphicsBackend,
    ) -> Result<()> {
        let num_surfaces = tokens.next_count("surface count")?;
        log::debug!("Loading {} surfaces for area {}", num_surfaces, self.name);

        for _ in 0..num_surfaces {
            let texture_name = tokens.next_string()? + platform_texture_extension();
            let texture = textures.resolve(&texture_name)?;

            let num_verts = tokens.next_count("vertex count")?;
            let num_indexes = tokens.next_count("index count")?;

            let mut vertices = Vec::new();
            for _ in 0..num_verts {
                let mut v = [0.0f32; 8];
                for component in &mut v {
                    *component = tokens.next_float()?;
                }
                vertices.push(Vertex {
                    position: [v[0], v[1], v[2]],
                    tex_coords: [v[3], v[4]],
                    normal: [v[5], v[6], v[7]],
                });
            }

            let mut indexes = Vec::new();
            for _ in 0..num_indexes {
                let index = tokens.next_int()?;
                match u32::try_from(index) {
                    Ok(index) if (index as usize) < num_verts => indexes.push(index),
                    _ => {
                        return Err(ViewerError::malformed(format!(
                            "index {index} out of range for {num_verts} vertices in area {}",
                            self.name
                        )));
                    }
                }
            }
            if num_indexes % 3 != 0 {
                log::warn!(
                    "Surface with {} in area {} has {} indexes, not a triangle list.",
                    texture_name,
                    self.name,
                    num_indexes
                );
            }

            let vertex_buffer =
                gfx.create_vertex_buffer(&format!("{} Vertex Buffer", self.name), &vertices);
            let index_buffer =
                gfx.create_index_buffer(&format!("{} Index Buffer", self.name), &indexes);

            self.surfaces.push(Surface {
                texture,
                vertex_buffer,
                index_buffer,
                num_verts: num_verts as u32,
                num_indexes: num_indexes as u32,
            });
        }
        Ok(())
    }

    /// Resolves the attribute and sampler locations of `program` and makes it current.
    pub fn bind_program(&mut self, program: &ShaderProgram, gfx: &mut dyn GraphicsBackend) {
        let fallback = ProgramBinding::default();
        let locate = |name: &str, default: u32, attribute: bool| {
            let location = if attribute {
                program.attribute_location(name)
            } else {
                program.uniform_location(name)
            };
            location.unwrap_or_else(|| {
                log::warn!(
                    "Program {:?} has no `{}`, using location {}.",
                    program.handle,
                    name,
                    default
                );
                default
            })
        };
        self.binding = ProgramBinding {
            program: program.handle,
            position: locate("vertexPosition", fallback.position, true),
            tex_coords: locate("vertexTexCoord", fallback.tex_coords, true),
            normal: locate("vertexNormal", fallback.normal, true),
            sampler: locate("texture", fallback.sampler, false),
        };

        gfx.use_program(self.binding.program);
        gfx.set_sampler_unit(self.binding.sampler, 0);
    }

    pub fn is_rendered(&self, frame: Frame) -> bool {
        self.last_rendered == Some(frame)
    }

    /// Draws every surface unless the area was already drawn in `frame`.
    ///
    /// Returns whether anything was drawn.
    pub fn render(&mut self, frame: Frame, gfx: &mut dyn GraphicsBackend) -> bool {
        gfx.use_program(self.binding.program);

        if self.is_rendered(frame) {
            return false;
        }

        let attributes = Vertex::attributes(
            self.binding.position,
            self.binding.tex_coords,
            self.binding.normal,
        );
        for surface in &self.surfaces {
            gfx.bind_texture(0, surface.texture);

            gfx.bind_vertex_buffer(surface.vertex_buffer);
            for attribute in attributes {
                gfx.vertex_attribute(attribute);
            }

            gfx.bind_index_buffer(surface.index_buffer);

            gfx.draw_indexed(surface.num_indexes);
        }

        self.last_rendered = Some(frame);
        true
    }

    pub fn reset(&mut self) {
        self.last_rendered = None;
    }

    pub fn add_portal(&mut self, portal: Portal) {
        self.portals.push(portal);
    }

    /// Deletes all GPU buffers. Safe to call more than once.
    pub fn release(&mut self, gfx: &mut dyn GraphicsBackend) {
        for surface in &mut self.surfaces {
            surface.release(gfx);
        }
    }

    pub fn is_released(&self) -> bool {
        !self.surfaces.iter().any(Surface::is_allocated)
    }
}

impl Drop for ModelArea {
    fn drop(&mut self) {
        if !self.is_released() {
            log::warn!(
                "Area {} dropped while still holding GPU buffers; call release first.",
                self.name
            );
        }
    }
}
