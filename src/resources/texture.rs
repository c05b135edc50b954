use std::collections::HashMap;

use crate::{
    data_structures::texture::Texture,
    error::{Result, ViewerError},
    gfx::TextureHandle,
    resources::read_binary,
};

/// Turns texture names from the level into GPU texture handles.
pub trait TextureProvider {
    /// `name` already carries the image extension.
    fn resolve(&mut self, name: &str) -> Result<TextureHandle>;
}

/// Image extension appended to the texture names found in a level.
pub fn platform_texture_extension() -> &'static str {
    if cfg!(target_os = "linux") { ".png" } else { ".dds" }
}

/// Bind group layout of a surface texture: the texture at binding 0, its sampler at 1.
pub fn surface_texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Surface texture_bind_group_layout"),
    })
}

struct LoadedTexture {
    #[allow(dead_code)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Loads each texture once and hands out stable handles.
///
/// Handle `n` refers to the `n`th loaded texture (starting at 1). Textures
/// live as long as the manager.
pub struct TextureManager {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    textures: Vec<LoadedTexture>,
    by_name: HashMap<String, TextureHandle>,
}

impl TextureManager {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            layout: surface_texture_layout(device),
            device: device.clone(),
            queue: queue.clone(),
            textures: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self, handle: TextureHandle) -> Option<&wgpu::BindGroup> {
        let index = (handle.0 as usize).checked_sub(1)?;
        self.textures.get(index).map(|loaded| &loaded.bind_group)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn load(&self, name: &str) -> anyhow::Result<LoadedTexture> {
        let data = read_binary(name)?;
        let format = std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str());
        let texture = Texture::from_bytes(&self.device, &self.queue, &data, name, format)?;
        let sampler = match &texture.sampler {
            Some(sampler) => sampler,
            None => anyhow::bail!("texture {name} has no sampler"),
        };
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(name),
        });
        Ok(LoadedTexture {
            texture,
            bind_group,
        })
    }
}

impl TextureProvider for TextureManager {
    fn resolve(&mut self, name: &str) -> Result<TextureHandle> {
        if let Some(handle) = self.by_name.get(name) {
            return Ok(*handle);
        }
        let loaded = self.load(name).map_err(|e| {
            log::error!("Texture {} could not be loaded: {:#}", name, e);
            ViewerError::resolution(name, format!("{e:#}"))
        })?;
        self.textures.push(loaded);
        let handle = TextureHandle(self.textures.len() as u32);
        self.by_name.insert(name.to_string(), handle);
        log::debug!("Loaded texture {} as {:?}", name, handle);
        Ok(handle)
    }
}
