use crate::{
    data_structures::vertex::Vertex,
    gfx::{ProgramHandle, ShaderProgram},
    pipelines::mk_render_pipeline,
};

/// The filled, textured area program.
pub const FILL_PROGRAM: ProgramHandle = ProgramHandle(1);
/// Same shading, rasterized as lines.
pub const WIREFRAME_PROGRAM: ProgramHandle = ProgramHandle(2);

/// Inputs of `area.wgsl` by the names areas look them up with.
pub fn area_program(handle: ProgramHandle) -> ShaderProgram {
    ShaderProgram::new(handle)
        .with_attribute("vertexPosition", 0)
        .with_attribute("vertexTexCoord", 1)
        .with_attribute("vertexNormal", 2)
        .with_uniform("texture", 0)
}

pub fn mk_camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    })
}

pub struct AreaPipelines {
    fill: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
}

impl AreaPipelines {
    /// The wireframe pipeline only exists when the device has `POLYGON_MODE_LINE`.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Area Pipeline Layout"),
            bind_group_layouts: &[texture_bind_group_layout, camera_bind_group_layout],
            immediate_size: 0,
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Area Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("area.wgsl").into()),
        });

        let fill = mk_render_pipeline(
            device,
            &layout,
            color_format,
            wgpu::PolygonMode::Fill,
            &[Vertex::desc()],
            &shader,
            "Area Fill Pipeline",
        );
        let wireframe = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(mk_render_pipeline(
                device,
                &layout,
                color_format,
                wgpu::PolygonMode::Line,
                &[Vertex::desc()],
                &shader,
                "Area Wireframe Pipeline",
            ))
        } else {
            log::info!("POLYGON_MODE_LINE not available, wireframe disabled");
            None
        };

        Self { fill, wireframe }
    }

    pub fn fill_program(&self) -> ShaderProgram {
        area_program(FILL_PROGRAM)
    }

    pub fn wireframe_program(&self) -> Option<ShaderProgram> {
        self.wireframe.as_ref().map(|_| area_program(WIREFRAME_PROGRAM))
    }

    pub fn pipeline(&self, program: ProgramHandle) -> Option<&wgpu::RenderPipeline> {
        match program {
            FILL_PROGRAM => Some(&self.fill),
            WIREFRAME_PROGRAM => self.wireframe.as_ref(),
            _ => None,
        }
    }
}
