#[cfg(feature = "integration-tests")]
async fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::default();
    let adapter = match instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
    {
        Ok(adapter) => adapter,
        Err(e) => {
            eprintln!("No adapter, skipping: {e}");
            return None;
        }
    };
    adapter
        .request_device(&wgpu::DeviceDescriptor::default())
        .await
        .ok()
}

#[tokio::test]
#[cfg(feature = "integration-tests")]
async fn should_draw_stock_level_offscreen() {
    use portal_view::{
        camera::{Camera, CameraUniform, Projection},
        config::ViewerConfig,
        data_structures::{
            scene::{Scene, Traversal},
            texture::Texture,
        },
        gfx::wgpu_backend::WgpuBackend,
        pipelines::area::{AreaPipelines, mk_camera_bind_group_layout},
        render::{FrameResources, draw_frame},
        resources::TextureManager,
    };
    use wgpu::util::DeviceExt;

    let Some((device, queue)) = headless_device().await else {
        return;
    };
    let config = ViewerConfig::default().with_traversal(Traversal::PortalFlood);
    let format = wgpu::TextureFormat::Rgba8UnormSrgb;
    let size = [64, 48];

    let mut backend = WgpuBackend::new(&device);
    let mut textures = TextureManager::new(&device, &queue);
    let camera_layout = mk_camera_bind_group_layout(&device);
    let pipelines = AreaPipelines::new(&device, format, textures.layout(), &camera_layout);

    let mut scene = Scene::load(&config.level, &mut textures, &mut backend)
        .await
        .unwrap()
        .with_traversal(config.traversal);
    scene.bind_program(&pipelines.fill_program(), &mut backend);
    assert_eq!(textures.len(), 2);

    let camera = Camera::look_at(config.eye, config.at, config.up);
    let projection = Projection::new(
        size[0],
        size[1],
        cgmath::Rad(config.fovy),
        config.znear,
        config.zfar,
    );
    let mut uniform = CameraUniform::new();
    uniform.update(&camera, &projection);
    let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Camera Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &camera_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: camera_buffer.as_entire_binding(),
        }],
        label: Some("camera_bind_group"),
    });

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: size[0],
            height: size[1],
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let depth = Texture::create_depth_texture(&device, size, "depth_texture");

    backend.begin_frame();
    scene.begin_frame();
    assert_eq!(scene.render(config.eye, &mut backend), 2);
    // two areas with a floor and a wall surface each
    assert_eq!(backend.commands().len(), 4);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Render Encoder"),
    });
    let resources = FrameResources {
        pipelines: &pipelines,
        textures: &textures,
        camera_bind_group: &camera_bind_group,
    };
    let draws = draw_frame(
        &mut encoder,
        &target_view,
        &depth.view,
        config.clear_colour,
        &backend,
        &resources,
    );
    queue.submit(std::iter::once(encoder.finish()));
    assert_eq!(draws, 4);

    scene.release(&mut backend);
    assert!(scene.areas().iter().all(|area| area.is_released()));
}
