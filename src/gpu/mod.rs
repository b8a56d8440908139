//! GPU state: surface, shared frame uniforms and one pass per system.
//!
//! Everything is drawn in a single render pass. Opaque meshes go first and
//! write depth; the point clouds follow, depth-tested against the meshes but
//! never writing depth themselves, so overlapping sprites blend instead of
//! occluding one another.

mod camera;
mod instanced;
pub mod mesh;
mod points;

use std::sync::Arc;

use bytemuck::Zeroable;
use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use camera::Camera;
pub use instanced::{InstancedMesh, MeshPipeline};
pub use points::PointCloudPass;

use crate::composer::SceneComposer;
use crate::error::GpuError;
use crate::shader::{FrameUniforms, ShaderProgram};
use crate::systems::ParticleSystem;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Colour blending of a point pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Alpha,
    /// Colours add up; overlapping sprites glow.
    Additive,
}

impl BlendMode {
    pub fn blend_state(self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            },
        }
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    foliage: PointCloudPass,
    spirals: PointCloudPass,
    snow: PointCloudPass,
    mesh_pipeline: MeshPipeline,
    ornaments: Vec<InstancedMesh>,
    topper: InstancedMesh,
    clear_color: wgpu::Color,
}

impl GpuState {
    /// Open the surface and upload every system of `composer`.
    pub async fn new(
        window: Arc<Window>,
        composer: &SceneComposer,
        background: [f32; 3],
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        log::info!("surface format {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&FrameUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let foliage = PointCloudPass::new(
            &device,
            &frame_layout,
            surface_format,
            ShaderProgram::Foliage,
            BlendMode::Alpha,
            composer.foliage().label(),
            &composer.foliage().vertices(),
            &composer.foliage().uniforms(),
        );
        let spirals = PointCloudPass::new(
            &device,
            &frame_layout,
            surface_format,
            ShaderProgram::Spiral,
            BlendMode::Additive,
            composer.spirals().label(),
            &composer.spirals().vertices(),
            &composer.spirals().uniforms(),
        );
        let snow = PointCloudPass::new(
            &device,
            &frame_layout,
            surface_format,
            ShaderProgram::Snow,
            BlendMode::Additive,
            composer.snow().label(),
            &composer.snow().vertices(),
            &composer.snow().uniforms(),
        );

        let mesh_pipeline = MeshPipeline::new(&device, &frame_layout, surface_format, &composer.lights());
        let ornaments = composer
            .ornaments()
            .iter()
            .map(|system| {
                InstancedMesh::new(
                    &device,
                    system.label(),
                    &mesh::ornament_mesh(system.class()),
                    system.len(),
                )
            })
            .collect();
        let topper = InstancedMesh::new(&device, composer.topper().label(), &mesh::topper_mesh(), 1);

        let [r, g, b] = background;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            frame_buffer,
            frame_bind_group,
            foliage,
            spirals,
            snow,
            mesh_pipeline,
            ornaments,
            topper,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Upload the composer's current state and draw one frame.
    pub fn render(
        &mut self,
        composer: &SceneComposer,
        camera: &Camera,
        pixel_ratio: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = FrameUniforms::new(
            camera.view_matrix(),
            camera.projection(self.aspect()),
            camera.position(),
            composer.clock().elapsed(),
            Vec2::new(self.config.width as f32, self.config.height as f32),
            pixel_ratio,
        );
        self.queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        self.foliage.update(&self.queue, &composer.foliage().uniforms());
        self.spirals.update(&self.queue, &composer.spirals().uniforms());
        self.snow.update(&self.queue, &composer.snow().uniforms());
        self.mesh_pipeline.update_lights(&self.queue, &composer.lights());
        for (mesh, system) in self.ornaments.iter_mut().zip(composer.ornaments()) {
            mesh.update(&self.queue, system.instances());
        }
        self.topper
            .update(&self.queue, std::slice::from_ref(composer.topper().instance()));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            self.mesh_pipeline.bind(&mut render_pass);
            for mesh in &self.ornaments {
                mesh.draw(&mut render_pass);
            }
            self.topper.draw(&mut render_pass);

            self.foliage.draw(&mut render_pass);
            self.spirals.draw(&mut render_pass);
            self.snow.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
