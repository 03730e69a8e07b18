//! WebGPU render pipeline setup

use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use super::vertex::Vertex;
use crate::consts::{CAMERA_RADIUS, ORBIT_SPEED_HOLDING, ORBIT_SPEED_IDLE};

/// Particle quad half-size in NDC at camera distance 1
const POINT_SIZE: f32 = 0.012;
/// Particle opacity (additive-looking alpha blend)
const POINT_ALPHA: f32 = 0.8;

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Camera orbit angle, advanced each frame
    orbit_angle: f32,
    /// Scratch vertex data, rebuilt each frame
    vertices: Vec<Vertex>,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("reactor-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            size: (width, height),
            orbit_angle: 0.0,
            vertices: Vec::new(),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Project the particle buffers and draw them.
    ///
    /// `holding` speeds up the camera orbit, matching the faster spin the
    /// site shows while stabilizing.
    pub fn render(
        &mut self,
        positions: &[f32],
        colors: &[f32],
        holding: bool,
        reduced_motion: bool,
    ) -> Result<(), wgpu::SurfaceError> {
        let speed = if holding && !reduced_motion {
            ORBIT_SPEED_HOLDING
        } else {
            ORBIT_SPEED_IDLE
        };
        self.orbit_angle += speed;

        self.build_vertices(positions, colors);

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let vertex_count = self.vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                render_pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Project every particle into an NDC quad (two triangles), with size
    /// attenuated by camera distance.
    fn build_vertices(&mut self, positions: &[f32], colors: &[f32]) {
        let (w, h) = self.size;
        let aspect = w as f32 / h.max(1) as f32;

        let eye = Vec3::new(
            self.orbit_angle.sin() * CAMERA_RADIUS,
            0.0,
            self.orbit_angle.cos() * CAMERA_RADIUS,
        );
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(75f32.to_radians(), aspect, 0.1, 1000.0);
        let view_proj = proj * view;

        self.vertices.clear();
        let count = positions.len() / 3;
        for i in 0..count {
            let base = i * 3;
            let world = Vec4::new(
                positions[base],
                positions[base + 1],
                positions[base + 2],
                1.0,
            );
            let clip = view_proj * world;
            if clip.w <= 0.1 {
                continue; // Behind the camera
            }
            let ndc_x = clip.x / clip.w;
            let ndc_y = clip.y / clip.w;
            if ndc_x.abs() > 1.2 || ndc_y.abs() > 1.2 {
                continue;
            }

            let color = [
                colors[base],
                colors[base + 1],
                colors[base + 2],
                POINT_ALPHA,
            ];

            // Size shrinks with distance; x compensated for aspect
            let half_y = (POINT_SIZE * CAMERA_RADIUS / clip.w).min(0.05);
            let half_x = half_y / aspect;

            let x0 = ndc_x - half_x;
            let x1 = ndc_x + half_x;
            let y0 = ndc_y - half_y;
            let y1 = ndc_y + half_y;

            self.vertices.extend_from_slice(&[
                Vertex::new(x0, y0, color),
                Vertex::new(x1, y0, color),
                Vertex::new(x1, y1, color),
                Vertex::new(x0, y0, color),
                Vertex::new(x1, y1, color),
                Vertex::new(x0, y1, color),
            ]);
        }
    }
}
