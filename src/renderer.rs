use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use glam::{Mat3, Vec3};
use log::{info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::frame::{FramePlan, SceneRenderer, ViewFrame};
use crate::math::transform::OPENGL_TO_WGPU;
use crate::mesh::Vertex;
use crate::scene::MeshId;
use crate::ui::ButtonView;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MAX_VIEWS: usize = 2;
const HUD_FONT_SIZE: f32 = 18.0;

/// Per-viewport camera and lighting, laid out for WGSL uniform rules
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_direction: [f32; 4],
    light_ambient: [f32; 4],
    light_diffuse: [f32; 4],
    point_positions: [[f32; 4]; 3],
    point_ambient: [[f32; 4]; 3],
    point_diffuse: [[f32; 4]; 3],
}

impl ViewUniform {
    fn from_view(view: &ViewFrame) -> Self {
        let lighting = &view.lighting;
        Self {
            view_proj: (OPENGL_TO_WGPU * view.projection).to_cols_array_2d(),
            eye: view.eye.extend(1.0).to_array(),
            light_direction: lighting.direction.extend(0.0).to_array(),
            light_ambient: lighting.ambient.extend(0.0).to_array(),
            light_diffuse: lighting.diffuse.extend(0.0).to_array(),
            point_positions: lighting.point_lights.map(|l| l.position.extend(1.0).to_array()),
            point_ambient: lighting.point_lights.map(|l| l.ambient.extend(0.0).to_array()),
            point_diffuse: lighting.point_lights.map(|l| l.diffuse.extend(0.0).to_array()),
        }
    }
}

/// Model and normal matrices; mat3x3 columns are padded to vec4
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
}

impl ModelUniform {
    fn new(model: glam::Mat4, normal: Mat3) -> Self {
        let column = |c: Vec3| c.extend(0.0).to_array();
        Self {
            model: model.to_cols_array_2d(),
            normal: [column(normal.x_axis), column(normal.y_axis), column(normal.z_axis)],
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        size: usize,
        label: &str,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

/// Frame timings shown in the overlay
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub fps: f32,
    pub frame_ms: f32,
}

/// Forward renderer for frame plans, with an egui overlay for the HUD
pub struct Renderer {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    model_layout: wgpu::BindGroupLayout,
    view_slots: Vec<UniformSlot>,
    model_slots: Vec<UniformSlot>,
    meshes: HashMap<MeshId, GpuMesh>,
    clear_color: wgpu::Color,
    show_overlay: bool,
    stats: FrameStats,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        clear_color: [f32; 3],
        show_overlay: bool,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size)?;
        surface.configure(&device, &surface_config);
        info!(
            "GPU adapter: {} ({:?}), surface format {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_config.format
        );

        let depth_view = Self::create_depth_view(&device, &surface_config);
        let view_layout =
            Self::uniform_layout(&device, "View Layout", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let model_layout =
            Self::uniform_layout(&device, "Model Layout", wgpu::ShaderStages::VERTEX);
        let pipeline =
            Self::create_pipeline(&device, &view_layout, &model_layout, surface_config.format);

        let view_size = std::mem::size_of::<ViewUniform>();
        let view_slots = (0..MAX_VIEWS)
            .map(|_| UniformSlot::new(&device, &view_layout, view_size, "View Uniform"))
            .collect();

        let meshes = MeshId::ALL
            .iter()
            .map(|&id| (id, Self::upload_mesh(&device, id)))
            .collect();

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let [r, g, b] = clear_color.map(f64::from);

        Ok(Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            pipeline,
            model_layout,
            view_slots,
            model_slots: Vec::new(),
            meshes,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            show_overlay,
            stats: FrameStats::default(),
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find appropriate adapter")
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface is incompatible with the adapter"))?;

        Ok(wgpu::SurfaceConfiguration {
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
        })
    }

    fn create_depth_view(
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

    fn uniform_layout(
        device: &wgpu::Device,
        label: &str,
        visibility: wgpu::ShaderStages,
    ) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        view_layout: &wgpu::BindGroupLayout,
        model_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[view_layout, model_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn upload_mesh(device: &wgpu::Device, id: MeshId) -> GpuMesh {
        let vertices = id.build().vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertices", id)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        info!("Uploaded {:?} mesh: {} triangles", id, vertices.len() / 3);
        GpuMesh {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = Self::create_depth_view(&self.device, &self.surface_config);
    }

    pub fn set_stats(&mut self, stats: FrameStats) {
        self.stats = stats;
    }

    /// Forward a window event to egui; returns true if egui consumed it.
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(&self.window, event).consumed
    }

    fn write_uniforms(&mut self, plan: &FramePlan) {
        while self.model_slots.len() < plan.drawables.len() {
            self.model_slots.push(UniformSlot::new(
                &self.device,
                &self.model_layout,
                std::mem::size_of::<ModelUniform>(),
                "Model Uniform",
            ));
        }

        for (slot, view) in self.view_slots.iter().zip(&plan.views) {
            self.queue
                .write_buffer(
                    &slot.buffer,
                    0,
                    bytemuck::cast_slice(&[ViewUniform::from_view(view)]),
                );
        }
        for (slot, drawable) in self.model_slots.iter().zip(&plan.drawables) {
            let uniform = ModelUniform::new(drawable.model, drawable.normal);
            self.queue.write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    fn paint_hud(ctx: &egui::Context, buttons: &[ButtonView], fb_height: f32, stats: FrameStats) {
        let ppp = ctx.pixels_per_point();
        let layer = egui::LayerId::new(egui::Order::Foreground, egui::Id::new("hud"));
        let painter = ctx.layer_painter(layer);

        for button in buttons {
            // Bottom-left pixel origin to top-left points
            let rect = egui::Rect::from_min_max(
                egui::pos2(button.rect.min.x / ppp, (fb_height - button.rect.max.y) / ppp),
                egui::pos2(button.rect.max.x / ppp, (fb_height - button.rect.min.y) / ppp),
            );
            painter.rect_filled(rect, 0.0, to_color32(button.fill));
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(button.border_width / ppp, to_color32(button.border_color)),
                egui::StrokeKind::Outside,
            );
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &button.caption,
                egui::FontId::proportional(HUD_FONT_SIZE),
                egui::Color32::WHITE,
            );
        }

        egui::Area::new(egui::Id::new("frame_stats"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("{:.0} FPS", stats.fps))
                        .size(16.0)
                        .color(egui::Color32::from_rgb(74, 158, 255)),
                );
                ui.label(
                    egui::RichText::new(format!("{:.2} ms", stats.frame_ms))
                        .size(12.0)
                        .color(egui::Color32::GRAY),
                );
            });
    }

    fn render_overlay(
        &mut self,
        plan: &FramePlan,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let fb_height = plan.framebuffer.1 as f32;
        let stats = self.stats;
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| Self::paint_hud(ctx, &plan.hud, fb_height, stats));

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };
        self.egui_renderer
            .update_buffers(&self.device, &self.queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("HUD Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

impl SceneRenderer for Renderer {
    fn render(&mut self, plan: &FramePlan) -> Result<()> {
        let (width, height) = plan.framebuffer;
        if (width, height) != (self.surface_config.width, self.surface_config.height) {
            self.resize(width, height);
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(anyhow!(e).context("Failed to acquire surface texture")),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.write_uniforms(plan);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
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
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline);

            for (view_frame, view_slot) in plan.views.iter().zip(&self.view_slots) {
                let vp = view_frame.viewport;
                render_pass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
                render_pass.set_bind_group(0, &view_slot.bind_group, &[]);

                for (drawable, model_slot) in plan.drawables.iter().zip(&self.model_slots) {
                    let Some(mesh) = self.meshes.get(&drawable.mesh) else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &model_slot.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    render_pass.draw(0..mesh.vertex_count, 0..1);
                }
            }
        }

        if self.show_overlay {
            self.render_overlay(plan, &mut encoder, &view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn to_color32(color: glam::Vec4) -> egui::Color32 {
    egui::Rgba::from_rgba_unmultiplied(color.x, color.y, color.z, color.w).into()
}
