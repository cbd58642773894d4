/// wgpu rendering pipeline for the transcript.
/// Each visible glyph is one textured quad sampled from the glyph atlas;
/// the background is the clear color.

use crate::core::ViewLine;
use crate::error::TermError;
use crate::renderer::atlas::GlyphAtlas;
use crate::theme::Theme;
use std::sync::Arc;
use winit::window::Window;

/// Per-vertex data for a glyph quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphVertex {
    /// Clip-space position
    pub position: [f32; 2],
    /// UV coordinates into glyph atlas
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

impl GlyphVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x3,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Pixel-space layout shared by vertex building and the grid size.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

pub struct RenderState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    atlas_texture: wgpu::Texture,
    atlas_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    quad_capacity: usize,
}

impl RenderState {
    pub fn new(window: Arc<Window>, atlas: &GlyphAtlas) -> Result<Self, TermError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| TermError::Graphics("no suitable GPU adapter".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("replterm-device"),
                ..Default::default()
            },
            None,
        ))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| TermError::Graphics("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (pipeline, atlas_texture, atlas_bind_group) =
            create_pipeline(&device, atlas, format);

        let quad_capacity = 4096;
        let (vertex_buffer, index_buffer) = create_buffers(&device, quad_capacity);

        let mut state = Self {
            device,
            queue,
            surface,
            config,
            pipeline,
            atlas_texture,
            atlas_bind_group,
            vertex_buffer,
            index_buffer,
            quad_capacity,
        };
        state.upload_atlas(atlas);
        Ok(state)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn upload_atlas(&mut self, atlas: &GlyphAtlas) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.atlas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(atlas.atlas_width),
                rows_per_image: Some(atlas.atlas_height),
            },
            atlas_extent(atlas),
        );
    }

    fn ensure_capacity(&mut self, quads: usize) {
        if quads <= self.quad_capacity {
            return;
        }
        let capacity = quads.next_power_of_two();
        let (vertex_buffer, index_buffer) = create_buffers(&self.device, capacity);
        self.vertex_buffer = vertex_buffer;
        self.index_buffer = index_buffer;
        self.quad_capacity = capacity;
    }

    /// Draw one frame of `lines`. Surface hiccups skip the frame.
    pub fn draw(&mut self, lines: &[ViewLine], atlas: &mut GlyphAtlas, theme: &Theme, padding: f32) {
        let viewport = Viewport {
            width: self.config.width as f32,
            height: self.config.height as f32,
            padding,
        };
        let (vertices, indices) = build_vertices(lines, atlas, theme, viewport);

        if atlas.dirty {
            self.upload_atlas(atlas);
            atlas.dirty = false;
        }

        self.ensure_capacity(vertices.len() / 4);
        if !vertices.is_empty() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            self.queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {}", e);
                return;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("transcript-encoder"),
        });

        {
            let [r, g, b] = theme.bg.to_f32();
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("transcript-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !indices.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.atlas_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Build glyph quads for `lines`, top row first. Spaces and empty glyphs
/// produce nothing.
pub fn build_vertices(
    lines: &[ViewLine],
    atlas: &mut GlyphAtlas,
    theme: &Theme,
    viewport: Viewport,
) -> (Vec<GlyphVertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let cw = atlas.cell_width;
    let ch = atlas.cell_height;
    let atlas_w = atlas.atlas_width as f32;
    let atlas_h = atlas.atlas_height as f32;

    let to_ndc = |x: f32, y: f32| -> [f32; 2] {
        [(x / viewport.width) * 2.0 - 1.0, 1.0 - (y / viewport.height) * 2.0]
    };

    for (row, line) in lines.iter().enumerate() {
        let color = theme.color_for(line.kind).to_f32();
        let baseline = viewport.padding + row as f32 * ch + atlas.ascent;

        for (col, c) in line.text.chars().enumerate() {
            if c == ' ' {
                continue;
            }
            let glyph = atlas.get_glyph(c);
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }

            let x0 = viewport.padding + col as f32 * cw + glyph.offset_x;
            let y0 = baseline - glyph.offset_y - glyph.height as f32;
            let x1 = x0 + glyph.width as f32;
            let y1 = y0 + glyph.height as f32;

            let u0 = glyph.x as f32 / atlas_w;
            let v0 = glyph.y as f32 / atlas_h;
            let u1 = (glyph.x + glyph.width) as f32 / atlas_w;
            let v1 = (glyph.y + glyph.height) as f32 / atlas_h;

            let base = vertices.len() as u32;
            vertices.extend_from_slice(&[
                GlyphVertex { position: to_ndc(x0, y0), uv: [u0, v0], color },
                GlyphVertex { position: to_ndc(x1, y0), uv: [u1, v0], color },
                GlyphVertex { position: to_ndc(x1, y1), uv: [u1, v1], color },
                GlyphVertex { position: to_ndc(x0, y1), uv: [u0, v1], color },
            ]);
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    (vertices, indices)
}

fn atlas_extent(atlas: &GlyphAtlas) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: atlas.atlas_width,
        height: atlas.atlas_height,
        depth_or_array_layers: 1,
    }
}

fn create_buffers(device: &wgpu::Device, quads: usize) -> (wgpu::Buffer, wgpu::Buffer) {
    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("glyph-vertices"),
        size: (quads * 4 * std::mem::size_of::<GlyphVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("glyph-indices"),
        size: (quads * 6 * std::mem::size_of::<u32>()) as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    (vertex_buffer, index_buffer)
}

fn create_pipeline(
    device: &wgpu::Device,
    atlas: &GlyphAtlas,
    target_format: wgpu::TextureFormat,
) -> (wgpu::RenderPipeline, wgpu::Texture, wgpu::BindGroup) {
    let atlas_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("glyph-atlas"),
        size: atlas_extent(atlas),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let atlas_view = atlas_texture.create_view(&wgpu::TextureViewDescriptor::default());
    let atlas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("atlas-bind-group-layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
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
    });

    let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("atlas-bind-group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&atlas_view) },
            wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&atlas_sampler) },
        ],
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glyph-shader"),
        source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("glyph-pipeline-layout"),
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("glyph-pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[GlyphVertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    (pipeline, atlas_texture, atlas_bind_group)
}

const SHADER_SRC: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    out.color = in.color;
    return out;
}

@group(0) @binding(0) var atlas_texture: texture_2d<f32>;
@group(0) @binding(1) var atlas_sampler: sampler;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let coverage = textureSample(atlas_texture, atlas_sampler, in.uv).r;
    return vec4<f32>(in.color, coverage);
}
"#;
