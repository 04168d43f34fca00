//! Converts `core::render_pipeline::FrameBatches` into wgpu draw calls.
//!
//! Reuses the existing, `Grid`-independent pieces of this module
//! (`pipeline`'s shaders/layouts, `instance_writer`'s byte packing) rather
//! than re-deriving the instanced-quad plumbing: those two pieces never
//! depended on the donor's own `Tab`/`Grid` types in the first place.

use crate::core::atlas::GlyphAtlas;
use crate::core::render_pipeline::{CellInstance, FrameBatches};

use super::instance_writer::{reuse_or_create_buffer, InstanceWriter};
use super::pipeline;
use super::state::GpuState;

fn color_to_f32(c: crate::core::render_pipeline::Rgba) -> [f32; 4] {
    [c.0, c.1, c.2, c.3]
}

/// Owns the two atlas textures (grayscale glyphs/sprites, color emoji),
/// the uniform buffer, and the bg/fg pipelines, all built once per window.
pub struct CoreRenderer {
    bg_pipeline: wgpu::RenderPipeline,
    fg_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    atlas_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    gray_texture: wgpu::Texture,
    gray_bind_group: wgpu::BindGroup,
    gray_modified: u64,
    color_texture: wgpu::Texture,
    color_bind_group: wgpu::BindGroup,
    color_modified: u64,
    render_format: wgpu::TextureFormat,
    buf_bg: Vec<u8>,
    buf_text: Vec<u8>,
    buf_color: Vec<u8>,
}

impl CoreRenderer {
    pub fn new(gpu: &GpuState) -> Self {
        let device = &gpu.device;
        let format = gpu.render_format;

        let uniform_layout = pipeline::create_uniform_bind_group_layout(device);
        let atlas_layout = pipeline::create_atlas_bind_group_layout(device);
        let bg_pipeline = pipeline::create_bg_pipeline(device, format, &uniform_layout, None);
        let fg_pipeline =
            pipeline::create_fg_pipeline(device, format, &uniform_layout, &atlas_layout, None);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("core_uniform_buffer"),
            size: 80,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("core_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("core_glyph_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let (gray_texture, gray_bind_group) =
            make_atlas_texture(device, &atlas_layout, &sampler, 512, wgpu::TextureFormat::R8Unorm);
        let (color_texture, color_bind_group) =
            make_atlas_texture(device, &atlas_layout, &sampler, 512, wgpu::TextureFormat::Bgra8Unorm);

        Self {
            bg_pipeline,
            fg_pipeline,
            uniform_buffer,
            uniform_bind_group,
            atlas_layout,
            sampler,
            gray_texture,
            gray_bind_group,
            gray_modified: u64::MAX,
            color_texture,
            color_bind_group,
            color_modified: u64::MAX,
            render_format: format,
            buf_bg: Vec::new(),
            buf_text: Vec::new(),
            buf_color: Vec::new(),
        }
    }

    /// Re-upload an atlas texture if it grew or its pixels changed since
    /// the last draw, recreating the GPU texture when the side changed.
    fn sync_atlas(
        &mut self,
        gpu: &GpuState,
        atlas: &GlyphAtlas,
        format: wgpu::TextureFormat,
        grayscale: bool,
    ) {
        let modified = atlas.modified();
        let last = if grayscale { self.gray_modified } else { self.color_modified };
        if modified == last {
            return;
        }
        let side = atlas.side();
        let current_side = if grayscale { self.gray_texture.size().width } else { self.color_texture.size().width };
        if side != current_side {
            let (texture, bind_group) =
                make_atlas_texture(&gpu.device, &self.atlas_layout, &self.sampler, side, format);
            if grayscale {
                self.gray_texture = texture;
                self.gray_bind_group = bind_group;
            } else {
                self.color_texture = texture;
                self.color_bind_group = bind_group;
            }
        }
        let texture = if grayscale { &self.gray_texture } else { &self.color_texture };
        let bpp = if grayscale { 1u32 } else { 4u32 };
        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.pixels(),
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(side * bpp), rows_per_image: Some(side) },
            wgpu::Extent3d { width: side, height: side, depth_or_array_layers: 1 },
        );
        if grayscale {
            self.gray_modified = modified;
        } else {
            self.color_modified = modified;
        }
    }

    /// Build instance buffers from `batches` and submit one render pass:
    /// background quads, then grayscale-atlas text, then color-atlas text.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_frame(
        &mut self,
        gpu: &GpuState,
        surface: &wgpu::Surface<'_>,
        config: &wgpu::SurfaceConfiguration,
        grayscale_atlas: &GlyphAtlas,
        color_atlas: &GlyphAtlas,
        batches: &FrameBatches,
        clear_color: [f32; 4],
    ) {
        self.sync_atlas(gpu, grayscale_atlas, wgpu::TextureFormat::R8Unorm, true);
        self.sync_atlas(gpu, color_atlas, wgpu::TextureFormat::Bgra8Unorm, false);

        let projection = ortho_projection(config.width as f32, config.height as f32);
        let mut uniform_bytes = [0u8; 80];
        uniform_bytes[0..64].copy_from_slice(bytemuck_cast(&projection));
        // flags = 0 (no linear-alpha correction), min_contrast = 1.0 (off).
        uniform_bytes[68..72].copy_from_slice(&1.0f32.to_ne_bytes());
        gpu.queue.write_buffer(&self.uniform_buffer, 0, &uniform_bytes);

        let mut bg_writer = InstanceWriter::from_buffer(std::mem::take(&mut self.buf_bg));
        for inst in &batches.background {
            push_instance(&mut bg_writer, inst, grayscale_atlas.side(), false);
        }
        let mut text_writer = InstanceWriter::from_buffer(std::mem::take(&mut self.buf_text));
        for inst in &batches.text {
            push_instance(&mut text_writer, inst, grayscale_atlas.side(), true);
        }
        let mut color_writer = InstanceWriter::from_buffer(std::mem::take(&mut self.buf_color));
        for inst in &batches.color_text {
            push_instance(&mut color_writer, inst, color_atlas.side(), true);
        }

        let bg_count = bg_writer.count();
        let text_count = text_writer.count();
        let color_count = color_writer.count();
        let bg_buf = reuse_or_create_buffer(&gpu.device, &gpu.queue, None, bg_writer.as_bytes(), "core_bg_instances");
        let text_buf =
            reuse_or_create_buffer(&gpu.device, &gpu.queue, None, text_writer.as_bytes(), "core_text_instances");
        let color_buf =
            reuse_or_create_buffer(&gpu.device, &gpu.queue, None, color_writer.as_bytes(), "core_color_instances");
        self.buf_bg = bg_writer.into_buffer();
        self.buf_text = text_writer.into_buffer();
        self.buf_color = color_writer.into_buffer();

        let Ok(frame) = surface.get_current_texture() else { return };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.render_format),
            ..Default::default()
        });
        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("core_frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear_color[0]),
                            g: f64::from(clear_color[1]),
                            b: f64::from(clear_color[2]),
                            a: f64::from(clear_color[3]),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if bg_count > 0 {
                rpass.set_pipeline(&self.bg_pipeline);
                rpass.set_bind_group(0, &self.uniform_bind_group, &[]);
                rpass.set_vertex_buffer(0, bg_buf.slice(..));
                rpass.draw(0..4, 0..bg_count);
            }
            if text_count > 0 {
                rpass.set_pipeline(&self.fg_pipeline);
                rpass.set_bind_group(0, &self.uniform_bind_group, &[]);
                rpass.set_bind_group(1, &self.gray_bind_group, &[]);
                rpass.set_vertex_buffer(0, text_buf.slice(..));
                rpass.draw(0..4, 0..text_count);
            }
            if color_count > 0 {
                rpass.set_pipeline(&self.fg_pipeline);
                rpass.set_bind_group(0, &self.uniform_bind_group, &[]);
                rpass.set_bind_group(1, &self.color_bind_group, &[]);
                rpass.set_vertex_buffer(0, color_buf.slice(..));
                rpass.draw(0..4, 0..color_count);
            }
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

fn push_instance(writer: &mut InstanceWriter, inst: &CellInstance, atlas_side: u32, textured: bool) {
    let color = color_to_f32(inst.color);
    if textured {
        let (u0, v0, u1, v1) = inst.uv.uv(atlas_side);
        writer.push_glyph(
            inst.x,
            inst.y,
            inst.w,
            inst.h,
            [u0, v0],
            [u1 - u0, v1 - v0],
            color,
            [0.0, 0.0, 0.0, 0.0],
        );
    } else {
        writer.push_rect(inst.x, inst.y, inst.w, inst.h, color);
    }
}

fn make_atlas_texture(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    side: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::BindGroup) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("core_atlas_texture"),
        size: wgpu::Extent3d { width: side, height: side, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("core_atlas_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
            wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
        ],
    });
    (texture, bind_group)
}

/// Column-major orthographic projection mapping pixel space to clip space.
fn ortho_projection(width: f32, height: f32) -> [f32; 16] {
    let mut m = [0.0f32; 16];
    m[0] = 2.0 / width;
    m[5] = -2.0 / height;
    m[10] = 1.0;
    m[12] = -1.0;
    m[13] = 1.0;
    m[15] = 1.0;
    m
}

fn bytemuck_cast(arr: &[f32; 16]) -> &[u8] {
    let ptr = arr.as_ptr().cast::<u8>();
    #[allow(unsafe_code)]
    unsafe {
        std::slice::from_raw_parts(ptr, 64)
    }
}
