use tracing::info;

use crate::config::{AppConfig, WindowConfig};
use crate::controller::FrameOutput;
use crate::error::ShaderError;
use crate::model::Drawable;
use crate::view::buffers::{vertex_buffer_layouts, GpuMeshStore};
use crate::view::submit::RenderSubmitter;
use crate::view::uniforms::UniformTable;

pub const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// One uniform slot per drawable
const OBJECT_SLOTS: u32 = Drawable::ALL.len() as u32;

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn create_scene_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let vertex_layouts = vertex_buffer_layouts();

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
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

pub fn clear_color(window: &WindowConfig) -> wgpu::Color {
    let [r, g, b, a] = window.clear_color;
    wgpu::Color { r, g, b, a }
}

/// Scene pipeline, depth buffer and per-object uniforms
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    submitter: RenderSubmitter,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Resolve the uniform table, build the pipeline and upload the lights.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &AppConfig,
    ) -> Result<Self, ShaderError> {
        let uniforms = UniformTable::resolve(SCENE_SHADER)?;

        let bind_group_layout = RenderSubmitter::create_bind_group_layout(device);
        let pipeline = create_scene_pipeline(device, format, &bind_group_layout);
        let submitter = RenderSubmitter::new(device, &bind_group_layout, uniforms, OBJECT_SLOTS);
        submitter.write_lights(queue, &config.scene);

        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        info!("Scene pipeline ready ({:?}, {}x{})", format, width, height);

        Ok(Self {
            pipeline,
            submitter,
            depth_texture,
            depth_view,
            clear_color: clear_color(&config.window),
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture.destroy();
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Clear the target and draw every object of the frame
    pub fn draw_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        queue: &wgpu::Queue,
        frame: &FrameOutput,
        meshes: &GpuMeshStore,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
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
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);

        for object in &frame.objects {
            let buffers = meshes.get(object.drawable.mesh());
            self.submitter
                .draw_object(&mut render_pass, queue, buffers, object, &frame.view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_slot_per_drawable() {
        assert_eq!(OBJECT_SLOTS, 4);
        for drawable in Drawable::ALL {
            assert!(drawable.slot() < OBJECT_SLOTS);
        }
    }

    #[test]
    fn test_clear_color_follows_config() {
        let color = clear_color(&WindowConfig::default());
        assert_eq!(color.r, 0.5);
        assert_eq!(color.g, 0.5);
        assert_eq!(color.b, 0.5);
    }

    #[test]
    fn test_shader_has_entry_points() {
        assert!(SCENE_SHADER.contains("fn vs_main"));
        assert!(SCENE_SHADER.contains("fn fs_main"));
    }
}
