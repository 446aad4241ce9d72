use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use super::pipeline::PipelineLayouts;
use super::texture::PanelTexture;
use super::uniforms::{write_uniforms, EffectUniforms};

/// GPU objects owned by one panel. Dropping it releases them.
pub(crate) struct PanelResources {
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture: PanelTexture,
    texture_bind_group: wgpu::BindGroup,
}

impl PanelResources {
    pub fn new(device: &wgpu::Device, layouts: &PipelineLayouts, texture: PanelTexture) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("panel uniforms"),
            contents: bytemuck::bytes_of(&EffectUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("panel uniform bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture_bind_group = texture_bind_group(device, layouts, &texture);
        Self {
            uniform_buffer,
            uniform_bind_group,
            texture,
            texture_bind_group,
        }
    }

    pub fn replace_texture(
        &mut self,
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        texture: PanelTexture,
    ) {
        self.texture_bind_group = texture_bind_group(device, layouts, &texture);
        self.texture = texture;
    }

    pub fn write(&self, queue: &wgpu::Queue, uniforms: &EffectUniforms) {
        write_uniforms(queue, &self.uniform_buffer, uniforms);
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layouts: &PipelineLayouts,
    texture: &PanelTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("panel texture bind group"),
        layout: &layouts.texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}
