use image::imageops::flip_vertical;
use image::{Rgba, RgbaImage};
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::types::ColorSpaceMode;

const PLACEHOLDER_SIZE: u32 = 64;
const PLACEHOLDER_CELL: u32 = 8;
const PLACEHOLDER_LIGHT: Rgba<u8> = Rgba([200, 200, 200, 255]);
const PLACEHOLDER_DARK: Rgba<u8> = Rgba([110, 110, 110, 255]);

pub(crate) struct PanelTexture {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl PanelTexture {
    /// Uploads `image` (top-left origin) so that UV `(0, 0)` samples its
    /// bottom-left corner.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        color_space: ColorSpaceMode,
        label: &str,
    ) -> Self {
        let flipped = flip_vertical(image);
        let (width, height) = flipped.dimensions();
        let format = match color_space {
            ColorSpaceMode::Gamma => wgpu::TextureFormat::Rgba8Unorm,
            ColorSpaceMode::Linear => wgpu::TextureFormat::Rgba8UnormSrgb,
        };
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            flipped.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panel sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            _texture: texture,
            view,
            sampler,
            size: (width, height),
        }
    }

    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_space: ColorSpaceMode,
    ) -> Self {
        Self::upload(
            device,
            queue,
            &checkerboard(PLACEHOLDER_SIZE, PLACEHOLDER_CELL),
            color_space,
            "placeholder panel texture",
        )
    }
}

/// Square checkerboard shown in place of images that failed to load.
pub(crate) fn checkerboard(size: u32, cell: u32) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            PLACEHOLDER_LIGHT
        } else {
            PLACEHOLDER_DARK
        }
    })
}
