//! CPU evaluation of the fragment stage, used for still-frame export.
//!
//! Sampling mirrors the GPU path: UVs have a bottom-left origin, lookups are
//! bilinear and coordinates outside `[0, 1]` clamp to the edge texel.

use image::{Rgba, RgbaImage};

use crate::glitch::{band_index, band_offset, ChannelAssignment};
use crate::ripple::channel_uvs;
use crate::strategy::{EffectKind, FrameUniforms};
use crate::wavy::warp_uv;

/// Luma weights of the saturation matrix applied by the host.
pub const SATURATION_LUMA: [f32; 3] = [0.213, 0.715, 0.072];

/// Renders one `width` x `height` frame of `kind` over `source`.
pub fn render(
    kind: EffectKind,
    source: &RgbaImage,
    uniforms: &FrameUniforms,
    saturation: f32,
    width: u32,
    height: u32,
) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let uv = [
            (x as f32 + 0.5) / width as f32,
            1.0 - (y as f32 + 0.5) / height as f32,
        ];
        let color = shade(kind, source, uniforms, uv);
        to_pixel(saturate(color, saturation))
    })
}

/// Colour of a single fragment.
pub fn shade(kind: EffectKind, source: &RgbaImage, uniforms: &FrameUniforms, uv: [f32; 2]) -> [f32; 4] {
    match kind {
        EffectKind::Ripple => {
            let [red, green, blue] = channel_uvs(uv, uniforms);
            let g = sample(source, green);
            [sample(source, red)[0], g[1], sample(source, blue)[2], g[3]]
        }
        EffectKind::Glitch => {
            let base = sample(source, uv);
            if uniforms.intensity <= 0.0 {
                return base;
            }
            let [bands, offset_scale, _, _] = uniforms.shape;
            let band = band_index(uv[1], bands);
            let offset = band_offset(band, uniforms.intensity, offset_scale);
            let forward = sample(source, [uv[0] + offset, uv[1]]);
            let back = sample(source, [uv[0] - offset, uv[1]]);
            let (shift_red, shift_green) = ChannelAssignment::for_band(band).shifts();
            [
                if shift_red { forward[0] } else { base[0] },
                if shift_green { back[1] } else { base[1] },
                base[2],
                1.0,
            ]
        }
        EffectKind::Wavy => sample(source, warp_uv(uv, uniforms)),
    }
}

/// Bilinear lookup at a bottom-origin UV with clamp-to-edge addressing.
pub fn sample(source: &RgbaImage, uv: [f32; 2]) -> [f32; 4] {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    let fx = uv[0].clamp(0.0, 1.0) * w as f32 - 0.5;
    let fy = (1.0 - uv[1].clamp(0.0, 1.0)) * h as f32 - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let texel = |x: f32, y: f32| -> [f32; 4] {
        let xi = (x.max(0.0) as u32).min(w - 1);
        let yi = (y.max(0.0) as u32).min(h - 1);
        let Rgba(p) = *source.get_pixel(xi, yi);
        p.map(|c| c as f32 / 255.0)
    };
    let a = texel(x0, y0);
    let b = texel(x0 + 1.0, y0);
    let c = texel(x0, y0 + 1.0);
    let d = texel(x0 + 1.0, y0 + 1.0);

    let mut out = [0.0; 4];
    for i in 0..4 {
        let top = a[i] + (b[i] - a[i]) * tx;
        let bottom = c[i] + (d[i] - c[i]) * tx;
        out[i] = top + (bottom - top) * ty;
    }
    out
}

/// Scales chroma around the colour's luma; 1.0 is the identity.
pub fn saturate(color: [f32; 4], amount: f32) -> [f32; 4] {
    let luma = color[0] * SATURATION_LUMA[0]
        + color[1] * SATURATION_LUMA[1]
        + color[2] * SATURATION_LUMA[2];
    [
        luma + (color[0] - luma) * amount,
        luma + (color[1] - luma) * amount,
        luma + (color[2] - luma) * amount,
        color[3],
    ]
}

fn to_pixel(color: [f32; 4]) -> Rgba<u8> {
    Rgba(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}
