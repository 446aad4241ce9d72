use bytemuck::{Pod, Zeroable};
use effects::FrameUniforms;

/// Per-panel std140 uniform block. Field order mirrors `EffectParams` in the
/// shader header.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EffectUniforms {
    pub pointer: [f32; 2],
    pub previous_pointer: [f32; 2],
    pub intensity: f32,
    pub time: f32,
    pub saturation: f32,
    pub padding0: f32,
    pub shape: [f32; 4],
}

unsafe impl Zeroable for EffectUniforms {}
unsafe impl Pod for EffectUniforms {}

impl EffectUniforms {
    pub fn new(frame: &FrameUniforms, saturation: f32) -> Self {
        Self {
            pointer: frame.pointer,
            previous_pointer: frame.previous_pointer,
            intensity: frame.intensity,
            time: frame.time,
            saturation,
            padding0: 0.0,
            shape: frame.shape,
        }
    }
}

pub(crate) fn write_uniforms(queue: &wgpu::Queue, buffer: &wgpu::Buffer, uniforms: &EffectUniforms) {
    queue.write_buffer(buffer, 0, bytemuck::bytes_of(uniforms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_matches_std140_layout() {
        assert_eq!(std::mem::size_of::<EffectUniforms>(), 48);
        assert_eq!(std::mem::align_of::<EffectUniforms>(), 16);

        let frame = FrameUniforms {
            pointer: [1.0, 2.0],
            previous_pointer: [3.0, 4.0],
            intensity: 5.0,
            time: 6.0,
            shape: [8.0, 9.0, 10.0, 11.0],
        };
        let uniforms = EffectUniforms::new(&frame, 7.0);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniforms));
        assert_eq!(&floats[..7], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(&floats[8..12], &[8.0, 9.0, 10.0, 11.0]);
    }
}
