//! Four-wave UV distortion that follows the pointer and swells on hover.

use crate::input::{ListenerKind, PointerEvent};
use crate::smoothing::{approach, approach2};
use crate::strategy::{
    EffectKind, EffectStrategy, FrameTick, FrameUniforms, SaturationStyle,
};
use crate::tuning::WavyTuning;

const LISTENERS: &[ListenerKind] = &[
    ListenerKind::PointerEnter,
    ListenerKind::PointerMove,
    ListenerKind::PointerLeave,
    ListenerKind::Resize,
];

#[derive(Debug, Clone)]
pub struct Wavy {
    tuning: WavyTuning,
    pointer: [f32; 2],
    target_pointer: [f32; 2],
    intensity: f32,
    target_intensity: f32,
    time: f32,
}

impl Wavy {
    pub fn new(tuning: WavyTuning) -> Self {
        Self {
            pointer: [0.0, 0.0],
            target_pointer: [0.0, 0.0],
            intensity: tuning.base_intensity,
            target_intensity: tuning.base_intensity,
            time: tuning.time_origin,
            tuning,
        }
    }

    pub fn target_pointer(&self) -> [f32; 2] {
        self.target_pointer
    }

    pub fn target_intensity(&self) -> f32 {
        self.target_intensity
    }

    fn step(&mut self) {
        let rate = self.tuning.transition_speed;
        self.pointer = approach2(self.pointer, self.target_pointer, rate);
        self.intensity = approach(self.intensity, self.target_intensity, rate);
        self.time += self.tuning.time_step;
    }
}

impl EffectStrategy for Wavy {
    fn kind(&self) -> EffectKind {
        EffectKind::Wavy
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        LISTENERS
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter { .. } => {
                self.target_intensity = self.tuning.hover_intensity;
            }
            PointerEvent::Move { position } => {
                // Centred coordinates, +y up.
                self.target_pointer = [position[0] * 2.0 - 1.0, -(position[1] * 2.0) + 1.0];
            }
            PointerEvent::Leave => {
                self.target_intensity = self.tuning.base_intensity;
                self.target_pointer = [0.0, 0.0];
            }
        }
    }

    fn update(&mut self, tick: FrameTick) -> FrameUniforms {
        for _ in 0..tick.steps {
            self.step();
        }
        FrameUniforms {
            pointer: self.pointer,
            intensity: self.intensity,
            time: self.time,
            ..FrameUniforms::default()
        }
    }

    fn saturation_style(&self) -> Option<SaturationStyle> {
        Some(SaturationStyle {
            idle: self.tuning.idle_saturation,
            hovered: self.tuning.hover_saturation,
            transition: self.tuning.saturation_transition,
        })
    }
}

/// Sampling coordinate for `uv` after the four waves are applied.
pub fn warp_uv(uv: [f32; 2], uniforms: &FrameUniforms) -> [f32; 2] {
    let [mx, my] = uniforms.pointer;
    let t = uniforms.time;
    let i = uniforms.intensity;
    let wave1 = (uv[0] * 10.0 + t * 0.5 + mx * 5.0).sin() * i;
    let wave2 = (uv[1] * 12.0 + t * 0.8 + my * 4.0).sin() * i;
    let wave3 = (uv[0] * 8.0 + t * 0.5 + mx * 3.0).cos() * i;
    let wave4 = (uv[1] * 9.0 + t * 0.7 + my * 3.5).cos() * i;
    [uv[0] + wave3 + wave4, uv[1] + wave1 + wave2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wavy() -> Wavy {
        Wavy::new(WavyTuning::default())
    }

    #[test]
    fn move_maps_to_centred_coordinates() {
        let mut effect = wavy();
        effect.handle_pointer(PointerEvent::Move {
            position: [1.0, 0.0],
        });
        assert_eq!(effect.target_pointer(), [1.0, 1.0]);
        effect.handle_pointer(PointerEvent::Move {
            position: [0.25, 0.75],
        });
        assert_eq!(effect.target_pointer(), [-0.5, -0.5]);
    }

    #[test]
    fn leave_resets_targets_regardless_of_state() {
        let mut effect = wavy();
        effect.handle_pointer(PointerEvent::Enter {
            position: [0.3, 0.3],
        });
        effect.handle_pointer(PointerEvent::Move {
            position: [0.9, 0.1],
        });
        effect.update(FrameTick::steps(37));
        effect.handle_pointer(PointerEvent::Leave);
        assert_eq!(effect.target_intensity(), 0.005);
        assert_eq!(effect.target_pointer(), [0.0, 0.0]);

        effect.handle_pointer(PointerEvent::Leave);
        assert_eq!(effect.target_pointer(), [0.0, 0.0]);
    }

    #[test]
    fn hover_raises_intensity_gradually() {
        let mut effect = wavy();
        effect.handle_pointer(PointerEvent::Enter {
            position: [0.5, 0.5],
        });
        assert_eq!(effect.target_intensity(), 0.009);
        let first = effect.update(FrameTick::steps(1)).intensity;
        assert!(first > 0.005 && first < 0.009);
        let later = effect.update(FrameTick::steps(600)).intensity;
        assert!((later - 0.009).abs() < 1e-6);
    }

    #[test]
    fn time_advances_per_step() {
        let mut effect = wavy();
        assert_eq!(effect.update(FrameTick::steps(0)).time, 1.0);
        let uniforms = effect.update(FrameTick::steps(200));
        assert!((uniforms.time - 2.0).abs() < 1e-4);
    }

    #[test]
    fn zero_intensity_leaves_uv_untouched() {
        let uniforms = FrameUniforms {
            pointer: [0.4, -0.2],
            time: 3.0,
            ..FrameUniforms::default()
        };
        assert_eq!(warp_uv([0.3, 0.7], &uniforms), [0.3, 0.7]);
    }

    #[test]
    fn warp_stays_within_four_intensities() {
        let uniforms = FrameUniforms {
            pointer: [0.4, -0.2],
            intensity: 0.009,
            time: 3.0,
            ..FrameUniforms::default()
        };
        let warped = warp_uv([0.3, 0.7], &uniforms);
        assert!((warped[0] - 0.3).abs() <= 0.018 + 1e-6);
        assert!((warped[1] - 0.7).abs() <= 0.018 + 1e-6);
    }
}
