//! Chromatic-aberration ripple that trails the pointer.
//!
//! Moving the pointer kicks the aberration to full strength; it then decays
//! linearly every step. The smoothed pointer eases toward the raw pointer at
//! the move rate, and back toward the previous target at the faster leave rate
//! once the pointer exits the panel.

use crate::input::{ListenerKind, PointerEvent};
use crate::smoothing::{approach2, decay, smoothstep};
use crate::strategy::{EffectKind, EffectStrategy, FrameTick, FrameUniforms};
use crate::tuning::RippleTuning;

const LISTENERS: &[ListenerKind] = &[
    ListenerKind::PointerEnter,
    ListenerKind::PointerMove,
    ListenerKind::PointerLeave,
    ListenerKind::Resize,
];

const CENTER: [f32; 2] = [0.5, 0.5];

#[derive(Debug, Clone)]
pub struct Ripple {
    tuning: RippleTuning,
    pointer: [f32; 2],
    target: [f32; 2],
    previous: [f32; 2],
    aberration: f32,
    ease: f32,
}

impl Ripple {
    pub fn new(tuning: RippleTuning) -> Self {
        let ease = tuning.move_ease;
        Self {
            tuning,
            pointer: CENTER,
            target: CENTER,
            previous: CENTER,
            aberration: 0.0,
            ease,
        }
    }

    pub fn pointer(&self) -> [f32; 2] {
        self.pointer
    }

    pub fn target(&self) -> [f32; 2] {
        self.target
    }

    pub fn aberration(&self) -> f32 {
        self.aberration
    }

    pub fn ease(&self) -> f32 {
        self.ease
    }

    fn step(&mut self) {
        self.pointer = approach2(self.pointer, self.target, self.ease);
        self.aberration = decay(self.aberration, self.tuning.decay_step);
    }

    fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            pointer: [self.pointer[0], 1.0 - self.pointer[1]],
            previous_pointer: [self.previous[0], 1.0 - self.previous[1]],
            intensity: self.aberration,
            time: 0.0,
            shape: [
                self.tuning.grid_cells,
                self.tuning.falloff_radius,
                self.tuning.displacement,
                self.tuning.channel_split,
            ],
        }
    }
}

impl EffectStrategy for Ripple {
    fn kind(&self) -> EffectKind {
        EffectKind::Ripple
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        LISTENERS
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter { position } => {
                self.ease = self.tuning.move_ease;
                self.pointer = position;
                self.target = position;
            }
            PointerEvent::Move { position } => {
                self.ease = self.tuning.move_ease;
                self.previous = self.target;
                self.target = position;
                self.aberration = 1.0;
            }
            PointerEvent::Leave => {
                self.ease = self.tuning.leave_ease;
                self.target = self.previous;
            }
        }
    }

    fn update(&mut self, tick: FrameTick) -> FrameUniforms {
        for _ in 0..tick.steps {
            self.step();
        }
        self.uniforms()
    }
}

/// Centre of the grid cell containing `uv`, offset by one cell as the shader
/// does.
pub fn cell_center(uv: [f32; 2], grid: f32) -> [f32; 2] {
    [
        (uv[0] * grid).floor() / grid + 1.0 / grid,
        (uv[1] * grid).floor() / grid + 1.0 / grid,
    ]
}

/// Falloff weight of the cell containing `uv` relative to the pointer.
pub fn falloff(uv: [f32; 2], uniforms: &FrameUniforms) -> f32 {
    let [grid, radius, _, _] = uniforms.shape;
    let center = cell_center(uv, grid);
    let dx = center[0] - uniforms.pointer[0];
    let dy = center[1] - uniforms.pointer[1];
    smoothstep(radius, 0.0, (dx * dx + dy * dy).sqrt())
}

/// Sampling coordinate after motion displacement, before the channel split.
pub fn displaced_uv(uv: [f32; 2], uniforms: &FrameUniforms) -> [f32; 2] {
    let strength = falloff(uv, uniforms);
    let displacement = uniforms.shape[2];
    let motion = [
        uniforms.pointer[0] - uniforms.previous_pointer[0],
        uniforms.pointer[1] - uniforms.previous_pointer[1],
    ];
    [
        uv[0] + strength * motion[0] * displacement,
        uv[1] + strength * motion[1] * displacement,
    ]
}

/// Sampling coordinates for the red, green, and blue channels.
pub fn channel_uvs(uv: [f32; 2], uniforms: &FrameUniforms) -> [[f32; 2]; 3] {
    let strength = falloff(uv, uniforms);
    let base = displaced_uv(uv, uniforms);
    let split = strength * uniforms.intensity * uniforms.shape[3];
    [[base[0] + split, base[1]], base, [base[0] - split, base[1]]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripple() -> Ripple {
        Ripple::new(RippleTuning::default())
    }

    #[test]
    fn move_kicks_aberration_and_tracks_previous_target() {
        let mut effect = ripple();
        effect.handle_pointer(PointerEvent::Move {
            position: [0.2, 0.3],
        });
        assert_eq!(effect.aberration(), 1.0);
        assert_eq!(effect.target(), [0.2, 0.3]);

        effect.handle_pointer(PointerEvent::Move {
            position: [0.4, 0.1],
        });
        let uniforms = effect.update(FrameTick::steps(0));
        assert_eq!(uniforms.previous_pointer, [0.2, 1.0 - 0.3]);
    }

    #[test]
    fn enter_snaps_pointer_and_leave_returns_to_previous() {
        let mut effect = ripple();
        effect.handle_pointer(PointerEvent::Enter {
            position: [0.9, 0.9],
        });
        assert_eq!(effect.pointer(), [0.9, 0.9]);
        assert_eq!(effect.ease(), 0.02);

        effect.handle_pointer(PointerEvent::Move {
            position: [0.7, 0.6],
        });
        effect.handle_pointer(PointerEvent::Leave);
        assert_eq!(effect.ease(), 0.05);
        assert_eq!(effect.target(), [0.9, 0.9]);

        effect.handle_pointer(PointerEvent::Enter {
            position: [0.1, 0.1],
        });
        assert_eq!(effect.ease(), 0.02);
    }

    #[test]
    fn aberration_decays_to_exactly_zero() {
        let mut effect = ripple();
        effect.handle_pointer(PointerEvent::Move {
            position: [0.5, 0.5],
        });
        for frame in 1..=20 {
            let uniforms = effect.update(FrameTick::steps(1));
            if frame < 20 {
                assert!(uniforms.intensity > 0.0, "frame {frame}");
            } else {
                assert_eq!(uniforms.intensity, 0.0);
            }
        }
        for _ in 0..5 {
            assert_eq!(effect.update(FrameTick::steps(1)).intensity, 0.0);
        }
    }

    #[test]
    fn pointer_eases_toward_target() {
        let mut effect = ripple();
        effect.handle_pointer(PointerEvent::Move {
            position: [1.0, 0.5],
        });
        let uniforms = effect.update(FrameTick::steps(1));
        assert!((uniforms.pointer[0] - 0.51).abs() < 1e-6);
        let uniforms = effect.update(FrameTick::steps(500));
        assert!((uniforms.pointer[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn uniforms_flip_pointer_into_uv_space() {
        let mut effect = ripple();
        effect.handle_pointer(PointerEvent::Enter {
            position: [0.25, 0.2],
        });
        let uniforms = effect.update(FrameTick::steps(0));
        assert_eq!(uniforms.pointer, [0.25, 0.8]);
    }

    #[test]
    fn zero_motion_means_zero_displacement() {
        let uniforms = FrameUniforms {
            pointer: [0.5, 0.5],
            previous_pointer: [0.5, 0.5],
            intensity: 1.0,
            time: 0.0,
            shape: [20.0, 0.3, 0.2, 0.01],
        };
        for &uv in &[[0.5, 0.5], [0.48, 0.52], [0.1, 0.9]] {
            assert_eq!(displaced_uv(uv, &uniforms), uv);
        }
    }

    #[test]
    fn displacement_follows_motion_near_pointer_only() {
        let uniforms = FrameUniforms {
            pointer: [0.5, 0.5],
            previous_pointer: [0.4, 0.5],
            intensity: 1.0,
            time: 0.0,
            shape: [20.0, 0.3, 0.2, 0.01],
        };
        let near = displaced_uv([0.46, 0.46], &uniforms);
        assert!(near[0] > 0.46);
        let far = displaced_uv([0.0, 0.0], &uniforms);
        assert_eq!(far, [0.0, 0.0]);
    }

    #[test]
    fn channel_split_scales_with_intensity() {
        let mut uniforms = FrameUniforms {
            pointer: [0.5, 0.5],
            previous_pointer: [0.5, 0.5],
            intensity: 0.0,
            time: 0.0,
            shape: [20.0, 0.3, 0.2, 0.01],
        };
        let [red, green, blue] = channel_uvs([0.46, 0.46], &uniforms);
        assert_eq!(red, green);
        assert_eq!(blue, green);

        uniforms.intensity = 1.0;
        let [red, green, blue] = channel_uvs([0.46, 0.46], &uniforms);
        assert!(red[0] > green[0]);
        assert!(blue[0] < green[0]);
    }
}
