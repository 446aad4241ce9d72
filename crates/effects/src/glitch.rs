//! Horizontal band glitch that re-rolls its intensity while hovered.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::input::{ListenerKind, PointerEvent};
use crate::smoothing::fract;
use crate::strategy::{EffectKind, EffectStrategy, FrameTick, FrameUniforms};
use crate::tuning::GlitchTuning;

const LISTENERS: &[ListenerKind] = &[
    ListenerKind::PointerEnter,
    ListenerKind::PointerLeave,
    ListenerKind::Resize,
];

/// Slack for ratios such as `0.5 / 0.1` that land a hair above a whole step.
const REROLL_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct Glitch {
    tuning: GlitchTuning,
    rng: StdRng,
    hovered: bool,
    hover_steps: u32,
    steps_per_reroll: u32,
    intensity: f32,
}

impl Glitch {
    pub fn new(tuning: GlitchTuning, seed: u64) -> Self {
        // Counting whole steps avoids float drift in the hover accumulator.
        // The re-roll fires on the first step whose accumulated hover time
        // reaches the interval, hence the ceiling.
        let steps_per_reroll = (tuning.interval / tuning.update_frequency - REROLL_EPSILON)
            .ceil()
            .max(1.0) as u32;
        Self {
            tuning,
            rng: StdRng::seed_from_u64(seed),
            hovered: false,
            hover_steps: 0,
            steps_per_reroll,
            intensity: 0.0,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Hover duration accumulated since the last re-roll.
    pub fn hover_duration(&self) -> f32 {
        self.hover_steps as f32 * self.tuning.update_frequency
    }

    fn step(&mut self) {
        if !self.hovered {
            return;
        }
        self.hover_steps += 1;
        if self.hover_steps >= self.steps_per_reroll {
            self.hover_steps = 0;
            self.intensity = self.rng.gen::<f32>() * self.tuning.intensity_modulus;
        }
    }
}

impl EffectStrategy for Glitch {
    fn kind(&self) -> EffectKind {
        EffectKind::Glitch
    }

    fn listeners(&self) -> &'static [ListenerKind] {
        LISTENERS
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter { .. } => self.hovered = true,
            PointerEvent::Move { .. } => {}
            PointerEvent::Leave => {
                self.hovered = false;
                self.hover_steps = 0;
                self.intensity = 0.0;
            }
        }
    }

    fn update(&mut self, tick: FrameTick) -> FrameUniforms {
        for _ in 0..tick.steps {
            self.step();
        }
        FrameUniforms {
            intensity: self.intensity,
            shape: [self.tuning.bands, self.tuning.offset_scale, 0.0, 0.0],
            ..FrameUniforms::default()
        }
    }
}

/// Which texture lookup feeds each output channel of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelAssignment {
    /// Red shifted forward, green shifted back, blue untouched.
    SplitRedGreen,
    /// Only green shifted back.
    ShiftGreen,
    /// Only red shifted forward.
    ShiftRed,
}

impl ChannelAssignment {
    pub fn for_band(band: i32) -> Self {
        match band.rem_euclid(3) {
            0 => ChannelAssignment::SplitRedGreen,
            1 => ChannelAssignment::ShiftGreen,
            _ => ChannelAssignment::ShiftRed,
        }
    }

    /// Whether the red and green channels read the shifted lookups.
    pub fn shifts(self) -> (bool, bool) {
        match self {
            ChannelAssignment::SplitRedGreen => (true, true),
            ChannelAssignment::ShiftGreen => (false, true),
            ChannelAssignment::ShiftRed => (true, false),
        }
    }
}

/// Band index for a bottom-origin `v` coordinate.
pub fn band_index(v: f32, bands: f32) -> i32 {
    (v * bands).floor() as i32
}

/// Horizontal offset applied to a band. Depends only on its inputs.
pub fn band_offset(band: i32, intensity: f32, offset_scale: f32) -> f32 {
    let random = fract((band as f32 * 12345.6789 + intensity).sin() * 43758.5453);
    random * offset_scale * intensity
}
