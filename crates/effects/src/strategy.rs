use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::glitch::Glitch;
use crate::input::{ListenerKind, PointerEvent};
use crate::ripple::Ripple;
use crate::tuning::Tuning;
use crate::wavy::Wavy;

/// The effects a panel can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Ripple,
    Glitch,
    Wavy,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Ripple, EffectKind::Glitch, EffectKind::Wavy];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Ripple => "ripple",
            EffectKind::Glitch => "glitch",
            EffectKind::Wavy => "wavy",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown effect '{0}'; expected ripple, glitch, or wavy")]
pub struct UnknownEffect(pub String);

impl FromStr for EffectKind {
    type Err = UnknownEffect;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ripple" | "aberration" | "chromatic" => Ok(EffectKind::Ripple),
            "glitch" => Ok(EffectKind::Glitch),
            "wavy" | "wave" => Ok(EffectKind::Wavy),
            _ => Err(UnknownEffect(value.to_string())),
        }
    }
}

/// How far the simulation should advance for the frame being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Fixed simulation steps to run before reporting uniforms. Zero re-reports
    /// the current state.
    pub steps: u32,
}

impl FrameTick {
    pub const fn steps(steps: u32) -> Self {
        Self { steps }
    }
}

/// Values handed to the fragment stage for one draw.
///
/// Positions are in UV space with a bottom-left origin. `shape` carries the
/// effect's static constants (grid size, band count, ...) so the shader does
/// not hard-code tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameUniforms {
    pub pointer: [f32; 2],
    pub previous_pointer: [f32; 2],
    pub intensity: f32,
    pub time: f32,
    pub shape: [f32; 4],
}

/// Host-side style applied on hover, outside the effect's own shader math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationStyle {
    pub idle: f32,
    pub hovered: f32,
    /// Seconds the host takes to move between the two values.
    pub transition: f32,
}

/// Per-effect state machine plugged into the shared effect host.
pub trait EffectStrategy: Send {
    fn kind(&self) -> EffectKind;

    /// Host notifications this effect needs while mounted.
    fn listeners(&self) -> &'static [ListenerKind];

    /// Applies a pointer event to the effect's targets.
    fn handle_pointer(&mut self, event: PointerEvent);

    /// Runs `tick.steps` simulation steps and returns the uniforms to draw.
    fn update(&mut self, tick: FrameTick) -> FrameUniforms;

    fn saturation_style(&self) -> Option<SaturationStyle> {
        None
    }
}

/// Instantiates the strategy for `kind`. `seed` feeds effects that need
/// randomness so runs can be reproduced.
pub fn build_strategy(kind: EffectKind, tuning: &Tuning, seed: u64) -> Box<dyn EffectStrategy> {
    match kind {
        EffectKind::Ripple => Box::new(Ripple::new(tuning.ripple.clone())),
        EffectKind::Glitch => Box::new(Glitch::new(tuning.glitch.clone(), seed)),
        EffectKind::Wavy => Box::new(Wavy::new(tuning.wavy.clone())),
    }
}
