//! Pointer-driven image distortion effects, independent of any GPU.
//!
//! Each effect is an [`EffectStrategy`]: a small state machine that accepts
//! pointer events in panel-normalized coordinates and, once per displayed
//! frame, advances by a number of fixed simulation steps and reports the
//! uniform values its fragment shader needs.
//!
//! ```text
//!   host pointer events ──▶ handle_pointer() ──▶ targets / intensities
//!                                                     │
//!   StepClock::advance() ──▶ FrameTick ──▶ update() ──┴─▶ FrameUniforms ──▶ GPU
//! ```
//!
//! The fragment math itself lives next to each strategy as plain functions
//! (`ripple::displaced_uv`, `glitch::band_offset`, `wavy::warp_uv`, ...). The
//! renderer's GLSL mirrors them, and [`cpu`] composes them into a CPU
//! reference sampler used for still-frame export.

pub mod clock;
pub mod cpu;
pub mod glitch;
pub mod input;
pub mod ripple;
pub mod smoothing;
pub mod strategy;
pub mod tuning;
pub mod wavy;

pub use clock::StepClock;
pub use input::{ListenerKind, PointerEvent};
pub use strategy::{
    build_strategy, EffectKind, EffectStrategy, FrameTick, FrameUniforms, SaturationStyle,
    UnknownEffect,
};
pub use tuning::{GlitchTuning, RippleTuning, Tuning, TuningError, WavyTuning};
