//! Per-effect constants. Defaults reproduce the hand-tuned values of each
//! effect; the rates differ between effects on purpose.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("invalid tuning: {0}")]
pub struct TuningError(pub String);

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub ripple: RippleTuning,
    pub glitch: GlitchTuning,
    pub wavy: WavyTuning,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RippleTuning {
    /// Pointer easing rate after enter/move.
    pub move_ease: f32,
    /// Pointer easing rate after leave.
    pub leave_ease: f32,
    /// Aberration lost per simulation step.
    pub decay_step: f32,
    /// Grid cells per axis used to bucket the falloff.
    pub grid_cells: f32,
    /// Distance from the pointer at which the falloff reaches zero.
    pub falloff_radius: f32,
    /// Scale applied to pointer motion when displacing UVs.
    pub displacement: f32,
    /// Horizontal red/blue split at full aberration.
    pub channel_split: f32,
}

impl Default for RippleTuning {
    fn default() -> Self {
        Self {
            move_ease: 0.02,
            leave_ease: 0.05,
            decay_step: 0.05,
            grid_cells: 20.0,
            falloff_radius: 0.3,
            displacement: 0.2,
            channel_split: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlitchTuning {
    /// Hover duration accumulated per simulation step.
    pub update_frequency: f32,
    /// Accumulated hover duration after which a new intensity is drawn.
    pub interval: f32,
    /// Exclusive upper bound of the random intensity.
    pub intensity_modulus: f32,
    /// Number of horizontal bands.
    pub bands: f32,
    /// Maximum horizontal offset of a shifted channel.
    pub offset_scale: f32,
}

impl Default for GlitchTuning {
    fn default() -> Self {
        Self {
            update_frequency: 0.1,
            interval: 0.5,
            intensity_modulus: 0.5,
            bands: 12.0,
            offset_scale: 0.03,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WavyTuning {
    pub transition_speed: f32,
    pub base_intensity: f32,
    pub hover_intensity: f32,
    pub time_origin: f32,
    pub time_step: f32,
    pub idle_saturation: f32,
    pub hover_saturation: f32,
    /// Seconds taken by the saturation change on hover.
    pub saturation_transition: f32,
}

impl Default for WavyTuning {
    fn default() -> Self {
        Self {
            transition_speed: 0.03,
            base_intensity: 0.005,
            hover_intensity: 0.009,
            time_origin: 1.0,
            time_step: 0.005,
            idle_saturation: 0.5,
            hover_saturation: 1.0,
            saturation_transition: 0.5,
        }
    }
}

/// Longest accepted hover saturation transition, in seconds.
pub const MAX_SATURATION_TRANSITION: f32 = 60.0;

impl Tuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        let ripple = &self.ripple;
        check_rate("ripple.move_ease", ripple.move_ease)?;
        check_rate("ripple.leave_ease", ripple.leave_ease)?;
        check_rate("ripple.decay_step", ripple.decay_step)?;
        check_positive("ripple.grid_cells", ripple.grid_cells)?;
        check_positive("ripple.falloff_radius", ripple.falloff_radius)?;
        check_non_negative("ripple.displacement", ripple.displacement)?;
        check_non_negative("ripple.channel_split", ripple.channel_split)?;

        let glitch = &self.glitch;
        check_positive("glitch.update_frequency", glitch.update_frequency)?;
        check_positive("glitch.interval", glitch.interval)?;
        check_non_negative("glitch.intensity_modulus", glitch.intensity_modulus)?;
        check_positive("glitch.bands", glitch.bands)?;
        check_non_negative("glitch.offset_scale", glitch.offset_scale)?;

        let wavy = &self.wavy;
        check_rate("wavy.transition_speed", wavy.transition_speed)?;
        check_non_negative("wavy.base_intensity", wavy.base_intensity)?;
        check_non_negative("wavy.hover_intensity", wavy.hover_intensity)?;
        check_non_negative("wavy.time_step", wavy.time_step)?;
        check_non_negative("wavy.idle_saturation", wavy.idle_saturation)?;
        check_non_negative("wavy.hover_saturation", wavy.hover_saturation)?;
        check_at_most(
            "wavy.saturation_transition",
            wavy.saturation_transition,
            MAX_SATURATION_TRANSITION,
        )?;
        Ok(())
    }
}

fn check_at_most(name: &str, value: f32, max: f32) -> Result<(), TuningError> {
    check_non_negative(name, value)?;
    if value <= max {
        Ok(())
    } else {
        Err(TuningError(format!("{name} must be <= {max}, got {value}")))
    }
}

fn check_rate(name: &str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(TuningError(format!("{name} must be in (0, 1], got {value}")))
    }
}

fn check_positive(name: &str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError(format!("{name} must be > 0, got {value}")))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError(format!("{name} must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_rate() {
        let mut tuning = Tuning::default();
        tuning.wavy.transition_speed = 1.5;
        let err = tuning.validate().unwrap_err();
        assert!(err.0.contains("wavy.transition_speed"));

        let mut tuning = Tuning::default();
        tuning.ripple.move_ease = 0.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn bounds_saturation_transition() {
        let mut tuning = Tuning::default();
        tuning.wavy.saturation_transition = MAX_SATURATION_TRANSITION;
        tuning.validate().unwrap();

        tuning.wavy.saturation_transition = 1e30;
        let err = tuning.validate().unwrap_err();
        assert!(err.0.contains("wavy.saturation_transition"));
    }
}
