use std::time::{Duration, Instant};

use effects::SaturationStyle;

/// Easing applied to timed host transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EaseCurve {
    Linear,
    Smoothstep,
    /// CSS `ease-in-out` approximated by a piecewise quadratic.
    #[default]
    EaseInOut,
}

impl EaseCurve {
    pub fn sample(self, t: f32) -> f32 {
        let clamped = t.clamp(0.0, 1.0);
        match self {
            EaseCurve::Linear => clamped,
            EaseCurve::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
            EaseCurve::EaseInOut => {
                if clamped < 0.5 {
                    2.0 * clamped * clamped
                } else {
                    -1.0 + (4.0 - 2.0 * clamped) * clamped
                }
            }
        }
    }
}

/// Panel saturation that animates between its idle and hovered values.
///
/// A hover change mid-transition starts from the value currently shown, so
/// quick in-and-out pointer motion never jumps.
#[derive(Debug, Clone)]
pub struct SaturationTransition {
    style: SaturationStyle,
    curve: EaseCurve,
    from: f32,
    to: f32,
    start: Instant,
    hovered: bool,
}

impl SaturationTransition {
    pub fn new(style: SaturationStyle, curve: EaseCurve, now: Instant) -> Self {
        Self {
            style,
            curve,
            from: style.idle,
            to: style.idle,
            start: now,
            hovered: false,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool, now: Instant) {
        if hovered == self.hovered {
            return;
        }
        self.from = self.value(now);
        self.to = if hovered {
            self.style.hovered
        } else {
            self.style.idle
        };
        self.start = now;
        self.hovered = hovered;
    }

    pub fn value(&self, now: Instant) -> f32 {
        let duration =
            Duration::try_from_secs_f32(self.style.transition.max(0.0)).unwrap_or_default();
        if duration.is_zero() {
            return self.to;
        }
        let progress =
            now.saturating_duration_since(self.start).as_secs_f32() / duration.as_secs_f32();
        if progress >= 1.0 {
            return self.to;
        }
        let mix = self.curve.sample(progress);
        self.from + (self.to - self.from) * mix
    }
}
