//! Still-frame export rendered on the CPU, so no window or GPU is needed.

use anyhow::{Context, Result};
use effects::{build_strategy, cpu, EffectStrategy, FrameTick, FrameUniforms, PointerEvent, Tuning};
use image::RgbaImage;
use renderer::{load_image, FetchOptions, ImageSource};

use crate::cli::ExportArgs;

/// Largest source dimension kept when exporting; bigger images are scaled down.
const EXPORT_MAX_DIMENSION: u32 = 4_096;

/// Result of simulating an effect ahead of a capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulated {
    pub uniforms: FrameUniforms,
    pub saturation: f32,
}

/// How the pointer reaches the panel before the simulated steps run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// The pointer never enters the panel.
    Away,
    /// The pointer enters and rests at one position.
    Rest([f32; 2]),
    /// The pointer enters at `from` and moves to `to`.
    Swipe { from: [f32; 2], to: [f32; 2] },
}

impl Gesture {
    pub fn from_args(args: &ExportArgs) -> Self {
        match (args.from, args.hover) {
            (Some(from), _) => Gesture::Swipe {
                from,
                to: args.pointer,
            },
            (None, true) => Gesture::Rest(args.pointer),
            (None, false) => Gesture::Away,
        }
    }

    fn is_hovering(self) -> bool {
        !matches!(self, Gesture::Away)
    }
}

/// Plays `gesture` into the strategy, then runs `steps` fixed steps.
pub fn simulate(strategy: &mut dyn EffectStrategy, steps: u32, gesture: Gesture) -> Simulated {
    match gesture {
        Gesture::Away => {}
        Gesture::Rest(position) => {
            strategy.handle_pointer(PointerEvent::Enter { position });
            strategy.handle_pointer(PointerEvent::Move { position });
        }
        Gesture::Swipe { from, to } => {
            strategy.handle_pointer(PointerEvent::Enter { position: from });
            strategy.handle_pointer(PointerEvent::Move { position: to });
        }
    }
    let hover = gesture.is_hovering();
    let mut uniforms = strategy.update(FrameTick::steps(0));
    for _ in 0..steps {
        uniforms = strategy.update(FrameTick::steps(1));
    }
    let saturation = strategy.saturation_style().map_or(1.0, |style| {
        if hover {
            style.hovered
        } else {
            style.idle
        }
    });
    Simulated {
        uniforms,
        saturation,
    }
}

pub fn export(args: &ExportArgs, tuning: &Tuning, fetch: &FetchOptions) -> Result<()> {
    let source = ImageSource::parse(&args.image);
    let image = load_image(&source, fetch, EXPORT_MAX_DIMENSION)
        .with_context(|| format!("failed to load {source}"))?;
    let frame = render_frame(args, tuning, &image);
    frame
        .save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    tracing::info!(
        effect = %args.effect,
        steps = args.steps,
        out = %args.out.display(),
        "exported still frame"
    );
    Ok(())
}

fn render_frame(args: &ExportArgs, tuning: &Tuning, image: &RgbaImage) -> RgbaImage {
    let mut strategy = build_strategy(args.effect, tuning, 0);
    let simulated = simulate(strategy.as_mut(), args.steps, Gesture::from_args(args));
    let (width, height) = args.size.unwrap_or_else(|| image.dimensions());
    cpu::render(
        args.effect,
        image,
        &simulated.uniforms,
        simulated.saturation,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use effects::EffectKind;
    use image::Rgba;
    use std::path::PathBuf;

    fn export_args(effect: EffectKind, hover: bool) -> ExportArgs {
        ExportArgs {
            effect,
            image: "unused.png".into(),
            out: PathBuf::from("unused-out.png"),
            steps: 30,
            pointer: [0.25, 0.5],
            hover,
            from: None,
            size: Some((16, 8)),
        }
    }

    fn gradient() -> RgbaImage {
        RgbaImage::from_fn(32, 32, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 128, 255]))
    }

    #[test]
    fn resting_ripple_has_no_aberration() {
        let tuning = Tuning::default();
        let mut strategy = build_strategy(EffectKind::Ripple, &tuning, 0);
        let simulated = simulate(strategy.as_mut(), 10, Gesture::Away);
        assert_eq!(simulated.uniforms.intensity, 0.0);
        assert_eq!(simulated.saturation, 1.0);
    }

    #[test]
    fn wavy_hover_uses_hovered_saturation() {
        let tuning = Tuning::default();
        let mut strategy = build_strategy(EffectKind::Wavy, &tuning, 0);
        let style = strategy.saturation_style().unwrap();
        let hovered = simulate(strategy.as_mut(), 5, Gesture::Rest([0.5, 0.5]));
        assert_eq!(hovered.saturation, style.hovered);

        let mut strategy = build_strategy(EffectKind::Wavy, &tuning, 0);
        let idle = simulate(strategy.as_mut(), 5, Gesture::Away);
        assert_eq!(idle.saturation, style.idle);
    }

    #[test]
    fn hovering_glitch_rerolls_intensity() {
        let tuning = Tuning::default();
        let mut strategy = build_strategy(EffectKind::Glitch, &tuning, 0);
        let calm = simulate(strategy.as_mut(), 30, Gesture::Away);
        assert_eq!(calm.uniforms.intensity, 0.0);

        let mut strategy = build_strategy(EffectKind::Glitch, &tuning, 0);
        let hovered = simulate(strategy.as_mut(), 30, Gesture::Rest([0.5, 0.5]));
        assert!((0.0..tuning.glitch.intensity_modulus).contains(&hovered.uniforms.intensity));
    }

    #[test]
    fn resting_ripple_pointer_has_no_motion() {
        let tuning = Tuning::default();
        let mut strategy = build_strategy(EffectKind::Ripple, &tuning, 0);
        let rest = simulate(strategy.as_mut(), 5, Gesture::Rest([0.6, 0.5]));
        assert_eq!(rest.uniforms.pointer, rest.uniforms.previous_pointer);
    }

    #[test]
    fn swiped_ripple_carries_pointer_motion() {
        let tuning = Tuning::default();
        let mut strategy = build_strategy(EffectKind::Ripple, &tuning, 0);
        let swipe = Gesture::Swipe {
            from: [0.2, 0.5],
            to: [0.6, 0.5],
        };
        let simulated = simulate(strategy.as_mut(), 5, swipe);
        let motion = simulated.uniforms.pointer[0] - simulated.uniforms.previous_pointer[0];
        assert!(motion > 0.0, "motion {motion}");
        assert!(simulated.uniforms.intensity > 0.0);
    }

    #[test]
    fn starting_pointer_implies_hover() {
        let mut args = export_args(EffectKind::Ripple, false);
        assert_eq!(Gesture::from_args(&args), Gesture::Away);
        args.from = Some([0.1, 0.1]);
        assert_eq!(
            Gesture::from_args(&args),
            Gesture::Swipe {
                from: [0.1, 0.1],
                to: [0.25, 0.5],
            }
        );
    }

    #[test]
    fn frame_uses_requested_size() {
        let tuning = Tuning::default();
        let image = gradient();
        let frame = render_frame(&export_args(EffectKind::Wavy, true), &tuning, &image);
        assert_eq!(frame.dimensions(), (16, 8));

        let mut args = export_args(EffectKind::Ripple, false);
        args.size = None;
        assert_eq!(render_frame(&args, &tuning, &image).dimensions(), (32, 32));
    }
}
