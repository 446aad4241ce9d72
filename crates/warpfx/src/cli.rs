use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use effects::EffectKind;

#[derive(Parser, Debug)]
#[command(
    name = "warpfx",
    author,
    version,
    about = "Image panels distorted by pointer-driven GPU effects",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Configuration file to use instead of the discovered one.
    #[arg(long, global = true, value_name = "FILE", env = "WARPFX_CONFIG")]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Images to show, one panel each (URL, `file://` URL, or path). Replaces
    /// the configured panels.
    #[arg(value_name = "IMAGE")]
    pub images: Vec<String>,

    /// Effect applied to every panel given on the command line. Without it
    /// the effects cycle ripple, glitch, wavy.
    #[arg(long, value_name = "KIND", value_parser = parse_effect)]
    pub effect: Option<EffectKind>,

    /// Disable vsync (present as fast as possible).
    #[arg(long)]
    pub no_vsync: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a configuration file, then print its panels.
    Validate(ValidateArgs),
    /// Simulate an effect on the CPU and write one frame as PNG.
    Export(ExportArgs),
    /// Print the resolved configuration directory and file.
    Paths,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// File to validate; defaults to the resolved configuration file.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long, value_name = "KIND", value_parser = parse_effect)]
    pub effect: EffectKind,

    /// Source image (URL, `file://` URL, or path).
    #[arg(long, value_name = "REF")]
    pub image: String,

    /// Destination PNG.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Simulation steps to run before capturing.
    #[arg(long, default_value_t = 60, value_name = "N")]
    pub steps: u32,

    /// Pointer position in panel coordinates, `(0, 0)` top-left.
    #[arg(long, value_name = "X,Y", value_parser = parse_pointer, default_value = "0.5,0.5")]
    pub pointer: [f32; 2],

    /// Hover the pointer over the panel for the whole simulation.
    #[arg(long)]
    pub hover: bool,

    /// Enter the panel here and move to `--pointer` before simulating.
    /// Implies `--hover`.
    #[arg(long, value_name = "X,Y", value_parser = parse_pointer)]
    pub from: Option<[f32; 2]>,

    /// Output size; defaults to the source image size.
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_effect(value: &str) -> Result<EffectKind, String> {
    value.parse().map_err(|err: effects::UnknownEffect| err.to_string())
}

fn parse_pointer(value: &str) -> Result<[f32; 2], String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let parse_axis = |raw: &str| -> Result<f32, String> {
        let parsed: f32 = raw
            .trim()
            .parse()
            .map_err(|err| format!("invalid coordinate '{raw}': {err}"))?;
        if !(0.0..=1.0).contains(&parsed) {
            return Err(format!("coordinate {parsed} must be within 0..=1"));
        }
        Ok(parsed)
    };
    Ok([parse_axis(x)?, parse_axis(y)?])
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT but got '{value}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|err| format!("invalid width '{width}': {err}"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|err| format!("invalid height '{height}': {err}"))?;
    if width == 0 || height == 0 {
        return Err("size must be non-zero".into());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pointer_pairs() {
        assert_eq!(parse_pointer("0.25, 0.75").unwrap(), [0.25, 0.75]);
        assert!(parse_pointer("0.5").is_err());
        assert!(parse_pointer("1.5,0").is_err());
    }

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("640x480").unwrap(), (640, 480));
        assert_eq!(parse_size("32X16").unwrap(), (32, 16));
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("wide").is_err());
    }

    #[test]
    fn export_requires_effect_image_and_out() {
        let cli = Cli::try_parse_from([
            "warpfx", "export", "--effect", "glitch", "--image", "a.png", "--out", "b.png",
            "--hover",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Export(args)) => {
                assert_eq!(args.effect, EffectKind::Glitch);
                assert_eq!(args.steps, 60);
                assert_eq!(args.pointer, [0.5, 0.5]);
                assert!(args.hover);
                assert_eq!(args.from, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["warpfx", "export", "--effect", "glitch"]).is_err());
    }

    #[test]
    fn export_accepts_a_starting_pointer() {
        let cli = Cli::try_parse_from([
            "warpfx", "export", "--effect", "ripple", "--image", "a.png", "--out", "b.png",
            "--from", "0.1,0.2", "--pointer", "0.7,0.2",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Export(args)) => {
                assert_eq!(args.from, Some([0.1, 0.2]));
                assert_eq!(args.pointer, [0.7, 0.2]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn positional_images_feed_the_run_args() {
        let cli = Cli::try_parse_from(["warpfx", "--effect", "wavy", "a.png", "b.png"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.images, vec!["a.png", "b.png"]);
        assert_eq!(cli.run.effect, Some(EffectKind::Wavy));
    }
}
