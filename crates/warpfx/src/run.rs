use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use effects::EffectKind;
use renderer::{
    ColorSpaceMode, FetchOptions, GpuPowerPreference, ImageSource, PanelLayout, PanelSpec,
    Renderer, RendererConfig,
};
use tracing_subscriber::EnvFilter;
use warpconfig::{ColorSpaceSetting, PanelConfig, PowerSetting, WarpConfig};

use crate::cli::RunArgs;
use crate::paths::AppPaths;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    BuiltIn,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::File(path) => write!(f, "{}", path.display()),
            ConfigOrigin::BuiltIn => f.write_str("built-in demo"),
        }
    }
}

/// Reads `path` and validates it.
pub fn read_config(path: &Path) -> Result<WarpConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    WarpConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))
}

/// Resolves the configuration: an explicit path must exist, the discovered
/// file is optional and falls back to the built-in demo.
pub fn resolve_config(explicit: Option<&Path>) -> Result<(WarpConfig, ConfigOrigin)> {
    if let Some(path) = explicit {
        let config = read_config(path)?;
        return Ok((config, ConfigOrigin::File(path.to_path_buf())));
    }
    let discovered = AppPaths::discover()?.config_file();
    if discovered.is_file() {
        let config = read_config(&discovered)?;
        return Ok((config, ConfigOrigin::File(discovered)));
    }
    tracing::debug!(path = %discovered.display(), "no config file; using built-in demo");
    Ok((WarpConfig::demo(), ConfigOrigin::BuiltIn))
}

/// Replaces the configured panels with the images given on the command line.
pub fn apply_overrides(config: &mut WarpConfig, args: &RunArgs) {
    if !args.images.is_empty() {
        config.panels = args
            .images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                let effect = args
                    .effect
                    .unwrap_or(EffectKind::ALL[index % EffectKind::ALL.len()]);
                PanelConfig::new(effect, image.clone())
            })
            .collect();
    } else if let Some(effect) = args.effect {
        for panel in &mut config.panels {
            panel.effect = effect;
        }
    }
    if args.no_vsync {
        config.window.vsync = false;
    }
}

pub fn renderer_config(config: &WarpConfig) -> RendererConfig {
    RendererConfig {
        title: config.window.title.clone(),
        window_size: (config.window.width, config.window.height),
        vsync: config.window.vsync,
        power: match config.window.power {
            PowerSetting::High => GpuPowerPreference::High,
            PowerSetting::Low => GpuPowerPreference::Low,
        },
        color_space: match config.window.color_space {
            ColorSpaceSetting::Gamma => ColorSpaceMode::Gamma,
            ColorSpaceSetting::Linear => ColorSpaceMode::Linear,
        },
        layout: PanelLayout {
            padding: config.layout.padding,
            gap: config.layout.gap,
            panel_width: config.layout.panel_width,
            panel_height: config.layout.panel_height,
        },
        panels: config
            .panels
            .iter()
            .enumerate()
            .map(|(index, panel)| PanelSpec {
                effect: panel.effect,
                image: ImageSource::parse(&panel.image),
                seed: config.panel_seed(index),
            })
            .collect(),
        tuning: config.tuning.clone(),
        fetch: fetch_options(config),
        step_hz: config.simulation.step_hz,
        max_catch_up: config.simulation.max_catch_up,
    }
}

pub fn fetch_options(config: &WarpConfig) -> FetchOptions {
    FetchOptions {
        timeout: config.fetch.timeout,
        max_bytes: config.fetch.max_bytes,
    }
}

pub fn run(explicit_config: Option<&Path>, args: RunArgs) -> Result<()> {
    let (mut config, origin) = resolve_config(explicit_config)?;
    apply_overrides(&mut config, &args);
    config
        .validate()
        .context("command-line overrides produced an invalid configuration")?;
    tracing::info!(config = %origin, panels = config.panels.len(), "starting warpfx");
    for (index, panel) in config.panels.iter().enumerate() {
        tracing::debug!(panel = index, effect = %panel.effect, image = %panel.image, "panel");
    }
    Renderer::new(renderer_config(&config)).run()
}
