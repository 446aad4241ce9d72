use effects::{EffectKind, Tuning};

use crate::layout::PanelLayout;
use crate::loader::{FetchOptions, ImageSource};

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Treat images and shader outputs as gamma-encoded; use non-sRGB surfaces.
    #[default]
    Gamma,
    /// Decode images to linear and let an sRGB swapchain re-encode on write.
    Linear,
}

/// Adapter selection hint forwarded to `wgpu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    #[default]
    High,
    Low,
}

/// Summary of the adapter the context ended up on, kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
    pub max_texture_dimension: u32,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo, limits: &wgpu::Limits) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
            max_texture_dimension: limits.max_texture_dimension_2d,
        }
    }

    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
    }
}

/// One panel of the page: which effect runs over which image.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub effect: EffectKind,
    pub image: ImageSource,
    pub seed: u64,
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub window_size: (u32, u32),
    pub vsync: bool,
    pub power: GpuPowerPreference,
    pub color_space: ColorSpaceMode,
    pub layout: PanelLayout,
    pub panels: Vec<PanelSpec>,
    pub tuning: Tuning,
    pub fetch: FetchOptions,
    pub step_hz: f32,
    pub max_catch_up: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "warpfx".into(),
            window_size: (1_612, 480),
            vsync: true,
            power: GpuPowerPreference::default(),
            color_space: ColorSpaceMode::default(),
            layout: PanelLayout::default(),
            panels: Vec::new(),
            tuning: Tuning::default(),
            fetch: FetchOptions::default(),
            step_hz: 60.0,
            max_catch_up: 4,
        }
    }
}
