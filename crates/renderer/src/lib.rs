//! Renderer crate for warpfx: a row of image panels, each distorted by a
//! pointer-driven effect.
//!
//! ```text
//!   warpfx CLI / warpconfig
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ EffectHost ──▶ winit event loop ──▶ render()
//!                        │  ▲                               │
//!          pointer events│  │TextureEvent                   └─▶ EffectUniforms ─▶ GPU
//!                        ▼  │
//!                  EffectInstance (Loading → Ready | Degraded → Unmounted)
//! ```
//!
//! The host owns the GPU context, one cached pipeline per effect kind, and one
//! [`EffectInstance`] per panel. Instances wrap an [`effects::EffectStrategy`]
//! and register the listener kinds it asks for in the host's
//! [`ListenerTable`]. Images load on worker threads and are uploaded as soon
//! as they arrive; a panel whose image fails keeps running over a
//! checkerboard placeholder.

mod compile;
mod gpu;
mod host;
pub mod layout;
pub mod lifecycle;
pub mod listeners;
pub mod loader;
pub mod routing;
pub mod style;
mod types;
mod window;

use anyhow::Result;

pub use layout::{PanelLayout, PanelRect};
pub use lifecycle::{EffectInstance, Lifecycle, TextureEvent};
pub use listeners::{ListenerHooks, ListenerTable, PanelId};
pub use loader::{load_image, FetchOptions, ImageSource, TextureLoadError};
pub use style::{EaseCurve, SaturationTransition};
pub use types::{AdapterProfile, ColorSpaceMode, GpuPowerPreference, PanelSpec, RendererConfig};

/// Entry point that owns the configuration and runs the window.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Blocks until the window is closed.
    pub fn run(self) -> Result<()> {
        if self.config.panels.is_empty() {
            anyhow::bail!("no panels configured; nothing to render");
        }
        tracing::debug!(
            panels = self.config.panels.len(),
            step_hz = self.config.step_hz,
            vsync = self.config.vsync,
            color_space = ?self.config.color_space,
            "starting renderer"
        );
        window::run_window(self.config)
    }
}
