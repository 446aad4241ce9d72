//! GPU side of the effect host.
//!
//! - `context` owns the wgpu instance, device, and swapchain, and reports
//!   device loss so the host can rebuild everything.
//! - `pipeline` compiles one full-screen-triangle pipeline per effect kind and
//!   shares the bind group layouts between them.
//! - `panel` holds a panel's uniform buffer, texture, and bind groups.
//! - `texture` uploads decoded images (or the failure placeholder).
//! - `uniforms` mirrors the shader's `EffectParams` block.

mod context;
mod panel;
mod pipeline;
mod texture;
mod uniforms;

pub(crate) use context::GpuContext;
pub(crate) use panel::PanelResources;
pub(crate) use pipeline::PipelineCache;
pub(crate) use texture::PanelTexture;
pub(crate) use uniforms::EffectUniforms;
