//! The effect host: owns the GPU scene and every mounted panel.
//!
//! One host drives all panels of a window. Each frame it collects finished
//! texture loads, advances the shared step clock, asks every drawable panel
//! for uniforms, and draws each panel into its own viewport.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use effects::{build_strategy, ListenerKind, PointerEvent, StepClock};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::Window;

use crate::gpu::{EffectUniforms, GpuContext, PanelResources, PanelTexture, PipelineCache};
use crate::layout::PanelRect;
use crate::lifecycle::{EffectInstance, TextureEvent};
use crate::listeners::{ListenerTable, PanelId};
use crate::loader::spawn_load;
use crate::routing::PointerRouter;
use crate::style::{EaseCurve, SaturationTransition};
use crate::types::RendererConfig;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.06,
    g: 0.06,
    b: 0.07,
    a: 1.0,
};

struct GpuScene {
    gpu: GpuContext,
    pipelines: PipelineCache,
}

struct MountedPanel {
    instance: EffectInstance,
    resources: Option<PanelResources>,
    saturation: Option<SaturationTransition>,
}

pub(crate) struct EffectHost {
    window: Arc<Window>,
    config: RendererConfig,
    scene: Option<GpuScene>,
    panels: Vec<MountedPanel>,
    listeners: ListenerTable,
    router: PointerRouter,
    clock: StepClock,
    rects: Vec<PanelRect>,
    scale_factor: f64,
}

impl EffectHost {
    pub(crate) fn new(window: Arc<Window>, config: RendererConfig) -> Result<Self> {
        let scale_factor = window.scale_factor();
        let clock = StepClock::new(config.step_hz, config.max_catch_up);
        let mut host = Self {
            window,
            config,
            scene: None,
            panels: Vec::new(),
            listeners: ListenerTable::new(),
            router: PointerRouter::new(),
            clock,
            rects: Vec::new(),
            scale_factor,
        };
        host.scene = Some(host.build_scene()?);
        host.relayout();
        host.mount_all()?;
        Ok(host)
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn build_scene(&self) -> Result<GpuScene> {
        let gpu = GpuContext::new(
            self.window.as_ref(),
            self.window.inner_size(),
            self.config.color_space,
            self.config.power,
            self.config.vsync,
        )
        .context("failed to initialise GPU context")?;
        tracing::info!(
            adapter = %gpu.adapter_profile.name,
            backend = ?gpu.adapter_profile.backend,
            "GPU context ready"
        );
        let pipelines = PipelineCache::new(&gpu.device, gpu.surface_format);
        Ok(GpuScene { gpu, pipelines })
    }

    /// Mounts one instance per configured panel and starts its image load.
    fn mount_all(&mut self) -> Result<()> {
        let Some(scene) = self.scene.as_mut() else {
            anyhow::bail!("cannot mount panels without a GPU context");
        };
        let max_dimension = scene.gpu.max_texture_dimension();
        let now = Instant::now();
        for (id, spec) in self.config.panels.iter().enumerate() {
            scene.pipelines.prepare(&scene.gpu.device, spec.effect);
            let strategy = build_strategy(spec.effect, &self.config.tuning, spec.seed);
            let saturation = strategy
                .saturation_style()
                .map(|style| SaturationTransition::new(style, EaseCurve::default(), now));
            let pending = spawn_load(spec.image.clone(), self.config.fetch, max_dimension)
                .with_context(|| format!("failed to start loading {}", spec.image))?;
            let instance = EffectInstance::mount(id, strategy, pending, &mut self.listeners);
            tracing::info!(panel = id, effect = %spec.effect, image = %spec.image, "loading panel");
            self.panels.push(MountedPanel {
                instance,
                resources: None,
                saturation,
            });
        }
        self.clock.reset();
        Ok(())
    }

    fn unmount_all(&mut self) {
        for panel in &mut self.panels {
            panel.instance.unmount(&mut self.listeners);
        }
        self.panels.clear();
        self.router.reset();
        if !self.listeners.is_empty() {
            tracing::warn!(
                remaining = self.listeners.len(),
                "listeners left registered after unmount"
            );
        }
    }

    /// Tears down every panel and the GPU context, then builds both again.
    pub(crate) fn recover(&mut self) -> Result<()> {
        tracing::warn!("rebuilding GPU context and remounting panels");
        self.unmount_all();
        self.scene = None;
        self.scene = Some(self.build_scene()?);
        self.relayout();
        self.mount_all()
    }

    pub(crate) fn is_device_lost(&self) -> bool {
        self.scene
            .as_ref()
            .is_some_and(|scene| scene.gpu.is_device_lost())
    }

    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(scene) = self.scene.as_mut() {
            if scene.gpu.resize(size) {
                tracing::debug!(width = size.width, height = size.height, "surface resized");
            }
        }
        self.relayout();
    }

    pub(crate) fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
        self.relayout();
    }

    pub(crate) fn reconfigure(&mut self) {
        if let Some(scene) = self.scene.as_mut() {
            scene.gpu.reconfigure();
        }
    }

    fn surface_size(&self) -> PhysicalSize<u32> {
        self.scene
            .as_ref()
            .map(|scene| scene.gpu.size)
            .unwrap_or_else(|| self.window.inner_size())
    }

    /// Recomputes panel rectangles from the current surface size.
    ///
    /// Shaders work in panel-normalized UVs, so a resize reaches a panel only
    /// through its viewport. Resize listeners are tracked for bookkeeping and
    /// get a trace line per new rectangle.
    fn relayout(&mut self) {
        let size = self.surface_size();
        self.rects = self
            .config
            .layout
            .compute(self.config.panels.len(), size, self.scale_factor);
        for id in self.listeners.panels_for(ListenerKind::Resize) {
            if let Some(rect) = self.rects.get(id) {
                tracing::trace!(panel = id, width = rect.width, height = rect.height, "panel resized");
            }
        }
    }

    pub(crate) fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let events = self.router.moved(&self.rects, position.x, position.y);
        for (panel, event) in events {
            self.dispatch(panel, event);
        }
    }

    pub(crate) fn cursor_left(&mut self) {
        if let Some((panel, event)) = self.router.left() {
            self.dispatch(panel, event);
        }
    }

    fn dispatch(&mut self, id: PanelId, event: PointerEvent) {
        let Some(panel) = self.panels.get_mut(id) else {
            return;
        };
        if let Some(saturation) = panel.saturation.as_mut() {
            match event {
                PointerEvent::Enter { .. } => saturation.set_hovered(true, Instant::now()),
                PointerEvent::Leave => saturation.set_hovered(false, Instant::now()),
                PointerEvent::Move { .. } => {}
            }
        }
        if self.listeners.wants(id, event.listener()) {
            panel.instance.handle_pointer(event);
        }
    }

    /// Uploads textures for loads that finished since the last frame.
    fn collect_textures(&mut self) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let gpu = &scene.gpu;
        let layouts = scene.pipelines.layouts();
        for (id, panel) in self.panels.iter_mut().enumerate() {
            let texture = match panel.instance.poll_texture() {
                Some(TextureEvent::Loaded(image)) => PanelTexture::upload(
                    &gpu.device,
                    &gpu.queue,
                    &image,
                    gpu.color_space,
                    "panel texture",
                ),
                Some(TextureEvent::Failed(_)) => {
                    PanelTexture::placeholder(&gpu.device, &gpu.queue, gpu.color_space)
                }
                None => continue,
            };
            tracing::debug!(
                panel = id,
                width = texture.size.0,
                height = texture.size.1,
                "panel texture uploaded"
            );
            match panel.resources.as_mut() {
                Some(resources) => resources.replace_texture(&gpu.device, layouts, texture),
                None => {
                    panel.resources = Some(PanelResources::new(&gpu.device, layouts, texture));
                }
            }
        }
    }

    /// Draws one frame. Surface errors are returned for the caller to handle.
    pub(crate) fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.collect_textures();
        let now = Instant::now();
        let tick = self.clock.advance(now);
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        let gpu = &scene.gpu;
        let target = (gpu.size.width, gpu.size.height);

        let mut draws = Vec::with_capacity(self.panels.len());
        for (id, panel) in self.panels.iter_mut().enumerate() {
            let Some(rect) = self.rects.get(id).and_then(|rect| rect.clip(target.0, target.1))
            else {
                continue;
            };
            let Some(frame) = panel.instance.tick(tick) else {
                continue;
            };
            let Some(resources) = panel.resources.as_ref() else {
                continue;
            };
            let saturation = panel
                .saturation
                .as_ref()
                .map_or(1.0, |transition| transition.value(now));
            let uniforms = EffectUniforms::new(&frame, saturation);
            resources.write(&gpu.queue, &uniforms);
            draws.push((id, rect));
        }
        tracing::trace!(steps = tick.steps, draws = draws.len(), "frame prepared");

        let frame = gpu.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("panel encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("panel pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for (id, rect) in draws {
                let panel = &self.panels[id];
                let (Some(pipeline), Some(resources)) = (
                    scene.pipelines.get(panel.instance.kind()),
                    panel.resources.as_ref(),
                ) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                resources.bind(&mut pass);
                pass.set_viewport(
                    rect.x as f32,
                    rect.y as f32,
                    rect.width as f32,
                    rect.height as f32,
                    0.0,
                    1.0,
                );
                pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
                pass.draw(0..3, 0..1);
            }
        }
        gpu.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl Drop for EffectHost {
    fn drop(&mut self) {
        self.unmount_all();
    }
}
