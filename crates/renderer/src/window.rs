use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::host::EffectHost;
use crate::types::RendererConfig;

/// Opens the window and drives the host until the window closes.
pub(crate) fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (width, height) = config.window_size;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(width as f64, height as f64))
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let mut host = EffectHost::new(Arc::clone(&window), config)?;
    host.window().request_redraw();

    let mut failure: Option<anyhow::Error> = None;
    let failure_slot = &mut failure;
    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == host.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    host.cursor_moved(position);
                }
                WindowEvent::CursorLeft { .. } => {
                    host.cursor_left();
                }
                WindowEvent::Resized(new_size) => {
                    host.resize(new_size);
                }
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    host.set_scale_factor(scale_factor);
                }
                WindowEvent::RedrawRequested => {
                    if host.is_device_lost() {
                        if let Err(err) = host.recover() {
                            *failure_slot = Some(err);
                            elwt.exit();
                        }
                        return;
                    }
                    match host.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            tracing::debug!("surface stale; reconfiguring");
                            host.reconfigure();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            tracing::warn!("surface timeout; skipping frame");
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::warn!("surface out of memory; rebuilding GPU state");
                            if let Err(err) = host.recover() {
                                *failure_slot = Some(err);
                                elwt.exit();
                            }
                        }
                        Err(other) => {
                            tracing::warn!(error = ?other, "surface error; retrying next frame");
                        }
                    }
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            tracing::trace!("requesting redraw");
            host.window().request_redraw();
            elwt.set_control_flow(ControlFlow::Wait);
        }
        _ => {}
    });

    if let Some(err) = failure {
        return Err(err.context("GPU recovery failed"));
    }
    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
