use std::sync::Arc;

use pixels::{Error as PixelsError, TextureError};
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::config::{ConfigError, ViewerConfig};
use crate::report::{HttpDecisionReporter, ReportError};

use super::input::InputRouter;
use super::rendering::Renderer;
use super::session::ViewerSession;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start decision reporter: {0}")]
    Reporter(#[source] ReportError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("failed to size render surface: {0}")]
    ResizeSurface(#[source] TextureError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: ViewerConfig) -> Result<(), AppError> {
    config.validate()?;
    let actor = config.build_actor()?;
    let reporter = HttpDecisionReporter::new(config.endpoint_url.clone(), config.report_timeout)
        .map_err(AppError::Reporter)?;
    let report_metrics = reporter.metrics();
    info!(
        map_width = config.map_width,
        map_height = config.map_height,
        cell_size = config.cell_size,
        zoom = config.zoom,
        start_x = actor.state().x,
        start_y = actor.state().y,
        endpoint_url = %config.endpoint_url,
        report_timeout_ms = config.report_timeout.as_millis() as u64,
        "viewer_config"
    );

    let router = InputRouter::new(actor, Box::new(reporter));
    let mut session: ViewerSession<Renderer> =
        ViewerSession::new(router, config.render_cell_size());

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    let size = window.inner_size();
    session
        .resize(size.width, size.height)
        .map_err(AppError::ResizeSurface)?;
    session
        .attach_binding(renderer)
        .map_err(AppError::ResizeSurface)?;

    event_loop.set_control_flow(ControlFlow::Wait);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = session.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    window.request_redraw();
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = session.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed {
                        return;
                    }
                    if is_quit_key(&event) {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                        return;
                    }
                    // winit has no default key action to suppress.
                    if let Some(key) = key_name(&event.logical_key) {
                        if session.handle_key(key).moved_state().is_some() {
                            window.request_redraw();
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Some(renderer) = session.binding_mut() {
                        if let Err(error) = renderer.render() {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                    }
                }
                _ => {}
            },
            Event::LoopExiting => {
                let reports = report_metrics.snapshot();
                info!(
                    reports_dispatched = reports.dispatched,
                    reports_succeeded = reports.succeeded,
                    reports_failed = reports.failed,
                    reports_in_flight = reports.in_flight(),
                    "shutdown"
                );
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn is_quit_key(key_event: &KeyEvent) -> bool {
    matches!(key_event.logical_key, Key::Named(NamedKey::Escape))
}

fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp"),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown"),
        Key::Named(NamedKey::ArrowLeft) => Some("ArrowLeft"),
        Key::Named(NamedKey::ArrowRight) => Some("ArrowRight"),
        Key::Character(text) => Some(text.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::input::InputAction;

    #[test]
    fn named_arrow_keys_map_to_router_names() {
        assert_eq!(key_name(&Key::Named(NamedKey::ArrowUp)), Some("ArrowUp"));
        assert_eq!(
            key_name(&Key::Named(NamedKey::ArrowRight)),
            Some("ArrowRight")
        );
        assert_eq!(key_name(&Key::Named(NamedKey::Tab)), None);
    }

    #[test]
    fn character_keys_pass_through_to_router() {
        let key: Key = Key::Character("a".into());
        let name = key_name(&key).expect("name");
        assert_eq!(InputAction::from_key_name(name), Some(InputAction::MoveLeft));
    }

    #[test]
    fn every_mapped_named_key_is_recognized_by_router() {
        for named in [
            NamedKey::ArrowUp,
            NamedKey::ArrowDown,
            NamedKey::ArrowLeft,
            NamedKey::ArrowRight,
        ] {
            let key = Key::Named(named);
            let name = key_name(&key).expect("name");
            assert!(InputAction::from_key_name(name).is_some(), "{name}");
        }
    }
}
