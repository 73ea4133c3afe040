//! Overlay daemon: the always-on-top reticle process
//!
//! Runs a single-threaded loop that owns the X11 connection, the drag state
//! machine, and the (lazily created) overlay surface. GUI requests arrive
//! over the IPC channel and are serviced between redraw ticks.

mod ipc_handler;
mod shapes;
mod state;
mod surface;

use anyhow::{Context, Result};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

use crate::config::CrosshairConfig;
use crate::constants::overlay::{POLL_INTERVAL_MS, TICK_INTERVAL_MS};
use crate::ipc::{OverlayRequest, OverlayResponse, OverlayServer};
use crate::types::{Position, ScreenSize};

use state::ReticleState;
use surface::OverlaySurface;

/// Run the overlay daemon until a Shutdown request arrives
pub fn run_overlay_daemon() -> Result<()> {
    let (conn, screen_num) =
        RustConnection::connect(None).context("Failed to connect to X11 server")?;
    let screen = conn.setup().roots[screen_num].clone();
    let screen_size = ScreenSize::new(screen.width_in_pixels, screen.height_in_pixels);
    info!(
        width = screen_size.width,
        height = screen_size.height,
        "Overlay daemon connected to X11"
    );

    let server = OverlayServer::bind().context("Failed to bind overlay IPC socket")?;
    let (command_tx, command_rx) = mpsc::channel();
    let _listener = ipc_handler::spawn_ipc_listener(server, command_tx);

    let mut state = ReticleState::new(CrosshairConfig::default(), screen_size);
    let mut surface: Option<OverlaySurface<'_>> = None;
    let mut last_tick = Instant::now();

    loop {
        // X events first so drag motion is never stale when we redraw
        while let Some(event) = conn.poll_for_event().context("Failed to poll X11 events")? {
            handle_x_event(&event, &mut state, surface.as_ref())?;
        }

        let mut shutdown = false;
        while let Ok((request, reply_tx)) = command_rx.try_recv() {
            shutdown |= matches!(request, OverlayRequest::Shutdown);
            let response = handle_request(request, &conn, &screen, &mut state, &mut surface)
                .unwrap_or_else(|e| {
                    error!(error = ?e, "Failed to service overlay request");
                    OverlayResponse::Error(format!("{e:#}"))
                });
            if reply_tx.send(response).is_err() {
                warn!("IPC listener dropped reply channel");
            }
        }
        if shutdown {
            break;
        }

        if last_tick.elapsed() >= Duration::from_millis(TICK_INTERVAL_MS) {
            last_tick = Instant::now();
            if let Some(ref surface) = surface
                && surface.visible()
            {
                surface.raise()?;
                surface.draw(state.config(), state.anchor())?;
            }
        }

        std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
    }

    info!("Overlay daemon shutting down");
    Ok(())
}

fn handle_x_event(
    event: &Event,
    state: &mut ReticleState,
    surface: Option<&OverlaySurface<'_>>,
) -> Result<()> {
    match event {
        Event::ButtonPress(press) if press.detail == 1 => {
            state.pointer_press(Position::new(press.root_x.into(), press.root_y.into()));
        }
        Event::ButtonRelease(release) if release.detail == 1 => {
            state.pointer_release();
        }
        Event::MotionNotify(motion) => {
            let moved =
                state.pointer_move(Position::new(motion.root_x.into(), motion.root_y.into()));
            if moved && let Some(surface) = surface {
                surface.draw(state.config(), state.anchor())?;
            }
        }
        Event::Expose(_) => {
            if let Some(surface) = surface
                && surface.visible()
            {
                surface.draw(state.config(), state.anchor())?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_request<'a>(
    request: OverlayRequest,
    conn: &'a RustConnection,
    screen: &x11rb::protocol::xproto::Screen,
    state: &mut ReticleState,
    surface: &mut Option<OverlaySurface<'a>>,
) -> Result<OverlayResponse> {
    match request {
        OverlayRequest::Show => {
            if surface.is_none() {
                *surface = Some(
                    OverlaySurface::new(conn, screen).context("Failed to create overlay window")?,
                );
            }
            if let Some(surface) = surface.as_mut() {
                surface.show()?;
                surface.set_click_through(!state.drag_mode())?;
                surface.draw(state.config(), state.anchor())?;
            }
            Ok(OverlayResponse::Ack)
        }

        OverlayRequest::Hide => {
            if let Some(surface) = surface {
                surface.hide()?;
            }
            Ok(OverlayResponse::Ack)
        }

        OverlayRequest::UpdateConfig(mut config) => {
            config.validate_and_clamp();
            debug!(shape = ?config.shape, "Applying pushed configuration");
            state.update_config(config);
            redraw_if_visible(state, surface.as_ref())?;
            Ok(OverlayResponse::Ack)
        }

        OverlayRequest::ToggleDragMode => {
            let dragging = state.toggle_drag_mode();
            if let Some(surface) = surface {
                surface.set_click_through(!dragging)?;
            }
            redraw_if_visible(state, surface.as_ref())?;
            Ok(OverlayResponse::DragMode(dragging))
        }

        OverlayRequest::GetPosition => {
            let pos = state.crosshair_position();
            Ok(OverlayResponse::Position { x: pos.x, y: pos.y })
        }

        OverlayRequest::Center => {
            state.center();
            redraw_if_visible(state, surface.as_ref())?;
            Ok(OverlayResponse::Ack)
        }

        OverlayRequest::Ping => Ok(OverlayResponse::Pong),

        OverlayRequest::Shutdown => Ok(OverlayResponse::Ack),
    }
}

fn redraw_if_visible(state: &ReticleState, surface: Option<&OverlaySurface<'_>>) -> Result<()> {
    if let Some(surface) = surface
        && surface.visible()
    {
        surface.draw(state.config(), state.anchor())?;
    }
    Ok(())
}
