//! The transparent, click-through X11 overlay window
//!
//! A full-screen, override-redirect window on a 32-bit ARGB visual. Drawing
//! goes through XRender fill requests; input transparency is a SHAPE
//! extension input region, toggled in place (no hide/show cycle needed on
//! X11).

use anyhow::{Context, Result, anyhow};
use tracing::{error, info};
use x11rb::connection::Connection;
use x11rb::protocol::render::{
    ConnectionExt as RenderExt, CreatePictureAux, PictOp, Pictformat, Picture,
};
use x11rb::protocol::shape::{ConnectionExt as ShapeExt, SK, SO};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

use crate::color::HexColor;
use crate::config::CrosshairConfig;
use crate::constants::{overlay, x11};
use crate::overlay::shapes;
use crate::types::{Position, ScreenSize};

const TRANSPARENT: x11rb::protocol::render::Color =
    x11rb::protocol::render::Color { red: 0, green: 0, blue: 0, alpha: 0 };

pub struct OverlaySurface<'a> {
    conn: &'a RustConnection,
    screen_size: ScreenSize,
    window: Window,
    colormap: Colormap,
    picture: Picture,
    visible: bool,
}

impl<'a> OverlaySurface<'a> {
    pub fn new(conn: &'a RustConnection, screen: &Screen) -> Result<Self> {
        let screen_size = ScreenSize::new(screen.width_in_pixels, screen.height_in_pixels);

        conn.shape_query_version()
            .context("Failed to query SHAPE extension version (is SHAPE available?)")?
            .reply()
            .context("Failed to get SHAPE extension version reply")?;

        let visual = find_argb_visual(screen)
            .ok_or_else(|| anyhow!("No 32-bit TrueColor visual available (compositor required)"))?;

        let colormap = conn.generate_id().context("Failed to generate colormap ID")?;
        conn.create_colormap(ColormapAlloc::NONE, colormap, screen.root, visual)
            .context("Failed to create ARGB colormap")?;

        let window = conn.generate_id().context("Failed to generate overlay window ID")?;
        conn.create_window(
            x11::ARGB_DEPTH,
            window,
            screen.root,
            0,
            0,
            screen.width_in_pixels,
            screen.height_in_pixels,
            0,
            WindowClass::INPUT_OUTPUT,
            visual,
            &CreateWindowAux::new()
                .background_pixel(0)
                .border_pixel(0)
                .colormap(colormap)
                .override_redirect(x11::OVERRIDE_REDIRECT)
                .event_mask(
                    EventMask::BUTTON_PRESS
                        | EventMask::BUTTON_RELEASE
                        | EventMask::POINTER_MOTION
                        | EventMask::EXPOSURE,
                ),
        )
        .context("Failed to create overlay window")?;

        Self::setup_window_properties(conn, window)?;

        let pict_format = find_pictformat(conn, x11::ARGB_DEPTH)
            .context("Failed to find ARGB picture format for overlay rendering")?;
        let picture = conn.generate_id().context("Failed to generate picture ID")?;
        conn.render_create_picture(picture, window, pict_format, &CreatePictureAux::new())
            .context("Failed to create picture for overlay window")?;

        let surface = Self {
            conn,
            screen_size,
            window,
            colormap,
            picture,
            visible: false,
        };

        // Start click-through: the reticle is purely decorative until drag
        // mode is requested
        surface.set_click_through(true)?;
        conn.flush().context("Failed to flush X11 connection after surface setup")?;
        info!(
            window = window,
            width = screen.width_in_pixels,
            height = screen.height_in_pixels,
            "Created overlay surface"
        );

        Ok(surface)
    }

    fn setup_window_properties(conn: &RustConnection, window: Window) -> Result<()> {
        let wm_class = conn
            .intern_atom(false, b"WM_CLASS")
            .context("Failed to intern WM_CLASS atom")?
            .reply()
            .context("Failed to get reply for WM_CLASS atom")?
            .atom;
        conn.change_property8(
            PropMode::REPLACE,
            window,
            wm_class,
            AtomEnum::STRING,
            overlay::WM_CLASS,
        )
        .context("Failed to set WM_CLASS on overlay window")?;

        let net_wm_state = conn
            .intern_atom(false, b"_NET_WM_STATE")
            .context("Failed to intern _NET_WM_STATE atom")?
            .reply()
            .context("Failed to get reply for _NET_WM_STATE atom")?
            .atom;
        let above = conn
            .intern_atom(false, b"_NET_WM_STATE_ABOVE")
            .context("Failed to intern _NET_WM_STATE_ABOVE atom")?
            .reply()
            .context("Failed to get reply for _NET_WM_STATE_ABOVE atom")?
            .atom;
        conn.change_property32(PropMode::REPLACE, window, net_wm_state, AtomEnum::ATOM, &[above])
            .context("Failed to set always-on-top state on overlay window")?;

        Ok(())
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) -> Result<()> {
        if self.visible {
            return Ok(());
        }
        self.conn.map_window(self.window).context("Failed to map overlay window")?;
        self.raise()?;
        self.conn.flush().context("Failed to flush X11 connection after map")?;
        self.visible = true;
        Ok(())
    }

    pub fn hide(&mut self) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        self.conn.unmap_window(self.window).context("Failed to unmap overlay window")?;
        self.conn.flush().context("Failed to flush X11 connection after unmap")?;
        self.visible = false;
        Ok(())
    }

    pub fn raise(&self) -> Result<()> {
        self.conn
            .configure_window(self.window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))
            .context("Failed to raise overlay window")?;
        Ok(())
    }

    /// Toggle input transparency in place via the SHAPE input region.
    ///
    /// An empty region lets every pointer event pass through to whatever is
    /// beneath; the full region restores normal input for drag mode.
    pub fn set_click_through(&self, enabled: bool) -> Result<()> {
        let rects: &[Rectangle] = if enabled {
            &[]
        } else {
            &[Rectangle {
                x: 0,
                y: 0,
                width: self.screen_size.width,
                height: self.screen_size.height,
            }]
        };
        self.conn
            .shape_rectangles(
                SO::SET,
                SK::INPUT,
                ClipOrdering::UNSORTED,
                self.window,
                0,
                0,
                rects,
            )
            .context("Failed to update overlay input region")?;
        self.conn.flush().context("Failed to flush X11 connection after input region change")?;
        Ok(())
    }

    /// Redraw one frame: clear the whole surface, then fill the reticle spans
    /// with the configured color at the configured opacity.
    pub fn draw(&self, config: &CrosshairConfig, anchor: Position) -> Result<()> {
        let full = Rectangle {
            x: 0,
            y: 0,
            width: self.screen_size.width,
            height: self.screen_size.height,
        };
        self.conn
            .render_fill_rectangles(PictOp::SRC, self.picture, TRANSPARENT, &[full])
            .context("Failed to clear overlay surface")?;

        let color = HexColor::parse(&config.color)
            .unwrap_or(HexColor { r: 255, g: 0, b: 0 })
            .to_render_color(config.opacity);
        let rects = shapes::spans(config, anchor);
        self.conn
            .render_fill_rectangles(PictOp::OVER, self.picture, color, &rects)
            .context("Failed to fill reticle spans")?;

        self.conn.flush().context("Failed to flush X11 connection after draw")?;
        Ok(())
    }
}

impl Drop for OverlaySurface<'_> {
    fn drop(&mut self) {
        // Clean up each resource independently to prevent cascade failures
        if let Err(e) = self.conn.render_free_picture(self.picture) {
            error!(picture = self.picture, error = %e, "Failed to free overlay picture");
        }
        if let Err(e) = self.conn.destroy_window(self.window) {
            error!(window = self.window, error = %e, "Failed to destroy overlay window");
        }
        if let Err(e) = self.conn.free_colormap(self.colormap) {
            error!(colormap = self.colormap, error = %e, "Failed to free overlay colormap");
        }
        if let Err(e) = self.conn.flush() {
            error!(error = %e, "Failed to flush X11 connection during surface cleanup");
        }
    }
}

/// Find a 32-bit TrueColor visual for ARGB windows
fn find_argb_visual(screen: &Screen) -> Option<Visualid> {
    screen
        .allowed_depths
        .iter()
        .find(|depth| depth.depth == x11::ARGB_DEPTH)?
        .visuals
        .iter()
        .find(|visual| visual.class == VisualClass::TRUE_COLOR)
        .map(|visual| visual.visual_id)
}

/// Find the picture format matching the given depth with an alpha channel
fn find_pictformat(conn: &RustConnection, depth: u8) -> Result<Pictformat> {
    conn.render_query_pict_formats()
        .context("Failed to query RENDER picture formats")?
        .reply()
        .context("Failed to get reply for RENDER picture formats query")?
        .formats
        .iter()
        .find(|format| format.depth == depth && format.direct.alpha_mask != 0)
        .map(|format| format.id)
        .ok_or_else(|| {
            anyhow!("No picture format with depth {depth} and alpha (check RENDER extension)")
        })
}
