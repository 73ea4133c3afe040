//! IPC message types for the settings GUI ↔ overlay daemon channel

use serde::{Deserialize, Serialize};

use crate::config::CrosshairConfig;

/// Requests sent from the GUI to the overlay daemon
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum OverlayRequest {
    /// Map the overlay window (creates it lazily on first use)
    Show,

    /// Unmap the overlay window, keeping its state
    Hide,

    /// Replace the active crosshair configuration
    UpdateConfig(CrosshairConfig),

    /// Flip between click-through and interactive drag mode
    ToggleDragMode,

    /// Query the current reticle position in screen pixels
    GetPosition,

    /// Re-anchor the reticle to the screen center
    Center,

    /// Health check
    Ping,

    /// Request graceful shutdown
    Shutdown,
}

/// Responses sent from the overlay daemon to the GUI
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum OverlayResponse {
    /// Generic success
    Ack,

    /// Resulting mode after ToggleDragMode (true = dragging)
    DragMode(bool),

    /// Current reticle position (response to GetPosition)
    Position { x: i32, y: i32 },

    /// Health check response
    Pong,

    /// The request failed; the daemon keeps running
    Error(String),
}
