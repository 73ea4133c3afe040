//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Configuration storage constants
pub mod config {
    /// Directory name under the per-user config directory
    pub const APP_DIR: &str = "reticle";

    /// File extension for preset records
    pub const PRESET_EXTENSION: &str = "json";

    /// Name of the protected preset that can never be deleted
    pub const DEFAULT_PRESET: &str = "default";
}

/// Overlay surface and redraw constants
pub mod overlay {
    /// Redraw tick period in milliseconds (20 Hz)
    pub const TICK_INTERVAL_MS: u64 = 50;

    /// Sleep granularity of the daemon main loop
    pub const POLL_INTERVAL_MS: u64 = 5;

    /// WM_CLASS property value (instance + class, NUL-terminated)
    pub const WM_CLASS: &[u8] = b"reticle\0reticle\0";
}

/// X11 protocol constants
pub mod x11 {
    /// ARGB color depth (32-bit: 8 bits each for Alpha, Red, Green, Blue)
    pub const ARGB_DEPTH: u8 = 32;

    /// Override redirect flag for unmanaged windows
    pub const OVERRIDE_REDIRECT: u32 = 1;
}

/// Domain limits for configuration fields
pub mod validation {
    pub const MIN_SIZE: i32 = 1;
    pub const MAX_SIZE: i32 = 100;

    pub const MIN_THICKNESS: i32 = 1;
    pub const MAX_THICKNESS: i32 = 20;

    pub const MIN_OPACITY: f32 = 0.10;
    pub const MAX_OPACITY: f32 = 1.00;

    pub const MIN_HOLLOW_GAP: i32 = 0;
    pub const MAX_HOLLOW_GAP: i32 = 50;

    pub const MIN_HOLLOW_LENGTH: i32 = 10;
    pub const MAX_HOLLOW_LENGTH: i32 = 100;

    pub const MIN_HOLLOW_THICKNESS: i32 = 1;
    pub const MAX_HOLLOW_THICKNESS: i32 = 10;

    pub const MIN_CENTER_DOT_SIZE: i32 = 1;
    pub const MAX_CENTER_DOT_SIZE: i32 = 10;
}
