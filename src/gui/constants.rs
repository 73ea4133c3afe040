//! Layout metrics and palette for the settings window

use egui;

/// Initial window size; tall enough for the hollow-cross controls without
/// scrolling
pub const WINDOW_WIDTH: f32 = 440.0;
pub const WINDOW_HEIGHT: f32 = 640.0;
pub const WINDOW_MIN_WIDTH: f32 = 380.0;
pub const WINDOW_MIN_HEIGHT: f32 = 480.0;

/// Vertical gap between groups / between rows inside a group
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;

/// Daemon status indicator colors
pub const STATUS_RUNNING: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_STOPPED: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const STATUS_STARTING: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);

/// How often the daemon child and IPC connection are re-checked
pub const DAEMON_CHECK_INTERVAL_MS: u64 = 500;
