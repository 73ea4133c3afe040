pub mod crosshair_settings;
pub mod preset_selector;
