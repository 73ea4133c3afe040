//! Settings GUI: preset management and live overlay control

mod components;
mod constants;
mod manager;

pub use manager::run_gui;
