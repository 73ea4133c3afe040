//! Crosshair configuration records and their on-disk preset store

mod crosshair;
mod store;

pub use crosshair::{CrosshairConfig, Placement, Shape};
pub use store::{ConfigStore, StoreError};
