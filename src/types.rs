//! Shared geometry types

use serde::{Deserialize, Serialize};

/// Absolute pixel coordinate in primary-display space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by the given delta
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Primary display dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

impl ScreenSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(i32::from(self.width) / 2, i32::from(self.height) / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_center() {
        assert_eq!(ScreenSize::new(1920, 1080).center(), Position::new(960, 540));
        assert_eq!(ScreenSize::new(2561, 1441).center(), Position::new(1280, 720));
    }

    #[test]
    fn test_position_offset() {
        assert_eq!(Position::new(100, 100).offset(40, 60), Position::new(140, 160));
        assert_eq!(Position::new(10, 10).offset(-20, 0), Position::new(-10, 10));
    }
}
