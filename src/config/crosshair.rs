//! The crosshair configuration record
//!
//! One flat JSON object per preset. Every field carries a serde default so a
//! partial record on disk merges over the documented defaults field-by-field;
//! unknown keys are ignored. The in-memory config is always fully populated.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::validation::*;
use crate::types::{Position, ScreenSize};

/// Reticle shape selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Cross,
    Dot,
    Square,
    Circle,
    Triangle,
    HollowCross,
    HollowSquare,
    HollowCrossDot,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Cross,
        Shape::Dot,
        Shape::Square,
        Shape::Circle,
        Shape::Triangle,
        Shape::HollowCross,
        Shape::HollowSquare,
        Shape::HollowCrossDot,
    ];

    /// Display label for the settings UI
    pub fn label(&self) -> &'static str {
        match self {
            Shape::Cross => "Cross",
            Shape::Dot => "Dot",
            Shape::Square => "Square",
            Shape::Circle => "Circle",
            Shape::Triangle => "Triangle",
            Shape::HollowCross => "Hollow Cross",
            Shape::HollowSquare => "Hollow Square",
            Shape::HollowCrossDot => "Hollow Cross + Dot",
        }
    }

    /// Whether the hollow gap/length/thickness fields apply to this shape
    pub fn is_hollow_cross(&self) -> bool {
        matches!(self, Shape::HollowCross | Shape::HollowCrossDot)
    }
}

/// Where the reticle is anchored: the `Centered` sentinel means "recompute
/// from the current screen center every frame", distinct from an absolute
/// pixel pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PositionRecord", into = "PositionRecord")]
pub enum Placement {
    Centered,
    At(Position),
}

impl Placement {
    /// Resolve against the current display size
    pub fn resolve(&self, screen: ScreenSize) -> Position {
        match self {
            Placement::Centered => screen.center(),
            Placement::At(pos) => *pos,
        }
    }
}

/// Wire format for `position`: `{"x": "center", "y": "center"}` or
/// `{"x": 100, "y": 200}`.
#[derive(Serialize, Deserialize)]
struct PositionRecord {
    x: Coordinate,
    y: Coordinate,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Pixel(i32),
    Word(String),
}

impl From<PositionRecord> for Placement {
    fn from(record: PositionRecord) -> Self {
        match (record.x, record.y) {
            (Coordinate::Pixel(x), Coordinate::Pixel(y)) => Placement::At(Position::new(x, y)),
            // Any non-numeric coordinate collapses to the sentinel
            _ => Placement::Centered,
        }
    }
}

impl From<Placement> for PositionRecord {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Centered => PositionRecord {
                x: Coordinate::Word("center".to_string()),
                y: Coordinate::Word("center".to_string()),
            },
            Placement::At(pos) => PositionRecord {
                x: Coordinate::Pixel(pos.x),
                y: Coordinate::Pixel(pos.y),
            },
        }
    }
}

/// A complete crosshair configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairConfig {
    #[serde(default = "default_shape")]
    pub shape: Shape,

    #[serde(default = "default_size")]
    pub size: i32,

    #[serde(default = "default_thickness")]
    pub thickness: i32,

    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// `#RRGGBB` hex string
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_position")]
    pub position: Placement,

    // Shape-conditional fields, meaningful only for hollow variants
    #[serde(default = "default_hollow_gap")]
    pub hollow_gap: i32,

    #[serde(default = "default_hollow_length")]
    pub hollow_length: i32,

    #[serde(default = "default_hollow_thickness")]
    pub hollow_thickness: i32,

    /// Only meaningful for `hollow_cross_dot`
    #[serde(default = "default_center_dot_size")]
    pub center_dot_size: i32,
}

fn default_shape() -> Shape {
    Shape::Cross
}

fn default_size() -> i32 {
    20
}

fn default_thickness() -> i32 {
    2
}

fn default_opacity() -> f32 {
    0.8
}

fn default_color() -> String {
    "#FF0000".to_string()
}

fn default_position() -> Placement {
    Placement::Centered
}

fn default_hollow_gap() -> i32 {
    0
}

fn default_hollow_length() -> i32 {
    30
}

fn default_hollow_thickness() -> i32 {
    2
}

fn default_center_dot_size() -> i32 {
    3
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            shape: default_shape(),
            size: default_size(),
            thickness: default_thickness(),
            opacity: default_opacity(),
            color: default_color(),
            position: default_position(),
            hollow_gap: default_hollow_gap(),
            hollow_length: default_hollow_length(),
            hollow_thickness: default_hollow_thickness(),
            center_dot_size: default_center_dot_size(),
        }
    }
}

impl CrosshairConfig {
    /// Clamp all fields into their documented domains.
    ///
    /// Called after loading a record from disk. Off-screen positions are left
    /// as-is: an explicit pair outside the current display bounds is valid.
    pub fn validate_and_clamp(&mut self) {
        clamp_field("size", &mut self.size, MIN_SIZE, MAX_SIZE);
        clamp_field("thickness", &mut self.thickness, MIN_THICKNESS, MAX_THICKNESS);
        clamp_field("hollow_gap", &mut self.hollow_gap, MIN_HOLLOW_GAP, MAX_HOLLOW_GAP);
        clamp_field(
            "hollow_length",
            &mut self.hollow_length,
            MIN_HOLLOW_LENGTH,
            MAX_HOLLOW_LENGTH,
        );
        clamp_field(
            "hollow_thickness",
            &mut self.hollow_thickness,
            MIN_HOLLOW_THICKNESS,
            MAX_HOLLOW_THICKNESS,
        );
        clamp_field(
            "center_dot_size",
            &mut self.center_dot_size,
            MIN_CENTER_DOT_SIZE,
            MAX_CENTER_DOT_SIZE,
        );

        if !(MIN_OPACITY..=MAX_OPACITY).contains(&self.opacity) || !self.opacity.is_finite() {
            let clamped = if self.opacity.is_finite() {
                self.opacity.clamp(MIN_OPACITY, MAX_OPACITY)
            } else {
                default_opacity()
            };
            warn!(opacity = self.opacity, using = clamped, "opacity out of range, clamping");
            self.opacity = clamped;
        }
    }
}

fn clamp_field(name: &str, value: &mut i32, min: i32, max: i32) {
    if *value < min || *value > max {
        let clamped = (*value).clamp(min, max);
        warn!(field = name, value = *value, using = clamped, "config field out of range, clamping");
        *value = clamped;
    }
}
