//! Shape rasterization
//!
//! Each reticle primitive is lowered to a list of axis-aligned spans that the
//! surface fills in one `RenderFillRectangles` request. Offset conventions
//! follow the shipped behavior: `dot` and `circle` place their bounding-box
//! origin at the anchor (not their centroid), while the square and hollow
//! variants are centered on it.

use x11rb::protocol::xproto::Rectangle;

use crate::config::{CrosshairConfig, Shape};
use crate::types::Position;

/// Rasterize the configured shape around the anchor point
pub fn spans(config: &CrosshairConfig, anchor: Position) -> Vec<Rectangle> {
    match config.shape {
        Shape::Cross => cross(anchor, config.size, config.thickness),
        Shape::Dot => filled_circle(anchor, config.size),
        Shape::Square => square(anchor, config.size),
        Shape::Circle => circle_outline(anchor, config.size, 2),
        Shape::Triangle => triangle(anchor, config.size),
        Shape::HollowCross => hollow_cross(
            anchor,
            config.hollow_gap,
            config.hollow_length,
            config.hollow_thickness,
        ),
        Shape::HollowSquare => hollow_square(anchor, config.size, config.thickness),
        Shape::HollowCrossDot => {
            let mut rects = hollow_cross(
                anchor,
                config.hollow_gap,
                config.hollow_length,
                config.hollow_thickness,
            );
            rects.extend(filled_circle(anchor, config.center_dot_size));
            rects
        }
    }
}

fn push_rect(rects: &mut Vec<Rectangle>, x: i32, y: i32, width: i32, height: i32) {
    if width <= 0 || height <= 0 {
        return;
    }
    rects.push(Rectangle {
        x: x as i16,
        y: y as i16,
        width: width as u16,
        height: height as u16,
    });
}

/// Two perpendicular strokes of half-length `size` through the center
fn cross(c: Position, size: i32, thickness: i32) -> Vec<Rectangle> {
    let mut rects = Vec::with_capacity(2);
    push_rect(&mut rects, c.x - size, c.y - thickness / 2, 2 * size, thickness);
    push_rect(&mut rects, c.x - thickness / 2, c.y - size, thickness, 2 * size);
    rects
}

/// Filled circle with its bounding-box origin at `origin`
fn filled_circle(origin: Position, diameter: i32) -> Vec<Rectangle> {
    let mut rects = Vec::new();
    if diameter <= 0 {
        return rects;
    }
    if diameter == 1 {
        push_rect(&mut rects, origin.x, origin.y, 1, 1);
        return rects;
    }

    let r = f64::from(diameter) / 2.0;
    for row in 0..diameter {
        // Sample the circle equation at the row's vertical midpoint
        let dy = f64::from(row) + 0.5 - r;
        let half = (r * r - dy * dy).sqrt();
        let x0 = (f64::from(origin.x) + r - half).round() as i32;
        let x1 = (f64::from(origin.x) + r + half).round() as i32;
        push_rect(&mut rects, x0, origin.y + row, x1 - x0, 1);
    }
    rects
}

/// Filled square centered on `c`
fn square(c: Position, size: i32) -> Vec<Rectangle> {
    let mut rects = Vec::with_capacity(1);
    push_rect(&mut rects, c.x - size / 2, c.y - size / 2, size, size);
    rects
}

/// Unfilled circle outline, bounding-box origin at `origin`
fn circle_outline(origin: Position, diameter: i32, stroke: i32) -> Vec<Rectangle> {
    if diameter <= 2 * stroke {
        return filled_circle(origin, diameter);
    }

    let mut rects = Vec::new();
    let r_outer = f64::from(diameter) / 2.0;
    let r_inner = r_outer - f64::from(stroke);
    for row in 0..diameter {
        let dy = f64::from(row) + 0.5 - r_outer;
        let outer_half = (r_outer * r_outer - dy * dy).sqrt();
        let ox0 = (f64::from(origin.x) + r_outer - outer_half).round() as i32;
        let ox1 = (f64::from(origin.x) + r_outer + outer_half).round() as i32;

        let inner_sq = r_inner * r_inner - dy * dy;
        if inner_sq <= 0.0 {
            // Row is entirely within the stroke (top and bottom caps)
            push_rect(&mut rects, ox0, origin.y + row, ox1 - ox0, 1);
        } else {
            let inner_half = inner_sq.sqrt();
            let ix0 = (f64::from(origin.x) + r_outer - inner_half).round() as i32;
            let ix1 = (f64::from(origin.x) + r_outer + inner_half).round() as i32;
            push_rect(&mut rects, ox0, origin.y + row, ix0 - ox0, 1);
            push_rect(&mut rects, ix1, origin.y + row, ox1 - ix1, 1);
        }
    }
    rects
}

/// Filled isoceles triangle: apex at `(c.x, c.y - size)`, base corners at
/// `(c.x ± size, c.y + size)`
fn triangle(c: Position, size: i32) -> Vec<Rectangle> {
    let mut rects = Vec::new();
    let apex_y = c.y - size;
    for row in 0..=(2 * size) {
        let half = row / 2;
        push_rect(&mut rects, c.x - half, apex_y + row, 2 * half + 1, 1);
    }
    rects
}

/// Four disjoint strokes, one per cardinal direction, starting `gap` pixels
/// from the center and extending `length` pixels outward
fn hollow_cross(c: Position, gap: i32, length: i32, thickness: i32) -> Vec<Rectangle> {
    let mut rects = Vec::with_capacity(4);
    let half = thickness / 2;
    // Up
    push_rect(&mut rects, c.x - half, c.y - gap - length, thickness, length);
    // Down
    push_rect(&mut rects, c.x - half, c.y + gap, thickness, length);
    // Left
    push_rect(&mut rects, c.x - gap - length, c.y - half, length, thickness);
    // Right
    push_rect(&mut rects, c.x + gap, c.y - half, length, thickness);
    rects
}

/// Unfilled square outline, side `size`, centered on `c`
fn hollow_square(c: Position, size: i32, thickness: i32) -> Vec<Rectangle> {
    if size <= 2 * thickness {
        return square(c, size);
    }

    let mut rects = Vec::with_capacity(4);
    let x0 = c.x - size / 2;
    let y0 = c.y - size / 2;
    push_rect(&mut rects, x0, y0, size, thickness);
    push_rect(&mut rects, x0, y0 + size - thickness, size, thickness);
    push_rect(&mut rects, x0, y0 + thickness, thickness, size - 2 * thickness);
    push_rect(
        &mut rects,
        x0 + size - thickness,
        y0 + thickness,
        thickness,
        size - 2 * thickness,
    );
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Position = Position::new(960, 540);

    // Rectangle has no PartialEq; compare by field tuple
    fn dims(r: &Rectangle) -> (i16, i16, u16, u16) {
        (r.x, r.y, r.width, r.height)
    }

    fn bounding_box(rects: &[Rectangle]) -> (i32, i32, i32, i32) {
        let min_x = rects.iter().map(|r| i32::from(r.x)).min().unwrap();
        let min_y = rects.iter().map(|r| i32::from(r.y)).min().unwrap();
        let max_x = rects
            .iter()
            .map(|r| i32::from(r.x) + i32::from(r.width))
            .max()
            .unwrap();
        let max_y = rects
            .iter()
            .map(|r| i32::from(r.y) + i32::from(r.height))
            .max()
            .unwrap();
        (min_x, min_y, max_x - min_x, max_y - min_y)
    }

    #[test]
    fn test_cross_strokes() {
        let rects = cross(CENTER, 20, 2);
        assert_eq!(rects.len(), 2);
        assert_eq!(dims(&rects[0]), (940, 539, 40, 2));
        assert_eq!(dims(&rects[1]), (959, 520, 2, 40));
    }

    #[test]
    fn test_dot_bounding_box_origin_at_anchor() {
        // dot, size 20, centered placement on 1920x1080: the bounding box
        // starts at (960, 540), not centered on it
        let rects = filled_circle(CENTER, 20);
        assert_eq!(bounding_box(&rects), (960, 540, 20, 20));
    }

    #[test]
    fn test_dot_rows_widen_towards_middle() {
        let rects = filled_circle(CENTER, 20);
        assert_eq!(rects.len(), 20);
        let first = &rects[0];
        let middle = &rects[10];
        assert!(first.width < middle.width);
        assert_eq!(middle.width, 20);
    }

    #[test]
    fn test_single_pixel_dot() {
        let rects = filled_circle(CENTER, 1);
        assert_eq!(rects.len(), 1);
        assert_eq!(dims(&rects[0]), (960, 540, 1, 1));
    }

    #[test]
    fn test_square_centered() {
        let rects = square(CENTER, 20);
        assert_eq!(rects.len(), 1);
        assert_eq!(dims(&rects[0]), (950, 530, 20, 20));
    }

    #[test]
    fn test_circle_outline_bounds_and_hollowness() {
        let rects = circle_outline(CENTER, 30, 2);
        assert_eq!(bounding_box(&rects), (960, 540, 30, 30));

        // Middle rows must leave the interior open: two spans per row
        let middle: Vec<_> = rects.iter().filter(|r| r.y == 540 + 15).collect();
        assert_eq!(middle.len(), 2);
        assert!(middle[0].x + middle[0].width as i16 <= middle[1].x);
    }

    #[test]
    fn test_triangle_apex_and_base() {
        let rects = triangle(CENTER, 20);
        // Rows from apex (c.y - size) to base (c.y + size) inclusive
        assert_eq!(rects.len(), 41);
        assert_eq!(dims(&rects[0]), (960, 520, 1, 1));
        assert_eq!(dims(&rects[40]), (940, 560, 41, 1));
    }

    #[test]
    fn test_hollow_cross_segments() {
        // gap 0, length 30, thickness 2: four 2px strokes, each extending
        // exactly 30px outward from the center
        let rects = hollow_cross(CENTER, 0, 30, 2);
        assert_eq!(rects.len(), 4);
        assert_eq!(dims(&rects[0]), (959, 510, 2, 30));
        assert_eq!(dims(&rects[1]), (959, 540, 2, 30));
        assert_eq!(dims(&rects[2]), (930, 539, 30, 2));
        assert_eq!(dims(&rects[3]), (960, 539, 30, 2));
    }

    #[test]
    fn test_hollow_cross_respects_gap() {
        let rects = hollow_cross(CENTER, 10, 30, 2);
        // Up stroke ends 10px above the center
        assert_eq!(rects[0].y, (540 - 10 - 30) as i16);
        // Right stroke starts 10px right of the center
        assert_eq!(rects[3].x, (960 + 10) as i16);
    }

    #[test]
    fn test_hollow_square_outline() {
        let rects = hollow_square(CENTER, 20, 2);
        assert_eq!(rects.len(), 4);
        assert_eq!(bounding_box(&rects), (950, 530, 20, 20));
        // Interior must stay open
        let covered: i32 = rects
            .iter()
            .map(|r| i32::from(r.width) * i32::from(r.height))
            .sum();
        assert!(covered < 20 * 20);
    }

    #[test]
    fn test_hollow_cross_dot_composites_center_dot() {
        let config = CrosshairConfig {
            shape: Shape::HollowCrossDot,
            hollow_gap: 5,
            hollow_length: 20,
            hollow_thickness: 2,
            center_dot_size: 4,
            ..CrosshairConfig::default()
        };
        let rects = spans(&config, CENTER);
        // 4 cross strokes + 4 dot rows
        assert_eq!(rects.len(), 8);
        // Dot rows carry the bounding-box-origin convention
        let dot_rows: Vec<_> = rects.iter().skip(4).collect();
        assert!(dot_rows.iter().all(|r| r.x >= 960 && r.y >= 540));
    }

    #[test]
    fn test_degenerate_sizes_produce_no_empty_rects() {
        for shape in Shape::ALL {
            let config = CrosshairConfig {
                shape,
                size: 1,
                thickness: 1,
                hollow_gap: 0,
                hollow_length: 10,
                hollow_thickness: 1,
                center_dot_size: 1,
                ..CrosshairConfig::default()
            };
            for rect in spans(&config, CENTER) {
                assert!(rect.width > 0 && rect.height > 0, "empty rect for {shape:?}");
            }
        }
    }
}
