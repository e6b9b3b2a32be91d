//! Shape generation for 2D primitives
//!
//! Everything is built from triangles in canvas pixel space (y down). Text is
//! drawn with seven-segment glyphs, which covers status codes, scores and the
//! few letters the HUD needs.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (x2, y2) = (x + width, y + height);
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Rectangle border drawn inside the given bounds
pub fn rect_outline(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    thickness: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let t = thickness.min(width / 2.0).min(height / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(x, y, width, t, color));
    vertices.extend(rect(x, y + height - t, width, t, color));
    vertices.extend(rect(x, y + t, t, height - 2.0 * t, color));
    vertices.extend(rect(x + width - t, y + t, t, height - 2.0 * t, color));
    vertices
}

/// Thick line segment between two points
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let a1 = from + perp;
    let a2 = from - perp;
    let b1 = to + perp;
    let b2 = to - perp;

    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

// Segment bits: a=top, b=upper right, c=lower right, d=bottom, e=lower left,
// f=upper left, g=middle
const SEG_A: u8 = 1 << 0;
const SEG_B: u8 = 1 << 1;
const SEG_C: u8 = 1 << 2;
const SEG_D: u8 = 1 << 3;
const SEG_E: u8 = 1 << 4;
const SEG_F: u8 = 1 << 5;
const SEG_G: u8 = 1 << 6;

/// Lit segments for a glyph, `None` if it can't be shown
pub fn segment_mask(ch: char) -> Option<u8> {
    let mask = match ch {
        '0' | 'O' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
        '1' => SEG_B | SEG_C,
        '2' => SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,
        '3' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,
        '4' => SEG_B | SEG_C | SEG_F | SEG_G,
        '5' | 'S' => SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,
        '6' => SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
        '7' => SEG_A | SEG_B | SEG_C,
        '8' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
        '9' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,
        '-' => SEG_G,
        'H' => SEG_B | SEG_C | SEG_E | SEG_F | SEG_G,
        'I' => SEG_E | SEG_F,
        'E' => SEG_A | SEG_D | SEG_E | SEG_F | SEG_G,
        'P' => SEG_A | SEG_B | SEG_E | SEG_F | SEG_G,
        'L' => SEG_D | SEG_E | SEG_F,
        'o' => SEG_C | SEG_D | SEG_E | SEG_G,
        'r' => SEG_E | SEG_G,
        'x' => SEG_B | SEG_C | SEG_E | SEG_F | SEG_G,
        _ => return None,
    };
    Some(mask)
}

/// One seven-segment glyph with its top-left corner at (x, y)
pub fn glyph(
    ch: char,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    thickness: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let Some(mask) = segment_mask(ch) else {
        return Vec::new();
    };
    let t = thickness;
    let half = height / 2.0;
    let segments = [
        (SEG_A, (x, y, width, t)),
        (SEG_B, (x + width - t, y, t, half)),
        (SEG_C, (x + width - t, y + half, t, half)),
        (SEG_D, (x, y + height - t, width, t)),
        (SEG_E, (x, y + half, t, half)),
        (SEG_F, (x, y, t, half)),
        (SEG_G, (x, y + half - t / 2.0, width, t)),
    ];

    let mut vertices = Vec::with_capacity(mask.count_ones() as usize * 6);
    for (bit, (sx, sy, sw, sh)) in segments {
        if mask & bit != 0 {
            vertices.extend(rect(sx, sy, sw, sh, color));
        }
    }
    vertices
}

/// Glyph cell size for a line of text
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub char_width: f32,
    pub char_height: f32,
    pub spacing: f32,
    pub thickness: f32,
}

impl TextStyle {
    /// Proportions scaled from a cell height
    pub fn with_height(height: f32) -> Self {
        Self {
            char_width: height * 0.6,
            char_height: height,
            spacing: height * 0.25,
            thickness: (height * 0.14).max(1.0),
        }
    }

    pub fn width_of(&self, text: &str) -> f32 {
        let n = text.chars().count() as f32;
        if n == 0.0 {
            return 0.0;
        }
        n * self.char_width + (n - 1.0) * self.spacing
    }
}

/// A line of seven-segment text starting at (x, y)
pub fn text(s: &str, x: f32, y: f32, style: TextStyle, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let mut cursor = x;
    for ch in s.chars() {
        vertices.extend(glyph(
            ch,
            cursor,
            y,
            style.char_width,
            style.char_height,
            style.thickness,
            color,
        ));
        cursor += style.char_width + style.spacing;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_rect_corners() {
        let v = rect(10.0, 20.0, 30.0, 40.0, WHITE);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_line_width() {
        let v = line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0, WHITE);
        assert_eq!(v.len(), 6);
        for vert in &v {
            assert!((vert.position[1].abs() - 2.0).abs() < 1e-5);
        }
        // Degenerate line draws nothing
        assert!(line(Vec2::ONE, Vec2::ONE, 4.0, WHITE).is_empty());
    }

    #[test]
    fn test_glyph_segments() {
        assert_eq!(glyph('8', 0.0, 0.0, 6.0, 10.0, 1.0, WHITE).len(), 7 * 6);
        assert_eq!(glyph('1', 0.0, 0.0, 6.0, 10.0, 1.0, WHITE).len(), 2 * 6);
        assert!(glyph('?', 0.0, 0.0, 6.0, 10.0, 1.0, WHITE).is_empty());
        for digit in '0'..='9' {
            assert!(segment_mask(digit).is_some());
        }
    }

    #[test]
    fn test_text_advances() {
        let style = TextStyle {
            char_width: 6.0,
            char_height: 10.0,
            spacing: 2.0,
            thickness: 1.0,
        };
        assert_eq!(style.width_of("404"), 22.0);
        assert_eq!(style.width_of(""), 0.0);

        let v = text("1 1", 0.0, 0.0, style, WHITE);
        // Space takes a cell but draws nothing
        let max_x = v.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 22.0);
        assert_eq!(v.len(), 2 * 2 * 6);
    }
}
