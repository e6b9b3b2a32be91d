//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` to linear-ish RGBA floats
pub fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Swap a color for its negative, keeping alpha (night mode)
pub fn invert(color: [f32; 4]) -> [f32; 4] {
    [1.0 - color[0], 1.0 - color[1], 1.0 - color[2], color[3]]
}

pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for game elements
pub mod colors {
    // Runner
    pub const RUNNER_BACKGROUND: [f32; 4] = [0.969, 0.969, 0.969, 1.0];
    pub const RUNNER_INK: [f32; 4] = [0.325, 0.325, 0.325, 1.0];
    pub const CLOUD: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
    pub const OBSTACLE_OK: [f32; 4] = [0.298, 0.686, 0.314, 1.0];
    pub const OBSTACLE_REDIRECT: [f32; 4] = [0.129, 0.588, 0.953, 1.0];
    pub const OBSTACLE_CLIENT: [f32; 4] = [1.0, 0.757, 0.027, 1.0];
    pub const OBSTACLE_SERVER: [f32; 4] = [0.957, 0.263, 0.212, 1.0];
    pub const CRITICAL_FLASH: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BUDGET_HIGH: [f32; 4] = [0.298, 0.686, 0.314, 1.0];
    pub const BUDGET_MID: [f32; 4] = [1.0, 0.757, 0.027, 1.0];
    pub const BUDGET_LOW: [f32; 4] = [0.957, 0.263, 0.212, 1.0];

    // Sorter
    pub const SORTER_BACKGROUND: [f32; 4] = [0.1, 0.1, 0.12, 1.0];
    pub const ARM: [f32; 4] = [0.667, 0.667, 0.667, 1.0];
    pub const BIN: [f32; 4] = [0.133, 0.133, 0.133, 1.0];
    pub const BIN_LABEL_DISCARD: [f32; 4] = [0.898, 0.224, 0.208, 1.0];
    pub const BIN_LABEL_KEEP: [f32; 4] = [0.298, 0.686, 0.314, 1.0];
    pub const PAGE: [f32; 4] = [0.89, 0.863, 0.773, 1.0];
    pub const PAGE_TEXT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const TIMER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xff0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x000000, 0.5), [0.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_invert_keeps_alpha() {
        let c = invert([0.25, 0.5, 1.0, 0.3]);
        assert_eq!(c, [0.75, 0.5, 0.0, 0.3]);
    }
}
