use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexData;
use crate::core::rasterizer::Rasterizer;
use crate::core::vertex_processor::VertexProcessor;
use crate::scene::mesh::Mesh;

/// The high-level renderer that owns every pipeline stage of one render context.
///
/// Fields are public so callers can configure each stage directly; the draw
/// methods borrow them disjointly.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    pub vertex_processor: VertexProcessor,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
            vertex_processor: VertexProcessor::new(),
        }
    }

    /// `width / height`, or 1 for an empty target.
    pub fn aspect_ratio(&self) -> f32 {
        if self.framebuffer.height == 0 {
            1.0
        } else {
            self.framebuffer.width as f32 / self.framebuffer.height as f32
        }
    }

    /// Clears both planes of the framebuffer.
    pub fn clear(&mut self, color: Color, depth: f32) {
        self.framebuffer.clear(color, depth);
    }

    pub fn draw_triangle(&mut self, v0: VertexData, v1: VertexData, v2: VertexData) {
        self.rasterizer
            .draw_triangle(&mut self.framebuffer, &self.vertex_processor, v0, v1, v2);
    }

    pub fn draw_mesh(&mut self, mesh: &Mesh) {
        self.rasterizer
            .draw_mesh(&mut self.framebuffer, &self.vertex_processor, mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::shading::ShadingMode;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_renderer_draws_mesh() {
        let mut renderer = Renderer::new(64, 48);
        assert!((renderer.aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);

        renderer.clear(Color::gray(10), 1.0);
        renderer
            .vertex_processor
            .set_perspective(60.0, renderer.aspect_ratio(), 0.1, 100.0)
            .unwrap();
        renderer
            .vertex_processor
            .set_look_at(Point3::new(0.0, 0.0, 3.0), Point3::origin(), Vector3::y());
        renderer.rasterizer.set_shading_mode(ShadingMode::Gouraud);

        renderer.draw_mesh(&Mesh::triangle());
        let touched = renderer.framebuffer.depths().iter().filter(|&&d| d < 1.0).count();
        assert!(touched > 0);
        // untouched pixels keep the clear color
        assert_eq!(renderer.framebuffer.get_pixel(0, 0), Some(Color::gray(10)));
    }
}
