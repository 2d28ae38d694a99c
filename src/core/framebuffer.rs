use crate::core::color::Color;
use rayon::prelude::*;

/// Default depth clear value: the far plane.
pub const DEFAULT_CLEAR_DEPTH: f32 = 1.0;

/// A row-major color plane plus a depth plane of the same shape.
///
/// Row 0 is the bottom row of the image.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<Color>,
    depth_buffer: Vec<f32>,
    clear_color_value: Color,
    clear_depth_value: f32,
}

impl FrameBuffer {
    /// Creates a buffer cleared to black and the far plane.
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![Color::BLACK; size],
            depth_buffer: vec![DEFAULT_CLEAR_DEPTH; size],
            clear_color_value: Color::BLACK,
            clear_depth_value: DEFAULT_CLEAR_DEPTH,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn clear_color(&mut self, color: Color) {
        self.clear_color_value = color;
        self.color_buffer.fill(color);
    }

    pub fn clear_depth(&mut self, depth: f32) {
        self.clear_depth_value = depth;
        self.depth_buffer.fill(depth);
    }

    pub fn clear(&mut self, color: Color, depth: f32) {
        self.clear_color(color);
        self.clear_depth(depth);
    }

    /// The value passed to the most recent `clear_color`.
    pub fn clear_color_value(&self) -> Color {
        self.clear_color_value
    }

    pub fn clear_depth_value(&self) -> f32 {
        self.clear_depth_value
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.in_bounds(x, y).then(|| self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        self.in_bounds(x, y).then(|| self.depth_buffer[self.index(x, y)])
    }

    /// Unconditional write, bypassing the depth test.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = color;
        }
    }

    pub fn colors(&self) -> &[Color] {
        &self.color_buffer
    }

    pub fn depths(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Parallel iterator over rows `start_y..=end_y`, yielding
    /// `(y, color_row, depth_row)`.
    ///
    /// Rows are disjoint, so each pixel is owned by exactly one task and the
    /// result matches a sequential sweep.
    pub fn par_rows_mut(
        &mut self,
        start_y: usize,
        end_y: usize,
    ) -> impl IndexedParallelIterator<Item = (usize, &mut [Color], &mut [f32])> {
        let width = self.width;
        let end_y = end_y.min(self.height.saturating_sub(1));
        let (lo, hi) = if width == 0 || self.height == 0 || start_y > end_y {
            (0, 0)
        } else {
            (start_y * width, (end_y + 1) * width)
        };

        self.color_buffer[lo..hi]
            .par_chunks_mut(width.max(1))
            .zip(self.depth_buffer[lo..hi].par_chunks_mut(width.max(1)))
            .enumerate()
            .map(move |(i, (colors, depths))| (start_y + i, colors, depths))
    }
}
