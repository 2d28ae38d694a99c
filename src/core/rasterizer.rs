use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::VertexData;
use crate::core::math::interpolation::{
    AREA_EPSILON, EdgeSetup, interpolate, perspective_correct_weights, signed_area_x2,
};
use crate::core::math::transform::{apply_perspective_division, inverse_w, ndc_to_depth, ndc_to_screen};
use crate::core::pipeline::{ProjectedVertex, Varying};
use crate::core::vertex_processor::VertexProcessor;
use crate::pipeline::shading::{ShadingMode, TriangleShader};
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use log::{debug, trace};
use nalgebra::{Matrix3, Point2, Point3, Vector3, Vector4};
use rayon::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

/// A triangle is rejected when every vertex has `W` at or below this.
pub const BEHIND_CAMERA_W: f32 = 1e-4;

/// Smallest world-space face normal length that still defines a direction.
const FACE_NORMAL_EPSILON: f32 = 1e-12;

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    #[default]
    Back,
    Front,
    None,
}

/// Winding of front faces as seen by the camera.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Deserialize)]
pub enum FrontFace {
    #[default]
    #[serde(rename = "ccw")]
    CounterClockwise,
    #[serde(rename = "cw")]
    Clockwise,
}

/// Scan-converts triangles into a [`FrameBuffer`].
///
/// Owns the light list, the bound texture and the fixed-function state
/// (shading mode, culling). Transforms are read from the [`VertexProcessor`]
/// passed to each draw call.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    lights: Vec<Light>,
    texture: Option<Arc<Texture>>,
    shading: ShadingMode,
    cull_mode: CullMode,
    front_face: FrontFace,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut Vec<Light> {
        &mut self.lights
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn set_lights(&mut self, lights: Vec<Light>) {
        self.lights = lights;
    }

    /// Binds `texture` for subsequent draws; `None` unbinds.
    pub fn bind_texture(&mut self, texture: Option<Arc<Texture>>) {
        self.texture = texture;
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_deref()
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.shading
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        self.shading = mode;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    pub fn front_face(&self) -> FrontFace {
        self.front_face
    }

    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.front_face = front_face;
    }

    /// Draws every triangle of `mesh` in index order.
    pub fn draw_mesh(&self, framebuffer: &mut FrameBuffer, vp: &VertexProcessor, mesh: &Mesh) {
        debug!("Drawing mesh: {} triangles ({} mode)", mesh.triangle_count(), self.shading);
        let frame = DrawState::new(vp);
        for triangle in mesh.triangles() {
            self.rasterize(framebuffer, vp, &frame, triangle);
        }
    }

    /// Transforms, culls, projects, rasterizes and shades one triangle.
    ///
    /// Degenerate input never fails: the triangle (or pixel) is skipped.
    pub fn draw_triangle(
        &self,
        framebuffer: &mut FrameBuffer,
        vp: &VertexProcessor,
        v0: VertexData,
        v1: VertexData,
        v2: VertexData,
    ) {
        self.rasterize(framebuffer, vp, &DrawState::new(vp), [v0, v1, v2]);
    }

    fn rasterize(&self, framebuffer: &mut FrameBuffer, vp: &VertexProcessor, frame: &DrawState, input: [VertexData; 3]) {
        let [v0, ..] = input;
        let width = framebuffer.width;
        let height = framebuffer.height;
        if width == 0 || height == 0 {
            return;
        }

        // 1. Clip space + trivial reject
        let clip = input.map(|v| vp.transform_position_to_clip_space(&v.position));
        if is_behind_camera(&clip) {
            trace!("Rejected triangle behind the camera");
            return;
        }

        // 2. World-space attributes
        let world_pos = input.map(|v| vp.transform_position_to_world(&v.position));
        let world_normal = input.map(|v| frame.normal_matrix * v.normal);

        let face = (world_pos[1] - world_pos[0]).cross(&(world_pos[2] - world_pos[0]));
        let mut flat_normal = face.try_normalize(FACE_NORMAL_EPSILON).unwrap_or_else(Vector3::y);
        if self.front_face == FrontFace::Clockwise {
            flat_normal = -flat_normal;
        }

        let shader = TriangleShader {
            mode: self.shading,
            lights: &self.lights,
            texture: self.texture.as_deref(),
            camera_pos: frame.camera_pos,
            flat_normal,
            flat_albedo: v0.color,
        };

        // 3. Perspective divide + screen mapping
        let mut projected = [0usize, 1, 2].map(|i| {
            let inv_w = inverse_w(clip[i].w);
            let ndc = apply_perspective_division(&clip[i], inv_w);
            ProjectedVertex {
                screen: ndc_to_screen(ndc.x, ndc.y, width as f32, height as f32),
                depth: ndc_to_depth(ndc.z),
                inv_w,
                varying: Varying {
                    color: shader.vertex_color(&world_pos[i], &world_normal[i], input[i].color),
                    world_pos: world_pos[i],
                    normal: world_normal[i],
                    uv: input[i].texcoord,
                },
            }
        });

        // 4. Backface culling
        let area_x2 = signed_area_x2(projected[0].screen, projected[1].screen, projected[2].screen);
        if !area_x2.is_finite() || area_x2.abs() < AREA_EPSILON {
            trace!("Skipped degenerate triangle (area_x2 = {area_x2})");
            return;
        }
        let is_front = match self.front_face {
            FrontFace::CounterClockwise => area_x2 > 0.0,
            FrontFace::Clockwise => area_x2 < 0.0,
        };
        match self.cull_mode {
            CullMode::Back if !is_front => {
                trace!("Culled back face");
                return;
            }
            CullMode::Front if is_front => {
                trace!("Culled front face");
                return;
            }
            _ => {}
        }

        // The edge setup and fill rule expect counter-clockwise order.
        if area_x2 < 0.0 {
            projected.swap(1, 2);
        }
        let [p0, p1, p2] = projected;
        let Some(edges) = EdgeSetup::new(p0.screen, p1.screen, p2.screen) else {
            return;
        };

        // 5. Pixel bounding box: pixels whose centers lie in the float box
        let Some((start_x, end_x)) = pixel_span(p0.screen.x, p1.screen.x, p2.screen.x, width) else {
            return;
        };
        let Some((start_y, end_y)) = pixel_span(p0.screen.y, p1.screen.y, p2.screen.y, height) else {
            return;
        };

        let inv_w = [p0.inv_w, p1.inv_w, p2.inv_w];
        let depths = [p0.depth, p1.depth, p2.depth];
        let varyings = [p0.varying, p1.varying, p2.varying];

        // 6. Rows are disjoint slices, so the parallel sweep writes exactly
        // what a sequential one would.
        framebuffer
            .par_rows_mut(start_y, end_y)
            .for_each(|(y, color_row, depth_row)| {
                let py = y as f32 + 0.5;
                for x in start_x..=end_x {
                    let Some(bary) = edges.coverage(Point2::new(x as f32 + 0.5, py)) else {
                        continue;
                    };
                    let Some(weights) = perspective_correct_weights(bary, inv_w) else {
                        continue;
                    };

                    let depth = interpolate(&depths, weights);
                    // also rejects NaN
                    if !(0.0..=1.0).contains(&depth) || !(depth < depth_row[x]) {
                        continue;
                    }

                    let varying = interpolate(&varyings, weights);
                    depth_row[x] = depth;
                    color_row[x] = shader.fragment(&varying);
                }
            });
    }
}

/// Transform-derived values that stay constant for a whole draw call.
struct DrawState {
    normal_matrix: Matrix3<f32>,
    camera_pos: Point3<f32>,
}

impl DrawState {
    fn new(vp: &VertexProcessor) -> Self {
        Self {
            normal_matrix: vp.normal_matrix(),
            camera_pos: vp.camera_position(),
        }
    }
}

/// True when every vertex sits at or behind the eye plane (`W <= BEHIND_CAMERA_W`).
#[inline]
fn is_behind_camera(clip: &[Vector4<f32>; 3]) -> bool {
    clip.iter().all(|c| c.w <= BEHIND_CAMERA_W)
}

/// Inclusive range of pixel indices whose centers `i + 0.5` lie within
/// `[min(a, b, c), max(a, b, c)]`, clamped to `0..limit`.
fn pixel_span(a: f32, b: f32, c: f32, limit: usize) -> Option<(usize, usize)> {
    let lo = (a.min(b).min(c) - 0.5).ceil().max(0.0);
    let hi = (a.max(b).max(c) - 0.5).floor().min((limit - 1) as f32);
    if !(lo <= hi) {
        return None;
    }
    Some((lo as usize, hi as usize))
}
