use crate::core::color::Color;
use crate::core::rasterizer::{CullMode, FrontFace};
use crate::error::{RasterError, Result};
use crate::pipeline::shading::ShadingMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A scene description. Every section is optional; missing `lights` or
/// `objects` fall back to the built-in demo scene.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_lights")]
    pub lights: Vec<LightConfig>,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: default_lights(),
            objects: default_objects(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| RasterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.render.validate()?;
        Ok(config)
    }
}

fn default_lights() -> Vec<LightConfig> {
    vec![
        LightConfig {
            direction: Some([-0.5, -1.0, -0.6]),
            ..LightConfig::new(LightKind::Directional)
        },
        LightConfig {
            position: Some([0.0, 3.0, 2.0]),
            ambient: [0, 0, 0],
            diffuse: [255, 230, 180],
            attenuation: [1.0, 0.05, 0.01],
            spot_direction: Some([0.0, -3.0, -2.0]),
            spot_cutoff: 35.0,
            spot_exponent: 8.0,
            ..LightConfig::new(LightKind::Point)
        },
    ]
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![
        ObjectConfig {
            position: [-2.0, -0.7, 0.0],
            ..ObjectConfig::new(ShapeConfig::Cone {
                segments: default_segments(),
                height: default_shape_height(),
            })
        },
        ObjectConfig {
            position: [0.0, -0.7, 0.0],
            scale: [0.7, 1.0, 0.7],
            ..ObjectConfig::new(ShapeConfig::Cylinder {
                radial_segments: default_segments(),
                height_segments: default_height_segments(),
                height: default_shape_height(),
            })
        },
        ObjectConfig {
            position: [2.0, 0.0, 0.0],
            rotation: [-60.0, 0.0, 0.0],
            ..ObjectConfig::new(ShapeConfig::Torus {
                major: default_major_radius(),
                minor: default_minor_radius(),
                outer_segments: default_outer_segments(),
                inner_segments: default_inner_segments(),
            })
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default)]
    pub shading: ShadingMode,
    #[serde(default)]
    pub cull_mode: CullMode,
    #[serde(default)]
    pub front_face: FrontFace,
    #[serde(default = "default_clear_color")]
    pub clear_color: [u8; 3],
    #[serde(default = "default_clear_depth")]
    pub clear_depth: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            shading: ShadingMode::default(),
            cull_mode: CullMode::default(),
            front_face: FrontFace::default(),
            clear_color: default_clear_color(),
            clear_depth: default_clear_depth(),
        }
    }
}

/// TGA stores each dimension as a 16-bit integer.
pub const MAX_FRAME_DIMENSION: usize = u16::MAX as usize;

/// Upper bound on `width * height` (8192 x 8192).
pub const MAX_FRAME_PIXELS: usize = 1 << 26;

impl RenderConfig {
    /// Rejects empty or oversized frames before any buffer is allocated.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(RasterError::invalid_argument(
                "render.width/height",
                format!("frame must be at least 1x1, got {width}x{height}"),
            ));
        }
        if width > MAX_FRAME_DIMENSION || height > MAX_FRAME_DIMENSION {
            return Err(RasterError::ImageTooLarge { width, height });
        }
        match width.checked_mul(height) {
            Some(pixels) if pixels <= MAX_FRAME_PIXELS => Ok(()),
            _ => Err(RasterError::invalid_argument(
                "render.width/height",
                format!("{width}x{height} exceeds the limit of {MAX_FRAME_PIXELS} pixels"),
            )),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_output() -> String {
    "output.tga".to_string()
}
fn default_clear_color() -> [u8; 3] {
    [20, 20, 30]
}
fn default_clear_depth() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 1.5, 6.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    60.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Directional,
    Point,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    pub r#type: LightKind,
    /// Direction the light travels in (directional lights).
    pub direction: Option<[f32; 3]>,
    pub position: Option<[f32; 3]>,
    #[serde(default = "default_ambient")]
    pub ambient: [u8; 3],
    #[serde(default = "default_white")]
    pub diffuse: [u8; 3],
    #[serde(default = "default_white")]
    pub specular: [u8; 3],
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Constant, linear and quadratic coefficients (point lights).
    #[serde(default = "default_attenuation")]
    pub attenuation: [f32; 3],
    /// Setting an axis turns a point light into a spotlight.
    pub spot_direction: Option<[f32; 3]>,
    /// Half-angle of the cone, in degrees.
    #[serde(default = "default_spot_cutoff")]
    pub spot_cutoff: f32,
    #[serde(default = "default_spot_exponent")]
    pub spot_exponent: f32,
}

impl LightConfig {
    pub fn new(kind: LightKind) -> Self {
        Self {
            r#type: kind,
            direction: None,
            position: None,
            ambient: default_ambient(),
            diffuse: default_white(),
            specular: default_white(),
            shininess: default_shininess(),
            enabled: true,
            attenuation: default_attenuation(),
            spot_direction: None,
            spot_cutoff: default_spot_cutoff(),
            spot_exponent: default_spot_exponent(),
        }
    }
}

fn default_ambient() -> [u8; 3] {
    [25, 25, 25]
}
fn default_white() -> [u8; 3] {
    [255, 255, 255]
}
fn default_shininess() -> f32 {
    32.0
}
fn default_true() -> bool {
    true
}
fn default_attenuation() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}
fn default_spot_cutoff() -> f32 {
    30.0
}
fn default_spot_exponent() -> f32 {
    1.0
}

/// Geometry source of an object, written as an inline table with a `type` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeConfig {
    Triangle,
    Plane {
        #[serde(default = "default_half_size")]
        half_size: f32,
    },
    Cone {
        #[serde(default = "default_segments")]
        segments: u32,
        #[serde(default = "default_shape_height")]
        height: f32,
    },
    Cylinder {
        #[serde(default = "default_segments")]
        radial_segments: u32,
        #[serde(default = "default_height_segments")]
        height_segments: u32,
        #[serde(default = "default_shape_height")]
        height: f32,
    },
    Torus {
        #[serde(default = "default_major_radius")]
        major: f32,
        #[serde(default = "default_minor_radius")]
        minor: f32,
        #[serde(default = "default_outer_segments")]
        outer_segments: u32,
        #[serde(default = "default_inner_segments")]
        inner_segments: u32,
    },
    /// A Wavefront OBJ file, centered and scaled to fit the unit cube.
    Obj { path: String },
}

fn default_half_size() -> f32 {
    1.0
}
fn default_segments() -> u32 {
    24
}
fn default_shape_height() -> f32 {
    1.5
}
fn default_height_segments() -> u32 {
    4
}
fn default_major_radius() -> f32 {
    0.8
}
fn default_minor_radius() -> f32 {
    0.3
}
fn default_outer_segments() -> u32 {
    32
}
fn default_inner_segments() -> u32 {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectConfig {
    pub shape: ShapeConfig,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    /// Degrees about X, then Y, then Z.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    // --- Appearance ---
    #[serde(default = "default_palette")]
    pub palette: [[u8; 3]; 3],
    /// Replaces the palette with per-vertex pseudo-random colors.
    pub color_seed: Option<u64>,
    pub texture: Option<String>,
}

impl ObjectConfig {
    pub fn new(shape: ShapeConfig) -> Self {
        Self {
            shape,
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: default_scale(),
            palette: default_palette(),
            color_seed: None,
            texture: None,
        }
    }

    pub fn palette_colors(&self) -> [Color; 3] {
        self.palette.map(Color::from)
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_palette() -> [[u8; 3]; 3] {
    [[220, 60, 60], [60, 200, 90], [70, 110, 230]]
}
