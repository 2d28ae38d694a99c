use crate::core::color::Color;
use crate::core::math::normalize_or_zero;
use nalgebra::{Point3, Vector3};

/// Point lights never divide by a distance shorter than this.
const MIN_LIGHT_DISTANCE: f32 = 1e-4;

/// The surface response a light imposes: tints, shininess and an on/off switch.
///
/// Colors already carry the light's intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProperties {
    /// Added unconditionally to every lit point (not modulated by albedo or normal).
    pub ambient: Color,
    /// Multiplied with the surface albedo.
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
    pub enabled: bool,
}

impl Default for LightProperties {
    fn default() -> Self {
        Self {
            ambient: Color::gray(25),
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            shininess: 32.0,
            enabled: true,
        }
    }
}

/// Hard-edged spotlight cone attached to a point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
    /// Unit axis the cone opens along.
    pub axis: Vector3<f32>,
    /// Cosine of the half-angle; points outside receive nothing, ambient included.
    pub cutoff_cos: f32,
    pub exponent: f32,
}

impl Spotlight {
    pub fn new(axis: Vector3<f32>, cutoff_deg: f32, exponent: f32) -> Self {
        Self {
            axis: normalize_or_zero(&axis),
            cutoff_cos: cutoff_deg.to_radians().cos(),
            exponent: exponent.max(0.0),
        }
    }
}

/// Attenuation coefficients: `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl Attenuation {
    /// Attenuation factor at `distance`, clamped to `[0, 1]`.
    pub fn factor(&self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;
        let factor = 1.0 / denom;
        if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) }
    }
}

/// A light source in the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Infinitely distant light; rays are parallel.
    Directional {
        /// Unit direction the light travels in.
        direction: Vector3<f32>,
        properties: LightProperties,
    },
    /// Positional light with distance attenuation and an optional spot cone.
    Point {
        position: Point3<f32>,
        attenuation: Attenuation,
        spot: Option<Spotlight>,
        properties: LightProperties,
    },
}

impl Light {
    pub fn new_directional(direction: Vector3<f32>) -> Self {
        Self::Directional {
            direction: normalize_or_zero(&direction),
            properties: LightProperties::default(),
        }
    }

    pub fn new_point(position: Point3<f32>) -> Self {
        Self::Point {
            position,
            attenuation: Attenuation::default(),
            spot: None,
            properties: LightProperties::default(),
        }
    }

    pub fn with_properties(mut self, props: LightProperties) -> Self {
        *self.properties_mut() = props;
        self
    }

    pub fn properties(&self) -> &LightProperties {
        match self {
            Light::Directional { properties, .. } | Light::Point { properties, .. } => properties,
        }
    }

    pub fn properties_mut(&mut self) -> &mut LightProperties {
        match self {
            Light::Directional { properties, .. } | Light::Point { properties, .. } => properties,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.properties().enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.properties_mut().enabled = enabled;
    }

    /// Sets attenuation coefficients. No-op on directional lights.
    pub fn set_attenuation(&mut self, coefficients: Attenuation) {
        if let Light::Point { attenuation, .. } = self {
            *attenuation = coefficients;
        }
    }

    /// Turns a point light into a spotlight. No-op on directional lights.
    pub fn set_spotlight(&mut self, axis: Vector3<f32>, cutoff_deg: f32, exponent: f32) {
        if let Light::Point { spot, .. } = self {
            *spot = Some(Spotlight::new(axis, cutoff_deg, exponent));
        }
    }

    pub fn disable_spotlight(&mut self) {
        if let Light::Point { spot, .. } = self {
            *spot = None;
        }
    }

    /// Color contributed by this light at a surface point.
    ///
    /// `normal` and `view_dir` are unit vectors in world space; `view_dir`
    /// points from the surface towards the camera.
    pub fn calculate(
        &self,
        world_pos: &Point3<f32>,
        normal: &Vector3<f32>,
        view_dir: &Vector3<f32>,
        albedo: Color,
    ) -> Color {
        match self {
            Light::Directional {
                direction,
                properties,
            } => {
                let to_light = -direction;
                properties.ambient + blinn_phong(properties, normal, &to_light, view_dir, albedo, 1.0)
            }

            Light::Point {
                position,
                attenuation,
                spot,
                properties,
            } => {
                let offset = position - world_pos;
                let distance = offset.norm().max(MIN_LIGHT_DISTANCE);
                let to_light = offset / distance;

                let spot_factor = match spot {
                    Some(cone) => {
                        let cos_angle = cone.axis.dot(&-to_light);
                        if cos_angle < cone.cutoff_cos {
                            return Color::BLACK;
                        }
                        cos_angle.max(0.0).powf(cone.exponent)
                    }
                    None => 1.0,
                };

                let factor = attenuation.factor(distance) * spot_factor;
                properties.ambient + blinn_phong(properties, normal, &to_light, view_dir, albedo, factor)
            }
        }
    }
}

/// Diffuse + Blinn-Phong specular, both scaled by `factor`.
/// The specular term is dropped wherever the diffuse term is zero.
fn blinn_phong(
    props: &LightProperties,
    normal: &Vector3<f32>,
    to_light: &Vector3<f32>,
    view_dir: &Vector3<f32>,
    albedo: Color,
    factor: f32,
) -> Color {
    let diff = normal.dot(to_light).max(0.0);
    let diffuse = props.diffuse.modulate(albedo).scale(diff * factor);

    let spec = if diff > 0.0 {
        let halfway = normalize_or_zero(&(to_light + view_dir));
        normal.dot(&halfway).max(0.0).powf(props.shininess)
    } else {
        0.0
    };
    let specular = props.specular.scale(spec * factor);

    diffuse + specular
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up() -> Vector3<f32> {
        Vector3::y()
    }

    #[test]
    fn test_directional_zero_tints_yield_black() {
        let light = Light::new_directional(Vector3::new(0.3, -1.0, 0.2)).with_properties(LightProperties {
            ambient: Color::BLACK,
            diffuse: Color::BLACK,
            specular: Color::BLACK,
            shininess: 0.0,
            enabled: true,
        });

        let normals = [up(), -up(), Vector3::x(), Vector3::new(0.5, 0.5, 0.7).normalize()];
        let views = [up(), Vector3::z(), -Vector3::x()];
        for n in &normals {
            for v in &views {
                let c = light.calculate(&Point3::origin(), n, v, Color::WHITE);
                assert_eq!(c, Color::BLACK);
            }
        }
    }

    #[test]
    fn test_directional_diffuse_follows_lambert() {
        let light = Light::new_directional(-up()).with_properties(LightProperties {
            ambient: Color::BLACK,
            specular: Color::BLACK,
            ..LightProperties::default()
        });
        let albedo = Color::new(200, 100, 50);

        let facing = light.calculate(&Point3::origin(), &up(), &up(), albedo);
        assert_eq!(facing, albedo);

        let tilted = Vector3::new(0.0, 0.5_f32, 0.75_f32.sqrt());
        let half = light.calculate(&Point3::origin(), &tilted, &up(), albedo);
        assert_eq!(half, Color::new(100, 50, 25));
    }

    #[test]
    fn test_no_specular_on_unlit_side() {
        let light = Light::new_directional(-up()).with_properties(LightProperties {
            ambient: Color::BLACK,
            diffuse: Color::BLACK,
            shininess: 1.0,
            ..LightProperties::default()
        });
        // normal faces away from the light, view direction would otherwise produce a highlight
        let c = light.calculate(&Point3::origin(), &-up(), &-up(), Color::WHITE);
        assert_eq!(c, Color::BLACK);

        let lit = light.calculate(&Point3::origin(), &up(), &up(), Color::WHITE);
        assert_eq!(lit, Color::WHITE);
    }

    #[test]
    fn test_ambient_is_unconditional() {
        let light = Light::new_directional(-up());
        let c = light.calculate(&Point3::origin(), &-up(), &up(), Color::BLACK);
        assert_eq!(c, Color::gray(25));
    }

    #[test]
    fn test_point_attenuation_is_clamped() {
        let att = Attenuation {
            constant: 0.1,
            linear: 0.0,
            quadratic: 0.0,
        };
        assert_eq!(att.factor(1.0), 1.0);

        let quad = Attenuation {
            constant: 1.0,
            linear: 0.0,
            quadratic: 1.0,
        };
        assert!((quad.factor(3.0) - 0.1).abs() < 1e-6);
        assert_eq!(Attenuation { constant: 0.0, linear: 0.0, quadratic: 0.0 }.factor(0.0), 1.0);
    }

    #[test]
    fn test_point_light_attenuates_diffuse() {
        let mut light = Light::new_point(Point3::new(0.0, 3.0, 0.0)).with_properties(LightProperties {
            ambient: Color::BLACK,
            specular: Color::BLACK,
            ..LightProperties::default()
        });
        light.set_attenuation(Attenuation {
            constant: 1.0,
            linear: 0.0,
            quadratic: 1.0,
        });

        // d = 3 -> 1 / 10
        let c = light.calculate(&Point3::origin(), &up(), &up(), Color::gray(200));
        assert_eq!(c, Color::gray(20));
    }

    #[test]
    fn test_point_light_at_surface_does_not_blow_up() {
        let light = Light::new_point(Point3::origin());
        let c = light.calculate(&Point3::origin(), &up(), &up(), Color::WHITE);
        assert_eq!(c, Color::gray(25));
    }

    fn point_at_angle(deg: f32) -> Point3<f32> {
        // spot axis points down -Y from (0, 0, 0); sample at unit distance
        let rad = deg.to_radians();
        Point3::new(rad.sin(), -rad.cos(), 0.0)
    }

    #[test]
    fn test_spot_cutoff_is_hard_edged() {
        let mut light = Light::new_point(Point3::origin());
        light.set_spotlight(-up(), 30.0, 1.0);

        let normal = up();
        let inside = point_at_angle(29.0);
        let outside = point_at_angle(31.0);
        let view = up();

        let lit = light.calculate(&inside, &normal, &view, Color::WHITE);
        assert_ne!(lit, Color::BLACK);
        assert!(lit.r > 25, "expected diffuse on top of ambient, got {lit:?}");

        let dark = light.calculate(&outside, &normal, &view, Color::WHITE);
        assert_eq!(dark, Color::BLACK);
    }

    #[test]
    fn test_disable_spotlight_restores_point_light() {
        let mut light = Light::new_point(Point3::origin());
        light.set_spotlight(-up(), 10.0, 2.0);
        let far_off_axis = point_at_angle(80.0);
        assert_eq!(light.calculate(&far_off_axis, &up(), &up(), Color::WHITE), Color::BLACK);

        light.disable_spotlight();
        assert_ne!(light.calculate(&far_off_axis, &up(), &up(), Color::WHITE), Color::BLACK);
    }

    #[test]
    fn test_enable_flag() {
        let mut light = Light::new_directional(-up());
        assert!(light.is_enabled());
        light.set_enabled(false);
        assert!(!light.is_enabled());
    }
}
