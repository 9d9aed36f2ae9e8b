use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Lights the shader's uniform block has room for.
pub const MAX_LIGHTS: usize = 2;

/// A point light with a constant ambient contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub position: Vec3,
    pub intensity: f32,
    pub ambient: f32,
}

/// Warm key light above, dimmer fill light below.
pub const DEFAULT_LIGHTS: [PointLight; MAX_LIGHTS] = [
    PointLight {
        color: Vec3::new(1.0, 0.8, 0.5),
        position: Vec3::new(-2.0, 5.0, -1.0),
        intensity: 1.0,
        ambient: 0.3,
    },
    PointLight {
        color: Vec3::new(1.0, 0.6, 0.375),
        position: Vec3::new(3.0, -6.0, -2.0),
        intensity: 0.8,
        ambient: 0.0,
    },
];

/// A shading model the renderer can be configured with.
///
/// `evaluate` is the CPU reference of what the GPU computes per pixel from
/// the parameters in [`Lighting::uniforms`].
pub trait Lighting: Send {
    /// Color at world position `pos` with unit `normal`, seen along unit
    /// `view_dir` (surface towards eye).
    fn evaluate(&self, lights: &[PointLight], normal: Vec3, view_dir: Vec3, pos: Vec3) -> Vec3;

    /// GPU parameters for `lights` under this model.
    fn uniforms(&self, lights: &[PointLight]) -> LightingUniforms;
}

/// Blinn-Phong with distance attenuation `1 / (1 + k1*d + k2*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinnPhong {
    pub shininess: f32,
    /// Linear and quadratic attenuation coefficients.
    pub attenuation: Vec2,
}

impl Default for BlinnPhong {
    fn default() -> Self {
        Self {
            shininess: 16.0,
            attenuation: Vec2::new(0.1, 0.001),
        }
    }
}

impl Lighting for BlinnPhong {
    fn evaluate(&self, lights: &[PointLight], normal: Vec3, view_dir: Vec3, pos: Vec3) -> Vec3 {
        lights.iter().fold(Vec3::ZERO, |color, light| {
            let to_light = light.position - pos;
            let dist = to_light.length();
            let light_dir = to_light / dist;
            let half_dir = (light_dir + view_dir).normalize();

            let specular = normal.dot(half_dir).max(0.0).powf(self.shininess);
            let diffuse = normal.dot(light_dir).max(0.0);
            let falloff = light.intensity
                / (1.0 + dist * self.attenuation.x + dist * dist * self.attenuation.y);

            color + (light.ambient + (diffuse + specular) * falloff) * light.color
        })
    }

    fn uniforms(&self, lights: &[PointLight]) -> LightingUniforms {
        let mut uniforms = LightingUniforms::zeroed();
        let count = lights.len().min(MAX_LIGHTS);
        if lights.len() > MAX_LIGHTS {
            tracing::warn!(lights = lights.len(), max = MAX_LIGHTS, "Extra lights ignored");
        }
        for (slot, light) in uniforms.lights.iter_mut().zip(&lights[..count]) {
            *slot = LightUniform {
                color: light.color.extend(light.intensity).to_array(),
                position: light.position.extend(light.ambient).to_array(),
            };
        }
        uniforms.params = [
            self.shininess,
            self.attenuation.x,
            self.attenuation.y,
            count as f32,
        ];
        uniforms
    }
}

/// One light as laid out in `cube.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// rgb color, w = intensity.
    pub color: [f32; 4],
    /// xyz position, w = ambient.
    pub position: [f32; 4],
}

/// Lighting uniform block (group 0, binding 1).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightingUniforms {
    pub lights: [LightUniform; MAX_LIGHTS],
    /// x = shininess, y/z = attenuation, w = active light count.
    pub params: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn unlit_side_only_receives_ambient() {
        // Facing +Z, viewed from behind: neither light reaches it.
        let color = BlinnPhong::default().evaluate(
            &DEFAULT_LIGHTS,
            Vec3::Z,
            Vec3::NEG_Z,
            Vec3::ZERO,
        );
        assert!(approx(color, Vec3::new(0.3, 0.24, 0.15)), "{color:?}");
    }

    #[test]
    fn facing_the_key_light_is_brighter_than_ambient() {
        let pos = Vec3::new(0.0, 0.1, 0.0);
        let normal = (DEFAULT_LIGHTS[0].position - pos).normalize();
        let view_dir = (Vec3::new(0.0, 0.8, 2.5) - pos).normalize();
        let lit = BlinnPhong::default().evaluate(&DEFAULT_LIGHTS, normal, view_dir, pos);
        assert!(lit.x > 0.5);
        assert!(lit.x > lit.z);
    }

    #[test]
    fn attenuation_falls_off_with_distance() {
        let model = BlinnPhong::default();
        let light = [PointLight {
            color: Vec3::ONE,
            position: Vec3::ZERO,
            intensity: 1.0,
            ambient: 0.0,
        }];
        let near = model.evaluate(&light, Vec3::Z, Vec3::Z, Vec3::new(0.0, 0.0, -1.0));
        let far = model.evaluate(&light, Vec3::Z, Vec3::Z, Vec3::new(0.0, 0.0, -10.0));
        assert!(near.x > far.x);
        assert!(far.x > 0.0);
    }

    #[test]
    fn uniforms_pack_intensity_and_ambient_into_w() {
        let u = BlinnPhong::default().uniforms(&DEFAULT_LIGHTS);
        assert_eq!(u.lights[0].color, [1.0, 0.8, 0.5, 1.0]);
        assert_eq!(u.lights[0].position, [-2.0, 5.0, -1.0, 0.3]);
        assert_eq!(u.lights[1].color[3], 0.8);
        assert_eq!(u.params, [16.0, 0.1, 0.001, 2.0]);
        assert_eq!(std::mem::size_of::<LightingUniforms>(), 80);
    }

    #[test]
    fn extra_lights_are_dropped() {
        let lights = [DEFAULT_LIGHTS[0]; 3];
        let u = BlinnPhong::default().uniforms(&lights);
        assert_eq!(u.params[3], 2.0);
    }
}
