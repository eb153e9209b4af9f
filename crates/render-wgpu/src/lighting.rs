use chessboard_render::{Geometry, Light, Scene};
use glam::{Mat4, Vec3};

/// The single directional light the GPU backend shades with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sun {
    /// Unit vector from the lit surface towards the light.
    pub direction: Vec3,
    /// Linear colour scaled by intensity.
    pub color: [f32; 3],
    pub cast_shadow: bool,
}

/// Scene lights reduced to what the shader consumes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct FrameLights {
    /// Sum of every ambient light, linear and intensity-scaled.
    pub ambient: [f32; 3],
    pub sun: Option<Sun>,
    /// Directional lights beyond the first, which are not shaded.
    pub ignored_directional: usize,
}

impl FrameLights {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut lights = FrameLights::default();
        for instance in scene.lights() {
            match instance.light {
                Light::Ambient { color, intensity } => {
                    let [r, g, b] = color.scaled_linear(intensity);
                    lights.ambient[0] += r;
                    lights.ambient[1] += g;
                    lights.ambient[2] += b;
                }
                Light::Directional {
                    color,
                    intensity,
                    target,
                    cast_shadow,
                } => {
                    if lights.sun.is_some() {
                        lights.ignored_directional += 1;
                        continue;
                    }
                    let Some(direction) = (instance.position - target).try_normalize() else {
                        continue;
                    };
                    lights.sun = Some(Sun {
                        direction,
                        color: color.scaled_linear(intensity),
                        cast_shadow,
                    });
                }
            }
        }
        lights
    }
}

/// Radius of a sphere around the geometry's local origin that contains it.
pub(crate) fn bounding_radius(geometry: &Geometry) -> f32 {
    match *geometry {
        Geometry::Box {
            width,
            height,
            depth,
        } => Vec3::new(width, height, depth).length() / 2.0,
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            ..
        } => Vec3::new(radius_top.max(radius_bottom), height / 2.0, 0.0).length(),
    }
}

/// Centre and radius of a sphere enclosing every mesh in the scene.
pub(crate) fn scene_bounds(scene: &Scene) -> Option<(Vec3, f32)> {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for mesh in scene.mesh_instances() {
        let Some(geometry) = scene.geometry(mesh.geometry) else {
            continue;
        };
        let r = Vec3::splat(bounding_radius(geometry));
        min = min.min(mesh.position - r);
        max = max.max(mesh.position + r);
    }
    if min.x > max.x {
        return None;
    }
    Some(((min + max) / 2.0, (max - min).length() / 2.0))
}

/// Orthographic light view fitted around a bounding sphere.
///
/// The eye sits two radii from the centre along `direction`, so the sphere
/// spans depths `radius..3 * radius` and maps into `[0, 1]`.
pub(crate) fn light_view_projection(direction: Vec3, center: Vec3, radius: f32) -> Mat4 {
    let dir = direction.try_normalize().unwrap_or(Vec3::Y);
    let radius = radius.max(1.0);
    let eye = center + dir * radius * 2.0;
    let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(eye, center, up);
    let proj = Mat4::orthographic_rh(-radius, radius, -radius, radius, radius, radius * 3.0);
    proj * view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessboard_common::{Color, Viewport};
    use chessboard_render::{Node, SceneConfig, assemble};

    #[test]
    fn reference_scene_lights() {
        let assembled = assemble(&SceneConfig::default(), Viewport::default()).unwrap();
        let lights = FrameLights::from_scene(&assembled.scene);
        assert!((lights.ambient[0] - 0.6).abs() < 1e-6);
        let sun = lights.sun.unwrap();
        assert!(sun.cast_shadow);
        let expected = Vec3::new(100.0, 200.0, 100.0).normalize();
        assert!(sun.direction.abs_diff_eq(expected, 1e-6));
        assert!((sun.color[1] - 0.8).abs() < 1e-6);
        assert_eq!(lights.ignored_directional, 0);
    }

    #[test]
    fn extra_directional_lights_are_counted() {
        let mut scene = Scene::new();
        for i in 0..3 {
            scene
                .add(Node::light(
                    format!("sun{i}"),
                    Light::Directional {
                        color: Color::WHITE,
                        intensity: 1.0,
                        target: Vec3::ZERO,
                        cast_shadow: false,
                    },
                    Vec3::Y,
                ))
                .unwrap();
        }
        let lights = FrameLights::from_scene(&scene);
        assert!(lights.sun.is_some());
        assert_eq!(lights.ignored_directional, 2);
    }

    #[test]
    fn bounds_cover_board_and_pieces() {
        let assembled = assemble(&SceneConfig::default(), Viewport::default()).unwrap();
        let (center, radius) = scene_bounds(&assembled.scene).unwrap();
        assert!(center.x.abs() < 1e-3 && center.z.abs() < 1e-3);
        // Half-diagonal of the 200x200 board is about 141.
        assert!(radius > 141.0 && radius < 200.0);
        assert!(scene_bounds(&Scene::new()).is_none());
    }

    #[test]
    fn light_projection_keeps_bounds_in_clip_space() {
        let center = Vec3::new(0.0, 5.0, 0.0);
        let radius = 150.0;
        let m = light_view_projection(Vec3::new(1.0, 2.0, 1.0), center, radius);

        let c = m.project_point3(center);
        assert!(c.x.abs() < 1e-4 && c.y.abs() < 1e-4);
        assert!((c.z - 0.5).abs() < 1e-4);

        for corner in [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ] {
            let p = m.project_point3(center + corner.normalize() * radius * 0.99);
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "{p:?}");
            assert!(p.z >= 0.0 && p.z <= 1.0, "{p:?}");
        }
    }

    #[test]
    fn light_projection_straight_down_is_finite() {
        let m = light_view_projection(Vec3::Y, Vec3::ZERO, 10.0);
        assert!(m.is_finite());
    }
}
