use bytemuck::{Pod, Zeroable};
use chessboard_render::Geometry;
use std::f32::consts::TAU;

/// Upper bound on cylinder tessellation, matching config validation.
const MAX_RADIAL_SEGMENTS: u32 = 512;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangle list with counter-clockwise front faces.
#[derive(Debug, Clone, Default)]
pub(crate) struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Box {
                width,
                height,
                depth,
            } => box_mesh(width, height, depth),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder_mesh(radius_top, radius_bottom, height, radial_segments),
        }
    }
}

/// Axis-aligned box centred on the origin.
pub(crate) fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-x, -y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ x, -y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ x,  y,  z], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-x,  y,  z], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ x, -y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-x, -y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-x,  y, -z], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ x,  y, -z], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ x, -y,  z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x, -y, -z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x,  y, -z], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ x,  y,  z], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-x, -y, -z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x, -y,  z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x,  y,  z], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-x,  y, -z], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-x,  y,  z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ x,  y,  z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ x,  y, -z], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-x,  y, -z], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-x, -y, -z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ x, -y, -z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ x, -y,  z], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-x, -y,  z], normal: [0.0, -1.0, 0.0] },
    ];
    let indices = (0..6u32)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();
    MeshData { vertices, indices }
}

/// Upright capped cylinder (or cone frustum) centred on the origin.
pub(crate) fn cylinder_mesh(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> MeshData {
    let segments = radial_segments.clamp(3, MAX_RADIAL_SEGMENTS);
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;
    let mut mesh = MeshData::default();

    // Side wall: one bottom/top vertex pair per seam, the last seam duplicates
    // the first so normals stay smooth without wrapping indices.
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let n = glam::Vec3::new(cos, slope, sin).normalize();
        let normal = [n.x, n.y, n.z];
        mesh.vertices.push(Vertex {
            position: [radius_bottom * cos, -half, radius_bottom * sin],
            normal,
        });
        mesh.vertices.push(Vertex {
            position: [radius_top * cos, half, radius_top * sin],
            normal,
        });
    }
    for i in 0..segments {
        let b0 = i * 2;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        mesh.indices.extend_from_slice(&[b0, t0, t1, b0, t1, b1]);
    }

    push_cap(&mut mesh, radius_top, half, segments, true);
    push_cap(&mut mesh, radius_bottom, -half, segments, false);
    mesh
}

fn push_cap(mesh: &mut MeshData, radius: f32, y: f32, segments: u32, top: bool) {
    let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let centre = mesh.vertices.len() as u32;
    mesh.vertices.push(Vertex {
        position: [0.0, y, 0.0],
        normal,
    });
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices.push(Vertex {
            position: [radius * cos, y, radius * sin],
            normal,
        });
    }
    for i in 0..segments {
        let a = centre + 1 + i;
        let b = a + 1;
        if top {
            mesh.indices.extend_from_slice(&[centre, b, a]);
        } else {
            mesh.indices.extend_from_slice(&[centre, a, b]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle_normal(mesh: &MeshData, tri: &[u32]) -> Vec3 {
        let p = |i: u32| Vec3::from(mesh.vertices[i as usize].position);
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]))
    }

    /// Every triangle's winding normal points the same way as its vertex normals.
    fn assert_outward(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let face = triangle_normal(mesh, tri);
            let vertex = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            assert!(face.dot(vertex) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn box_dimensions() {
        let mesh = box_mesh(25.0, 2.0, 25.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let max = mesh
            .vertices
            .iter()
            .fold(Vec3::splat(f32::MIN), |m, v| m.max(Vec3::from(v.position)));
        assert_eq!(max, Vec3::new(12.5, 1.0, 12.5));
        assert_outward(&mesh);
    }

    #[test]
    fn cylinder_counts_and_extent() {
        let mesh = cylinder_mesh(6.0, 6.0, 20.0, 32);
        // side seams + two caps (centre + ring)
        assert_eq!(mesh.vertices.len(), 33 * 2 + 2 * (1 + 33));
        assert_eq!(mesh.indices.len(), (32 * 6 + 2 * 32 * 3) as usize);
        for v in &mesh.vertices {
            assert!(v.position[1].abs() <= 10.0 + 1e-5);
            let r = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
            assert!(r <= 6.0 + 1e-4);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn cone_frustum_winding() {
        assert_outward(&cylinder_mesh(2.0, 6.0, 10.0, 12));
    }

    #[test]
    fn segment_count_is_capped() {
        let mesh = cylinder_mesh(1.0, 1.0, 1.0, u32::MAX);
        let seams = MAX_RADIAL_SEGMENTS as usize + 1;
        assert_eq!(mesh.vertices.len(), seams * 2 + 2 * (1 + seams));
    }

    #[test]
    fn indices_in_range() {
        let mesh = MeshData::from_geometry(&Geometry::Cylinder {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 1.0,
            radial_segments: 8,
        });
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|i| *i < n));
    }
}
