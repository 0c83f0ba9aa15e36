use super::vertex::{v, Vertex};
use std::f32::consts::PI;

pub fn sphere_mesh(segments: u32, rings: u32) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for segment in 0..=segments {
            let theta = 2.0 * PI * segment as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            // For a unit sphere, position = normal
            vertices.push(v([x, y, z], [x, y, z]));
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.push(current);
            indices.push(next);
            indices.push(current + 1);

            indices.push(current + 1);
            indices.push(next);
            indices.push(next + 1);
        }
    }

    (vertices, indices)
}

pub fn cube_mesh() -> (Vec<Vertex>, Vec<u32>) {
    let p = |x, y, z| [x, y, z];

    let verts = vec![
        // Right face (+X)
        v(p(0.5, -0.5, -0.5), [1.0, 0.0, 0.0]),
        v(p(0.5, 0.5, -0.5), [1.0, 0.0, 0.0]),
        v(p(0.5, 0.5, 0.5), [1.0, 0.0, 0.0]),
        v(p(0.5, -0.5, 0.5), [1.0, 0.0, 0.0]),
        // Left face (-X)
        v(p(-0.5, -0.5, 0.5), [-1.0, 0.0, 0.0]),
        v(p(-0.5, 0.5, 0.5), [-1.0, 0.0, 0.0]),
        v(p(-0.5, 0.5, -0.5), [-1.0, 0.0, 0.0]),
        v(p(-0.5, -0.5, -0.5), [-1.0, 0.0, 0.0]),
        // Top face (+Y)
        v(p(-0.5, 0.5, -0.5), [0.0, 1.0, 0.0]),
        v(p(-0.5, 0.5, 0.5), [0.0, 1.0, 0.0]),
        v(p(0.5, 0.5, 0.5), [0.0, 1.0, 0.0]),
        v(p(0.5, 0.5, -0.5), [0.0, 1.0, 0.0]),
        // Bottom face (-Y)
        v(p(-0.5, -0.5, 0.5), [0.0, -1.0, 0.0]),
        v(p(-0.5, -0.5, -0.5), [0.0, -1.0, 0.0]),
        v(p(0.5, -0.5, -0.5), [0.0, -1.0, 0.0]),
        v(p(0.5, -0.5, 0.5), [0.0, -1.0, 0.0]),
        // Front face (+Z)
        v(p(0.5, -0.5, 0.5), [0.0, 0.0, 1.0]),
        v(p(0.5, 0.5, 0.5), [0.0, 0.0, 1.0]),
        v(p(-0.5, 0.5, 0.5), [0.0, 0.0, 1.0]),
        v(p(-0.5, -0.5, 0.5), [0.0, 0.0, 1.0]),
        // Back face (-Z)
        v(p(-0.5, -0.5, -0.5), [0.0, 0.0, -1.0]),
        v(p(-0.5, 0.5, -0.5), [0.0, 0.0, -1.0]),
        v(p(0.5, 0.5, -0.5), [0.0, 0.0, -1.0]),
        v(p(0.5, -0.5, -0.5), [0.0, 0.0, -1.0]),
    ];

    let mut indices = Vec::with_capacity(36);
    for face in 0..6u32 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (verts, indices)
}

/// Unit plane in the XZ plane, facing +Y.
pub fn plane_mesh() -> (Vec<Vertex>, Vec<u32>) {
    let n = [0.0, 1.0, 0.0];
    let verts = vec![
        v([-0.5, 0.0, -0.5], n),
        v([-0.5, 0.0, 0.5], n),
        v([0.5, 0.0, 0.5], n),
        v([0.5, 0.0, -0.5], n),
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];
    (verts, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(vertices: &[Vertex], indices: &[u32]) {
        for &i in indices {
            assert!((i as usize) < vertices.len());
        }
    }

    #[test]
    fn cube_has_36_indices() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert_indices_in_range(&vertices, &indices);
    }

    #[test]
    fn sphere_indices_in_range() {
        let (vertices, indices) = sphere_mesh(16, 12);
        assert_eq!(indices.len() as u32, 16 * 12 * 6);
        assert_indices_in_range(&vertices, &indices);
    }

    #[test]
    fn sphere_normals_are_unit_length() {
        let (vertices, _) = sphere_mesh(8, 6);
        for vert in vertices {
            let n = glam::Vec3::from_array(vert.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn plane_faces_up() {
        let (vertices, indices) = plane_mesh();
        assert_indices_in_range(&vertices, &indices);
        for vert in vertices {
            assert_eq!(vert.normal, [0.0, 1.0, 0.0]);
        }
    }
}
