//! Triangle-soup mesh data
//!
//! Components draw with `glDrawArrays`, so meshes are stored de-indexed: every
//! three consecutive entries form one triangle and the attribute arrays always
//! have the same length.

use crate::foundation::math::Vec3;

/// De-indexed triangle list with per-vertex UVs and normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates, one per position
    pub uvs: Vec<[f32; 2]>,
    /// Vertex normals, one per position
    pub normals: Vec<[f32; 3]>,
}

impl MeshData {
    /// Unit cube centred on the origin with corners at ±1
    ///
    /// Each face gets its own four corners so normals stay flat and UVs run
    /// 0..1 across every face. 6 faces × 2 triangles × 3 vertices = 36.
    pub fn cube() -> Self {
        // (normal, corners counter-clockwise seen from outside)
        const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // Front
            ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
            // Back
            ([0.0, 0.0, -1.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
            // Left
            ([-1.0, 0.0, 0.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
            // Right
            ([1.0, 0.0, 0.0], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
            // Top
            ([0.0, 1.0, 0.0], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
            // Bottom
            ([0.0, -1.0, 0.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
        ];
        const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        const TRIANGLES: [usize; 6] = [0, 1, 2, 2, 3, 0];

        let mut mesh = Self::default();
        for (normal, corners) in FACES {
            for corner in TRIANGLES {
                mesh.positions.push(corners[corner]);
                mesh.uvs.push(CORNER_UVS[corner]);
                mesh.normals.push(normal);
            }
        }
        mesh
    }

    /// Number of vertices (three per triangle)
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Average of all vertex positions; the origin for an empty mesh
    pub fn center(&self) -> Vec3 {
        centroid(&self.positions)
    }

    /// Positions as a flat `x, y, z, ...` array
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    /// UVs as a flat `u, v, ...` array
    pub fn flat_uvs(&self) -> Vec<f32> {
        self.uvs.iter().flatten().copied().collect()
    }

    /// Normals as a flat `x, y, z, ...` array
    pub fn flat_normals(&self) -> Vec<f32> {
        self.normals.iter().flatten().copied().collect()
    }
}

/// Arithmetic mean of a set of points
pub fn centroid(points: &[[f32; 3]]) -> Vec3 {
    if points.is_empty() {
        return Vec3::zeros();
    }
    let sum = points
        .iter()
        .fold(Vec3::zeros(), |acc, p| acc + Vec3::new(p[0], p[1], p[2]));
    sum / points.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_mesh_structure() {
        let cube = MeshData::cube();

        assert_eq!(cube.vertex_count(), 36, "6 faces * 2 triangles * 3 vertices");
        assert_eq!(cube.uvs.len(), 36);
        assert_eq!(cube.normals.len(), 36);
        assert_eq!(cube.flat_positions().len(), 108);
        assert_eq!(cube.flat_uvs().len(), 72);
    }

    #[test]
    fn test_cube_is_centred() {
        let center = MeshData::cube().center();
        assert_relative_eq!(center, Vec3::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = MeshData::cube();
        for (position, normal) in cube.positions.iter().zip(&cube.normals) {
            let p = Vec3::from(*position);
            let n = Vec3::from(*normal);
            assert_relative_eq!(p.dot(&n), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = MeshData::cube();
        for (triangle, normals) in cube.positions.chunks(3).zip(cube.normals.chunks(3)) {
            let a = Vec3::from(triangle[0]);
            let b = Vec3::from(triangle[1]);
            let c = Vec3::from(triangle[2]);
            let face = (b - a).cross(&(c - a)).normalize();
            assert_relative_eq!(face, Vec3::from(normals[0]), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_centroid() {
        let points = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 3.0, 0.0]];
        assert_relative_eq!(centroid(&points), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(centroid(&[]), Vec3::zeros());
    }
}
