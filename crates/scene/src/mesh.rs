/// One face of the cube, in upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
    Top,
    Bottom,
    Right,
    Left,
}

impl Face {
    /// All faces in the order their vertices appear in the buffers.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Top,
        Face::Bottom,
        Face::Right,
        Face::Left,
    ];

    /// Position of this face in [`Face::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The four corners of the face, counter-clockwise seen from outside.
    #[rustfmt::skip]
    pub fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Face::Front  => [[-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0]],
            Face::Back   => [[-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0]],
            Face::Top    => [[-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0]],
            Face::Bottom => [[-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0]],
            Face::Right  => [[ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0]],
            Face::Left   => [[-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0]],
        }
    }

    /// Flat RGBA color shared by the face's four vertices.
    pub fn color(self) -> [f32; 4] {
        match self {
            Face::Front => [1.0, 1.0, 1.0, 1.0],  // white
            Face::Back => [1.0, 0.0, 0.0, 1.0],   // red
            Face::Top => [0.0, 1.0, 0.0, 1.0],    // green
            Face::Bottom => [0.0, 0.0, 1.0, 1.0], // blue
            Face::Right => [1.0, 1.0, 0.0, 1.0],  // yellow
            Face::Left => [1.0, 0.0, 1.0, 1.0],   // magenta
        }
    }
}

/// Vertex and index data for the cube, laid out as three separate streams
/// so each can be uploaded to its own buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMesh {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u16>,
}

impl CubeMesh {
    pub const VERTICES_PER_FACE: usize = 4;
    pub const VERTEX_COUNT: usize = 24;
    pub const INDEX_COUNT: usize = 36;

    /// Two triangles per quad, relative to the face's first vertex.
    const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

    /// Build the unit cube centered at the origin with side length 2.
    pub fn new() -> Self {
        let mut positions = Vec::with_capacity(Self::VERTEX_COUNT);
        let mut colors = Vec::with_capacity(Self::VERTEX_COUNT);
        let mut indices = Vec::with_capacity(Self::INDEX_COUNT);

        for face in Face::ALL {
            let base = (face.index() * Self::VERTICES_PER_FACE) as u16;
            positions.extend(face.corners());
            colors.extend([face.color(); Self::VERTICES_PER_FACE]);
            indices.extend(Self::QUAD_INDICES.iter().map(|i| base + i));
        }

        Self {
            positions,
            colors,
            indices,
        }
    }

    /// Number of indices consumed by one draw of the whole mesh.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Triangles as triples of vertex indices.
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex range of a face within the position and color streams.
    pub fn face_range(face: Face) -> std::ops::Range<usize> {
        let start = face.index() * Self::VERTICES_PER_FACE;
        start..start + Self::VERTICES_PER_FACE
    }
}

impl Default for CubeMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn corner(mesh: &CubeMesh, i: usize) -> Vec3 {
        Vec3::from_array(mesh.positions[i])
    }

    #[test]
    fn stream_lengths() {
        let mesh = CubeMesh::new();
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.colors.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.triangles().count(), 12);
    }

    #[test]
    fn faces_are_planar_equal_area_quads() {
        let mesh = CubeMesh::new();
        for face in Face::ALL {
            let r = CubeMesh::face_range(face);
            let [a, b, c, d] = [0, 1, 2, 3].map(|k| corner(&mesh, r.start + k));

            let normal = (b - a).cross(c - a);
            assert!(normal.dot(d - a).abs() < 1e-6, "{face:?} is not planar");

            let area = 0.5 * (b - a).cross(c - a).length() + 0.5 * (c - a).cross(d - a).length();
            assert!((area - 4.0).abs() < 1e-6, "{face:?} has area {area}");
        }
    }

    #[test]
    fn faces_wind_outward() {
        let mesh = CubeMesh::new();
        for face in Face::ALL {
            let r = CubeMesh::face_range(face);
            let [a, b, c] = [0, 1, 2].map(|k| corner(&mesh, r.start + k));
            let center = (a + c) * 0.5;
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(center) > 0.0, "{face:?} winds inward");
        }
    }

    #[test]
    fn positions_lie_on_the_cube() {
        let mesh = CubeMesh::new();
        for p in &mesh.positions {
            assert!(p.iter().all(|c| c.abs() == 1.0));
        }
    }

    #[test]
    fn indices_in_range_and_follow_quad_pattern() {
        let mesh = CubeMesh::new();
        assert!(mesh.indices.iter().all(|&i| (i as usize) < CubeMesh::VERTEX_COUNT));

        for (f, chunk) in mesh.indices.chunks_exact(6).enumerate() {
            let base = (f * 4) as u16;
            assert_eq!(chunk, [base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    #[test]
    fn every_vertex_is_referenced() {
        let mesh = CubeMesh::new();
        for v in 0..CubeMesh::VERTEX_COUNT as u16 {
            assert!(mesh.indices.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn face_colors_are_flat_and_distinct() {
        let mesh = CubeMesh::new();
        let mut seen: Vec<[f32; 4]> = Vec::new();
        for face in Face::ALL {
            let colors = &mesh.colors[CubeMesh::face_range(face)];
            assert!(colors.iter().all(|c| *c == colors[0]));
            assert!(colors[0].iter().all(|ch| (0.0..=1.0).contains(ch)));
            assert!(!seen.contains(&colors[0]), "{face:?} repeats a color");
            seen.push(colors[0]);
        }
        assert_eq!(seen.len(), 6);
    }
}
