use crate::types::{Point, Vector};

/// Triangle mesh produced for one chunk.
///
/// Vertices are never shared: every triangle appends three fresh vertices, even when they
/// coincide with vertices emitted for a neighbouring cube. Positions are chunk-local; placing
/// the chunk in the world is up to the consumer, as is computing normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions: `[[x, y, z], ...]`
    pub vertices: Vec<[f32; 3]>,

    /// Triangle list into `vertices`, three indices per triangle.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Creates an empty mesh with no vertices or triangles.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `vertices` vertices and as many indices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices),
        }
    }

    /// `true` when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a vertex and returns its index.
    #[inline]
    pub(crate) fn push_vertex(&mut self, p: Point) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push([p.x, p.y, p.z]);
        index
    }

    /// Returns the vertex indices of triangle `tri`.
    pub fn triangle(&self, tri: usize) -> [u32; 3] {
        let i = tri * 3;
        [self.indices[i], self.indices[i + 1], self.indices[i + 2]]
    }

    /// Returns the three vertex positions of triangle `tri`, in winding order.
    pub fn tri_coords(&self, tri: usize) -> [Point; 3] {
        self.triangle(tri)
            .map(|v| Point::from(self.vertices[v as usize]))
    }

    /// Computes the unit face normal `(b - a) × (c - a)` for triangle `tri`.
    ///
    /// Returns the zero vector if the triangle is degenerate.
    pub fn tri_normal(&self, tri: usize) -> Vector {
        let [a, b, c] = self.tri_coords(tri);

        let cross = (b - a).cross(&(c - a));

        let nrm = cross.norm();
        if nrm == 0.0 {
            Vector::new(0.0, 0.0, 0.0)
        } else {
            cross / nrm
        }
    }

    /// Moves `other` onto the end of this mesh, rebasing its indices.
    pub fn append(&mut self, other: &mut MeshBuffers) {
        let base = self.vertices.len() as u32;
        self.vertices.append(&mut other.vertices);
        self.indices.extend(other.indices.drain(..).map(|i| i + base));
    }
}
