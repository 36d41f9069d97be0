use glam::Vec2;

/// A side of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The edge at the minimum X coordinate.
    NegX,
    /// The edge at the maximum X coordinate.
    PosX,
    /// The edge at the minimum Z coordinate.
    NegZ,
    /// The edge at the maximum Z coordinate.
    PosZ,
}

impl Edge {
    /// Returns the edge on the other side of the boundary.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::NegX => Self::PosX,
            Self::PosX => Self::NegX,
            Self::NegZ => Self::PosZ,
            Self::PosZ => Self::NegZ,
        }
    }
}

/// A square grid of height samples covering a chunk.
///
/// A height map of resolution `r` stores `(r + 1)²` vertices, so that the last row and column
/// lie exactly on the boundary shared with the next chunk.
///
/// Vertex `(i, j)` sits at local position `(i * cell_size, j * cell_size)`, `i` along X and `j`
/// along Z.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightMap {
    resolution: u32,
    cell_size: f32,
    heights: Vec<f32>,
}

impl HeightMap {
    /// Creates a flat height map.
    ///
    /// # Panics
    ///
    /// Panics if `resolution` is zero.
    #[track_caller]
    pub fn flat(resolution: u32, chunk_size: f32) -> Self {
        assert!(resolution > 0, "a height map needs at least one cell");
        let side = resolution as usize + 1;
        Self {
            resolution,
            cell_size: chunk_size / resolution as f32,
            heights: vec![0.0; side * side],
        }
    }

    /// Creates a height map by evaluating `f(i, j)` for every vertex.
    #[track_caller]
    pub fn from_fn(resolution: u32, chunk_size: f32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        let mut ret = Self::flat(resolution, chunk_size);
        for j in 0..=resolution {
            for i in 0..=resolution {
                ret.set(i, j, f(i, j));
            }
        }
        ret
    }

    /// Returns the number of cells along one side.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Returns the number of vertices along one side.
    #[inline]
    pub fn side(&self) -> u32 {
        self.resolution + 1
    }

    /// Returns the world-space distance between two neighboring vertices.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Returns every height sample, row by row.
    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    fn index(&self, i: u32, j: u32) -> usize {
        debug_assert!(i <= self.resolution && j <= self.resolution);
        j as usize * self.side() as usize + i as usize
    }

    /// Returns the height of vertex `(i, j)`.
    #[inline]
    #[track_caller]
    pub fn get(&self, i: u32, j: u32) -> f32 {
        self.heights[self.index(i, j)]
    }

    /// Sets the height of vertex `(i, j)`.
    #[inline]
    #[track_caller]
    pub fn set(&mut self, i: u32, j: u32, height: f32) {
        let index = self.index(i, j);
        self.heights[index] = height;
    }

    /// Returns the vertex coordinates along the provided edge, in increasing order.
    pub fn edge_vertices(&self, edge: Edge) -> impl Iterator<Item = (u32, u32)> {
        let r = self.resolution;
        (0..=r).map(move |k| match edge {
            Edge::NegX => (0, k),
            Edge::PosX => (r, k),
            Edge::NegZ => (k, 0),
            Edge::PosZ => (k, r),
        })
    }

    /// Returns the heights along the provided edge, in increasing order.
    pub fn edge(&self, edge: Edge) -> Vec<f32> {
        self.edge_vertices(edge)
            .map(|(i, j)| self.get(i, j))
            .collect()
    }

    /// Samples the height at a local position using bilinear interpolation.
    ///
    /// Positions outside of the chunk are clamped to its edges.
    pub fn height_at(&self, local: Vec2) -> f32 {
        let r = self.resolution as f32;
        let gx = (local.x / self.cell_size).clamp(0.0, r);
        let gz = (local.y / self.cell_size).clamp(0.0, r);

        let i0 = (gx.floor() as u32).min(self.resolution - 1);
        let j0 = (gz.floor() as u32).min(self.resolution - 1);
        let tx = gx - i0 as f32;
        let tz = gz - j0 as f32;

        let h00 = self.get(i0, j0);
        let h10 = self.get(i0 + 1, j0);
        let h01 = self.get(i0, j0 + 1);
        let h11 = self.get(i0 + 1, j0 + 1);

        let a = h00 + (h10 - h00) * tx;
        let b = h01 + (h11 - h01) * tx;
        a + (b - a) * tz
    }

    /// Returns the minimum and maximum heights of the map.
    pub fn range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }
}
