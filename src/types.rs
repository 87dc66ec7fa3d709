use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use nalgebra::Vector3;

use crate::error::MeshError;

/// An indexed triangle mesh extracted from a signed distance field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<Vector3<f64>>,
    /// Per-vertex normals (unit length), parallel to `positions`.
    pub normals: Vec<Vector3<f64>>,
    /// Triangle indices (every 3 consecutive values form one triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, position: Vector3<f64>, normal: Vector3<f64>) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        (self.positions.len() - 1) as u32
    }

    /// Remove vertices that no triangle references, compacting positions and
    /// normals and remapping the index buffer. Relative vertex order is kept.
    /// Returns the number of vertices removed.
    pub fn drop_unreferenced_vertices(&mut self) -> usize {
        let mut used = vec![false; self.positions.len()];
        for &i in &self.indices {
            used[i as usize] = true;
        }

        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut next = 0usize;
        for (old, &keep) in used.iter().enumerate() {
            if keep {
                self.positions[next] = self.positions[old];
                self.normals[next] = self.normals[old];
                remap[old] = next as u32;
                next += 1;
            }
        }

        let removed = self.positions.len() - next;
        self.positions.truncate(next);
        self.normals.truncate(next);
        for i in &mut self.indices {
            *i = remap[*i as usize];
        }
        removed
    }

    /// Axis-aligned bounds of the vertex positions.
    pub fn bounding_box(&self) -> BBox3 {
        let mut bbox = BBox3::empty();
        for p in &self.positions {
            bbox.expand(*p);
        }
        bbox
    }

    /// Write the mesh as a Wavefront OBJ file.
    pub fn export_obj(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        crate::export::write_obj(self, &mut writer)
    }

    /// Write the mesh as a binary STL file.
    pub fn export_stl(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        crate::export::write_stl(self, &mut writer)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
pub struct BBox3 {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl BBox3 {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self { Self { min, max } }

    /// Inverted box that any `expand` call overwrites.
    pub fn empty() -> Self {
        Self {
            min: Vector3::repeat(f64::INFINITY),
            max: Vector3::repeat(f64::NEG_INFINITY),
        }
    }

    pub fn size(&self) -> Vector3<f64> { self.max - self.min }
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand(&mut self, p: Vector3<f64>) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    /// Index (0 = x, 1 = y, 2 = z) of the widest dimension.
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s.x >= s.y && s.x >= s.z {
            0
        } else if s.y >= s.z {
            1
        } else {
            2
        }
    }

    /// Squared distance from `p` to the box (zero inside).
    pub fn distance_squared(&self, p: Vector3<f64>) -> f64 {
        let below = self.min - p;
        let above = p - self.max;
        let d = Vector3::new(
            below.x.max(above.x).max(0.0),
            below.y.max(above.y).max(0.0),
            below.z.max(above.z).max(0.0),
        );
        d.norm_squared()
    }
}

/// Optional post-processing stages run on the half-edge topology.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefineOptions {
    /// Number of feature-restoring edge-split passes.
    pub rectify_passes: u32,
    /// Collapse short edges inside flat regions.
    pub simplify: bool,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self { rectify_passes: 0, simplify: false }
    }
}

/// Settings controlling mesh extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSettings {
    /// Edge length of the finest sampling cube.
    pub target_resolution: f64,
    /// Half-size of the root sampling cube. The surface must lie inside it.
    pub initial_span: f64,
    /// Center of the root sampling cube.
    pub center: Vector3<f64>,
    pub refine: RefineOptions,
    /// Soup vertices closer than this are merged.
    pub merge_distance: f64,
    /// Octree recursion cap. Values above 64 are treated as 64.
    pub max_depth: u8,
    /// Fan the coarse octree levels out over the rayon pool.
    pub parallel: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            target_resolution: 0.1,
            initial_span: 1e8,
            center: Vector3::zeros(),
            refine: RefineOptions::default(),
            merge_distance: 1e-3,
            max_depth: 48,
            parallel: true,
        }
    }
}

impl MeshSettings {
    /// Check that the settings describe a finite, non-empty sampling job.
    pub fn validate(&self) -> Result<(), MeshError> {
        if !self.target_resolution.is_finite() || self.target_resolution <= 0.0 {
            return Err(MeshError::InvalidResolution(self.target_resolution));
        }
        if !self.initial_span.is_finite() || self.initial_span <= 0.0 {
            return Err(MeshError::InvalidSpan(self.initial_span));
        }
        if !self.merge_distance.is_finite() || self.merge_distance < 0.0 {
            return Err(MeshError::InvalidMergeDistance(self.merge_distance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_unreferenced_compacts_and_remaps() {
        let mut mesh = Mesh {
            positions: (0..5).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect(),
            normals: vec![Vector3::z(); 5],
            indices: vec![4, 2, 0],
        };
        assert_eq!(mesh.drop_unreferenced_vertices(), 2);
        assert_eq!(mesh.indices, vec![2, 1, 0]);
        assert_eq!(mesh.positions[1], Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(mesh.positions[2], Vector3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn bbox_distance_is_zero_inside() {
        let b = BBox3::new(Vector3::zeros(), Vector3::repeat(1.0));
        assert_eq!(b.distance_squared(Vector3::repeat(0.5)), 0.0);
        assert_eq!(b.distance_squared(Vector3::new(3.0, 0.5, 0.5)), 4.0);
    }

    #[test]
    fn default_settings_validate() {
        assert!(MeshSettings::default().validate().is_ok());
        let bad = MeshSettings { target_resolution: 0.0, ..Default::default() };
        assert!(matches!(bad.validate(), Err(MeshError::InvalidResolution(_))));
    }
}
