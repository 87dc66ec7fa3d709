//! BVH (Bounding Volume Hierarchy) over a point cloud.
//!
//! Answers "all points within radius r of q" in roughly O(log n + k). Built
//! once over the triangle-soup vertices during deduplication and read-only
//! afterwards.

use nalgebra::Vector3;

use crate::types::BBox3;

/// Maximum number of points stored in a leaf.
pub const MAX_POINTS_PER_LEAF: usize = 8;

/// BVH node.
#[derive(Debug)]
pub enum BvhNode {
    /// Leaf node holding point indices.
    Leaf { bbox: BBox3, points: Vec<u32> },
    /// Internal node with two children.
    Internal {
        bbox: BBox3,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    pub fn bbox(&self) -> &BBox3 {
        match self {
            BvhNode::Leaf { bbox, .. } => bbox,
            BvhNode::Internal { bbox, .. } => bbox,
        }
    }
}

/// Point BVH. Indices returned by queries refer to the slice passed to
/// [`PointBvh::build`].
pub struct PointBvh {
    points: Vec<Vector3<f64>>,
    root: Option<BvhNode>,
}

impl PointBvh {
    pub fn build(points: &[Vector3<f64>]) -> Self {
        if points.is_empty() {
            return PointBvh { points: Vec::new(), root: None };
        }
        let indices: Vec<u32> = (0..points.len() as u32).collect();
        let root = Self::build_node(points, indices);
        PointBvh {
            points: points.to_vec(),
            root: Some(root),
        }
    }

    /// Split along the longest axis at the median.
    fn build_node(points: &[Vector3<f64>], mut indices: Vec<u32>) -> BvhNode {
        let mut bbox = BBox3::empty();
        for &i in &indices {
            bbox.expand(points[i as usize]);
        }

        if indices.len() <= MAX_POINTS_PER_LEAF {
            return BvhNode::Leaf { bbox, points: indices };
        }

        let axis = bbox.longest_axis();
        let mid = indices.len() / 2;
        indices.select_nth_unstable_by(mid, |&a, &b| {
            points[a as usize][axis]
                .partial_cmp(&points[b as usize][axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let right_indices = indices.split_off(mid);

        BvhNode::Internal {
            bbox,
            left: Box::new(Self::build_node(points, indices)),
            right: Box::new(Self::build_node(points, right_indices)),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indices of all points `p` with `|p - center| <= radius`.
    pub fn query_within_radius(&self, center: Vector3<f64>, radius: f64) -> Vec<u32> {
        let mut result = Vec::new();
        let Some(root) = &self.root else {
            return result;
        };
        let r2 = radius * radius;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.bbox().distance_squared(center) > r2 {
                continue;
            }
            match node {
                BvhNode::Leaf { points, .. } => {
                    result.extend(
                        points
                            .iter()
                            .copied()
                            .filter(|&i| (self.points[i as usize] - center).norm_squared() <= r2),
                    );
                }
                BvhNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        result
    }
}
