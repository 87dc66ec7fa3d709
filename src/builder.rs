//! Declarative Shape builder API.
//!
//! `Shape` is the user-facing entry point for composing SDF geometry.
//! It wraps an `Arc<SdfNode>` so it is cheaply cloneable and immutable.
//!
//! # Example
//!
//! ```rust,no_run
//! use sdfmesh::builder::Shape;
//! use sdfmesh::types::MeshSettings;
//!
//! let bracket = Shape::box3(2.0, 0.3, 1.5)
//!     .union(Shape::cylinder(0.5, 2.0).translate(0.0, 1.0, 0.0))
//!     .subtract(Shape::cylinder(0.3, 2.5))
//!     .translate(0.0, 0.5, 0.0);
//! let mesh = bracket.mesh(&MeshSettings::default()).unwrap();
//! mesh.export_obj("bracket.obj").unwrap();
//! ```

use std::sync::Arc;
use nalgebra::Vector3;
use crate::dag::SdfNode;
use crate::error::MeshError;
use crate::shape::Sdf;
use crate::types::{Mesh, MeshSettings};

/// A composable, immutable shape backed by an SDF expression DAG.
///
/// Combinators consume their operands and return a new `Shape` whose node
/// references the operands' nodes; clone a shape first to reuse it in
/// several places of the same expression.
#[derive(Clone)]
pub struct Shape {
    node: Arc<SdfNode>,
}

impl From<SdfNode> for Shape {
    fn from(node: SdfNode) -> Self {
        Self { node: Arc::new(node) }
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

impl Shape {
    /// Sphere centered at the origin.
    pub fn sphere(radius: f64) -> Self {
        Self::sphere_at(Vector3::zeros(), radius)
    }

    /// Sphere centered at `center`.
    pub fn sphere_at(center: Vector3<f64>, radius: f64) -> Self {
        SdfNode::Sphere { center, radius }.into()
    }

    /// Axis-aligned box centered at the origin.
    /// `hx`, `hy`, `hz` are the half-extents along each axis.
    pub fn box3(hx: f64, hy: f64, hz: f64) -> Self {
        SdfNode::Box3 {
            half_extents: Vector3::new(hx, hy, hz),
        }
        .into()
    }

    /// Capped cylinder along the X axis, centered at the origin.
    pub fn cylinder(radius: f64, length: f64) -> Self {
        SdfNode::Cylinder { radius, length }.into()
    }
}

// ---------------------------------------------------------------------------
// CSG operations: consume self, return new Shape
// ---------------------------------------------------------------------------

impl Shape {
    /// Boolean union: the volume of either shape.
    pub fn union(self, other: Shape) -> Self {
        SdfNode::Union(self.node, other.node).into()
    }

    /// Alias for [`Shape::union`].
    pub fn add(self, other: Shape) -> Self {
        self.union(other)
    }

    /// Smooth union with blending width `k`.
    pub fn smooth_union(self, other: Shape, k: f64) -> Self {
        SdfNode::SmoothUnion(self.node, other.node, k).into()
    }

    /// Alias for [`Shape::smooth_union`].
    pub fn smooth_add(self, other: Shape, k: f64) -> Self {
        self.smooth_union(other, k)
    }

    /// Grow the surface outward by `radius`.
    pub fn pad(self, radius: f64) -> Self {
        SdfNode::Pad(self.node, radius).into()
    }

    /// Boolean intersection: the volume shared by both shapes.
    pub fn intersect(self, other: Shape) -> Self {
        SdfNode::Intersection(self.node, other.node).into()
    }

    /// Complement: everything outside the shape.
    pub fn inverse(self) -> Self {
        SdfNode::Inverse(self.node).into()
    }

    /// Boolean subtraction: self minus other.
    pub fn subtract(self, other: Shape) -> Self {
        self.intersect(other.inverse())
    }
}

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

impl Shape {
    /// Translate by `(x, y, z)`.
    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        SdfNode::Translate(self.node, Vector3::new(x, y, z)).into()
    }

    /// Uniform scale by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        SdfNode::UniformScale(self.node, factor).into()
    }

    /// Per-axis scale. The resulting field is only an approximate distance.
    pub fn scale_xyz(self, sx: f64, sy: f64, sz: f64) -> Self {
        SdfNode::NonUniformScale(self.node, Vector3::new(sx, sy, sz)).into()
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

impl Shape {
    /// Evaluate the signed distance at `point`.
    /// Negative inside, zero on surface, positive outside.
    pub fn distance(&self, point: Vector3<f64>) -> f64 {
        self.node.evaluate(point)
    }

    /// Outward unit normal at `point`.
    pub fn normal(&self, point: Vector3<f64>) -> Vector3<f64> {
        self.node.normal(point)
    }

    /// Returns `true` if `point` is inside the shape (SDF < 0).
    pub fn contains(&self, point: Vector3<f64>) -> bool {
        self.node.evaluate(point) < 0.0
    }

    /// Expose the inner DAG node.
    pub fn node(&self) -> &SdfNode {
        &self.node
    }
}

impl Sdf for Shape {
    fn evaluate(&self, point: Vector3<f64>) -> f64 {
        self.node.evaluate(point)
    }

    fn normal(&self, point: Vector3<f64>) -> Vector3<f64> {
        self.node.normal(point)
    }
}

// ---------------------------------------------------------------------------
// Meshing
// ---------------------------------------------------------------------------

impl Shape {
    /// Extract an indexed triangle mesh of the zero level-set.
    pub fn mesh(&self, settings: &MeshSettings) -> Result<Mesh, MeshError> {
        crate::mesh::construct_mesh(self.node.as_ref(), settings)
    }
}
