//! SdfNode expression DAG: an enum-based composable SDF tree.
//!
//! Children are held behind `Arc<SdfNode>`, so sub-expressions can be shared
//! between several parents and the whole DAG is safe to evaluate from many
//! threads at once. Nodes are immutable after construction.

use std::sync::Arc;
use nalgebra::Vector3;
use crate::shape::{central_difference_normal, Sdf};
use crate::{csg, primitives};

/// An expression DAG node representing a signed distance function.
///
/// Each variant stores its parameters inline. Parameters are not validated;
/// nonsensical values (negative radius, zero scale) evaluate to whatever the
/// arithmetic yields.
pub enum SdfNode {
    // -- Primitives --------------------------------------------------------

    /// Sphere at `center` with given `radius`.
    Sphere { center: Vector3<f64>, radius: f64 },

    /// Axis-aligned box at the origin with `half_extents`.
    Box3 { half_extents: Vector3<f64> },

    /// Capped cylinder along the X axis, centered at the origin.
    /// `length` is the full extent along X.
    Cylinder { radius: f64, length: f64 },

    // -- CSG Operations ----------------------------------------------------

    /// Boolean union (logical OR): min of children.
    Union(Arc<SdfNode>, Arc<SdfNode>),

    /// Smooth union with blending width `k`.
    SmoothUnion(Arc<SdfNode>, Arc<SdfNode>, f64),

    /// Boolean intersection (logical AND): max of children.
    Intersection(Arc<SdfNode>, Arc<SdfNode>),

    /// Complement: inside and outside swapped.
    Inverse(Arc<SdfNode>),

    /// Grow (or shrink, for negative values) the surface by `radius`.
    Pad(Arc<SdfNode>, f64),

    // -- Transforms --------------------------------------------------------

    /// Translate by an offset vector.
    Translate(Arc<SdfNode>, Vector3<f64>),

    /// Uniform scale by a factor.
    UniformScale(Arc<SdfNode>, f64),

    /// Per-axis scale. The distance is approximate (not exact Euclidean).
    NonUniformScale(Arc<SdfNode>, Vector3<f64>),
}

/// Distance correction for a non-uniform scale at `point`.
///
/// Ratio of `|p|` to `|p / s|`, i.e. how much the scale stretches space along
/// the direction of `point`. At the origin the direction is undefined and the
/// smallest absolute scale factor is used.
fn non_uniform_back_scale(point: Vector3<f64>, scale: Vector3<f64>) -> f64 {
    let scaled = point.component_div(&scale);
    let denom = scaled.norm_squared();
    if denom > 0.0 {
        (point.norm_squared() / denom).sqrt()
    } else {
        scale.x.abs().min(scale.y.abs()).min(scale.z.abs())
    }
}

impl SdfNode {
    /// Evaluate the signed distance at a 3D point.
    pub fn evaluate(&self, point: Vector3<f64>) -> f64 {
        match self {
            // -- Primitives ------------------------------------------------

            SdfNode::Sphere { center, radius } => {
                primitives::sdf_sphere(point, *center, *radius)
            }
            SdfNode::Box3 { half_extents } => {
                primitives::sdf_box(point, *half_extents)
            }
            SdfNode::Cylinder { radius, length } => {
                primitives::sdf_cylinder(point, *radius, *length)
            }

            // -- CSG -------------------------------------------------------

            SdfNode::Union(a, b) => {
                csg::union(a.evaluate(point), b.evaluate(point))
            }
            SdfNode::SmoothUnion(a, b, k) => {
                csg::smooth_union(a.evaluate(point), b.evaluate(point), *k)
            }
            SdfNode::Intersection(a, b) => {
                csg::intersection(a.evaluate(point), b.evaluate(point))
            }
            SdfNode::Inverse(inner) => {
                csg::inverse(inner.evaluate(point))
            }
            SdfNode::Pad(inner, radius) => {
                csg::pad(inner.evaluate(point), *radius)
            }

            // -- Transforms ------------------------------------------------

            SdfNode::Translate(inner, offset) => {
                inner.evaluate(point - offset)
            }
            SdfNode::UniformScale(inner, factor) => {
                inner.evaluate(point / *factor) * factor
            }
            SdfNode::NonUniformScale(inner, scale) => {
                let d = inner.evaluate(point.component_div(scale));
                d * non_uniform_back_scale(point, *scale)
            }
        }
    }

    /// Outward unit normal at a 3D point.
    ///
    /// Closed forms where one exists; composites pass the query down to the
    /// operand that determines the distance. Everything else falls back to the
    /// central-difference gradient of [`SdfNode::evaluate`].
    pub fn normal(&self, point: Vector3<f64>) -> Vector3<f64> {
        match self {
            SdfNode::Sphere { center, .. } => primitives::sphere_normal(point, *center),
            SdfNode::Union(a, b) => {
                if a.evaluate(point) <= b.evaluate(point) {
                    a.normal(point)
                } else {
                    b.normal(point)
                }
            }
            SdfNode::Intersection(a, b) => {
                if a.evaluate(point) >= b.evaluate(point) {
                    a.normal(point)
                } else {
                    b.normal(point)
                }
            }
            SdfNode::Inverse(inner) => -inner.normal(point),
            SdfNode::Pad(inner, _) => inner.normal(point),
            SdfNode::Translate(inner, offset) => inner.normal(point - offset),
            SdfNode::UniformScale(inner, factor) => inner.normal(point / *factor),
            _ => central_difference_normal(|p| self.evaluate(p), point),
        }
    }
}

impl Sdf for SdfNode {
    fn evaluate(&self, point: Vector3<f64>) -> f64 {
        SdfNode::evaluate(self, point)
    }

    fn normal(&self, point: Vector3<f64>) -> Vector3<f64> {
        SdfNode::normal(self, point)
    }
}
