//! Post-extraction mesh refinement.
//!
//! - **Reproject**: one Newton step moving every vertex onto the zero
//!   level-set along its normal.
//! - **Rectify**: marching cubes cuts sharp features off. Edges whose end
//!   normals disagree strongly are searched for a point near the crease and
//!   split there.
//! - **Simplify**: short edges inside flat regions are collapsed.
//!
//! Rectify and simplify edit the [`HalfEdgeMesh`] topology and append to or
//! move vertices of the [`Mesh`]; the index buffer is stale until
//! [`HalfEdgeMesh::reconstruct`] is read back.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::half_edge::{HalfEdgeId, HalfEdgeMesh};
use crate::shape::Sdf;
use crate::types::Mesh;

/// Binary-search steps when looking for a crease point on an edge.
const MAX_SEARCH_ITERATIONS: usize = 4;
/// Steps pushing the candidate past the padded surface.
const MAX_PUSH_STEPS: usize = 4;
/// Overshoot applied to each push step.
const PUSH_GAIN: f64 = 1.5;

/// Move each vertex onto the surface: `p -= n * sdf(p)`.
pub fn reproject_mesh<S>(sdf: &S, mesh: &mut Mesh)
where
    S: Sdf + ?Sized,
{
    for (p, n) in mesh.positions.iter_mut().zip(&mesh.normals) {
        *p -= *n * sdf.evaluate(*p);
    }
}

/// Split edges that straddle a sharp feature. Returns the number of splits.
///
/// Only half-edges that exist when the pass starts are visited; the halves
/// created by a split are left for the next pass.
pub fn rectify_mesh<S>(sdf: &S, mesh: &mut Mesh, hem: &mut HalfEdgeMesh) -> usize
where
    S: Sdf + ?Sized,
{
    let feature_cos = (PI / 4.0).cos();
    let mut splits = 0;

    let num_edges = hem.len() as HalfEdgeId;
    for he in 0..num_edges {
        if !hem.is_alive(he) {
            continue;
        }
        let v0 = hem.origin(he) as usize;
        let v1 = hem.target(he) as usize;
        let (n0, n1) = (mesh.normals[v0], mesh.normals[v1]);
        if n0.dot(&n1) >= feature_cos {
            continue;
        }

        let Some(point) = find_crease_point(sdf, mesh.positions[v0], mesh.positions[v1], n0, n1)
        else {
            continue;
        };
        let v = mesh.push_vertex(point, sdf.normal(point));
        hem.split_edge(he, v);
        splits += 1;
    }

    splits
}

/// Search the edge `p0 -> p1` for a surface point whose normal differs from
/// both end normals. `None` when the search is ambiguous or gives up.
fn find_crease_point<S>(
    sdf: &S,
    p0: Vector3<f64>,
    p1: Vector3<f64>,
    n0: Vector3<f64>,
    n1: Vector3<f64>,
) -> Option<Vector3<f64>>
where
    S: Sdf + ?Sized,
{
    let distinct_cos = (PI / 16.0).cos();

    let dir = p1 - p0;
    let len = dir.norm();
    // The crease is on the outside when both normals lean away from the edge
    // and on the inside when both lean toward it.
    let factor = if dir.dot(&n0) < 0.0 && dir.dot(&n1) > 0.0 {
        -1.0
    } else if dir.dot(&n0) > 0.0 && dir.dot(&n1) < 0.0 {
        1.0
    } else {
        return None;
    };
    let push_dir = (n0 + n1).try_normalize(1e-12)?;
    let pad = factor * len / 4.0;

    let (mut low, mut high) = (0.0f64, 1.0f64);
    for _ in 0..MAX_SEARCH_ITERATIONS {
        let mid = (low + high) / 2.0;
        let mut point = p0.lerp(&p1, mid);

        let mut padded = sdf.evaluate(point) + pad;
        let mut steps = 0;
        while factor * padded > 0.0 && steps < MAX_PUSH_STEPS {
            point -= push_dir * (padded * PUSH_GAIN);
            padded = sdf.evaluate(point) + pad;
            steps += 1;
        }

        let normal = sdf.normal(point);
        point -= normal * (padded - pad);

        if normal.dot(&n0) > distinct_cos {
            low = mid;
        } else if normal.dot(&n1) > distinct_cos {
            high = mid;
        } else {
            return Some(point);
        }
    }
    None
}

/// Collapse short edges inside flat regions. Returns the number of
/// collapses.
///
/// An edge `a -> b` qualifies when both normals are equal, the edge lies in
/// the tangent plane of `a` and it is shorter than `max_len`. The surviving
/// vertex `a` moves to the midpoint; `b` stays in the vertex arrays
/// unreferenced.
pub fn simplify_mesh(mesh: &mut Mesh, hem: &mut HalfEdgeMesh, max_len: f64) -> usize {
    let max_len_sq = max_len * max_len;
    let mut collapses = 0;

    for he in 0..hem.len() as HalfEdgeId {
        if !hem.is_alive(he) {
            continue;
        }
        let a = hem.origin(he) as usize;
        let b = hem.target(he) as usize;
        let diff = mesh.positions[b] - mesh.positions[a];
        let len_sq = diff.norm_squared();
        if len_sq == 0.0 || len_sq >= max_len_sq {
            continue;
        }
        if (mesh.normals[a] - mesh.normals[b]).norm_squared() >= 1e-10 {
            continue;
        }
        if (mesh.normals[a].dot(&diff) / len_sq.sqrt()).abs() >= 1e-7 {
            continue;
        }

        if hem.collapse_edge(he) {
            mesh.positions[a] = (mesh.positions[a] + mesh.positions[b]) / 2.0;
            collapses += 1;
        }
    }

    collapses
}
