//! Octree marching-cubes sampler.
//!
//! A cube is recursively split into octants, refining only near the zero
//! level-set. A cube whose center distance exceeds its circumscribed radius
//! (plus a margin) cannot contain surface because the field is 1-Lipschitz,
//! so whole empty regions are skipped after a single evaluation. Leaf cubes
//! are polygonized with the classic marching-cubes tables, producing an
//! unindexed triangle soup.

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::shape::Sdf;
use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};
use crate::types::MeshSettings;

/// A cube with half-span `s` is pruned when `|d(center)| > s * PRUNE_FACTOR`.
pub const PRUNE_FACTOR: f64 = 1.01 + 1.732_050_807_568_877_2;

/// Smallest leaf half-span the sampler will refine to.
pub const MIN_LEAF_SPAN: f64 = 1e-6;

/// Hard ceiling on recursion depth regardless of settings.
pub const DEPTH_LIMIT: u8 = 64;

/// Cubes with half-span above `PARALLEL_SPAN_FACTOR * target_span` fan out
/// over the rayon pool.
const PARALLEL_SPAN_FACTOR: f64 = 8.0;

struct SampleParams {
    target_span: f64,
    max_depth: u8,
    parallel: bool,
    truncated: AtomicBool,
}

/// Sample the zero level-set of `sdf` into a triangle soup.
///
/// Every three consecutive points form one counter-clockwise (outward
/// facing) triangle. Output order is deterministic, also when
/// `settings.parallel` is set.
pub fn sample_surface<S>(sdf: &S, settings: &MeshSettings) -> Vec<Vector3<f64>>
where
    S: Sdf + ?Sized,
{
    let params = SampleParams {
        target_span: (settings.target_resolution / 2.0).max(MIN_LEAF_SPAN),
        max_depth: settings.max_depth.min(DEPTH_LIMIT),
        parallel: settings.parallel,
        truncated: AtomicBool::new(false),
    };

    let mut soup = Vec::new();
    sample_cube(sdf, settings.center, settings.initial_span, 0, &params, &mut soup);

    if params.truncated.load(Ordering::Relaxed) {
        warn!(
            "octree depth cap {} reached before leaf span {}; surface sampled coarser than requested",
            params.max_depth, params.target_span
        );
    }
    soup
}

fn sample_cube<S>(
    sdf: &S,
    mid: Vector3<f64>,
    span: f64,
    depth: u8,
    params: &SampleParams,
    out: &mut Vec<Vector3<f64>>,
) where
    S: Sdf + ?Sized,
{
    // Anything not provably near the surface is pruned, NaN included.
    let d = sdf.evaluate(mid);
    if !(d.abs() <= span * PRUNE_FACTOR) {
        return;
    }

    if span > params.target_span {
        if depth < params.max_depth {
            let child_span = span / 2.0;
            let child_mid = |off: &[u8; 3]| mid + corner_direction(off) * child_span;

            if params.parallel && span > PARALLEL_SPAN_FACTOR * params.target_span {
                let parts: Vec<Vec<Vector3<f64>>> = CORNER_OFFSETS
                    .par_iter()
                    .map(|off| {
                        let mut buf = Vec::new();
                        sample_cube(sdf, child_mid(off), child_span, depth + 1, params, &mut buf);
                        buf
                    })
                    .collect();
                for part in parts {
                    out.extend(part);
                }
            } else {
                for off in &CORNER_OFFSETS {
                    sample_cube(sdf, child_mid(off), child_span, depth + 1, params, out);
                }
            }
            return;
        }
        params.truncated.store(true, Ordering::Relaxed);
    }

    polygonize_cube(sdf, mid, span, out);
}

/// Maps a unit-cube corner offset to a direction in `{-1, 1}^3`.
fn corner_direction(off: &[u8; 3]) -> Vector3<f64> {
    Vector3::new(
        2.0 * off[0] as f64 - 1.0,
        2.0 * off[1] as f64 - 1.0,
        2.0 * off[2] as f64 - 1.0,
    )
}

/// Emit marching-cubes triangles for the cube centered at `mid` with
/// half-span `span`.
pub fn polygonize_cube<S>(sdf: &S, mid: Vector3<f64>, span: f64, out: &mut Vec<Vector3<f64>>)
where
    S: Sdf + ?Sized,
{
    let mut corners = [Vector3::zeros(); 8];
    let mut values = [0.0f64; 8];
    let mut mask = 0usize;
    for (i, off) in CORNER_OFFSETS.iter().enumerate() {
        corners[i] = mid + corner_direction(off) * span;
        values[i] = sdf.evaluate(corners[i]);
        if values[i] <= 0.0 {
            mask |= 1 << i;
        }
    }

    let edges = EDGE_TABLE[mask];
    if edges == 0 {
        return;
    }

    let mut edge_points = [Vector3::zeros(); 12];
    for (e, [a, b]) in EDGE_CORNERS.iter().enumerate() {
        if edges & (1 << e) != 0 {
            edge_points[e] = lerp_vertex(values[*a], values[*b], corners[*a], corners[*b]);
        }
    }

    // Table triangles face inward for this mask convention; swap the last two.
    for tri in TRI_TABLE[mask].chunks_exact(3) {
        if tri[0] < 0 {
            break;
        }
        out.push(edge_points[tri[0] as usize]);
        out.push(edge_points[tri[2] as usize]);
        out.push(edge_points[tri[1] as usize]);
    }
}

/// Zero crossing on the segment `v0 -> v1` given the field values at its
/// ends. Snaps to an endpoint when the crossing is within 1e-3 of it, or
/// when the values are too close to interpolate.
pub fn lerp_vertex(val0: f64, val1: f64, v0: Vector3<f64>, v1: Vector3<f64>) -> Vector3<f64> {
    if (val0 - val1).abs() < 1e-5 {
        return v0;
    }
    let mu = -val0 / (val1 - val0);
    if mu < 1e-3 {
        v0
    } else if mu > 1.0 - 1e-3 {
        v1
    } else {
        v0 + (v1 - v0) * mu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_finds_midpoint_crossing() {
        let p = lerp_vertex(-1.0, 1.0, Vector3::zeros(), Vector3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(p, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn lerp_snaps_near_endpoints() {
        let v0 = Vector3::zeros();
        let v1 = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(lerp_vertex(-1e-5, 1.0, v0, v1), v0);
        assert_eq!(lerp_vertex(-1.0, 1e-5, v0, v1), v1);
        assert_eq!(lerp_vertex(0.5, 0.5 + 1e-6, v0, v1), v0);
    }

    #[test]
    fn cube_without_crossing_emits_nothing() {
        let far = crate::shape::FnSdf::new(|p: Vector3<f64>| p.norm() - 100.0);
        let mut out = Vec::new();
        polygonize_cube(&far, Vector3::zeros(), 1.0, &mut out);
        assert!(out.is_empty());
    }
}
