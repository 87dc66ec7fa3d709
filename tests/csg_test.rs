use approx::assert_relative_eq;
use sdfmesh::csg::{difference, intersection, inverse, pad, smooth_union, union};
use sdfmesh::primitives::sdf_sphere;
use nalgebra::Vector3;

#[test]
fn union_takes_minimum() {
    let a = sdf_sphere(Vector3::new(2.0, 0.0, 0.0), Vector3::zeros(), 1.0);
    let b = sdf_sphere(
        Vector3::new(2.0, 0.0, 0.0),
        Vector3::new(5.0, 0.0, 0.0),
        1.0,
    );
    assert_relative_eq!(union(a, b), 1.0, epsilon = 1e-6);
}

#[test]
fn intersection_takes_maximum() {
    let a = sdf_sphere(Vector3::new(0.5, 0.0, 0.0), Vector3::zeros(), 1.0);
    let b = sdf_sphere(
        Vector3::new(0.5, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        1.0,
    );
    assert_relative_eq!(intersection(a, b), -0.5, epsilon = 1e-6);
}

#[test]
fn inverse_negates() {
    assert_eq!(inverse(0.25), -0.25);
    assert_eq!(inverse(-3.0), 3.0);
}

#[test]
fn difference_subtracts() {
    let a = sdf_sphere(Vector3::zeros(), Vector3::zeros(), 2.0);
    let b = sdf_sphere(Vector3::zeros(), Vector3::zeros(), 1.0);
    let d = difference(a, b);
    assert!(d > 0.0, "Point inside both should be outside A-B");
}

#[test]
fn pad_shifts_level_set() {
    assert_relative_eq!(pad(0.3, 0.5), -0.2, epsilon = 1e-12);
}

#[test]
fn smooth_union_never_exceeds_union() {
    let k = 0.5;
    for &(a, b) in &[(1.0, 1.0), (0.2, -0.1), (-1.0, 2.0), (0.0, 0.4), (3.0, -3.0)] {
        assert!(smooth_union(a, b, k) <= union(a, b));
    }
    // Equal operands get the deepest blend: k / 6.
    assert_relative_eq!(smooth_union(1.0, 1.0, k), 1.0 - k / 6.0, epsilon = 1e-12);
}

#[test]
fn smooth_union_converges_to_union() {
    let (a, b) = (0.3, 0.31);
    let mut prev_gap = f64::INFINITY;
    for k in [1.0, 0.1, 0.01, 0.001] {
        let gap = union(a, b) - smooth_union(a, b, k);
        assert!(gap >= 0.0 && gap <= prev_gap);
        prev_gap = gap;
    }
    assert!(prev_gap < 1e-9);
}

#[test]
fn smooth_union_with_zero_width_is_hard() {
    assert_eq!(smooth_union(0.5, 0.7, 0.0), 0.5);
    assert_eq!(smooth_union(0.5, 0.7, -1.0), 0.5);
}
