use std::sync::Arc;

use approx::assert_relative_eq;
use sdfmesh::dag::SdfNode;
use nalgebra::Vector3;

fn sphere(center: Vector3<f64>, radius: f64) -> Arc<SdfNode> {
    Arc::new(SdfNode::Sphere { center, radius })
}

fn sample_points() -> Vec<Vector3<f64>> {
    vec![
        Vector3::zeros(),
        Vector3::new(0.3, -1.2, 0.7),
        Vector3::new(2.0, 2.0, -1.0),
        Vector3::new(-0.5, 0.1, 1.9),
        Vector3::new(10.0, -4.0, 3.0),
    ]
}

#[test]
fn dag_union_is_min_of_children() {
    let a = sphere(Vector3::zeros(), 1.0);
    let b = Arc::new(SdfNode::Box3 { half_extents: Vector3::new(0.5, 2.0, 0.5) });
    let u = SdfNode::Union(a.clone(), b.clone());
    for p in sample_points() {
        assert_eq!(u.evaluate(p), a.evaluate(p).min(b.evaluate(p)));
    }
}

#[test]
fn dag_intersection_is_max_of_children() {
    let a = sphere(Vector3::zeros(), 1.0);
    let b = Arc::new(SdfNode::Cylinder { radius: 0.5, length: 3.0 });
    let i = SdfNode::Intersection(a.clone(), b.clone());
    for p in sample_points() {
        assert_eq!(i.evaluate(p), a.evaluate(p).max(b.evaluate(p)));
    }
}

#[test]
fn dag_inverse_negates() {
    let a = sphere(Vector3::new(0.0, 1.0, 0.0), 2.0);
    let inv = SdfNode::Inverse(a.clone());
    for p in sample_points() {
        assert_eq!(inv.evaluate(p), -a.evaluate(p));
    }
}

#[test]
fn dag_translate_shifts_query() {
    let a = Arc::new(SdfNode::Box3 { half_extents: Vector3::new(1.0, 0.5, 0.25) });
    let d = Vector3::new(1.5, -2.0, 0.5);
    let t = SdfNode::Translate(a.clone(), d);
    for p in sample_points() {
        assert_relative_eq!(t.evaluate(p), a.evaluate(p - d), epsilon = 1e-12);
    }
}

#[test]
fn dag_uniform_scale_identity() {
    let a = sphere(Vector3::new(0.2, 0.0, 0.0), 1.0);
    let s = 2.5;
    let scaled = SdfNode::UniformScale(a.clone(), s);
    for p in sample_points() {
        assert_relative_eq!(scaled.evaluate(p), s * a.evaluate(p / s), epsilon = 1e-12);
    }
}

#[test]
fn dag_uniform_scale_sphere_radius() {
    let scaled = SdfNode::UniformScale(sphere(Vector3::zeros(), 1.0), 3.0);
    assert_relative_eq!(scaled.evaluate(Vector3::new(3.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
    assert_relative_eq!(scaled.evaluate(Vector3::zeros()), -3.0, epsilon = 1e-12);
}

#[test]
fn dag_non_uniform_scale_matches_uniform_when_equal() {
    let a = sphere(Vector3::zeros(), 1.0);
    let nu = SdfNode::NonUniformScale(a.clone(), Vector3::new(2.0, 2.0, 2.0));
    let u = SdfNode::UniformScale(a, 2.0);
    for p in sample_points().into_iter().skip(1) {
        assert_relative_eq!(nu.evaluate(p), u.evaluate(p), epsilon = 1e-12);
    }
}

#[test]
fn dag_non_uniform_scale_origin_uses_smallest_factor() {
    let a = sphere(Vector3::zeros(), 1.0);
    let nu = SdfNode::NonUniformScale(a, Vector3::new(3.0, 0.5, 2.0));
    assert_relative_eq!(nu.evaluate(Vector3::zeros()), -0.5, epsilon = 1e-12);
    // Ellipsoid surface along each axis.
    assert_relative_eq!(nu.evaluate(Vector3::new(3.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
    assert_relative_eq!(nu.evaluate(Vector3::new(0.0, 0.5, 0.0)), 0.0, epsilon = 1e-12);
}

#[test]
fn dag_pad_grows_surface() {
    let padded = SdfNode::Pad(sphere(Vector3::zeros(), 1.0), 0.25);
    assert_relative_eq!(padded.evaluate(Vector3::new(1.25, 0.0, 0.0)), 0.0, epsilon = 1e-12);
}

#[test]
fn dag_shared_child() {
    let shared = sphere(Vector3::zeros(), 1.0);
    let left = Arc::new(SdfNode::Translate(shared.clone(), Vector3::new(-1.0, 0.0, 0.0)));
    let right = Arc::new(SdfNode::Translate(shared.clone(), Vector3::new(1.0, 0.0, 0.0)));
    let both = SdfNode::Union(left, right);
    assert_eq!(Arc::strong_count(&shared), 3);
    assert_relative_eq!(both.evaluate(Vector3::new(2.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
    assert_relative_eq!(both.evaluate(Vector3::new(-2.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
}

#[test]
fn dag_union_normal_follows_closer_operand() {
    let a = sphere(Vector3::new(-2.0, 0.0, 0.0), 1.0);
    let b = sphere(Vector3::new(2.0, 0.0, 0.0), 1.0);
    let u = SdfNode::Union(a, b);
    let n = u.normal(Vector3::new(3.5, 0.0, 0.0));
    assert_relative_eq!(n, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    let n = u.normal(Vector3::new(-2.0, 0.0, 1.5));
    assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
}

#[test]
fn dag_intersection_normal_follows_farther_operand() {
    let a = sphere(Vector3::zeros(), 2.0);
    let b = Arc::new(SdfNode::Box3 { half_extents: Vector3::new(1.0, 1.0, 1.0) });
    let i = SdfNode::Intersection(a, b);
    // Box face dominates on the +Z axis.
    let n = i.normal(Vector3::new(0.0, 0.0, 1.0));
    assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
}

#[test]
fn dag_inverse_normal_points_inward() {
    let inv = SdfNode::Inverse(sphere(Vector3::zeros(), 1.0));
    let n = inv.normal(Vector3::new(0.0, 1.0, 0.0));
    assert_relative_eq!(n, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
}

#[test]
fn dag_translate_normal() {
    let t = SdfNode::Translate(sphere(Vector3::zeros(), 1.0), Vector3::new(0.0, 0.0, 5.0));
    let n = t.normal(Vector3::new(0.0, 1.0, 5.0));
    assert_relative_eq!(n, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
}

#[test]
fn dag_gradient_normal_is_unit() {
    let blob = SdfNode::SmoothUnion(
        Arc::new(SdfNode::Box3 { half_extents: Vector3::new(1.0, 1.0, 1.0) }),
        sphere(Vector3::new(0.0, 1.5, 0.0), 0.5),
        0.5,
    );
    for p in sample_points().into_iter().skip(1) {
        assert_relative_eq!(blob.normal(p).norm(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn dag_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SdfNode>();
}
