use nalgebra::{Vector2, Vector3};

/// Signed distance to a sphere.
/// Negative inside, zero on surface, positive outside.
pub fn sdf_sphere(point: Vector3<f64>, center: Vector3<f64>, radius: f64) -> f64 {
    (point - center).norm() - radius
}

/// Outward unit normal of a sphere. Falls back to `+Y` at the center.
pub fn sphere_normal(point: Vector3<f64>, center: Vector3<f64>) -> Vector3<f64> {
    (point - center)
        .try_normalize(1e-12)
        .unwrap_or_else(|| Vector3::new(0.0, 1.0, 0.0))
}

/// Signed distance to an axis-aligned box centered at the origin.
/// `half_extents` is the half-size in each dimension (sign is ignored).
pub fn sdf_box(point: Vector3<f64>, half_extents: Vector3<f64>) -> f64 {
    let d = point.abs() - half_extents.abs();
    let outside = Vector3::new(d.x.max(0.0), d.y.max(0.0), d.z.max(0.0)).norm();
    let inside = d.x.max(d.y).max(d.z).min(0.0);
    outside + inside
}

/// Signed distance to a capped cylinder aligned with the X axis and centered
/// at the origin. `length` is the full extent along X.
///
/// Outside both the cap planes and the mantle the larger of the two
/// distances is returned, which underestimates the corner distance but
/// stays a valid bound.
pub fn sdf_cylinder(point: Vector3<f64>, radius: f64, length: f64) -> f64 {
    let d_radial = Vector2::new(point.y, point.z).norm() - radius;
    let d_axial = point.x.abs() - length / 2.0;
    d_axial
        .max(d_radial)
        .min((d_axial * d_axial + d_radial * d_radial).sqrt())
}
