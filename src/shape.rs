use nalgebra::Vector3;

/// Step used by the central-difference gradient.
pub const GRADIENT_EPSILON: f64 = 1e-5;

/// Trait for any object that can evaluate a signed distance.
///
/// `normal` defaults to a normalized central-difference gradient; shapes
/// with a closed-form normal override it.
pub trait Sdf: Send + Sync {
    fn evaluate(&self, point: Vector3<f64>) -> f64;

    fn normal(&self, point: Vector3<f64>) -> Vector3<f64> {
        central_difference_normal(|p| self.evaluate(p), point)
    }
}

/// Normalized central-difference gradient of `f` at `point`.
///
/// Falls back to `+Y` where the gradient vanishes.
pub fn central_difference_normal<F>(f: F, point: Vector3<f64>) -> Vector3<f64>
where
    F: Fn(Vector3<f64>) -> f64,
{
    let eps = GRADIENT_EPSILON;
    let dx = f(point + Vector3::new(eps, 0.0, 0.0)) - f(point - Vector3::new(eps, 0.0, 0.0));
    let dy = f(point + Vector3::new(0.0, eps, 0.0)) - f(point - Vector3::new(0.0, eps, 0.0));
    let dz = f(point + Vector3::new(0.0, 0.0, eps)) - f(point - Vector3::new(0.0, 0.0, eps));
    let g = Vector3::new(dx, dy, dz);
    let len = g.norm();
    if len > 1e-10 {
        g / len
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    }
}

/// An SDF defined by a closure. Useful for custom/dynamic shapes.
pub struct FnSdf<F: Fn(Vector3<f64>) -> f64 + Send + Sync> {
    pub func: F,
}

impl<F: Fn(Vector3<f64>) -> f64 + Send + Sync> FnSdf<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F: Fn(Vector3<f64>) -> f64 + Send + Sync> Sdf for FnSdf<F> {
    fn evaluate(&self, point: Vector3<f64>) -> f64 {
        (self.func)(point)
    }
}
