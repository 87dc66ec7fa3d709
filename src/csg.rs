// CSG (Constructive Solid Geometry) operations
//
// These combine SDF distance values to produce boolean combinations of shapes:
// - union:        the merged shape (min)
// - intersection: the overlapping region (max)
// - difference:   A minus B (max of A and negated B)
// - inverse:      swaps inside and outside
//
// The smooth union blends the transition region with a cubic kernel of
// width `k`.

/// Boolean union of two SDF values (logical OR).
/// Returns the minimum distance: the point is inside whichever shape is closer.
pub fn union(d1: f64, d2: f64) -> f64 {
    d1.min(d2)
}

/// Boolean intersection of two SDF values (logical AND).
/// Returns the maximum distance: the point must be inside both shapes.
pub fn intersection(d1: f64, d2: f64) -> f64 {
    d1.max(d2)
}

/// Complement of a shape.
pub fn inverse(d: f64) -> f64 {
    -d
}

/// Boolean difference: shape A minus shape B.
/// Keeps points inside A that are outside B.
pub fn difference(d1: f64, d2: f64) -> f64 {
    intersection(d1, inverse(d2))
}

/// Uniform dilation by `radius` (Minkowski sum with a ball).
pub fn pad(d: f64, radius: f64) -> f64 {
    d - radius
}

/// Smooth union with a cubic polynomial kernel of width `k`.
///
/// Never exceeds the hard union and converges to it as `k -> 0`. For
/// `k <= 0` the hard union is returned.
pub fn smooth_union(d1: f64, d2: f64, k: f64) -> f64 {
    if k <= 0.0 {
        return union(d1, d2);
    }
    let h = (k - (d1 - d2).abs()).max(0.0);
    union(d1, d2) - h * h * h / (6.0 * k * k)
}
