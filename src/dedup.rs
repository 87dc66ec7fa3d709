//! Triangle soup to indexed mesh.
//!
//! Marching cubes emits every shared vertex once per incident triangle.
//! Points closer than a merge distance are collapsed onto the first one
//! visited, the soup is remapped onto the surviving points, and triangles
//! that lost an edge to the merge are dropped.

use nalgebra::Vector3;

use crate::bvh::PointBvh;
use crate::shape::Sdf;
use crate::types::Mesh;

/// For every point, the index of the point it is merged into.
///
/// Points are visited in order. An unmapped point claims itself and every
/// other still-unmapped point within `closest_distance` (inclusive). The
/// result depends on visiting order and is not transitive: `a` near `b`
/// near `c` does not force `a` and `c` together.
pub fn deduplicate_map_points(points: &[Vector3<f64>], closest_distance: f64) -> Vec<u32> {
    const UNMAPPED: u32 = u32::MAX;

    let bvh = PointBvh::build(points);
    let mut map = vec![UNMAPPED; points.len()];
    for (i, p) in points.iter().enumerate() {
        if map[i] != UNMAPPED {
            continue;
        }
        map[i] = i as u32;
        for j in bvh.query_within_radius(*p, closest_distance) {
            let slot = &mut map[j as usize];
            if *slot == UNMAPPED {
                *slot = i as u32;
            }
        }
    }
    map
}

/// Build an indexed mesh from a triangle soup.
///
/// Vertices keep the first-seen order of their representatives; each
/// normal is `sdf.normal` evaluated at the representative position.
pub fn index_triangle_soup<S>(sdf: &S, soup: &[Vector3<f64>], closest_distance: f64) -> Mesh
where
    S: Sdf + ?Sized,
{
    let map = deduplicate_map_points(soup, closest_distance);

    let mut mesh = Mesh::default();
    let mut compact = vec![u32::MAX; soup.len()];
    for (i, &rep) in map.iter().enumerate() {
        if rep as usize == i {
            compact[i] = mesh.push_vertex(soup[i], sdf.normal(soup[i]));
        }
    }

    mesh.indices = map.iter().map(|&rep| compact[rep as usize]).collect();
    mesh
}

/// Remove triangles that reference the same vertex twice.
///
/// A degenerate triangle is overwritten by the last live triangle of the
/// buffer and its slot re-examined, so triangle order is not preserved.
/// Returns the number of triangles removed.
pub fn remove_degenerate_triangles(indices: &mut Vec<u32>) -> usize {
    let total = indices.len() / 3;
    let mut count = total;
    let mut tri = 0;
    while tri < count {
        let t = &indices[tri * 3..tri * 3 + 3];
        if t[0] == t[1] || t[1] == t[2] || t[2] == t[0] {
            count -= 1;
            indices.copy_within(count * 3..count * 3 + 3, tri * 3);
        } else {
            tri += 1;
        }
    }
    indices.truncate(count * 3);
    total - count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_degenerate_swaps_from_back() {
        let mut idx = vec![0, 0, 1, 1, 2, 3, 4, 5, 5, 6, 7, 8];
        let removed = remove_degenerate_triangles(&mut idx);
        assert_eq!(removed, 2);
        assert_eq!(idx, vec![6, 7, 8, 1, 2, 3]);
    }

    #[test]
    fn first_seen_point_wins() {
        let pts = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0005, 0.0, 0.0),
            Vector3::new(0.0015, 0.0, 0.0),
        ];
        // 1 joins 0; 2 is 0.0015 from 0 and stays alone even though it is
        // within range of 1.
        assert_eq!(deduplicate_map_points(&pts, 1e-3), vec![0, 0, 2]);
    }
}
