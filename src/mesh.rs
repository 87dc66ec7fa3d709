use log::debug;

use crate::dedup::{index_triangle_soup, remove_degenerate_triangles};
use crate::error::MeshError;
use crate::half_edge::HalfEdgeMesh;
use crate::octree::sample_surface;
use crate::refine::{rectify_mesh, reproject_mesh, simplify_mesh};
use crate::shape::Sdf;
use crate::types::{Mesh, MeshSettings};

/// Extract an indexed triangle mesh of the zero level-set of `sdf`.
///
/// Stages, in order: octree marching cubes, vertex merging, degenerate
/// triangle removal, reprojection onto the surface, then the optional
/// rectify passes and simplification selected by `settings.refine`.
/// The surface must lie inside the cube of half-size
/// `settings.initial_span` around `settings.center`.
///
/// The output has a valid index buffer and no vertex left unreferenced.
/// It is not guaranteed to be watertight or manifold.
pub fn construct_mesh<S>(sdf: &S, settings: &MeshSettings) -> Result<Mesh, MeshError>
where
    S: Sdf + ?Sized,
{
    settings.validate()?;

    let soup = sample_surface(sdf, settings);
    debug!("sampled {} soup triangles", soup.len() / 3);

    let mut mesh = index_triangle_soup(sdf, &soup, settings.merge_distance);
    let removed = remove_degenerate_triangles(&mut mesh.indices);
    debug!(
        "indexed {} vertices, {} triangles ({} degenerate removed)",
        mesh.vertex_count(),
        mesh.triangle_count(),
        removed
    );

    reproject_mesh(sdf, &mut mesh);

    let refine = settings.refine;
    if refine.rectify_passes > 0 || refine.simplify {
        let mut hem = HalfEdgeMesh::from_indices(&mesh.indices, mesh.vertex_count());
        for pass in 0..refine.rectify_passes {
            let splits = rectify_mesh(sdf, &mut mesh, &mut hem);
            debug!("rectify pass {pass}: {splits} splits");
        }
        if refine.simplify {
            let collapses = simplify_mesh(&mut mesh, &mut hem, settings.target_resolution * 2.0);
            debug!("simplify: {collapses} collapses");
        }
        mesh.indices = hem.reconstruct();
    }

    let dropped = mesh.drop_unreferenced_vertices();
    debug!(
        "mesh done: {} vertices, {} triangles ({} orphaned vertices dropped)",
        mesh.vertex_count(),
        mesh.triangle_count(),
        dropped
    );
    Ok(mesh)
}
