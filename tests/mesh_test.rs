use sdfmesh::builder::Shape;
use sdfmesh::error::MeshError;
use sdfmesh::mesh::construct_mesh;
use sdfmesh::types::{Mesh, MeshSettings, RefineOptions};
use nalgebra::Vector3;

fn blob() -> Shape {
    Shape::box3(1.0, 1.0, 1.0).smooth_union(Shape::sphere(0.5).translate(0.0, 1.5, 0.0), 0.5)
}

fn assert_well_formed(mesh: &Mesh) {
    assert_eq!(mesh.indices.len() % 3, 0, "Index count must be multiple of 3");
    assert_eq!(mesh.positions.len(), mesh.normals.len());
    let mut used = vec![false; mesh.positions.len()];
    for tri in mesh.indices.chunks_exact(3) {
        assert!(tri.iter().all(|&i| (i as usize) < mesh.positions.len()));
        assert!(
            tri[0] != tri[1] && tri[1] != tri[2] && tri[2] != tri[0],
            "degenerate triangle {tri:?}"
        );
        for &i in tri {
            used[i as usize] = true;
        }
    }
    assert!(used.iter().all(|&u| u), "unreferenced vertex");
}

fn connected_components(mesh: &Mesh) -> usize {
    let mut parent: Vec<usize> = (0..mesh.positions.len()).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    for tri in mesh.indices.chunks_exact(3) {
        for k in 0..3 {
            let a = find(&mut parent, tri[k] as usize);
            let b = find(&mut parent, tri[(k + 1) % 3] as usize);
            parent[a] = b;
        }
    }
    (0..parent.len()).filter(|&i| find(&mut parent, i) == i).count()
}

#[test]
fn sphere_mesh_vertices_on_surface() {
    let mesh = construct_mesh(&Shape::sphere(1.0), &MeshSettings::default()).unwrap();
    assert!(mesh.triangle_count() > 100, "got {} triangles", mesh.triangle_count());
    assert_well_formed(&mesh);
    for p in &mesh.positions {
        let r = p.norm();
        assert!((r - 1.0).abs() < 1e-2, "Vertex at distance {r} should be near radius 1.0");
    }
    for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
        assert!(n.dot(&p.normalize()) > 0.99);
    }
}

#[test]
fn sphere_mesh_is_single_component() {
    let mesh = construct_mesh(&Shape::sphere(1.0), &MeshSettings::default()).unwrap();
    assert_eq!(connected_components(&mesh), 1);
}

#[test]
fn meshing_is_deterministic() {
    let settings = MeshSettings {
        refine: RefineOptions { rectify_passes: 1, simplify: true },
        ..Default::default()
    };
    let a = construct_mesh(&blob(), &settings).unwrap();
    let b = construct_mesh(&blob(), &settings).unwrap();
    assert_eq!(a, b);
}

#[test]
fn blob_is_one_piece_with_expected_bounds() {
    let mesh = blob().mesh(&MeshSettings::default()).unwrap();
    assert_well_formed(&mesh);
    assert_eq!(connected_components(&mesh), 1);

    let bbox = mesh.bounding_box();
    let expect_min = Vector3::new(-1.0, -1.0, -1.0);
    let expect_max = Vector3::new(1.0, 2.0, 1.0);
    assert!((bbox.min - expect_min).amax() < 0.15, "min {:?}", bbox.min);
    assert!((bbox.max - expect_max).amax() < 0.15, "max {:?}", bbox.max);
}

#[test]
fn rectify_adds_vertices_and_stays_valid() {
    let cube = Shape::box3(1.0, 1.0, 1.0);
    let plain = cube.mesh(&MeshSettings::default()).unwrap();
    let rectified = cube
        .mesh(&MeshSettings {
            refine: RefineOptions { rectify_passes: 2, simplify: false },
            ..Default::default()
        })
        .unwrap();
    assert_well_formed(&rectified);
    assert!(rectified.vertex_count() >= plain.vertex_count());
    assert!(rectified.triangle_count() >= plain.triangle_count());
}

#[test]
fn simplify_never_adds_triangles() {
    let cube = Shape::box3(1.0, 1.0, 1.0);
    let plain = cube.mesh(&MeshSettings::default()).unwrap();
    let simplified = cube
        .mesh(&MeshSettings {
            refine: RefineOptions { rectify_passes: 0, simplify: true },
            ..Default::default()
        })
        .unwrap();
    assert_well_formed(&simplified);
    assert!(simplified.triangle_count() <= plain.triangle_count());
    assert!(simplified.vertex_count() <= plain.vertex_count());
}

#[test]
fn empty_region_gives_empty_mesh() {
    let settings = MeshSettings { initial_span: 2.0, ..Default::default() };
    let far = Shape::sphere(0.5).translate(50.0, 0.0, 0.0);
    let mesh = construct_mesh(&far, &settings).unwrap();
    assert_eq!(mesh, Mesh::default());
}

#[test]
fn nan_field_gives_empty_mesh() {
    // A zero scale turns every sample into NaN; the sampler must stop at the root.
    let collapsed = Shape::sphere(1.0).scale(0.0);
    assert!(collapsed.distance(Vector3::zeros()).is_nan());
    let mesh = construct_mesh(&collapsed, &MeshSettings::default()).unwrap();
    assert_eq!(mesh, Mesh::default());
}

#[test]
fn invalid_settings_are_rejected() {
    let sphere = Shape::sphere(1.0);
    let bad_res = MeshSettings { target_resolution: -0.1, ..Default::default() };
    assert_eq!(construct_mesh(&sphere, &bad_res), Err(MeshError::InvalidResolution(-0.1)));

    let bad_span = MeshSettings { initial_span: f64::INFINITY, ..Default::default() };
    assert!(matches!(construct_mesh(&sphere, &bad_span), Err(MeshError::InvalidSpan(_))));

    let bad_merge = MeshSettings { merge_distance: f64::NAN, ..Default::default() };
    assert!(matches!(
        construct_mesh(&sphere, &bad_merge),
        Err(MeshError::InvalidMergeDistance(_))
    ));
}
