use sdfmesh::builder::Shape;
use sdfmesh::export::{write_obj, write_stl};
use sdfmesh::types::MeshSettings;
use std::path::PathBuf;

fn sphere_mesh() -> sdfmesh::Mesh {
    let settings = MeshSettings { target_resolution: 0.25, ..Default::default() };
    Shape::sphere(1.0).mesh(&settings).unwrap()
}

#[test]
fn export_obj_counts_match_mesh() {
    let mesh = sphere_mesh();
    let mut buf = Vec::new();
    write_obj(&mesh, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), mesh.vertex_count());
    assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), mesh.vertex_count());
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), mesh.triangle_count());
}

#[test]
fn export_stl_size_matches_triangles() {
    let mesh = sphere_mesh();
    let mut buf = Vec::new();
    write_stl(&mesh, &mut buf).unwrap();
    assert_eq!(buf.len(), 84 + 50 * mesh.triangle_count());
}

#[test]
fn export_files_written() {
    let mesh = sphere_mesh();
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    let obj = dir.join("export_sphere.obj");
    let stl = dir.join("export_sphere.stl");

    mesh.export_obj(&obj).unwrap();
    mesh.export_stl(&stl).unwrap();

    let obj_text = std::fs::read_to_string(&obj).unwrap();
    assert!(obj_text.starts_with("# sdfmesh"));
    assert_eq!(
        std::fs::metadata(&stl).unwrap().len() as usize,
        84 + 50 * mesh.triangle_count()
    );

    std::fs::remove_file(obj).ok();
    std::fs::remove_file(stl).ok();
}
