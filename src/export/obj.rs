//! Wavefront OBJ text output.
//!
//! Positions and normals share one index space, so every face corner is
//! written as `p//p`.

use std::io::{self, Write};

use nalgebra::Vector3;

use crate::types::Mesh;

fn write_rows<W: Write>(writer: &mut W, tag: &str, rows: &[Vector3<f64>]) -> io::Result<()> {
    rows.iter()
        .try_for_each(|r| writeln!(writer, "{tag} {:.6} {:.6} {:.6}", r.x, r.y, r.z))
}

/// Serialize `mesh` to `writer`.
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    writeln!(
        writer,
        "# sdfmesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;
    write_rows(writer, "v", &mesh.positions)?;
    write_rows(writer, "vn", &mesh.normals)?;

    for tri in mesh.indices.chunks_exact(3) {
        write!(writer, "f")?;
        for &i in tri {
            // 1-based
            write!(writer, " {0}//{0}", i + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
