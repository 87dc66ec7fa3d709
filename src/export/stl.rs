//! Binary STL export.
//!
//! Writes a standard 80-byte header + triangle facets in little-endian binary format.
//! Each triangle stores a facet normal followed by three vertex positions.

use nalgebra::Vector3;

use crate::types::Mesh;
use std::io::{self, Write};

const HEADER_LEN: usize = 80;
const HEADER_TEXT: &[u8] = b"binary STL written by sdfmesh";

/// Write a `Mesh` as a binary STL to the given writer.
///
/// Facet normals come from the triangle winding, not the vertex normals.
pub fn write_stl<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    let mut header = [0u8; HEADER_LEN];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&(mesh.triangle_count() as u32).to_le_bytes())?;

    for tri in mesh.indices.chunks_exact(3) {
        let [v0, v1, v2] = [0, 1, 2].map(|k| mesh.positions[tri[k] as usize]);
        let normal = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(1e-15)
            .unwrap_or_else(|| Vector3::z());

        for v in [normal, v0, v1, v2] {
            write_vec3(writer, &v)?;
        }
        // Attribute byte count (unused)
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_vec3<W: Write>(writer: &mut W, v: &Vector3<f64>) -> io::Result<()> {
    for c in [v.x, v.y, v.z] {
        writer.write_all(&(c as f32).to_le_bytes())?;
    }
    Ok(())
}
