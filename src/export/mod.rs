//! Mesh writers.
//!
//! - **OBJ**: Wavefront text format with per-vertex normals
//! - **STL**: binary triangle soup with facet normals

pub mod obj;
pub mod stl;

pub use obj::write_obj;
pub use stl::write_stl;
