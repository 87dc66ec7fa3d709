//! Signed-distance CSG kernel with mesh extraction.
//!
//! Shapes are built as an immutable expression DAG ([`builder::Shape`] over
//! [`dag::SdfNode`]) and turned into an indexed triangle mesh by
//! [`mesh::construct_mesh`]:
//!
//! 1. **Sample** - octree marching cubes emits a triangle soup ([`octree`]).
//! 2. **Deduplicate** - near-coincident soup vertices are merged into an
//!    indexed mesh and degenerate triangles removed ([`dedup`]).
//! 3. **Reproject** - vertices are snapped back onto the zero level-set.
//! 4. **Refine** - optional feature-preserving edge splits and flat-region
//!    edge collapses on a half-edge topology ([`refine`], [`half_edge`]).
//!
//! ```rust,no_run
//! use sdfmesh::builder::Shape;
//! use sdfmesh::types::MeshSettings;
//!
//! let shape = Shape::box3(1.0, 1.0, 1.0)
//!     .smooth_union(Shape::sphere(0.5).translate(0.0, 1.5, 0.0), 0.5);
//! let mesh = shape.mesh(&MeshSettings::default()).unwrap();
//! mesh.export_obj("blob.obj").unwrap();
//! ```

pub mod builder;
pub mod bvh;
pub mod csg;
pub mod dag;
pub mod dedup;
pub mod error;
pub mod export;
pub mod half_edge;
pub mod mesh;
pub mod octree;
pub mod primitives;
pub mod refine;
pub mod shape;
pub mod tables;
pub mod types;

pub use builder::Shape;
pub use error::MeshError;
pub use mesh::construct_mesh;
pub use shape::Sdf;
pub use types::{Mesh, MeshSettings, RefineOptions};
