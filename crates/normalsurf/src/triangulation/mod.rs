//! Triangulations of 3-manifolds and their skeleta.
//!
//! Purpose
//! - Hold tetrahedra and face gluings behind a cheap, copy-on-write handle.
//! - Derive the skeleton (edges, vertices, triangles, boundary components)
//!   lazily; the normal surface engines read it but never build it.
//! - Decode the two text encodings in common use (isomorphism signatures and
//!   dehydration strings) and provide a small catalog of named examples.
//!
//! Conventions
//! - Face `f` of a tetrahedron is the face opposite vertex `f`.
//! - A gluing `g` of face `f` of `t` to `u` maps vertex `i` of `t` to vertex
//!   `g[i]` of `u`; the face of `u` is `g[f]`.

pub mod catalog;
mod dehydration;
mod isosig;
pub mod random;
mod skeleton;
mod types;

pub use skeleton::{
    BoundaryComponent, Edge, EdgeEmbedding, Triangle, TriangleEmbedding, Vertex, VertexEmbedding,
    VertexLink,
};
pub use types::{Tetrahedron, Triangulation};

#[cfg(test)]
mod tests;
