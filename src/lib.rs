// src/lib.rs
//! Cairn Geometry Engine
//!
//! A procedural 3D geometry construction and buffer consolidation engine
//! built on wgpu. Build meshes surface by surface, then pack everything
//! into a minimal set of GPU buffers grouped by material.

pub mod gfx;
pub mod prelude;

// Re-export main types for convenience
pub use gfx::geometry::Geometry;
pub use gfx::GraphicsError;
