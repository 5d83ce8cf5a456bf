//! # Cairn Prelude
//!
//! This module provides a convenient way to import commonly used types and
//! traits from the engine. It's designed to reduce boilerplate imports in
//! typical geometry-building code.
//!
//! ## Usage
//!
//! ```rust
//! use cairn::prelude::*;
//!
//! let mut geometry = Geometry::new();
//! let surface = geometry.create_surface(MaterialProperties::default());
//! ```

// Re-export geometry construction types
pub use crate::gfx::geometry::{
    BoundingBox, BuiltVerticesRange, Geometry, GeometrySurface, GlyphPath, PathSegment, Polygon,
    Polygon2D, SurfaceBuilder, TextGeometryOptions, Vertex, VertexTransform,
};

// Re-export material and resource types
pub use crate::gfx::resources::{
    GeometryExportInfo, MaterialHandle, MaterialProperties, MaterialRegistry, MaterialResource,
    TextureHandle,
};

// Re-export consolidation and dispatch
pub use crate::gfx::rendering::{
    consolidate, BufferId, BufferLimits, ConsolidatedMesh, DrawConsolidated, DrawRange,
    MaterialBinder, PackedBufferSet,
};

// Re-export the error type
pub use crate::gfx::error::GraphicsError;
