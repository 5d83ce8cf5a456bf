//! # Graphics Module
//!
//! This module contains the geometry construction and buffer consolidation
//! core: procedural mesh building, normal/tangent computation, material
//! resolution, buffer packing, and draw dispatch.
//!
//! ## Architecture Overview
//!
//! The pipeline runs in three strictly ordered phases:
//!
//! - **Build** ([`geometry`]) - Shape builders append vertices and
//!   triangles to surfaces sharing one vertex pool
//! - **Consolidate** ([`rendering`]) - Surfaces from one or more finished
//!   geometries are packed into a minimal set of capacity-limited
//!   vertex/index buffers, grouped by material ([`resources`])
//! - **Dispatch** ([`rendering::dispatch`]) - Draw ranges are replayed
//!   against a render pass, rebinding buffers only when they change
//!
//! Everything is single-threaded by design: a geometry is exclusively
//! owned while it is being built and read-only afterwards, so no locking
//! exists anywhere in this core.
//!
//! ## Usage
//!
//! ```
//! use cairn::gfx::geometry::Geometry;
//! use cairn::gfx::rendering::{consolidate, BufferLimits};
//! use cairn::gfx::resources::MaterialRegistry;
//! use cgmath::{Vector2, Vector3};
//!
//! let mut geometry = Geometry::new();
//! let surface = geometry.create_surface_default();
//! geometry.surface_builder(surface).build_cube_24v(
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(1.0, 1.0, 1.0),
//!     Vector2::new(0.0, 0.0),
//! );
//!
//! let mut registry = MaterialRegistry::new();
//! let packed = consolidate(&[geometry], &mut registry, &BufferLimits::default()).unwrap();
//! assert_eq!(packed.ranges.len(), 1);
//! ```

pub mod error;
pub mod geometry;
pub mod rendering;
pub mod resources;

// Re-export commonly used types
pub use error::GraphicsError;
pub use geometry::Geometry;
