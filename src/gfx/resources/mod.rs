// src/gfx/resources/mod.rs
//! Material and texture resources
//!
//! Surface material descriptors, the closed set of resolved material
//! resources, and the registry that consolidation resolves descriptors
//! through. Also carries the export snapshot handed to external exporters.

pub mod material;

// Re-export main types
pub use material::{
    MaterialHandle, MaterialProperties, MaterialRegistry, MaterialResource,
    PostprocessMaterialResource, StandardMaterialResource, TextureHandle,
};

use crate::gfx::geometry::Geometry;

/// Snapshot of a built geometry under its resource key, handed to external
/// exporters. No serialization format is defined here.
pub struct GeometryExportInfo {
    /// Key the geometry is registered under.
    pub resource_key: String,
    /// The raw built geometry.
    pub geometry: Geometry,
}
