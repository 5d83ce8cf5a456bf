//! # Materials
//!
//! Material descriptors carried by geometry surfaces, the closed set of
//! resolved material resources, and the registry that maps descriptors to
//! resources. Surfaces store descriptors by value; consolidation resolves
//! them through a [`MaterialRegistry`] into shareable handles.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::gfx::error::{GraphicsError, ResourceKind};

/// Material description attached to a single geometry surface.
///
/// Defaults to a plain white diffuse material without texture. The
/// `material_key` names a registry entry to resolve to (created on first
/// use); the `texture_key` names a texture that must already be registered.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperties {
    /// Free-text name, not used for resolution.
    pub name: String,
    /// Registry identity; empty for anonymous materials.
    pub material_key: String,
    /// Key of the texture to sample; empty for untextured surfaces.
    pub texture_key: String,
    /// Diffuse RGBA color.
    pub diffuse_color: [f32; 4],
    /// Ambient RGBA color.
    pub ambient_color: [f32; 4],
    /// Emissive RGBA color.
    pub emissive_color: [f32; 4],
    /// Specular RGBA color.
    pub specular_color: [f32; 4],
    /// Specular exponent.
    pub shininess: f32,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            material_key: String::new(),
            texture_key: String::new(),
            diffuse_color: [1.0, 1.0, 1.0, 1.0],
            ambient_color: [0.0, 0.0, 0.0, 1.0],
            emissive_color: [0.0, 0.0, 0.0, 1.0],
            specular_color: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
        }
    }
}

impl MaterialProperties {
    /// Builder pattern: set the free-text name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Builder pattern: set the registry key
    pub fn with_material_key(mut self, key: &str) -> Self {
        self.material_key = key.to_string();
        self
    }

    /// Builder pattern: set the texture key
    pub fn with_texture_key(mut self, key: &str) -> Self {
        self.texture_key = key.to_string();
        self
    }

    /// Builder pattern: set the diffuse color
    pub fn with_diffuse_color(mut self, color: [f32; 4]) -> Self {
        self.diffuse_color = color;
        self
    }

    /// Total, deterministic ordering over material descriptors.
    ///
    /// Used by buffer consolidation to sort surfaces so that equal
    /// materials end up adjacent. The ordering is stable across runs
    /// (string comparison plus `f32::total_cmp` on the color components),
    /// unlike a hash-based key.
    pub fn cmp_stable(&self, other: &Self) -> Ordering {
        self.material_key
            .cmp(&other.material_key)
            .then_with(|| self.texture_key.cmp(&other.texture_key))
            .then_with(|| cmp_color(&self.diffuse_color, &other.diffuse_color))
            .then_with(|| cmp_color(&self.ambient_color, &other.ambient_color))
            .then_with(|| cmp_color(&self.emissive_color, &other.emissive_color))
            .then_with(|| cmp_color(&self.specular_color, &other.specular_color))
            .then_with(|| self.shininess.total_cmp(&other.shininess))
            .then_with(|| self.name.cmp(&other.name))
    }
}

fn cmp_color(a: &[f32; 4], b: &[f32; 4]) -> Ordering {
    for i in 0..4 {
        let ordering = a[i].total_cmp(&b[i]);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Handle to a resolved material inside a [`MaterialRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub(crate) u32);

impl MaterialHandle {
    /// Positional index inside the registry.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Handle to a registered texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u32);

impl TextureHandle {
    /// Positional index inside the registry's texture table.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A resolved fixed-function color material, optionally textured.
#[derive(Debug, Clone)]
pub struct StandardMaterialResource {
    /// The descriptor the resource was created from.
    pub properties: MaterialProperties,
    /// Resolved texture, if the descriptor named one.
    pub texture: Option<TextureHandle>,
}

/// A resolved screen-space effect material.
#[derive(Debug, Clone)]
pub struct PostprocessMaterialResource {
    /// Name of the postprocess effect to run.
    pub effect_key: String,
}

/// The closed set of material resource kinds.
///
/// Render dispatch matches on this exhaustively; adding a kind is a
/// deliberate API change, not a new subclass slipping in.
#[derive(Debug, Clone)]
pub enum MaterialResource {
    /// Fixed-function color material.
    Standard(StandardMaterialResource),
    /// Screen-space effect material.
    Postprocess(PostprocessMaterialResource),
}

struct RegisteredMaterial {
    /// Descriptor the entry was created from; `None` for resources
    /// registered directly.
    source: Option<MaterialProperties>,
    resource: MaterialResource,
}

/// Resource dictionary mapping material descriptors and texture keys to
/// resolved handles.
///
/// Lookup failures propagate as errors; there is no fallback material
/// policy here.
#[derive(Default)]
pub struct MaterialRegistry {
    entries: Vec<RegisteredMaterial>,
    by_key: HashMap<String, MaterialHandle>,
    textures: HashMap<String, TextureHandle>,
}

impl MaterialRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a texture under `key`, returning its handle. Registering
    /// the same key twice returns the existing handle.
    pub fn register_texture(&mut self, key: &str) -> TextureHandle {
        if let Some(&handle) = self.textures.get(key) {
            return handle;
        }
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.insert(key.to_string(), handle);
        handle
    }

    /// Looks up a registered texture.
    ///
    /// # Errors
    /// [`GraphicsError::ResourceNotFound`] if the key was never registered.
    pub fn texture(&self, key: &str) -> Result<TextureHandle, GraphicsError> {
        self.textures
            .get(key)
            .copied()
            .ok_or_else(|| GraphicsError::ResourceNotFound {
                kind: ResourceKind::Texture,
                key: key.to_string(),
            })
    }

    /// Registers a prepared resource under `key`, returning its handle.
    /// An existing entry under the same key is replaced as the key's
    /// resolution target.
    pub fn register_material(&mut self, key: &str, resource: MaterialResource) -> MaterialHandle {
        let handle = MaterialHandle(self.entries.len() as u32);
        self.entries.push(RegisteredMaterial {
            source: None,
            resource,
        });
        self.by_key.insert(key.to_string(), handle);
        handle
    }

    /// Resolves a surface descriptor to a material handle, creating a
    /// standard material on first use.
    ///
    /// A non-empty `material_key` resolves to the entry registered under
    /// that key, creating one from the descriptor if absent. Anonymous
    /// descriptors are deduplicated by full property equality, so equal
    /// descriptors share one resource.
    ///
    /// # Errors
    /// [`GraphicsError::ResourceNotFound`] if the descriptor names a
    /// texture that was never registered.
    pub fn resolve_or_create(
        &mut self,
        properties: &MaterialProperties,
    ) -> Result<MaterialHandle, GraphicsError> {
        if !properties.material_key.is_empty() {
            if let Some(&handle) = self.by_key.get(&properties.material_key) {
                return Ok(handle);
            }
        } else if let Some(position) = self
            .entries
            .iter()
            .position(|entry| entry.source.as_ref() == Some(properties))
        {
            return Ok(MaterialHandle(position as u32));
        }

        let texture = if properties.texture_key.is_empty() {
            None
        } else {
            Some(self.texture(&properties.texture_key)?)
        };

        let handle = MaterialHandle(self.entries.len() as u32);
        self.entries.push(RegisteredMaterial {
            source: Some(properties.clone()),
            resource: MaterialResource::Standard(StandardMaterialResource {
                properties: properties.clone(),
                texture,
            }),
        });
        if !properties.material_key.is_empty() {
            self.by_key
                .insert(properties.material_key.clone(), handle);
        }
        Ok(handle)
    }

    /// The resource behind a handle.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this registry.
    pub fn get(&self, handle: MaterialHandle) -> &MaterialResource {
        &self.entries[handle.index()].resource
    }

    /// Number of resolved materials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no material has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_white_diffuse_without_texture() {
        let properties = MaterialProperties::default();
        assert_eq!(properties.diffuse_color, [1.0, 1.0, 1.0, 1.0]);
        assert!(properties.texture_key.is_empty());
        assert!(properties.material_key.is_empty());
    }

    #[test]
    fn anonymous_descriptors_deduplicate_by_equality() {
        let mut registry = MaterialRegistry::new();
        let red = MaterialProperties::default().with_diffuse_color([1.0, 0.0, 0.0, 1.0]);
        let blue = MaterialProperties::default().with_diffuse_color([0.0, 0.0, 1.0, 1.0]);

        let first = registry.resolve_or_create(&red).unwrap();
        let second = registry.resolve_or_create(&red.clone()).unwrap();
        let third = registry.resolve_or_create(&blue).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, third);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn keyed_descriptors_resolve_to_one_entry() {
        let mut registry = MaterialRegistry::new();
        let keyed = MaterialProperties::default().with_material_key("walls");
        // Different colors, same key: the first registration wins.
        let keyed_other = keyed.clone().with_diffuse_color([0.5, 0.5, 0.5, 1.0]);

        let first = registry.resolve_or_create(&keyed).unwrap();
        let second = registry.resolve_or_create(&keyed_other).unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn missing_texture_fails_loudly() {
        let mut registry = MaterialRegistry::new();
        let textured = MaterialProperties::default().with_texture_key("bricks");
        let result = registry.resolve_or_create(&textured);
        assert!(matches!(
            result,
            Err(GraphicsError::ResourceNotFound {
                kind: ResourceKind::Texture,
                ..
            })
        ));
    }

    #[test]
    fn registered_texture_is_resolved() {
        let mut registry = MaterialRegistry::new();
        let texture = registry.register_texture("bricks");
        let textured = MaterialProperties::default().with_texture_key("bricks");

        let handle = registry.resolve_or_create(&textured).unwrap();
        match registry.get(handle) {
            MaterialResource::Standard(standard) => {
                assert_eq!(standard.texture, Some(texture));
            }
            MaterialResource::Postprocess(_) => panic!("expected a standard material"),
        }
    }

    #[test]
    fn registered_resources_win_key_resolution() {
        let mut registry = MaterialRegistry::new();
        let handle = registry.register_material(
            "blur",
            MaterialResource::Postprocess(PostprocessMaterialResource {
                effect_key: "gaussian".to_string(),
            }),
        );

        let descriptor = MaterialProperties::default().with_material_key("blur");
        let resolved = registry.resolve_or_create(&descriptor).unwrap();
        assert_eq!(resolved, handle);
        assert!(matches!(
            registry.get(resolved),
            MaterialResource::Postprocess(_)
        ));
    }

    #[test]
    fn ordering_is_total_and_deterministic() {
        let red = MaterialProperties::default().with_diffuse_color([1.0, 0.0, 0.0, 1.0]);
        let blue = MaterialProperties::default().with_diffuse_color([0.0, 0.0, 1.0, 1.0]);
        let keyed = MaterialProperties::default().with_material_key("a");

        assert_eq!(red.cmp_stable(&red.clone()), Ordering::Equal);
        assert_eq!(red.cmp_stable(&blue), blue.cmp_stable(&red).reverse());
        // Empty keys sort before non-empty ones.
        assert_eq!(red.cmp_stable(&keyed), Ordering::Less);
    }
}
