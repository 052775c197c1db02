//! Shadow generator.
//!
//! A [`ShadowGenerator`] can only be built from an existing light, and every terrain
//! builder that wants shadows has to be handed one. Casters are stored as mesh ids;
//! the generator never owns the meshes themselves.

use std::collections::BTreeSet;

use crate::data_structures::{light::DirectionalLight, scene_graph::MeshId};

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowGenerator {
    resolution: u32,
    ortho_extent: f32,
    light: String,
    casters: BTreeSet<MeshId>,
}

impl ShadowGenerator {
    pub fn new(resolution: u32, light: &DirectionalLight) -> Self {
        Self {
            resolution,
            ortho_extent: 25.0,
            light: light.name.clone(),
            casters: BTreeSet::new(),
        }
    }

    /// Width and height of the shadow map in texels.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Half-size of the light's orthographic frustum in world units.
    pub fn with_ortho_extent(mut self, extent: f32) -> Self {
        self.ortho_extent = extent;
        self
    }

    pub fn ortho_extent(&self) -> f32 {
        self.ortho_extent
    }

    /// Name of the light this generator is bound to.
    pub fn light_name(&self) -> &str {
        &self.light
    }

    /// Returns `false` if the mesh was already casting shadows.
    pub fn add_shadow_caster(&mut self, mesh: MeshId) -> bool {
        self.casters.insert(mesh)
    }

    pub fn remove_shadow_caster(&mut self, mesh: MeshId) -> bool {
        self.casters.remove(&mesh)
    }

    pub fn is_caster(&self, mesh: MeshId) -> bool {
        self.casters.contains(&mesh)
    }

    pub fn casters(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.casters.iter().copied()
    }

    pub fn caster_count(&self) -> usize {
        self.casters.len()
    }
}
