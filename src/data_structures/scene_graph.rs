//! Scene graph: the engine-agnostic description of everything that gets drawn.
//!
//! A [`Scene`] owns its camera, its light, its shadow generator and a flat list of
//! [`MeshNode`]s. GPU resources live in the engine and are only referenced here
//! through the ids the engine handed out.

use crate::{
    camera::OrbitCamera,
    data_structures::{instance::Instance, light::DirectionalLight, shadow::ShadowGenerator},
};

/// Handle of a mesh uploaded to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Handle of a 2D or cube texture uploaded to an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Handle of a material created by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Description of a standard lit material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub diffuse_colour: [f32; 3],
    pub specular_colour: [f32; 3],
    pub diffuse_texture: Option<TextureId>,
    /// Cube texture sampled by view direction; used by the skybox.
    pub reflection_texture: Option<TextureId>,
    pub backface_culling: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_colour: [1.0, 1.0, 1.0],
            specular_colour: [1.0, 1.0, 1.0],
            diffuse_texture: None,
            reflection_texture: None,
            backface_culling: true,
        }
    }
}

impl Material {
    pub fn textured(diffuse_texture: TextureId) -> Self {
        Self {
            diffuse_texture: Some(diffuse_texture),
            ..Default::default()
        }
    }

    /// Only the reflection texture contributes; both sides are drawn.
    pub fn skybox(reflection_texture: TextureId) -> Self {
        Self {
            diffuse_colour: [0.0; 3],
            specular_colour: [0.0; 3],
            diffuse_texture: None,
            reflection_texture: Some(reflection_texture),
            backface_culling: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Ground,
    Column,
    SkyBox,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub id: MeshId,
    pub name: String,
    pub kind: MeshKind,
    pub transform: Instance,
    pub material: Option<MaterialId>,
    pub receive_shadows: bool,
    /// Follows the camera's translation so it never gets closer.
    pub infinite_distance: bool,
}

impl MeshNode {
    pub fn new(id: MeshId, name: impl Into<String>, kind: MeshKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            transform: Instance::default(),
            material: None,
            receive_shadows: false,
            infinite_distance: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    camera: Option<OrbitCamera>,
    light: Option<DirectionalLight>,
    shadow_generator: Option<ShadowGenerator>,
    nodes: Vec<MeshNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_camera(&mut self, camera: OrbitCamera) -> &mut OrbitCamera {
        if self.camera.is_some() {
            log::warn!("Replacing the scene's camera; a scene holds exactly one");
        }
        self.camera.insert(camera)
    }

    pub fn camera(&self) -> Option<&OrbitCamera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        self.camera.as_mut()
    }

    pub fn set_light(&mut self, light: DirectionalLight) -> &DirectionalLight {
        if self.light.is_some() {
            log::warn!("Replacing the scene's light; a scene holds exactly one");
        }
        self.light.insert(light)
    }

    pub fn light(&self) -> Option<&DirectionalLight> {
        self.light.as_ref()
    }

    pub fn set_shadow_generator(&mut self, generator: ShadowGenerator) {
        if self.shadow_generator.is_some() {
            log::warn!("Replacing the scene's shadow generator");
        }
        self.shadow_generator = Some(generator);
    }

    pub fn shadow_generator(&self) -> Option<&ShadowGenerator> {
        self.shadow_generator.as_ref()
    }

    pub fn add_node(&mut self, node: MeshNode) -> &mut MeshNode {
        self.nodes.push(node);
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn nodes(&self) -> &[MeshNode] {
        &self.nodes
    }

    pub fn node(&self, id: MeshId) -> Option<&MeshNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of(&self, kind: MeshKind) -> impl Iterator<Item = &MeshNode> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    pub fn count(&self, kind: MeshKind) -> usize {
        self.nodes_of(kind).count()
    }

    /// Nodes in draw order: everything at a finite distance first, then the
    /// nodes pinned to infinite distance.
    pub fn draw_order(&self) -> (Vec<&MeshNode>, Vec<&MeshNode>) {
        self.nodes.iter().partition(|node| !node.infinite_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_distance_nodes_are_drawn_last() {
        let mut scene = Scene::new();
        scene.add_node(MeshNode::new(MeshId(1), "ground", MeshKind::Ground));
        let sky = scene.add_node(MeshNode::new(MeshId(2), "skyBox", MeshKind::SkyBox));
        sky.infinite_distance = true;
        scene.add_node(MeshNode::new(MeshId(3), "column_0", MeshKind::Column));

        let (finite, infinite) = scene.draw_order();
        let ids = |nodes: &[&MeshNode]| nodes.iter().map(|node| node.id.0).collect::<Vec<_>>();
        assert_eq!(ids(&finite), vec![1, 3]);
        assert_eq!(ids(&infinite), vec![2]);
    }
}
