//! The capability interface between scene code and a rendering backend.
//!
//! Terrain builders, the scene assembler and the viewport only ever talk to an
//! [`Engine`]. The crate ships [`WgpuEngine`](crate::render::WgpuEngine); tests drive
//! the same code through a recording fake.

use std::future::Future;

use crate::{
    camera::OrbitCamera,
    config::EngineOptions,
    data_structures::{
        light::DirectionalLight,
        model::Geometry,
        scene_graph::{Material, MaterialId, MeshId, Scene, TextureId},
        shadow::ShadowGenerator,
    },
    errors::Result,
    resources::CubeFaces,
};

pub trait Engine {
    /// What the engine draws into, e.g. a window.
    type Surface;

    /// Bind a new engine to `surface`. One engine per surface.
    fn create(surface: Self::Surface, options: &EngineOptions) -> impl Future<Output = Result<Self>>
    where
        Self: Sized;

    fn create_mesh(&mut self, name: &str, geometry: &Geometry) -> Result<MeshId>;

    fn create_texture(&mut self, name: &str, image: &image::RgbaImage) -> Result<TextureId>;

    fn create_cube_texture(&mut self, name: &str, faces: &CubeFaces) -> Result<TextureId>;

    fn create_material(&mut self, name: &str, material: &Material) -> Result<MaterialId>;

    /// Register the camera the scene is viewed through.
    fn create_camera(&mut self, camera: &OrbitCamera) -> Result<()>;

    /// Route the surface's pointer input to `camera`.
    fn attach_control(&mut self, camera: &mut OrbitCamera) -> Result<()>;

    fn create_light(&mut self, light: &DirectionalLight) -> Result<()>;

    /// Allocate the shadow map for `generator`. Its light must already exist.
    fn create_shadow_generator(&mut self, generator: &ShadowGenerator) -> Result<()>;

    /// Draw one frame of `scene`.
    fn render(&mut self, scene: &Scene) -> Result<()>;

    /// Adapt to a new surface size in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Release every GPU resource. The engine is unusable afterwards.
    fn dispose(&mut self);
}
