//! Scene data: geometry, transforms, lights, shadows and terrain.
//!
//! - `model` contains vertex layouts and the CPU geometry builders
//! - `instance` holds per-node transformation data
//! - `scene_graph` is the engine-agnostic scene and its resource ids
//! - `light` and `shadow` describe the directional light and its shadow generator
//! - `terrain` builds the heightmap ground or the hex column field
//! - `skybox` wraps the scene in a cube-textured box
//! - `texture` contains the GPU texture wrapper used by the wgpu engine

pub mod instance;
pub mod light;
pub mod model;
pub mod scene_graph;
pub mod shadow;
pub mod skybox;
pub mod terrain;
pub mod texture;
