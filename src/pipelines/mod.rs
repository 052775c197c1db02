//! Render pipelines of the wgpu engine.
//!
//! - `basic`: shared pipeline builder and the lit mesh pipeline
//! - `light`: light uniform and the shadow map it is sampled against
//! - `shadow`: depth-only pass over the shadow casters
//! - `skybox`: cube-textured sky box drawn at infinite distance

pub mod basic;
pub mod light;
pub mod shadow;
pub mod skybox;
