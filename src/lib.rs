//! hexscape
//!
//! Procedural terrain scenes for native and WASM targets. A scene is an orbit
//! camera, one directional light with a shadow generator, a ground and a skybox.
//! The ground is either a heightmap-displaced mesh or a field of hexagonal columns
//! with random heights that cast shadows onto each other.
//!
//! High-level modules
//! - `layout`: placement points of the hex column field
//! - `data_structures`: scene graph, geometry, light, shadow and terrain builders
//! - `assembler`: wires camera, light, shadows, terrain and skybox into a scene
//! - `viewport`: starts an engine on a surface and drives render and resize
//! - `engine`: the capability trait scene code renders through
//! - `render`, `context`, `pipelines`: the wgpu implementation of that trait
//! - `app`: winit host running the viewport in a window or canvas
//! - `config`, `errors`, `resources`: configuration, error types and asset loading
//!

pub mod app;
pub mod assembler;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod engine;
pub mod errors;
pub mod layout;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod viewport;

// Re-exports commonly used types for convenience in downstream code.
pub use app::{run, run_for_frames};
pub use config::{EngineOptions, GroundStrategy, SceneConfig};
pub use engine::Engine;
pub use errors::{Error, Result};
pub use viewport::{RenderHandle, ViewportController};
pub use winit::event::WindowEvent;
