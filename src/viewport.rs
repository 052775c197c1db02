//! Viewport lifecycle.
//!
//! [`ViewportController::start`] binds an engine to a surface, assembles the scene
//! and hands back a [`RenderHandle`]. The handle holds two subscriptions: the
//! render loop, fed by the host once per frame, and the resize observer, fed once
//! per surface resize. Disposing the handle (or dropping it) cancels both and
//! releases the engine.

use winit::event::WindowEvent;

use crate::{
    assembler::{assemble_scene, scene_rng},
    config::{EngineOptions, SceneConfig},
    data_structures::scene_graph::Scene,
    engine::Engine,
    errors::{Error, Result},
    resources::AssetLoader,
};

/// A host callback registration that stays live until cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    name: &'static str,
    active: bool,
}

impl Subscription {
    fn new(name: &'static str) -> Self {
        log::debug!("Subscribed {}", name);
        Self { name, active: true }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel(&mut self) {
        if self.active {
            log::debug!("Unsubscribed {}", self.name);
            self.active = false;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    pub options: EngineOptions,
    pub config: SceneConfig,
}

impl ViewportController {
    pub fn new(options: EngineOptions, config: SceneConfig) -> Self {
        Self { options, config }
    }

    /// Create an engine for `surface`, assemble the scene and start rendering.
    ///
    /// If assembly fails the engine is disposed before the error is returned.
    pub async fn start<E: Engine>(&self, surface: E::Surface) -> Result<RenderHandle<E>> {
        let engine = E::create(surface, &self.options).await?;
        let assets = AssetLoader::new(&self.options.asset_root);
        self.start_with(engine, &assets).await
    }

    /// Like [`start`](Self::start) for an engine that already exists.
    pub async fn start_with<E: Engine>(
        &self,
        mut engine: E,
        assets: &AssetLoader,
    ) -> Result<RenderHandle<E>> {
        let mut rng = scene_rng(self.config.seed);
        let scene = match assemble_scene(&mut engine, assets, &self.config, &mut rng).await {
            Ok(scene) => scene,
            Err(err) => {
                log::error!("{}", err);
                engine.dispose();
                return Err(err);
            }
        };

        if !scene.camera().is_some_and(|camera| camera.is_attached()) {
            engine.dispose();
            return Err(Error::CameraDetached);
        }

        log::info!("Render loop started");
        Ok(RenderHandle {
            engine,
            scene,
            render_loop: Subscription::new("render loop"),
            resize_observer: Subscription::new("resize observer"),
            disposed: false,
        })
    }
}

/// A running viewport. Owns the engine and the assembled scene.
pub struct RenderHandle<E: Engine> {
    engine: E,
    scene: Scene,
    render_loop: Subscription,
    resize_observer: Subscription,
    disposed: bool,
}

impl<E: Engine> RenderHandle<E> {
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn render_loop(&self) -> &Subscription {
        &self.render_loop
    }

    pub fn resize_observer(&self) -> &Subscription {
        &self.resize_observer
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_active()
    }

    /// Draw one frame. A no-op once the render loop is cancelled.
    pub fn render_frame(&mut self) -> Result<()> {
        if !self.render_loop.is_active() {
            return Ok(());
        }
        self.engine.render(&self.scene)
    }

    /// Forward one surface resize to the engine.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.resize_observer.is_active() {
            return;
        }
        if width == 0 || height == 0 {
            log::warn!("Surface resized to {}x{}", width, height);
        }
        self.engine.resize(width, height);
    }

    /// Route pointer input to the scene's camera. Returns `true` if it was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match self.scene.camera_mut() {
            Some(camera) if self.render_loop.is_active() => camera.handle_window_event(event),
            _ => false,
        }
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.render_loop.cancel();
        self.resize_observer.cancel();
        self.engine.dispose();
        self.disposed = true;
        log::info!("Viewport disposed");
    }
}

impl<E: Engine> Drop for RenderHandle<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
