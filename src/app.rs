//! Windowed host.
//!
//! [`run`] opens a window, starts a [`ViewportController`] on it with the wgpu engine
//! and feeds the resulting [`RenderHandle`] from the winit event loop:
//!
//! 1. `resumed` creates the window and starts the viewport (blocking on native,
//!    `spawn_local` on the web); the result comes back as a [`HostEvent::Started`]
//! 2. `Resized` forwards the new size, once per event
//! 3. `RedrawRequested` renders a frame and asks for the next one
//! 4. `CloseRequested` disposes the viewport and leaves the loop

use std::sync::Arc;

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use crate::{
    config::{EngineOptions, SceneConfig},
    errors::{Error, Result},
    render::WgpuEngine,
    viewport::{RenderHandle, ViewportController},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub(crate) enum HostEvent {
    Started(Result<RenderHandle<WgpuEngine>>),
}

impl std::fmt::Debug for HostEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Started(Ok(_)) => f.write_str("Started(Ok)"),
            Self::Started(Err(e)) => f.debug_tuple("Started").field(e).finish(),
        }
    }
}

pub(crate) struct App {
    proxy: EventLoopProxy<HostEvent>,
    controller: ViewportController,
    window: Option<Arc<Window>>,
    handle: Option<RenderHandle<WgpuEngine>>,
    error: Option<Error>,
    frame_limit: Option<u64>,
    frames: u64,
    last_report: (Instant, u64),
}

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

impl App {
    fn new(
        event_loop: &EventLoop<HostEvent>,
        controller: ViewportController,
        frame_limit: Option<u64>,
    ) -> Self {
        Self {
            proxy: event_loop.create_proxy(),
            controller,
            window: None,
            handle: None,
            error: None,
            frame_limit,
            frames: 0,
            last_report: (Instant::now(), 0),
        }
    }

    fn on_started(
        &mut self,
        event_loop: &ActiveEventLoop,
        started: Result<RenderHandle<WgpuEngine>>,
    ) {
        match started {
            Ok(handle) => {
                handle.engine().request_redraw();
                self.handle = Some(handle);
            }
            Err(e) => {
                log::error!("Viewport failed to start: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut handle) = self.handle.take() {
            handle.dispose();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler<HostEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("hexscape");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes =
                        window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::warn!("No #{} element, winit creates its own canvas", CANVAS_ID),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(Error::Engine(format!("window creation failed: {}", e)));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let started = futures::executor::block_on(self.controller.start::<WgpuEngine>(window));
            if self.proxy.send_event(HostEvent::Started(started)).is_err() {
                log::error!("Event loop closed before the viewport started");
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let controller = self.controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let started = controller.start::<WgpuEngine>(window).await;
                if proxy.send_event(HostEvent::Started(started)).is_err() {
                    log::error!("Event loop closed before the viewport started");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: HostEvent) {
        match event {
            HostEvent::Started(started) => self.on_started(event_loop, started),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(handle) = self.handle.as_mut() else {
            if matches!(event, WindowEvent::CloseRequested) {
                event_loop.exit();
            }
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => handle.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                if let Err(e) = handle.render_frame() {
                    log::error!("Frame {} failed: {}", self.frames, e);
                }
                self.frames += 1;
                let (since, frames_then) = self.last_report;
                if since.elapsed() >= REPORT_INTERVAL {
                    let fps = (self.frames - frames_then) as f32 / since.elapsed().as_secs_f32();
                    log::debug!("{:.1} fps", fps);
                    self.last_report = (Instant::now(), self.frames);
                }
                if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
                    log::info!("Rendered {} frames, exiting", self.frames);
                    self.shutdown(event_loop);
                } else {
                    handle.engine().request_redraw();
                }
            }
            other => {
                handle.handle_window_event(&other);
            }
        }
    }
}

fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {}", e).into());
        }
    }
}

fn build_event_loop() -> anyhow::Result<EventLoop<HostEvent>> {
    // Test harnesses run off the main thread
    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(feature = "integration-tests", any(target_os = "linux", target_os = "windows"))))]
    let event_loop = EventLoop::with_user_event().build()?;

    Ok(event_loop)
}

fn run_app(
    config: SceneConfig,
    options: EngineOptions,
    frame_limit: Option<u64>,
) -> anyhow::Result<()> {
    init_logging();

    let event_loop = build_event_loop()?;
    let mut app = App::new(&event_loop, ViewportController::new(options, config), frame_limit);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Open a window and render the scene until it is closed.
pub fn run(config: SceneConfig, options: EngineOptions) -> anyhow::Result<()> {
    run_app(config, options, None)
}

/// Like [`run`], but exits on its own after `frames` frames.
pub fn run_for_frames(
    config: SceneConfig,
    options: EngineOptions,
    frames: u64,
) -> anyhow::Result<()> {
    run_app(config, options, Some(frames))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> std::result::Result<(), JsValue> {
    run(SceneConfig::default(), EngineOptions::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
