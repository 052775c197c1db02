//! Opens a real window and renders a few frames through wgpu.
//!
//! Needs a display and an adapter, so it only runs with `--features integration-tests`.
//! winit allows one event loop per process, hence a single test.

#[cfg(feature = "integration-tests")]
fn options() -> hexscape::EngineOptions {
    hexscape::EngineOptions {
        asset_root: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string(),
        ..Default::default()
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn renders_hex_field_frames() {
    let config = hexscape::SceneConfig {
        seed: Some(11),
        ..Default::default()
    };
    hexscape::run_for_frames(config, options(), 5).unwrap();
}

