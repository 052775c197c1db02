use futures::executor::block_on;
use hexscape::{Error, RenderHandle, ViewportController, errors::AssemblyStep};

use crate::common::test_utils::{
    AssetFixture, Call, RecordingEngine, SharedRecording, fixture_config, heightmap_ground,
    hex_ground, recording,
};

mod common;

fn start(
    assets: &AssetFixture,
    log: &SharedRecording,
) -> hexscape::Result<RenderHandle<RecordingEngine>> {
    let controller =
        ViewportController::new(assets.engine_options(), fixture_config(hex_ground(3, 3)));
    block_on(controller.start::<RecordingEngine>(log.clone()))
}

#[test]
fn start_creates_the_engine_and_subscribes() {
    let assets = AssetFixture::new("viewport-start");
    let log = recording();

    let handle = start(&assets, &log).unwrap();

    assert_eq!(log.borrow().calls.first(), Some(&Call::Create));
    assert!(handle.is_running());
    assert!(handle.render_loop().is_active());
    assert!(handle.resize_observer().is_active());
    assert!(handle.scene().camera().unwrap().is_attached());
    assert_eq!(handle.scene().nodes().len(), 10);
}

#[test]
fn each_resize_reaches_the_engine_once() {
    let assets = AssetFixture::new("viewport-resize");
    let log = recording();
    let mut handle = start(&assets, &log).unwrap();

    handle.render_frame().unwrap();
    handle.resize(800, 600);
    handle.render_frame().unwrap();
    handle.resize(1024, 768);
    handle.resize(1024, 768);
    handle.render_frame().unwrap();

    let log = log.borrow();
    assert_eq!(log.resizes(), 3);
    assert_eq!(log.renders(), 3);
    let sizes: Vec<_> = log
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Resize { width, height } => Some((*width, *height)),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![(800, 600), (1024, 768), (1024, 768)]);
}

#[test]
fn zero_size_resize_is_forwarded_once() {
    let assets = AssetFixture::new("viewport-resize-zero");
    let log = recording();
    let mut handle = start(&assets, &log).unwrap();

    handle.resize(0, 0);
    handle.render_frame().unwrap();

    let log = log.borrow();
    assert_eq!(log.resizes(), 1);
    assert_eq!(
        log.count(|c| *c == Call::Resize {
            width: 0,
            height: 0
        }),
        1
    );
    assert_eq!(log.renders(), 1);
}

#[test]
fn frames_render_the_whole_scene() {
    let assets = AssetFixture::new("viewport-frame");
    let log = recording();
    let mut handle = start(&assets, &log).unwrap();

    handle.render_frame().unwrap();

    let nodes = handle.scene().nodes().len();
    assert_eq!(log.borrow().calls.last(), Some(&Call::Render { nodes }));
}

#[test]
fn dispose_stops_rendering_and_releases_the_engine_once() {
    let assets = AssetFixture::new("viewport-dispose");
    let log = recording();
    let mut handle = start(&assets, &log).unwrap();

    handle.dispose();
    handle.dispose();
    handle.render_frame().unwrap();
    handle.resize(640, 480);

    assert!(!handle.is_running());
    assert!(!handle.resize_observer().is_active());
    drop(handle);

    let log = log.borrow();
    assert_eq!(log.disposals(), 1);
    assert_eq!(log.renders(), 0);
    assert_eq!(log.resizes(), 0);
}

#[test]
fn dropping_the_handle_disposes() {
    let assets = AssetFixture::new("viewport-drop");
    let log = recording();

    drop(start(&assets, &log).unwrap());

    assert_eq!(log.borrow().disposals(), 1);
    assert_eq!(log.borrow().calls.last(), Some(&Call::Dispose));
}

#[test]
fn failed_assembly_disposes_the_engine() {
    let assets = AssetFixture::new("viewport-fail");
    assets.remove(AssetFixture::HEIGHTMAP);
    let log = recording();
    let controller =
        ViewportController::new(assets.engine_options(), fixture_config(heightmap_ground()));

    let err = block_on(controller.start::<RecordingEngine>(log.clone())).err().unwrap();

    assert_eq!(err.failed_step(), Some(AssemblyStep::Terrain));
    assert!(matches!(err.root_cause(), Error::AssetLoad { .. }));
    let log = log.borrow();
    assert_eq!(log.disposals(), 1);
    assert_eq!(log.renders(), 0);
}

#[test]
fn engine_that_cannot_be_created_is_reported() {
    let assets = AssetFixture::new("viewport-create");
    let log = recording();
    log.borrow_mut().fail_on = Some("create");

    let err = start(&assets, &log).err().unwrap();

    assert!(matches!(err, Error::Engine(_)));
    assert!(log.borrow().calls.is_empty());
}

#[test]
fn start_with_uses_a_given_engine() {
    let assets = AssetFixture::new("viewport-start-with");
    let log = recording();
    let controller =
        ViewportController::new(assets.engine_options(), fixture_config(hex_ground(1, 2)));

    let handle =
        block_on(controller.start_with(RecordingEngine::new(&log), &assets.loader())).unwrap();

    assert_eq!(handle.scene().nodes().len(), 3);
    assert!(!log.borrow().calls.contains(&Call::Create));
}

#[test]
fn detached_camera_is_refused() {
    let assets = AssetFixture::new("viewport-detached");
    let log = recording();
    log.borrow_mut().ignore_attach = true;

    let err = start(&assets, &log).err().unwrap();

    assert!(matches!(err, Error::CameraDetached));
    let log = log.borrow();
    assert_eq!(log.count(|c| *c == Call::AttachControl), 1);
    assert_eq!(log.disposals(), 1);
    assert_eq!(log.calls.last(), Some(&Call::Dispose));
    assert_eq!(log.renders(), 0);
}
