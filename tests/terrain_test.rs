use futures::executor::block_on;
use hexscape::{
    Error,
    config::HeightmapExtents,
    data_structures::{
        light::DirectionalLight,
        scene_graph::{MeshKind, Scene},
        shadow::ShadowGenerator,
        terrain::{build_heightmap_ground, build_hex_column_field},
    },
    layout::generate_layout,
};
use rand::{SeedableRng, rngs::StdRng};

use crate::common::test_utils::{AssetFixture, Call, RecordingEngine, recording};

mod common;

fn generator() -> ShadowGenerator {
    let light = DirectionalLight::new("dir01", [0.0, -0.1, 0.1], [10.0, 10.0, 0.0]);
    ShadowGenerator::new(1024, &light)
}

#[test]
fn columns_rest_on_the_ground_and_cast_shadows() {
    let log = recording();
    let mut engine = RecordingEngine::new(&log);
    let mut scene = Scene::new();
    let mut shadows = generator();
    let layout = generate_layout(3, 4, 0.0, 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let columns =
        build_hex_column_field(&mut engine, &mut scene, &mut shadows, &layout, &mut rng).unwrap();

    assert_eq!(columns.len(), 12);
    assert_eq!(shadows.caster_count(), 12);
    assert_eq!(scene.count(MeshKind::Column), 12);
    assert_eq!(log.borrow().meshes(), 12);

    for (column, point) in columns.iter().zip(&layout) {
        assert!((0.5..1.0).contains(&column.height), "height {}", column.height);
        assert!((column.position.y - column.height / 2.0).abs() < 1e-6);
        assert_eq!(column.position.x, point.x);
        assert_eq!(column.position.z, point.z);
        assert!(shadows.is_caster(column.mesh));

        let node = scene.node(column.mesh).unwrap();
        assert!(node.receive_shadows);
        assert_eq!(node.transform.position, column.position);
    }
}

#[test]
fn columns_share_one_material() {
    let log = recording();
    let mut engine = RecordingEngine::new(&log);
    let mut scene = Scene::new();
    let mut shadows = generator();
    let layout = generate_layout(2, 2, 0.0, 0.0).unwrap();

    build_hex_column_field(
        &mut engine,
        &mut scene,
        &mut shadows,
        &layout,
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();

    assert_eq!(log.borrow().count(|c| matches!(c, Call::Material { .. })), 1);
    let material = scene.nodes()[0].material;
    assert!(scene.nodes().iter().all(|node| node.material == material));
}

#[test]
fn same_seed_gives_the_same_heights() {
    let heights = |seed| {
        let log = recording();
        let mut engine = RecordingEngine::new(&log);
        let mut scene = Scene::new();
        let mut shadows = generator();
        let layout = generate_layout(5, 5, 0.0, 0.0).unwrap();
        build_hex_column_field(
            &mut engine,
            &mut scene,
            &mut shadows,
            &layout,
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
        .into_iter()
        .map(|column| column.height)
        .collect::<Vec<_>>()
    };

    assert_eq!(heights(42), heights(42));
    assert_ne!(heights(42), heights(43));
}

#[test]
fn empty_layout_builds_nothing() {
    let log = recording();
    let mut engine = RecordingEngine::new(&log);
    let mut scene = Scene::new();
    let mut shadows = generator();
    let mut rng = StdRng::seed_from_u64(0);

    let columns =
        build_hex_column_field(&mut engine, &mut scene, &mut shadows, &[], &mut rng).unwrap();

    assert!(columns.is_empty());
    assert_eq!(shadows.caster_count(), 0);
    assert!(log.borrow().calls.is_empty());
}

#[test]
fn heightmap_ground_is_one_textured_shadow_receiver() {
    let assets = AssetFixture::new("heightmap");
    let log = recording();
    let mut engine = RecordingEngine::new(&log);
    let mut scene = Scene::new();
    let extents = HeightmapExtents {
        subdivisions: 8,
        ..Default::default()
    };

    let ground = block_on(build_heightmap_ground(
        &mut engine,
        &mut scene,
        &assets.loader(),
        AssetFixture::HEIGHTMAP,
        AssetFixture::GROUND,
        &extents,
    ))
    .unwrap();

    assert_eq!(scene.count(MeshKind::Ground), 1);
    let node = scene.node(ground.mesh).unwrap();
    assert!(node.receive_shadows);
    assert_eq!(node.material, Some(ground.material));

    let log = log.borrow();
    assert_eq!(log.meshes(), 1);
    assert!(log.calls.contains(&Call::Mesh {
        name: "ground".to_string(),
        triangles: 8 * 8 * 2,
    }));
    let material = log.calls.iter().find_map(|c| match c {
        Call::Material { material, .. } => Some(material.clone()),
        _ => None,
    });
    assert_eq!(material.unwrap().diffuse_texture, Some(ground.texture));
}

#[test]
fn missing_heightmap_creates_nothing() {
    let assets = AssetFixture::new("missing-heightmap");
    assets.remove(AssetFixture::HEIGHTMAP);
    let log = recording();
    let mut engine = RecordingEngine::new(&log);
    let mut scene = Scene::new();

    let result = block_on(build_heightmap_ground(
        &mut engine,
        &mut scene,
        &assets.loader(),
        AssetFixture::HEIGHTMAP,
        AssetFixture::GROUND,
        &HeightmapExtents::default(),
    ));

    match result {
        Err(Error::AssetLoad { path, .. }) => {
            assert!(path.ends_with(AssetFixture::HEIGHTMAP), "{}", path)
        }
        other => panic!("expected AssetLoad, got {:?}", other),
    }
    assert!(scene.nodes().is_empty());
    assert!(log.borrow().calls.is_empty());
}
