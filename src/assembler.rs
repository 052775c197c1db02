//! Scene assembly.
//!
//! [`assemble_scene`] wires a complete scene in a fixed order: camera, light,
//! shadow generator, terrain, skybox. Each step only gets what earlier steps
//! produced, so e.g. the column field can never be built before the shadow
//! generator it registers casters with. The first failure aborts assembly and is
//! returned wrapped in [`Error::SceneAssembly`] with the step that failed.
//! Resources created before the failure are left to the engine's disposal.

use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::{
    camera::OrbitCamera,
    config::{GroundStrategy, SceneConfig},
    data_structures::{
        light::DirectionalLight,
        scene_graph::Scene,
        shadow::ShadowGenerator,
        skybox::build_skybox,
        terrain::{Ground, build_heightmap_ground, build_hex_column_field},
    },
    engine::Engine,
    errors::{AssemblyStep, Error, Result},
    layout::generate_layout,
    resources::AssetLoader,
};

/// The random source for column heights. Without a configured seed a fresh one is
/// drawn and logged so a run can be reproduced.
pub fn scene_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| {
        let seed = rand::random();
        log::info!("Terrain seed {} (set HEXSCAPE_SEED to reproduce)", seed);
        seed
    });
    StdRng::seed_from_u64(seed)
}

pub async fn assemble_scene<E: Engine, R: RngExt>(
    engine: &mut E,
    assets: &AssetLoader,
    config: &SceneConfig,
    rng: &mut R,
) -> Result<Scene> {
    log::info!("Assembling scene");
    let mut scene = Scene::new();

    log::info!("Creating camera");
    let camera = scene.set_camera(OrbitCamera::from_rig(&config.camera));
    engine.create_camera(camera).map_err(Error::at(AssemblyStep::Camera))?;
    engine.attach_control(camera).map_err(Error::at(AssemblyStep::Camera))?;

    log::info!("Creating light");
    let mut light = DirectionalLight::new("dir01", config.light.direction, config.light.position);
    light.colour = config.light.colour;
    light.intensity = config.light.intensity;
    let light = scene.set_light(light);
    engine.create_light(light).map_err(Error::at(AssemblyStep::Light))?;

    log::info!("Creating {}px shadow generator", config.shadows.resolution);
    let mut shadow_generator = ShadowGenerator::new(config.shadows.resolution, light)
        .with_ortho_extent(config.shadows.ortho_extent);
    engine
        .create_shadow_generator(&shadow_generator)
        .map_err(Error::at(AssemblyStep::ShadowGenerator))?;

    let ground = match &config.ground {
        GroundStrategy::Heightmap(ground) => {
            log::info!("Building heightmap ground from {}", ground.heightmap_path);
            build_heightmap_ground(
                engine,
                &mut scene,
                assets,
                &ground.heightmap_path,
                &ground.texture_path,
                &ground.extents,
            )
            .await
            .map(Ground::Heightmap)
        }
        GroundStrategy::HexField(field) => {
            log::info!(
                "Building {}x{} hex column field",
                field.row_count,
                field.columns_per_row
            );
            generate_layout(
                field.row_count,
                field.columns_per_row,
                field.origin_x,
                field.origin_z,
            )
            .and_then(|layout| {
                build_hex_column_field(engine, &mut scene, &mut shadow_generator, &layout, rng)
            })
            .map(Ground::Columns)
        }
    }
    .map_err(Error::at(AssemblyStep::Terrain))?;
    log::info!(
        "Ground ready: {} meshes, {} shadow casters",
        ground.mesh_count(),
        shadow_generator.caster_count()
    );
    scene.set_shadow_generator(shadow_generator);

    log::info!("Building skybox from {}", config.skybox_prefix);
    build_skybox(engine, &mut scene, assets, &config.skybox_prefix, config.skybox_size)
        .await
        .map_err(Error::at(AssemblyStep::SkyBox))?;

    log::info!("Scene assembled with {} meshes", scene.nodes().len());
    Ok(scene)
}
