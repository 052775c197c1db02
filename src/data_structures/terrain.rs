//! Terrain construction.
//!
//! A scene stands on exactly one [`Ground`]: either a single heightmap-displaced
//! mesh or a field of hexagonal columns. Both builders create their meshes through
//! the [`Engine`], add them to the [`Scene`] and mark them to receive shadows. The
//! column builder also registers every column with the shadow generator it is
//! handed, so it cannot run before one exists.

use cgmath::Vector3;
use rand::RngExt;

use crate::{
    config::{COLUMN_DIAMETER, COLUMN_HEIGHT_RANGE, COLUMN_TESSELLATION, HeightmapExtents},
    data_structures::{
        instance::Instance,
        model::Geometry,
        scene_graph::{Material, MaterialId, MeshId, MeshKind, MeshNode, Scene, TextureId},
        shadow::ShadowGenerator,
    },
    engine::Engine,
    errors::Result,
    layout::LayoutPoint,
    resources::AssetLoader,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GroundMesh {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub texture: TextureId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub mesh: MeshId,
    pub height: f32,
    /// Centre of the column; `y` is always half its height so it rests on y = 0.
    pub position: Vector3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ground {
    Heightmap(GroundMesh),
    Columns(Vec<Column>),
}

impl Ground {
    pub fn mesh_count(&self) -> usize {
        match self {
            Ground::Heightmap(_) => 1,
            Ground::Columns(columns) => columns.len(),
        }
    }
}

/// Build a textured ground displaced by `heightmap_path`.
///
/// Both images are loaded before anything is created, so a missing asset leaves
/// the engine and the scene untouched.
pub async fn build_heightmap_ground<E: Engine>(
    engine: &mut E,
    scene: &mut Scene,
    assets: &AssetLoader,
    heightmap_path: &str,
    texture_path: &str,
    extents: &HeightmapExtents,
) -> Result<GroundMesh> {
    let heightmap = assets.load_heightmap(heightmap_path).await?;
    let diffuse = assets.load_image(texture_path).await?.to_rgba8();

    let geometry = Geometry::ground_from_heightmap(
        &heightmap,
        extents.width,
        extents.height,
        extents.subdivisions,
        extents.min_height,
        extents.max_height,
    )?;

    let texture = engine.create_texture(texture_path, &diffuse)?;
    let material = engine.create_material("ground", &Material::textured(texture))?;
    let mesh = engine.create_mesh("ground", &geometry)?;

    let node = scene.add_node(MeshNode::new(mesh, "ground", MeshKind::Ground));
    node.material = Some(material);
    node.receive_shadows = true;

    log::info!(
        "Heightmap ground {}x{} with {} triangles",
        extents.width,
        extents.height,
        geometry.triangle_count()
    );
    Ok(GroundMesh {
        mesh,
        material,
        texture,
    })
}

/// Raise one hexagonal column per layout point, each with a random height drawn
/// from `rng`, and register all of them as shadow casters.
pub fn build_hex_column_field<E: Engine, R: RngExt>(
    engine: &mut E,
    scene: &mut Scene,
    shadow_generator: &mut ShadowGenerator,
    layout: &[LayoutPoint],
    rng: &mut R,
) -> Result<Vec<Column>> {
    if layout.is_empty() {
        log::warn!("Empty hex layout, no columns built");
        return Ok(Vec::new());
    }

    let material = engine.create_material("column", &Material::default())?;
    let mut columns = Vec::with_capacity(layout.len());

    for (i, point) in layout.iter().enumerate() {
        let height: f32 = rng.random_range(COLUMN_HEIGHT_RANGE);
        let geometry = Geometry::cylinder(COLUMN_DIAMETER, height, COLUMN_TESSELLATION)?;
        let name = format!("column_{}", i);
        let mesh = engine.create_mesh(&name, &geometry)?;

        let position = Vector3::new(point.x, height / 2.0, point.z);
        let node = scene.add_node(MeshNode::new(mesh, name, MeshKind::Column));
        node.transform = Instance::from(position);
        node.material = Some(material);
        node.receive_shadows = true;

        shadow_generator.add_shadow_caster(mesh);
        columns.push(Column {
            mesh,
            height,
            position,
        });
    }

    log::debug!(
        "Built {} columns, {} shadow casters registered",
        columns.len(),
        shadow_generator.caster_count()
    );
    Ok(columns)
}
