use crate::{
    data_structures::{
        model::Geometry,
        scene_graph::{Material, MaterialId, MeshId, MeshKind, MeshNode, Scene, TextureId},
    },
    engine::Engine,
    errors::Result,
    resources::AssetLoader,
};

/// A large cube around the camera, drawn from the inside with a cube texture.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyBox {
    pub mesh: MeshId,
    pub material: MaterialId,
    pub texture: TextureId,
}

/// Load the six faces at `prefix` and wrap the scene in a `size`-wide skybox.
pub async fn build_skybox<E: Engine>(
    engine: &mut E,
    scene: &mut Scene,
    assets: &AssetLoader,
    prefix: &str,
    size: f32,
) -> Result<SkyBox> {
    let faces = assets.load_cube_faces(prefix).await?;

    let texture = engine.create_cube_texture(prefix, &faces)?;
    let material = engine.create_material("skyBox", &Material::skybox(texture))?;
    let mesh = engine.create_mesh("skyBox", &Geometry::cuboid(size))?;

    let node = scene.add_node(MeshNode::new(mesh, "skyBox", MeshKind::SkyBox));
    node.material = Some(material);
    node.infinite_distance = true;

    log::info!("Skybox {} with {}px faces", prefix, faces.size());
    Ok(SkyBox {
        mesh,
        material,
        texture,
    })
}
