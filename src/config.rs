//! Scene and engine configuration.
//!
//! The defaults reproduce the reference scene: an orbit camera looking down on the
//! origin, one directional light with a 1024² shadow map, a 1000-unit skybox and a
//! hex column field. Both structs can be overlaid from `HEXSCAPE_*` environment
//! variables so demos can switch terrain without a rebuild.

use std::{env, f32::consts::PI, str::FromStr};

/// Resolution (width and height in texels) of the light's shadow map.
pub const SHADOW_MAP_RESOLUTION: u32 = 1024;
/// Edge length of the skybox cube in world units.
pub const SKYBOX_SIZE: f32 = 1000.0;
/// Column diameter in world units.
pub const COLUMN_DIAMETER: f32 = 1.0;
/// Number of sides of a column's cross-section.
pub const COLUMN_TESSELLATION: u32 = 6;
/// Column heights are drawn uniformly from this half-open range.
pub const COLUMN_HEIGHT_RANGE: std::ops::Range<f32> = 0.5..1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Azimuth in radians.
    pub alpha: f32,
    /// Elevation from the +y axis in radians.
    pub beta: f32,
    pub radius: f32,
    pub target: [f32; 3],
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            alpha: -PI / 2.0,
            beta: PI / 2.5,
            radius: 10.0,
            target: [0.0; 3],
            fovy_degrees: 45.0,
            znear: 0.1,
            zfar: 2000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub direction: [f32; 3],
    pub position: [f32; 3],
    pub colour: [f32; 3],
    pub intensity: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            direction: [0.0, -0.1, 0.1],
            position: [10.0, 10.0, 0.0],
            colour: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowSettings {
    pub resolution: u32,
    /// Half-size of the light's orthographic shadow frustum.
    pub ortho_extent: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            resolution: SHADOW_MAP_RESOLUTION,
            ortho_extent: 25.0,
        }
    }
}

/// Size of a heightmap ground and the elevation range its samples map to.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapExtents {
    pub width: f32,
    pub height: f32,
    pub subdivisions: u32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for HeightmapExtents {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            subdivisions: 100,
            min_height: 0.0,
            max_height: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapGround {
    pub heightmap_path: String,
    pub texture_path: String,
    pub extents: HeightmapExtents,
}

impl Default for HeightmapGround {
    fn default() -> Self {
        Self {
            heightmap_path: "textures/heightmap.png".to_string(),
            texture_path: "textures/ground.png".to_string(),
            extents: HeightmapExtents::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HexField {
    pub row_count: i32,
    pub columns_per_row: i32,
    pub origin_x: f32,
    pub origin_z: f32,
}

impl Default for HexField {
    fn default() -> Self {
        Self {
            row_count: 20,
            columns_per_row: 20,
            origin_x: 0.0,
            origin_z: 0.0,
        }
    }
}

/// Which terrain the scene is built on. The two are never combined.
#[derive(Debug, Clone, PartialEq)]
pub enum GroundStrategy {
    Heightmap(HeightmapGround),
    HexField(HexField),
}

impl Default for GroundStrategy {
    fn default() -> Self {
        GroundStrategy::HexField(HexField::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub camera: CameraRig,
    pub light: LightRig,
    pub shadows: ShadowSettings,
    pub ground: GroundStrategy,
    pub skybox_size: f32,
    /// Cube faces are loaded from `<prefix>_px.png`, `<prefix>_nx.png`, ...
    pub skybox_prefix: String,
    /// Seed for column heights. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraRig::default(),
            light: LightRig::default(),
            shadows: ShadowSettings::default(),
            ground: GroundStrategy::default(),
            skybox_size: SKYBOX_SIZE,
            skybox_prefix: "textures/skybox".to_string(),
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Defaults overlaid with `HEXSCAPE_GROUND`, `HEXSCAPE_SEED`, `HEXSCAPE_ROWS`
    /// and `HEXSCAPE_COLUMNS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        match env::var("HEXSCAPE_GROUND").as_deref() {
            Ok("heightmap") => config.ground = GroundStrategy::Heightmap(Default::default()),
            Ok("hex") | Err(_) => (),
            Ok(other) => log::warn!("Ignoring unknown HEXSCAPE_GROUND value {:?}", other),
        }
        config.seed = parse_var("HEXSCAPE_SEED").or(config.seed);
        if let GroundStrategy::HexField(field) = &mut config.ground {
            if let Some(rows) = parse_var("HEXSCAPE_ROWS") {
                field.row_count = rows;
            }
            if let Some(columns) = parse_var("HEXSCAPE_COLUMNS") {
                field.columns_per_row = columns;
            }
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub clear_colour: [f64; 4],
    pub vsync: bool,
    /// Directory (native) or URL path segment (web) that asset names resolve against.
    pub asset_root: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            clear_colour: [0.1, 0.2, 0.3, 1.0],
            vsync: true,
            asset_root: "assets".to_string(),
        }
    }
}

impl EngineOptions {
    /// Defaults overlaid with `HEXSCAPE_ASSETS`.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(root) = env::var("HEXSCAPE_ASSETS") {
            options.asset_root = root;
        }
        options
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}
