#![allow(dead_code)]

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
    sync::atomic::{AtomicU32, Ordering},
};

use hexscape::{
    Engine, EngineOptions, Error, Result,
    camera::OrbitCamera,
    data_structures::{
        light::DirectionalLight,
        model::Geometry,
        scene_graph::{Material, MaterialId, MeshId, Scene, TextureId},
        shadow::ShadowGenerator,
    },
    resources::{AssetLoader, CubeFaces},
};

/// One call made through the [`Engine`] trait.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create,
    Mesh { name: String, triangles: usize },
    Texture { name: String },
    CubeTexture { name: String, size: u32 },
    Material { name: String, material: Material },
    Camera,
    AttachControl,
    Light { name: String },
    ShadowGenerator { resolution: u32, light: String },
    Render { nodes: usize },
    Resize { width: u32, height: u32 },
    Dispose,
}

#[derive(Debug, Default)]
pub struct Recording {
    pub calls: Vec<Call>,
    /// Calls of this kind fail with `Error::Engine`.
    pub fail_on: Option<&'static str>,
    /// `attach_control` is recorded but leaves the camera without input.
    pub ignore_attach: bool,
}

impl Recording {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }

    pub fn meshes(&self) -> usize {
        self.count(|c| matches!(c, Call::Mesh { .. }))
    }

    pub fn resizes(&self) -> usize {
        self.count(|c| matches!(c, Call::Resize { .. }))
    }

    pub fn renders(&self) -> usize {
        self.count(|c| matches!(c, Call::Render { .. }))
    }

    pub fn disposals(&self) -> usize {
        self.count(|c| matches!(c, Call::Dispose))
    }
}

/// Handle to a recording shared between a test and the engine it created.
pub type SharedRecording = Rc<RefCell<Recording>>;

pub fn recording() -> SharedRecording {
    Rc::new(RefCell::new(Recording::default()))
}

/// An engine that draws nothing and remembers every call.
pub struct RecordingEngine {
    log: SharedRecording,
    next_id: u32,
}

impl RecordingEngine {
    pub fn new(log: &SharedRecording) -> Self {
        Self {
            log: log.clone(),
            next_id: 0,
        }
    }

    fn record(&mut self, kind: &'static str, call: Call) -> Result<u32> {
        let mut log = self.log.borrow_mut();
        if log.fail_on == Some(kind) {
            return Err(Error::Engine(format!("{} refused", kind)));
        }
        log.calls.push(call);
        self.next_id += 1;
        Ok(self.next_id)
    }
}

impl Engine for RecordingEngine {
    type Surface = SharedRecording;

    async fn create(surface: SharedRecording, _options: &EngineOptions) -> Result<Self> {
        let mut engine = RecordingEngine::new(&surface);
        engine.record("create", Call::Create)?;
        Ok(engine)
    }

    fn create_mesh(&mut self, name: &str, geometry: &Geometry) -> Result<MeshId> {
        let call = Call::Mesh {
            name: name.to_string(),
            triangles: geometry.triangle_count(),
        };
        self.record("mesh", call).map(MeshId)
    }

    fn create_texture(&mut self, name: &str, _image: &image::RgbaImage) -> Result<TextureId> {
        let call = Call::Texture {
            name: name.to_string(),
        };
        self.record("texture", call).map(TextureId)
    }

    fn create_cube_texture(&mut self, name: &str, faces: &CubeFaces) -> Result<TextureId> {
        let call = Call::CubeTexture {
            name: name.to_string(),
            size: faces.size(),
        };
        self.record("cube_texture", call).map(TextureId)
    }

    fn create_material(&mut self, name: &str, material: &Material) -> Result<MaterialId> {
        let call = Call::Material {
            name: name.to_string(),
            material: material.clone(),
        };
        self.record("material", call).map(MaterialId)
    }

    fn create_camera(&mut self, _camera: &OrbitCamera) -> Result<()> {
        self.record("camera", Call::Camera).map(drop)
    }

    fn attach_control(&mut self, camera: &mut OrbitCamera) -> Result<()> {
        self.record("attach_control", Call::AttachControl)?;
        if !self.log.borrow().ignore_attach {
            camera.attach_control();
        }
        Ok(())
    }

    fn create_light(&mut self, light: &DirectionalLight) -> Result<()> {
        let call = Call::Light {
            name: light.name.clone(),
        };
        self.record("light", call).map(drop)
    }

    fn create_shadow_generator(&mut self, generator: &ShadowGenerator) -> Result<()> {
        let call = Call::ShadowGenerator {
            resolution: generator.resolution(),
            light: generator.light_name().to_string(),
        };
        self.record("shadow_generator", call).map(drop)
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        let call = Call::Render {
            nodes: scene.nodes().len(),
        };
        self.record("render", call).map(drop)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().calls.push(Call::Resize { width, height });
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().calls.push(Call::Dispose);
    }
}

/// A throwaway asset directory with a heightmap, a ground texture and skybox faces.
pub struct AssetFixture {
    pub root: PathBuf,
}

impl AssetFixture {
    pub const HEIGHTMAP: &'static str = "heightmap.png";
    pub const GROUND: &'static str = "ground.png";
    pub const SKYBOX: &'static str = "sky";

    pub fn new(name: &str) -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let root = std::env::temp_dir().join(format!(
            "hexscape-{}-{}-{}",
            name,
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&root).unwrap();

        let heightmap = image::RgbImage::from_fn(16, 16, |x, _| {
            let v = (x * 255 / 15) as u8;
            image::Rgb([v, v, v])
        });
        heightmap.save(root.join(Self::HEIGHTMAP)).unwrap();

        let ground = image::RgbImage::from_pixel(4, 4, image::Rgb([90, 120, 60]));
        ground.save(root.join(Self::GROUND)).unwrap();

        for suffix in hexscape::resources::CUBE_FACE_SUFFIXES {
            let face = image::RgbImage::from_pixel(8, 8, image::Rgb([120, 170, 235]));
            face.save(root.join(format!("{}{}.png", Self::SKYBOX, suffix))).unwrap();
        }

        Self { root }
    }

    pub fn loader(&self) -> AssetLoader {
        AssetLoader::new(&self.root)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.path(name)).unwrap();
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            asset_root: self.root.display().to_string(),
            ..Default::default()
        }
    }
}

impl Drop for AssetFixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Scene config pointing at the fixture's files, with a fixed seed.
pub fn fixture_config(ground: hexscape::GroundStrategy) -> hexscape::SceneConfig {
    hexscape::SceneConfig {
        ground,
        skybox_prefix: AssetFixture::SKYBOX.to_string(),
        seed: Some(42),
        ..Default::default()
    }
}

pub fn heightmap_ground() -> hexscape::GroundStrategy {
    hexscape::GroundStrategy::Heightmap(hexscape::config::HeightmapGround {
        heightmap_path: AssetFixture::HEIGHTMAP.to_string(),
        texture_path: AssetFixture::GROUND.to_string(),
        extents: hexscape::config::HeightmapExtents {
            subdivisions: 8,
            ..Default::default()
        },
    })
}

pub fn hex_ground(rows: i32, columns: i32) -> hexscape::GroundStrategy {
    hexscape::GroundStrategy::HexField(hexscape::config::HexField {
        row_count: rows,
        columns_per_row: columns,
        ..Default::default()
    })
}
