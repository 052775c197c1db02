//! Asset loading.
//!
//! [`AssetLoader`] resolves asset names against a root: a directory on native
//! targets, `<origin>/<root>/` over HTTP on the web. Every failure, from a missing
//! file to an undecodable image, comes back as [`Error::AssetLoad`] naming the asset.

use std::path::PathBuf;

use crate::errors::{Error, Result};

/// Face suffixes of a cube texture, in the layer order wgpu expects (+x, -x, +y, -y, +z, -z).
pub const CUBE_FACE_SUFFIXES: [&str; 6] = ["_px", "_nx", "_py", "_ny", "_pz", "_nz"];

/// The six square faces of a cube texture, in [`CUBE_FACE_SUFFIXES`] order.
#[derive(Debug, Clone)]
pub struct CubeFaces {
    pub faces: [image::RgbaImage; 6],
}

impl CubeFaces {
    /// Edge length in texels. All faces share it.
    pub fn size(&self) -> u32 {
        self.faces[0].width()
    }
}

#[derive(Debug, Clone)]
pub struct AssetLoader {
    root: PathBuf,
    extension: String,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "png".to_string(),
        }
    }

    /// File extension appended to cube face names. Defaults to `png`.
    pub fn with_cube_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    #[cfg(target_arch = "wasm32")]
    fn format_url(&self, file_name: &str) -> Result<reqwest::Url> {
        let origin = web_sys::window()
            .ok_or_else(|| Error::asset(file_name, "no browser window"))?
            .location()
            .origin()
            .map_err(|_| Error::asset(file_name, "page origin unavailable"))?;
        let base = format!("{}/{}/", origin, self.root.display());
        reqwest::Url::parse(&base)
            .and_then(|base| base.join(file_name))
            .map_err(|e| Error::asset(file_name, e))
    }

    pub async fn load_binary(&self, file_name: &str) -> Result<Vec<u8>> {
        #[cfg(target_arch = "wasm32")]
        let data = {
            let url = self.format_url(file_name)?;
            let response = reqwest::get(url)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| Error::asset(file_name, e))?;
            response
                .bytes()
                .await
                .map_err(|e| Error::asset(file_name, e))?
                .to_vec()
        };
        #[cfg(not(target_arch = "wasm32"))]
        let data = {
            let path = self.root.join(file_name);
            std::fs::read(&path).map_err(|e| Error::asset(path.display().to_string(), e))?
        };

        log::debug!("Loaded {} ({} bytes)", file_name, data.len());
        Ok(data)
    }

    pub async fn load_image(&self, file_name: &str) -> Result<image::DynamicImage> {
        let data = self.load_binary(file_name).await?;
        image::load_from_memory(&data).map_err(|e| Error::asset(file_name, e))
    }

    /// Heightmaps are sampled through their RGB channels.
    pub async fn load_heightmap(&self, file_name: &str) -> Result<image::RgbImage> {
        Ok(self.load_image(file_name).await?.to_rgb8())
    }

    /// Load `<prefix>_px.<ext>` and its five siblings. Faces must be square and
    /// equally sized.
    pub async fn load_cube_faces(&self, prefix: &str) -> Result<CubeFaces> {
        let mut faces = Vec::with_capacity(CUBE_FACE_SUFFIXES.len());
        for suffix in CUBE_FACE_SUFFIXES {
            let name = format!("{}{}.{}", prefix, suffix, self.extension);
            let face = self.load_image(&name).await?.to_rgba8();
            if face.width() != face.height() {
                return Err(Error::asset(
                    name,
                    format!("cube face is {}x{}, expected a square", face.width(), face.height()),
                ));
            }
            let expected = faces.first().map_or(face.width(), |f: &image::RgbaImage| f.width());
            if face.width() != expected {
                return Err(Error::asset(
                    name,
                    format!("cube face is {} texels wide, expected {}", face.width(), expected),
                ));
            }
            faces.push(face);
        }
        let faces: [image::RgbaImage; 6] = faces
            .try_into()
            .map_err(|_| Error::asset(prefix, "expected six cube faces"))?;
        Ok(CubeFaces { faces })
    }
}
