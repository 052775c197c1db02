//! Error types.
//!
//! Every fallible operation of the crate returns [`Result<T>`]. Scene assembly wraps
//! the first failure it hits in [`Error::SceneAssembly`] together with the
//! [`AssemblyStep`] that was running, so callers can both report the step and match
//! on the underlying cause via [`Error::root_cause`].

use std::fmt;

use thiserror::Error;

/// Fixed steps of scene assembly, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblyStep {
    Camera,
    Light,
    ShadowGenerator,
    Terrain,
    SkyBox,
}

impl fmt::Display for AssemblyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblyStep::Camera => "camera",
            AssemblyStep::Light => "light",
            AssemblyStep::ShadowGenerator => "shadow generator",
            AssemblyStep::Terrain => "terrain",
            AssemblyStep::SkyBox => "skybox",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed parameters, e.g. negative layout counts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A texture, heightmap or cube-map face could not be read or decoded.
    #[error("Failed to load asset {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    /// Scene assembly stopped at `step`.
    #[error("Scene assembly failed at the {step} step: {source}")]
    SceneAssembly {
        step: AssemblyStep,
        #[source]
        source: Box<Error>,
    },

    /// The rendering engine refused an operation.
    #[error("Engine error: {0}")]
    Engine(String),

    /// The render loop may only start once the camera receives input.
    #[error("Camera must be attached to the surface before rendering starts")]
    CameraDetached,
}

impl Error {
    pub(crate) fn asset(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn at(step: AssemblyStep) -> impl FnOnce(Error) -> Error {
        move |source| Error::SceneAssembly {
            step,
            source: Box::new(source),
        }
    }

    /// The innermost error below any `SceneAssembly` wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::SceneAssembly { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The step that failed, when this error came out of scene assembly.
    pub fn failed_step(&self) -> Option<AssemblyStep> {
        match self {
            Error::SceneAssembly { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
