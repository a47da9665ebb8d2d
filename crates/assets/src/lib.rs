//! Asset loading: OBJ models through `tobj`, textures through `image`.
//!
//! Loading happens once at startup. Every failure is reported as an
//! [`AssetError`]; the demo cannot run without its visuals, so callers treat
//! these as fatal.
//!
//! # Layout
//! Paths in a [`SceneAssets`] manifest are relative to an assets root.

mod model;
mod scene;
mod texture;

pub use model::{ModelData, ModelVertex, SubMesh};
pub use scene::{LoadedModel, LoadedScene, ModelSource, SceneAssets};
pub use texture::TextureData;

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to import model {path:?}: {source}")]
    Import {
        path: PathBuf,
        source: tobj::LoadError,
    },
    #[error("failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("model {0:?} contains no geometry")]
    Empty(PathBuf),
    #[error("model {0:?} has no diffuse texture and none was configured")]
    MissingTexture(PathBuf),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
