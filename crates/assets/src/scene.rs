use crate::{AssetError, ModelData, TextureData};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where one model and its texture live, relative to the assets root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSource {
    pub model: PathBuf,
    /// Overrides the texture named by the model's material.
    #[serde(default)]
    pub texture: Option<PathBuf>,
}

impl ModelSource {
    pub fn new(model: impl Into<PathBuf>, texture: Option<PathBuf>) -> Self {
        Self {
            model: model.into(),
            texture,
        }
    }

    /// Import the model and decode its texture.
    pub fn load(&self, root: &Path) -> Result<LoadedModel, AssetError> {
        let model_path = root.join(&self.model);
        let data = ModelData::load(&model_path)?;
        let texture_path = match (&self.texture, &data.diffuse_texture) {
            (Some(explicit), _) => root.join(explicit),
            (None, Some(from_material)) => from_material.clone(),
            (None, None) => return Err(AssetError::MissingTexture(model_path)),
        };
        let texture = TextureData::load(&texture_path)?;
        tracing::info!(
            "loaded {} with texture {}",
            model_path.display(),
            texture_path.display()
        );
        Ok(LoadedModel { data, texture })
    }
}

/// Manifest of every model the scene draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAssets {
    pub terrain: ModelSource,
    pub fish: ModelSource,
    pub shark: ModelSource,
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self {
            terrain: ModelSource::new("model/terrain/ShangGu.obj", None),
            fish: ModelSource::new("model/fish/fish.obj", None),
            shark: ModelSource::new(
                "model/fish/shark.obj",
                Some(PathBuf::from("model/fish/shark.jpg")),
            ),
        }
    }
}

/// A model plus its decoded texture.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub data: ModelData,
    pub texture: TextureData,
}

/// Everything the renderer needs at startup.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub terrain: LoadedModel,
    pub fish: LoadedModel,
    pub shark: LoadedModel,
}

impl SceneAssets {
    /// Read a manifest from JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Load every model. The first failure aborts the whole load.
    pub fn load(&self, root: impl AsRef<Path>) -> Result<LoadedScene, AssetError> {
        let root = root.as_ref();
        Ok(LoadedScene {
            terrain: self.terrain.load(root)?,
            fish: self.fish.load(root)?,
            shark: self.shark.load(root)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TRI: &str = "mtllib tri.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nusemtl a\nf 1/1 2/2 3/3\n";

    fn write_model(dir: &Path, name: &str, with_material: bool) {
        fs::write(dir.join(format!("{name}.obj")), TRI.replace("tri.mtl", &format!("{name}.mtl")))
            .unwrap();
        if with_material {
            fs::write(dir.join(format!("{name}.mtl")), format!("newmtl a\nmap_Kd {name}.png\n"))
                .unwrap();
            image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]))
                .save(dir.join(format!("{name}.png")))
                .unwrap();
        }
    }

    #[test]
    fn texture_from_material() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), "fish", true);

        let loaded = ModelSource::new("fish.obj", None).load(dir.path()).unwrap();
        assert_eq!(loaded.data.vertex_count(), 3);
        assert_eq!(loaded.texture.rgba, vec![1, 2, 3, 4]);
    }

    #[test]
    fn explicit_texture_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), "shark", false);
        image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]))
            .save(dir.path().join("skin.png"))
            .unwrap();

        let source = ModelSource::new("shark.obj", Some(PathBuf::from("skin.png")));
        let loaded = source.load(dir.path()).unwrap();
        assert_eq!(loaded.texture.width, 2);
    }

    #[test]
    fn no_texture_anywhere_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), "terrain", false);
        let err = ModelSource::new("terrain.obj", None)
            .load(dir.path())
            .unwrap_err();
        assert!(matches!(err, AssetError::MissingTexture(_)));
    }

    #[test]
    fn scene_load_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), "terrain", true);
        let scene = SceneAssets {
            terrain: ModelSource::new("terrain.obj", None),
            fish: ModelSource::new("missing.obj", None),
            shark: ModelSource::new("terrain.obj", None),
        };
        assert!(matches!(
            scene.load(dir.path()),
            Err(AssetError::Import { .. })
        ));
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(&path, serde_json::to_string(&SceneAssets::default()).unwrap()).unwrap();
        assert_eq!(SceneAssets::from_file(&path).unwrap(), SceneAssets::default());
    }
}
