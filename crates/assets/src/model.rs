use crate::AssetError;
use std::path::{Path, PathBuf};

/// Geometry of one submesh, flattened to one entry per triangle corner.
///
/// `normals` and `tex_coords` are empty when the source file has none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubMesh {
    pub id: u32,
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
}

impl SubMesh {
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }
}

/// Interleaved vertex ready for upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub mesh_id: u32,
}

/// A triangulated model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub submeshes: Vec<SubMesh>,
    /// Diffuse texture named by the first material, resolved against the
    /// model's directory.
    pub diffuse_texture: Option<PathBuf>,
}

impl ModelData {
    /// Import an OBJ file, triangulated and de-indexed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, materials) =
            tobj::load_obj(path, &options).map_err(|source| AssetError::Import {
                path: path.to_path_buf(),
                source,
            })?;

        // A missing .mtl only costs us the texture hint.
        let materials = materials.unwrap_or_else(|e| {
            tracing::debug!("no materials for {}: {e}", path.display());
            Vec::new()
        });
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let diffuse_texture = materials
            .iter()
            .find_map(|m| m.diffuse_texture.as_deref())
            .filter(|name| !name.is_empty())
            .map(|name| base.join(name));

        let submeshes: Vec<SubMesh> = models
            .iter()
            .enumerate()
            .map(|(i, model)| flatten(i as u32, model))
            .collect();

        let data = Self {
            submeshes,
            diffuse_texture,
        };
        if data.vertex_count() == 0 {
            return Err(AssetError::Empty(path.to_path_buf()));
        }

        tracing::debug!(
            "imported {} ({} submeshes, {} vertices)",
            path.display(),
            data.submeshes.len(),
            data.vertex_count()
        );
        Ok(data)
    }

    pub fn vertex_count(&self) -> usize {
        self.submeshes.iter().map(|m| m.positions.len()).sum()
    }

    /// Interleave every submesh. Missing normals and UVs become zeros.
    pub fn vertices(&self) -> Vec<ModelVertex> {
        let mut out = Vec::with_capacity(self.vertex_count());
        for mesh in &self.submeshes {
            for (i, position) in mesh.positions.iter().enumerate() {
                out.push(ModelVertex {
                    position: *position,
                    normal: mesh.normals.get(i).copied().unwrap_or_default(),
                    tex_coord: mesh.tex_coords.get(i).copied().unwrap_or_default(),
                    mesh_id: mesh.id,
                });
            }
        }
        out
    }
}

fn flatten(id: u32, model: &tobj::Model) -> SubMesh {
    let mesh = &model.mesh;
    let has_normals = !mesh.normals.is_empty();
    let has_uvs = !mesh.texcoords.is_empty();

    let mut sub = SubMesh {
        id,
        name: model.name.clone(),
        ..SubMesh::default()
    };
    for &index in &mesh.indices {
        let i = index as usize;
        sub.positions.push([
            mesh.positions[3 * i],
            mesh.positions[3 * i + 1],
            mesh.positions[3 * i + 2],
        ]);
        if has_normals {
            sub.normals
                .push([mesh.normals[3 * i], mesh.normals[3 * i + 1], mesh.normals[3 * i + 2]]);
        }
        if has_uvs {
            sub.tex_coords
                .push([mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]]);
        }
    }
    sub
}
