//! Flat triangle mesh and the single material it is rendered with.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Material name written to OBJ/MTL files when no texture is selected.
pub const DEFAULT_MATERIAL_NAME: &str = "default_grey";

/// Diffuse color of the default solid material (light grey).
pub const DEFAULT_DIFFUSE: Vec3 = Vec3::new(0.8, 0.8, 0.8);

/// An engine-agnostic triangle list.
///
/// Vertices are never shared: every triangle appends three fresh positions,
/// so triangle `t` always uses vertices `3t`, `3t + 1` and `3t + 2`. The OBJ
/// writer relies on this ordering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Vec3>,

    /// Either empty or one entry per position.
    pub tex_coords: Vec<Vec2>,

    /// Triangle list; length is always a multiple of 3.
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty()
    }

    /// Iterates over the triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// True when the index buffer is a whole number of triangles and every
    /// index refers to an existing position.
    pub fn is_valid(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.positions.len())
    }
}

/// Accumulates triangles in creation order and hands back a finished [`Mesh`].
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_indices(&mut self) {
        let index = self.mesh.positions.len() as u32;
        self.mesh
            .indices
            .extend_from_slice(&[index, index + 1, index + 2]);
    }

    /// Appends one untextured triangle.
    pub fn add_triangle(&mut self, corners: [Vec3; 3]) {
        self.push_indices();
        self.mesh.positions.extend_from_slice(&corners);
    }

    /// Appends one triangle together with its texture coordinates.
    pub fn add_textured_triangle(&mut self, corners: [Vec3; 3], uvs: [Vec2; 3]) {
        self.push_indices();
        self.mesh.positions.extend_from_slice(&corners);
        self.mesh.tex_coords.extend_from_slice(&uvs);
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    pub fn build(self) -> Mesh {
        self.mesh
    }
}

/// Names longer than this are shortened by [`TextureRef::short_name`].
const SHORT_NAME_LIMIT: usize = 7;

/// A texture image referenced by path, with a display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    pub name: String,
    pub path: PathBuf,
}

impl TextureRef {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Builds a reference named after the file name of `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    /// Compact label for tight UI slots: the first four characters followed
    /// by `...` when the name is longer than seven characters.
    pub fn short_name(&self) -> String {
        if self.name.chars().count() > SHORT_NAME_LIMIT {
            let head: String = self.name.chars().take(4).collect();
            format!("{head}...")
        } else {
            self.name.clone()
        }
    }
}

/// The one diffuse material applied to a whole plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Material {
    /// Flat diffuse color (linear RGB, 0..1).
    Solid(Vec3),
    /// Single diffuse texture image.
    Texture(TextureRef),
}

impl Default for Material {
    fn default() -> Self {
        Self::Solid(DEFAULT_DIFFUSE)
    }
}

impl Material {
    pub fn from_texture(texture: Option<TextureRef>) -> Self {
        texture.map_or_else(Self::default, Self::Texture)
    }

    pub fn texture(&self) -> Option<&TextureRef> {
        match self {
            Self::Texture(t) => Some(t),
            Self::Solid(_) => None,
        }
    }

    pub fn is_textured(&self) -> bool {
        matches!(self, Self::Texture(_))
    }

    /// True for the untextured default grey.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Solid(color) if *color == DEFAULT_DIFFUSE)
    }
}
