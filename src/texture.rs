//! Texture provider interface.
//!
//! Discovering, importing and deleting texture files is left to the host
//! application. The generator only needs a list of selectable textures and a
//! way to fetch image bytes for one of them.

use crate::mesh::TextureRef;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

/// Source of selectable textures.
pub trait TextureProvider {
    /// All available textures, in display order.
    fn textures(&self) -> Vec<TextureRef>;

    /// Raw encoded image data for the texture called `name`.
    fn image_bytes(&self, name: &str) -> io::Result<Vec<u8>>;

    fn find(&self, name: &str) -> Option<TextureRef> {
        self.textures().into_iter().find(|t| t.name == name)
    }
}

/// Provider backed by images held in memory, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTextures {
    entries: BTreeMap<String, (PathBuf, Vec<u8>)>,
}

impl InMemoryTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a texture.
    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.entries.insert(name.into(), (path.into(), bytes));
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }
}

impl TextureProvider for InMemoryTextures {
    fn textures(&self) -> Vec<TextureRef> {
        self.entries
            .iter()
            .map(|(name, (path, _))| TextureRef::new(name.clone(), path.clone()))
            .collect()
    }

    fn image_bytes(&self, name: &str) -> io::Result<Vec<u8>> {
        self.entries
            .get(name)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no texture '{name}'")))
    }
}
