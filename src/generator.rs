//! Session-level facade: one grammar, one parameter set, one selected
//! texture and the most recent plant.

use crate::error::{ObjResult, PresetResult};
use crate::grammar::Grammar;
use crate::interpreter::{PlantInterpreter, PlantModel};
use crate::mesh::{Material, TextureRef};
use crate::obj;
use crate::params::ModelParams;
use crate::preset::Preset;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// Owns the editable state of a plant and the model generated from it.
pub struct PlantGenerator {
    pub grammar: Grammar,
    pub params: ModelParams,
    /// Texture applied on the next [`generate`](Self::generate); `None` means
    /// the default solid material.
    pub texture: Option<TextureRef>,
    rng: StdRng,
    model: Option<PlantModel>,
}

impl Default for PlantGenerator {
    fn default() -> Self {
        Self::new(Grammar::default(), ModelParams::default())
    }
}

impl PlantGenerator {
    /// Creates a generator seeded from system entropy.
    pub fn new(grammar: Grammar, params: ModelParams) -> Self {
        Self::with_rng(grammar, params, StdRng::from_entropy())
    }

    /// Creates a generator whose builds are reproducible for a given seed.
    pub fn seeded(grammar: Grammar, params: ModelParams, seed: u64) -> Self {
        Self::with_rng(grammar, params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grammar: Grammar, params: ModelParams, rng: StdRng) -> Self {
        Self {
            grammar,
            params,
            texture: None,
            rng,
            model: None,
        }
    }

    /// Reseeds the random source used for turn angles.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn material(&self) -> Material {
        Material::from_texture(self.texture.clone())
    }

    /// The current plant, if one has been generated or imported.
    pub fn model(&self) -> Option<&PlantModel> {
        self.model.as_ref()
    }

    /// Derives the command string and builds a fresh plant from it.
    pub fn generate(&mut self) -> &PlantModel {
        let commands = self.grammar.derive();
        let interpreter = PlantInterpreter::new(self.params.clone());
        let model = interpreter.build(&commands, &self.material(), &mut self.rng);
        self.model.insert(model)
    }

    /// Drops the current plant.
    pub fn reset(&mut self) {
        self.model = None;
    }

    /// Writes the current plant to `path` and its `.mtl` companion.
    ///
    /// Returns `Ok(None)` when there is nothing to export.
    pub fn export(&self, path: &Path) -> ObjResult<Option<PathBuf>> {
        let Some(model) = &self.model else {
            log::warn!("nothing to export; generate a plant first");
            return Ok(None);
        };
        obj::save_obj(path, &model.mesh, &model.material).map(Some)
    }

    /// Replaces the current plant with the one stored at `path`.
    ///
    /// On failure the current plant is left untouched.
    pub fn import(&mut self, path: &Path) -> ObjResult<&PlantModel> {
        let model = obj::load_obj(path)?;
        Ok(self.model.insert(model))
    }

    pub fn save_preset(&self, path: &Path) -> PresetResult<()> {
        Preset::capture(&self.grammar, &self.params).save(path)
    }

    /// Loads a preset into the grammar and parameters. On failure neither is
    /// modified.
    pub fn load_preset(&mut self, path: &Path) -> PresetResult<()> {
        let preset = Preset::load(path)?;
        preset.apply(&mut self.grammar, &mut self.params);
        Ok(())
    }
}
