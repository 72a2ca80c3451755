//! # symbios-flora
//!
//! An engine-agnostic crate that grows plant meshes from string-rewriting
//! L-System grammars using [glam](https://crates.io/crates/glam).
//!
//! The pipeline has three stages:
//!
//! 1. [`Grammar::derive`] expands an axiom with order-dependent production rules
//!    into a command string.
//! 2. [`PlantInterpreter::build`] walks that string with a 3D turtle, laying
//!    down tapered cylindrical segments and branch caps into a flat [`Mesh`].
//! 3. [`obj`] writes the mesh and its single [`Material`] to Wavefront OBJ/MTL
//!    and reads them back.
//!
//! [`PlantGenerator`] bundles the three for applications that keep one plant
//! around, and [`Preset`] stores grammar and parameters as JSON.
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use symbios_flora::{Grammar, Material, ModelParams, PlantInterpreter};
//!
//! let grammar = Grammar::new("F", "F:F[+F]F[-F]F", 3);
//! let interpreter = PlantInterpreter::new(ModelParams::default());
//! let mut rng = StdRng::seed_from_u64(7);
//! let plant = interpreter.build(&grammar.derive(), &Material::default(), &mut rng);
//!
//! symbios_flora::obj::save_obj("plant.obj".as_ref(), &plant.mesh, &plant.material)?;
//! # Ok::<(), symbios_flora::ObjError>(())
//! ```

pub mod error;
pub mod generator;
pub mod geometry;
pub mod grammar;
pub mod interpreter;
pub mod mesh;
pub mod obj;
pub mod params;
pub mod preset;
pub mod texture;
pub mod turtle;

pub use error::*;
pub use generator::PlantGenerator;
pub use geometry::*;
pub use grammar::*;
pub use interpreter::*;
pub use mesh::*;
pub use params::*;
pub use preset::*;
pub use texture::*;
pub use turtle::*;
