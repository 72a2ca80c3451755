//! Command-line plant generator.
//!
//! ```text
//! flora <preset.json> <output.obj> [seed]
//! ```
//!
//! Loads a preset, grows the plant and writes `<output>.obj` plus
//! `<output>.mtl`. Set `RUST_LOG=debug` for build statistics.

use std::path::PathBuf;
use std::process::ExitCode;
use symbios_flora::PlantGenerator;

fn usage() -> ExitCode {
    eprintln!("usage: flora <preset.json> <output.obj> [seed]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (preset, output) = match args.as_slice() {
        [preset, output] | [preset, output, _] => (PathBuf::from(preset), PathBuf::from(output)),
        _ => return usage(),
    };

    let mut generator = PlantGenerator::default();
    if let Some(seed) = args.get(2) {
        match seed.parse::<u64>() {
            Ok(seed) => generator.reseed(seed),
            Err(_) => return usage(),
        }
    }

    if let Err(e) = generator.load_preset(&preset) {
        log::error!("failed to load {}: {}", preset.display(), e);
        return ExitCode::FAILURE;
    }

    let stats = generator.generate().stats;
    log::info!(
        "grew {} segments and {} caps (depth {})",
        stats.segments,
        stats.caps,
        stats.max_depth
    );

    match generator.export(&output) {
        Ok(Some(mtl)) => {
            log::info!("wrote {} and {}", output.display(), mtl.display());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("failed to write {}: {}", output.display(), e);
            ExitCode::FAILURE
        }
    }
}
