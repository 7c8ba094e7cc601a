//! Render command - compile a descriptor into Kubernetes manifests

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs;
use std::path::Path;
use synthpack_core::{AppSpec, SynthOptions};

pub fn run(
    app_path: &Path,
    slot: &str,
    max_name_length: usize,
    output_dir: Option<&Path>,
    debug: bool,
) -> Result<()> {
    let spec = AppSpec::from_file(app_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to load app descriptor from {}", app_path.display()))?;

    if debug {
        eprintln!(
            "{} Loaded app: {} v{}",
            style("DEBUG").dim(),
            spec.name,
            spec.version
        );
    }

    let options = SynthOptions {
        slot: slot.to_string(),
        max_len: max_name_length,
    };
    let graph = synthpack_core::synth(&spec, &options)
        .into_diagnostic()
        .wrap_err("Failed to synthesize application")?;

    if debug {
        eprintln!(
            "{} Synthesized {} object(s)",
            style("DEBUG").dim(),
            graph.len()
        );
    }

    match output_dir {
        Some(output_path) => {
            fs::create_dir_all(output_path)
                .into_diagnostic()
                .wrap_err_with(|| {
                    format!("Failed to create output directory: {}", output_path.display())
                })?;

            for object in graph.iter() {
                let file_name = format!("{}-{}.yaml", object.kind().to_lowercase(), object.name());
                let yaml = serde_yaml::to_string(object)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to serialize {}", object.name()))?;

                let path = output_path.join(&file_name);
                fs::write(&path, format!("---\n{}", yaml))
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

                if debug {
                    eprintln!("{} Wrote {}", style("DEBUG").dim(), path.display());
                }
            }
            println!(
                "Wrote {} manifest(s) to {}",
                graph.len(),
                output_path.display()
            );
        }
        None => {
            let yaml = graph
                .to_yaml()
                .into_diagnostic()
                .wrap_err("Failed to render manifests")?;
            print!("{}", yaml);
        }
    }

    Ok(())
}
