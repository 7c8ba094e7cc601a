//! Show command - print the names and labels derived from a descriptor

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::Path;
use synthpack_core::{AppIdentity, AppSpec};

pub fn run(app_path: &Path, slot: &str) -> Result<()> {
    let spec = AppSpec::from_file(app_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to load app descriptor from {}", app_path.display()))?;

    let identity = AppIdentity::new(&spec.name, &spec.version).with_slot(slot);

    println!("{}", style("Derived names").cyan().bold());
    println!("name:    {}", identity.name());
    println!("release: {}", identity.release());
    println!("appId:   {}", identity.app_id());
    println!();

    println!("{}", style("Labels").cyan().bold());
    for (key, value) in identity.labels() {
        println!("{}: {}", key, value);
    }

    Ok(())
}
