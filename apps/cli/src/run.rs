use crate::args::{Cli, STDIN};
use anyhow::{Context, Result};
use mgen::kernel::config::load_catalog;
use mgen::{GenerateRequest, generate};
use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use tracing::{info, warn};

/// Runs the pipeline and returns the serialized matrix document.
pub fn run(cli: &Cli) -> Result<String> {
    let inputs = read_inputs(&cli.input)?;
    let manifest = read_manifest(&cli.project_root.join(&cli.manifest))?;
    let branches = cli
        .branches
        .as_deref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Reading branches from {}", path.display()))
        })
        .transpose()?;
    let catalog = load_catalog(cli.catalog.as_deref()).context("Catalog is malformed")?;

    let project_root = (!cli.no_scan).then_some(cli.project_root.as_path());
    let request = GenerateRequest::from_documents(
        &inputs,
        manifest.as_deref(),
        branches.as_deref(),
        project_root,
    )?;
    let matrix = generate(&request, &catalog)?;
    info!(jobs = matrix.len(), "Matrix generated");

    let json = if cli.pretty {
        serde_json::to_string_pretty(&matrix)?
    } else {
        serde_json::to_string(&matrix)?
    };
    Ok(json)
}

fn read_inputs(source: &str) -> Result<String> {
    if source == STDIN {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("Reading inputs from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(source).with_context(|| format!("Reading inputs from {source}"))
}

fn read_manifest(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "No manifest found, assuming an empty one");
            Ok(None)
        },
        Err(err) => Err(err).with_context(|| format!("Reading manifest {}", path.display())),
    }
}
