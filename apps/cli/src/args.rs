//! # CLI Argument Definitions

use clap::Parser;
use mgen_logger::LevelFilter;
use std::path::PathBuf;

/// Reads `-` as "standard input".
pub const STDIN: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "matrixgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generates the CI test matrix for a package of the ecosystem")]
pub struct Cli {
    /// Inputs YAML document (`-` reads standard input)
    #[arg(long, short, default_value = STDIN)]
    pub input: String,

    /// Package manifest, relative to the project root; a missing file means "no manifest"
    #[arg(long, default_value = "composer.json")]
    pub manifest: PathBuf,

    /// JSON list of existing installer branches (`[{"name": "5"}, ...]`)
    #[arg(long)]
    pub branches: Option<PathBuf>,

    /// Catalog file replacing the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Checkout scanned for suite marker files and `.feature` files
    #[arg(long, default_value = ".")]
    pub project_root: PathBuf,

    /// Do not scan the checkout; every requested suite is kept
    #[arg(long)]
    pub no_scan: bool,

    /// Pretty-print the matrix document
    #[arg(long)]
    pub pretty: bool,

    /// Minimum level of diagnostics written to stderr
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,

    /// Emit diagnostics as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Also write diagnostics to rolling files in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
