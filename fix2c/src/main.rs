/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! fix2c command-line entry point.
//!
//! Validates the output directories, loads the specification, runs the
//! generator and writes the artifact pair. Any failure prints a single
//! `ERROR: <message>` line on stderr and exits nonzero.

use clap::Parser;
use fix2c_codegen::{CodegenError, Generator};
use fix2c_dictionary::{Dictionary, DictionaryError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;

mod cli;

use cli::Cli;

/// Top-level error type for one compiler run.
#[derive(Debug, Error)]
enum CliError {
    /// An output directory is missing or not a directory.
    #[error("{} is not a directory", path.display())]
    BadOutputDir {
        /// The offending path.
        path: PathBuf,
    },

    /// I/O failure reading the input or writing an artifact.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure loading the specification.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// Failure analyzing or emitting the specification.
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .try_init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    // Output directories are checked before the input is touched.
    for dir in [&cli.header_dir, &cli.source_dir] {
        if !dir.is_dir() {
            return Err(CliError::BadOutputDir { path: dir.clone() });
        }
    }

    let xml = fs::read_to_string(&cli.input)?;
    let dictionary = Dictionary::parse(&xml)?;

    let base = base_name(&cli.input);
    let code = Generator::new(dictionary).generate(&base)?;

    let header_path = cli.header_dir.join(format!("{base}.h"));
    let source_path = cli.source_dir.join(format!("{base}.c"));
    fs::write(&header_path, &code.header)?;
    fs::write(&source_path, &code.source)?;

    info!(
        header = %header_path.display(),
        source = %source_path.display(),
        "wrote parser tables"
    );
    Ok(())
}

/// The input filename without its extension; names the artifacts and
/// forms the C symbol prefix.
fn base_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fix".to_string())
}
