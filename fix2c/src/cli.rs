/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 30/1/26
******************************************************************************/

//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

/// Compiles a FIX XML specification into C parser tables.
///
/// The generated header and source pair with the `fix.h` runtime to
/// yield a parser for messages conforming to the specification.
#[derive(Parser, Debug)]
#[command(name = "fix2c")]
#[command(about = "Compiles a FIX XML specification into C parser tables.", long_about = None)]
pub struct Cli {
    /// Input FIX XML specification.
    pub input: PathBuf,

    /// Directory the generated header file is written to.
    #[arg(short = 'i', long = "header-dir", value_name = "DIR", default_value = "include")]
    pub header_dir: PathBuf,

    /// Directory the generated source file is written to.
    #[arg(short = 's', long = "source-dir", value_name = "DIR", default_value = "src")]
    pub source_dir: PathBuf,
}
