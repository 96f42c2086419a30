//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// buildprobe - detect scientific C/C++ libraries and build CMake projects
#[derive(Parser)]
#[command(name = "buildprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe for a library and print the flags it needs
    Probe(ProbeArgs),

    /// Parse compiler flags from wrapper or pkg-config output
    Flags(FlagsArgs),

    /// Configure and build a CMake project
    Cmake(CmakeArgs),

    /// Validate and print build variables
    Vars(VarsArgs),
}

/// Libraries `probe` knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Capability {
    Hdf5,
    Metis,
    Openmp,
    Apf,
    Asagi,
    Simmodsuite,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Hdf5 => "hdf5",
            Capability::Metis => "metis",
            Capability::Openmp => "openmp",
            Capability::Apf => "apf",
            Capability::Asagi => "asagi",
            Capability::Simmodsuite => "simmodsuite",
        }
    }
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Library to probe for
    #[arg(value_enum)]
    pub capability: Capability,

    /// Report a missing library instead of failing
    #[arg(long)]
    pub optional: bool,

    /// Use the MPI variant (hdf5, metis, asagi)
    #[arg(long)]
    pub parallel: bool,

    /// Minimum OpenMP version
    #[arg(long = "version", value_name = "VERSION", default_value = "1.0")]
    pub openmp_version: String,

    /// Require the SimModSuite adapters (apf)
    #[arg(long)]
    pub simmetrix: bool,

    /// Require the Zoltan adapter (apf)
    #[arg(long)]
    pub zoltan: bool,

    /// MPI flavor of the partition wrapper (simmodsuite)
    #[arg(long, default_value = "mpich2")]
    pub mpi_lib: String,

    /// Do not add the Parasolid kernel to RPATH (simmodsuite)
    #[arg(long)]
    pub no_rpath: bool,

    /// Build variables (KEY=VALUE)
    pub vars: Vec<String>,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Strip the leading compiler token (compiler wrapper output)
    #[arg(long)]
    pub wrapper: bool,

    /// Print the parsed flags as JSON
    #[arg(long)]
    pub json: bool,

    /// Flag text to parse
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct CmakeArgs {
    /// CMake project directory
    pub project: PathBuf,

    /// Build directory
    #[arg(long, default_value = "build")]
    pub build_dir: PathBuf,

    /// cmake program
    #[arg(long, default_value = "cmake")]
    pub cmake: String,

    /// Native build program
    #[arg(long, default_value = "make")]
    pub make: String,

    /// Number of parallel jobs
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Options passed to cmake
    #[arg(last = true)]
    pub options: Vec<String>,
}

#[derive(Args)]
pub struct VarsArgs {
    /// List the available build variables
    #[arg(long)]
    pub help_vars: bool,

    /// Build variables (KEY=VALUE)
    pub vars: Vec<String>,
}
