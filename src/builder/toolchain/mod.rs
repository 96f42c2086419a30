//! Toolchain abstraction for C/C++ compilers.
//!
//! Probes need just enough of a compiler driver to compile and link tiny
//! test programs. This module generates those commands.
//!
//! Toolchain detection priority:
//! 1. Compiler overrides in the build environment (`cc`/`cxx` variables)
//! 2. Environment variables (CC, CXX)
//! 3. Auto-detection (searching PATH for common compilers)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

mod detect;
mod gcc;

pub use detect::detect_toolchain;
pub use gcc::GccToolchain;

/// Source language of a check program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language (default)
    #[default]
    C,
    /// C++ language
    #[serde(alias = "cpp", alias = "cxx", alias = "c++")]
    Cxx,
}

impl Language {
    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cxx => "C++",
        }
    }

    /// Source file extension for check programs.
    pub fn source_extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "cpp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command to execute, with program, arguments, and environment.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }
}

/// Input for a compile-only step.
#[derive(Debug, Clone, Default)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub output: PathBuf,
    /// Include directories
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines, `NAME` or `NAME=VALUE`
    pub defines: Vec<String>,
    /// Additional compiler flags
    pub cflags: Vec<String>,
}

/// Input for a compile-and-link step producing an executable.
#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    /// Compile settings; `compile.source` is the program source
    pub compile: CompileInput,
    /// Library search paths
    pub lib_dirs: Vec<PathBuf>,
    /// Runtime library search paths
    pub rpath: Vec<PathBuf>,
    /// Libraries to link (without -l prefix), in link order
    pub libs: Vec<String>,
    /// Additional linker flags
    pub ldflags: Vec<String>,
}

/// Trait for toolchain implementations.
///
/// Each toolchain knows how to generate commands for its specific compiler.
pub trait Toolchain: Send + Sync {
    /// Get the compiler driver for a language.
    fn compiler_path(&self, lang: Language) -> &Path;

    /// Generate a compile-only command.
    fn compile_command(&self, input: &CompileInput, lang: Language) -> CommandSpec;

    /// Generate a command that compiles and links an executable in one step.
    fn link_exe_command(&self, input: &LinkInput, lang: Language) -> CommandSpec;

    /// Get the object file extension.
    fn object_extension(&self) -> &str;

    /// Get the executable extension.
    fn exe_extension(&self) -> &str;
}
