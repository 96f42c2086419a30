//! GCC/Clang toolchain implementation.

use std::path::{Path, PathBuf};

use crate::configure::environment::rpath_flag;

use super::{CommandSpec, CompileInput, Language, LinkInput, Toolchain};

/// GCC/Clang toolchain (Unix-like systems).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler
    pub cc: PathBuf,
    /// Path to the C++ compiler
    pub cxx: PathBuf,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(cc: PathBuf, cxx: PathBuf) -> Self {
        GccToolchain { cc, cxx }
    }

    /// Infer C++ compiler path from C compiler path.
    ///
    /// Handles common patterns:
    /// - gcc, x86_64-linux-gnu-gcc -> g++, x86_64-linux-gnu-g++
    /// - clang -> clang++
    /// - cc, /usr/bin/cc -> c++, /usr/bin/c++
    pub fn infer_cxx(cc: &Path) -> PathBuf {
        let cc_str = cc.to_string_lossy();

        if cc_str.ends_with("gcc") {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 2]));
        }

        if cc_str.ends_with("clang") {
            return PathBuf::from(format!("{}++", cc_str));
        }

        // Only match "cc" when it's a complete basename (not "mycc")
        let is_standalone_cc = cc_str == "cc"
            || cc_str.ends_with("/cc")
            || cc_str.ends_with("\\cc")
            || cc_str.ends_with("-cc");

        if is_standalone_cc {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 1]));
        }

        PathBuf::from(format!("{}++", cc_str))
    }

    fn compile_args(&self, input: &CompileInput) -> Vec<String> {
        let mut args = Vec::new();

        for dir in &input.include_dirs {
            args.push(format!("-I{}", dir.display()));
        }

        for define in &input.defines {
            args.push(format!("-D{}", define));
        }

        args.extend(input.cflags.iter().cloned());
        args
    }
}

impl Toolchain for GccToolchain {
    fn compiler_path(&self, lang: Language) -> &Path {
        match lang {
            Language::C => &self.cc,
            Language::Cxx => &self.cxx,
        }
    }

    fn compile_command(&self, input: &CompileInput, lang: Language) -> CommandSpec {
        CommandSpec::new(self.compiler_path(lang))
            .arg("-c")
            .args(self.compile_args(input))
            .arg(input.source.display().to_string())
            .arg("-o")
            .arg(input.output.display().to_string())
    }

    fn link_exe_command(&self, input: &LinkInput, lang: Language) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.compiler_path(lang))
            .args(self.compile_args(&input.compile))
            .arg(input.compile.source.display().to_string())
            .arg("-o")
            .arg(input.compile.output.display().to_string());

        // Libraries must come after the source for single-pass linkers
        for dir in &input.lib_dirs {
            cmd = cmd.arg(format!("-L{}", dir.display()));
        }

        for dir in &input.rpath {
            cmd = cmd.arg(rpath_flag(dir));
        }

        for lib in &input.libs {
            cmd = cmd.arg(format!("-l{}", lib));
        }

        cmd.args(input.ldflags.iter().cloned())
    }

    fn object_extension(&self) -> &str {
        "o"
    }

    fn exe_extension(&self) -> &str {
        if cfg!(windows) {
            "exe"
        } else {
            ""
        }
    }
}
