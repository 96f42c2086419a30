//! The configuration-check backend.
//!
//! A [`Checker`] performs the low-level tests a probe needs: locating a
//! program, linking or compiling a test program against the current build
//! environment, and capturing the output of an external tool.
//! [`ToolchainChecker`] does this with a real C/C++ compiler.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::builder::toolchain::{detect_toolchain, CompileInput, Language, LinkInput, Toolchain};
use crate::configure::environment::{BuildEnvironment, PATH_VAR};
use crate::util::process::{find_executable_in, ProcessBuilder};

/// Low-level configuration checks.
pub trait Checker {
    /// Locate a program on the environment's search path.
    fn find_program(&mut self, env: &BuildEnvironment, name: &str) -> Option<PathBuf>;

    /// Compile and link `source`, linking `libs` ahead of the environment's
    /// own libraries. Returns whether the link succeeded.
    fn try_link(
        &mut self,
        env: &BuildEnvironment,
        source: &str,
        libs: &[String],
        lang: Language,
    ) -> Result<bool>;

    /// Compile `source` without linking. Returns whether it compiled.
    fn try_compile(&mut self, env: &BuildEnvironment, source: &str, lang: Language)
        -> Result<bool>;

    /// Run a program and return its stdout, or `None` if it exited with a
    /// failure status.
    fn capture_output(
        &mut self,
        env: &BuildEnvironment,
        program: &Path,
        args: &[String],
    ) -> Result<Option<String>>;

    /// Release resources held for the current session (temporary files).
    fn cleanup(&mut self) {}
}

/// Checker that drives a real compiler in a temporary directory.
#[derive(Default)]
pub struct ToolchainChecker {
    toolchain: Option<Box<dyn Toolchain>>,
    work_dir: Option<TempDir>,
    counter: usize,
}

impl ToolchainChecker {
    /// Create a checker that detects its toolchain on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checker with an explicit toolchain.
    pub fn with_toolchain(toolchain: Box<dyn Toolchain>) -> Self {
        ToolchainChecker {
            toolchain: Some(toolchain),
            work_dir: None,
            counter: 0,
        }
    }

    fn toolchain(&mut self, env: &BuildEnvironment) -> Result<&dyn Toolchain> {
        if self.toolchain.is_none() {
            self.toolchain = Some(detect_toolchain(env)?);
        }
        Ok(self
            .toolchain
            .as_deref()
            .context("toolchain detection produced no toolchain")?)
    }

    /// Write `source` to a fresh conftest file; returns (source, output stem).
    fn write_source(&mut self, source: &str, lang: Language) -> Result<(PathBuf, PathBuf)> {
        if self.work_dir.is_none() {
            let dir = tempfile::Builder::new()
                .prefix("buildprobe-conf")
                .tempdir()
                .context("failed to create configure directory")?;
            self.work_dir = Some(dir);
        }
        let dir = self
            .work_dir
            .as_ref()
            .context("configure directory missing")?
            .path()
            .to_path_buf();

        self.counter += 1;
        let stem = dir.join(format!("conftest_{}", self.counter));
        let path = stem.with_extension(lang.source_extension());
        std::fs::write(&path, source)
            .with_context(|| format!("failed to write {}", path.display()))?;

        Ok((path, stem))
    }

    fn compile_input(env: &BuildEnvironment, source: PathBuf, output: PathBuf, lang: Language) -> CompileInput {
        let cflags = match lang {
            Language::C => env.cflags.clone(),
            Language::Cxx => env.cxxflags.clone(),
        };
        CompileInput {
            source,
            output,
            include_dirs: env.cpppath.clone(),
            defines: env.cppdefines.clone(),
            cflags,
        }
    }

    fn run(env: &BuildEnvironment, program: &Path, args: &[String]) -> Result<bool> {
        let output = ProcessBuilder::new(program)
            .args(args)
            .envs(env.process_env())
            .exec()?;

        if !output.status.success() {
            tracing::debug!(
                "check command failed: {}\n{}",
                program.display(),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        Ok(output.status.success())
    }
}

impl Checker for ToolchainChecker {
    fn find_program(&mut self, env: &BuildEnvironment, name: &str) -> Option<PathBuf> {
        let candidate = Path::new(name);
        if candidate.components().count() > 1 {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        let search_path = env
            .env_var(PATH_VAR)
            .or_else(|| std::env::var_os(PATH_VAR))?;
        find_executable_in(name, search_path)
    }

    fn try_link(
        &mut self,
        env: &BuildEnvironment,
        source: &str,
        libs: &[String],
        lang: Language,
    ) -> Result<bool> {
        let (src, stem) = self.write_source(source, lang)?;
        let toolchain = self.toolchain(env)?;
        let output = stem.with_extension(toolchain.exe_extension());

        let mut link_libs = libs.to_vec();
        link_libs.extend(env.libs.iter().filter(|l| !libs.contains(l)).cloned());

        let input = LinkInput {
            compile: Self::compile_input(env, src, output, lang),
            lib_dirs: env.libpath.clone(),
            rpath: env.rpath.clone(),
            libs: link_libs,
            ldflags: env.linkflags.clone(),
        };
        let cmd = toolchain.link_exe_command(&input, lang);
        Self::run(env, &cmd.program, &cmd.args)
    }

    fn try_compile(
        &mut self,
        env: &BuildEnvironment,
        source: &str,
        lang: Language,
    ) -> Result<bool> {
        let (src, stem) = self.write_source(source, lang)?;
        let toolchain = self.toolchain(env)?;
        let output = stem.with_extension(toolchain.object_extension());

        let input = Self::compile_input(env, src, output, lang);
        let cmd = toolchain.compile_command(&input, lang);
        Self::run(env, &cmd.program, &cmd.args)
    }

    fn capture_output(
        &mut self,
        env: &BuildEnvironment,
        program: &Path,
        args: &[String],
    ) -> Result<Option<String>> {
        let output = ProcessBuilder::new(program)
            .args(args)
            .envs(env.process_env())
            .exec()?;

        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            Ok(None)
        }
    }

    fn cleanup(&mut self) {
        if let Some(dir) = self.work_dir.take() {
            tracing::trace!("removing configure directory {}", dir.path().display());
        }
        self.counter = 0;
    }
}
