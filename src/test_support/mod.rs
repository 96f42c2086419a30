//! Test utilities and fakes for buildprobe unit tests.
//!
//! [`FakeChecker`] stands in for a real compiler: programs, libraries and
//! tool outputs are declared up front, and every check is recorded so tests
//! can assert on what a probe attempted.
//!
//! # Example
//!
//! ```rust,ignore
//! use buildprobe::test_support::FakeChecker;
//!
//! #[test]
//! fn test_example() {
//!     let mut checker = FakeChecker::new()
//!         .with_program("h5cc", "/opt/hdf5/bin/h5cc")
//!         .with_output("/opt/hdf5/bin/h5cc -show -shlib", "gcc -lhdf5")
//!         .with_lib("hdf5");
//!
//!     // Run a probe against the checker...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;

// Re-export fixtures for convenience
pub use fixtures::*;

type CompilePredicate = Box<dyn Fn(&BuildEnvironment, &str) -> bool>;

/// One recorded link test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAttempt {
    /// Libraries passed to the link test
    pub libs: Vec<String>,
    /// `LIBPATH` of the environment at the time of the test
    pub libpath: Vec<PathBuf>,
    /// `CPPDEFINES` of the environment at the time of the test
    pub cppdefines: Vec<String>,
    /// Language of the test program
    pub language: Language,
}

/// Fake [`Checker`] with declared programs, libraries and outputs.
///
/// A link test succeeds when its first library is available (or when no
/// library is passed). A library declared with [`FakeChecker::with_lib_in`]
/// is only available while its directory is on `LIBPATH`.
pub struct FakeChecker {
    programs: HashMap<String, PathBuf>,
    libs: HashMap<String, Option<PathBuf>>,
    outputs: HashMap<String, String>,
    compile: CompilePredicate,
    attempts: Vec<LinkAttempt>,
    compile_tests: usize,
    cleanups: usize,
    last_source: Option<String>,
}

impl Default for FakeChecker {
    fn default() -> Self {
        FakeChecker {
            programs: HashMap::new(),
            libs: HashMap::new(),
            outputs: HashMap::new(),
            compile: Box::new(|_, _| true),
            attempts: Vec::new(),
            compile_tests: 0,
            cleanups: 0,
            last_source: None,
        }
    }
}

impl FakeChecker {
    /// Create a checker where nothing is installed and everything compiles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an installed program.
    pub fn with_program(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(name.to_string(), path.into());
        self
    }

    /// Declare a library that always links.
    pub fn with_lib(mut self, name: &str) -> Self {
        self.libs.insert(name.to_string(), None);
        self
    }

    /// Declare a library that links only when `dir` is on `LIBPATH`.
    pub fn with_lib_in(mut self, name: &str, dir: impl Into<PathBuf>) -> Self {
        self.libs.insert(name.to_string(), Some(dir.into()));
        self
    }

    /// Declare the stdout of a command line (`<program> <args...>`).
    pub fn with_output(mut self, command: &str, stdout: &str) -> Self {
        self.outputs.insert(command.to_string(), stdout.to_string());
        self
    }

    /// Decide compile tests with `predicate` instead of always succeeding.
    pub fn with_compile(
        mut self,
        predicate: impl Fn(&BuildEnvironment, &str) -> bool + 'static,
    ) -> Self {
        self.compile = Box::new(predicate);
        self
    }

    /// Number of link tests run.
    pub fn link_tests(&self) -> usize {
        self.attempts.len()
    }

    /// All recorded link tests, in order.
    pub fn attempts(&self) -> &[LinkAttempt] {
        &self.attempts
    }

    /// Number of compile tests run.
    pub fn compile_tests(&self) -> usize {
        self.compile_tests
    }

    /// Number of times a session released the checker.
    pub fn cleanups(&self) -> usize {
        self.cleanups
    }

    /// Source of the most recent link or compile test.
    pub fn last_source(&self) -> Option<&str> {
        self.last_source.as_deref()
    }

    fn lib_available(&self, env: &BuildEnvironment, lib: &str) -> bool {
        match self.libs.get(lib) {
            Some(None) => true,
            Some(Some(dir)) => env.libpath.contains(dir),
            None => false,
        }
    }
}

impl Checker for FakeChecker {
    fn find_program(&mut self, _env: &BuildEnvironment, name: &str) -> Option<PathBuf> {
        self.programs.get(name).cloned()
    }

    fn try_link(
        &mut self,
        env: &BuildEnvironment,
        source: &str,
        libs: &[String],
        lang: Language,
    ) -> Result<bool> {
        self.last_source = Some(source.to_string());
        self.attempts.push(LinkAttempt {
            libs: libs.to_vec(),
            libpath: env.libpath.clone(),
            cppdefines: env.cppdefines.clone(),
            language: lang,
        });

        Ok(libs
            .first()
            .map_or(true, |lib| self.lib_available(env, lib)))
    }

    fn try_compile(
        &mut self,
        env: &BuildEnvironment,
        source: &str,
        _lang: Language,
    ) -> Result<bool> {
        self.last_source = Some(source.to_string());
        self.compile_tests += 1;
        Ok((self.compile)(env, source))
    }

    fn capture_output(
        &mut self,
        _env: &BuildEnvironment,
        program: &Path,
        args: &[String],
    ) -> Result<Option<String>> {
        let mut command = program.display().to_string();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        Ok(self.outputs.get(&command).cloned())
    }

    fn cleanup(&mut self) {
        self.cleanups += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_checker_libs() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new()
            .with_lib("m")
            .with_lib_in("pskernel", "/opt/sim/lib/x64_rhel7_gcc48/psKrnl");

        assert!(checker.try_link(&env, "", &["m".to_string()], Language::C).unwrap());
        assert!(!checker.try_link(&env, "", &["pskernel".to_string()], Language::C).unwrap());

        env.append_libpath([PathBuf::from("/opt/sim/lib/x64_rhel7_gcc48/psKrnl")]);
        assert!(checker.try_link(&env, "", &["pskernel".to_string()], Language::C).unwrap());
        assert_eq!(checker.link_tests(), 3);
    }

    #[test]
    fn test_fake_checker_outputs() {
        let env = BuildEnvironment::new();
        let mut checker = FakeChecker::new().with_output("/bin/h5cc -show", "gcc -lhdf5");

        let out = checker
            .capture_output(&env, Path::new("/bin/h5cc"), &["-show".to_string()])
            .unwrap();
        assert_eq!(out.as_deref(), Some("gcc -lhdf5"));
        assert!(checker
            .capture_output(&env, Path::new("/bin/h5pcc"), &[])
            .unwrap()
            .is_none());
    }
}
