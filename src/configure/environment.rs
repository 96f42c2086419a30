//! The mutable build environment shared by all probes.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Process execution search path.
pub const PATH_VAR: &str = "PATH";

/// pkg-config search path.
pub const PKG_CONFIG_PATH_VAR: &str = "PKG_CONFIG_PATH";

/// Build configuration state for one invocation.
///
/// Probes read from and append to this. A probe never replaces it wholesale,
/// except when committing a successful trial clone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    /// Include search paths (`-I`)
    pub cpppath: Vec<PathBuf>,
    /// Library search paths (`-L`)
    pub libpath: Vec<PathBuf>,
    /// Runtime library search paths (`-Wl,-rpath`)
    pub rpath: Vec<PathBuf>,
    /// Libraries to link, in link order (`-l`)
    pub libs: Vec<String>,
    /// Preprocessor defines, `NAME` or `NAME=VALUE`
    pub cppdefines: Vec<String>,
    /// Extra C compiler flags
    pub cflags: Vec<String>,
    /// Extra C++ compiler flags
    pub cxxflags: Vec<String>,
    /// Extra linker flags
    pub linkflags: Vec<String>,
    /// C compiler override
    pub cc: Option<PathBuf>,
    /// C++ compiler override
    pub cxx: Option<PathBuf>,
    /// Cached pkg-config lookup: `None` = not looked up yet,
    /// `Some(None)` = looked up and not found.
    pub pkg_config: Option<Option<PathBuf>>,
    /// Path-list variables passed to every subprocess (PATH, PKG_CONFIG_PATH)
    env_paths: BTreeMap<String, Vec<PathBuf>>,
}

impl BuildEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment seeded with the current process's `PATH` and
    /// `PKG_CONFIG_PATH`.
    pub fn from_process() -> Self {
        let mut env = Self::new();
        for var in [PATH_VAR, PKG_CONFIG_PATH_VAR] {
            if let Some(value) = std::env::var_os(var) {
                let paths: Vec<PathBuf> = std::env::split_paths(&value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect();
                env.env_paths.insert(var.to_string(), paths);
            }
        }
        env
    }

    /// Whether `lib` is already in the link list.
    pub fn has_lib(&self, lib: &str) -> bool {
        self.libs.iter().any(|l| l == lib)
    }

    /// First of `candidates` that is already in the link list.
    pub fn linked_candidate<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        candidates
            .iter()
            .find(|c| self.has_lib(c))
            .map(String::as_str)
    }

    /// Append include paths that are not yet present.
    pub fn append_cpppath(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        append_unique(&mut self.cpppath, paths);
    }

    /// Append library paths that are not yet present.
    pub fn append_libpath(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        append_unique(&mut self.libpath, paths);
    }

    /// Append runtime library paths that are not yet present.
    pub fn append_rpath(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        append_unique(&mut self.rpath, paths);
    }

    /// Append libraries that are not yet linked.
    pub fn append_libs(&mut self, libs: impl IntoIterator<Item = String>) {
        append_unique(&mut self.libs, libs);
    }

    /// Append defines that are not yet present.
    pub fn append_cppdefines(&mut self, defines: impl IntoIterator<Item = String>) {
        append_unique(&mut self.cppdefines, defines);
    }

    /// Entries of a path-list variable.
    pub fn env_path(&self, var: &str) -> &[PathBuf] {
        self.env_paths.get(var).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Prepend entries to a path-list variable.
    ///
    /// The given order is kept at the front; entries that were already
    /// present are moved rather than duplicated.
    pub fn prepend_env_path(&mut self, var: &str, paths: impl IntoIterator<Item = PathBuf>) {
        let new: Vec<PathBuf> = paths.into_iter().collect();
        if new.is_empty() {
            return;
        }

        let current = self.env_paths.entry(var.to_string()).or_default();
        let mut merged = Vec::with_capacity(new.len() + current.len());
        append_unique(&mut merged, new);
        append_unique(&mut merged, current.drain(..));
        *current = merged;
    }

    /// Joined value of a path-list variable, if it has any entries.
    pub fn env_var(&self, var: &str) -> Option<OsString> {
        let paths = self.env_paths.get(var)?;
        if paths.is_empty() {
            return None;
        }
        std::env::join_paths(paths).ok()
    }

    /// All path-list variables as subprocess environment entries.
    pub fn process_env(&self) -> Vec<(String, OsString)> {
        self.env_paths
            .keys()
            .filter_map(|var| self.env_var(var).map(|value| (var.clone(), value)))
            .collect()
    }

    /// Compiler flags implied by this environment.
    pub fn compile_flags(&self) -> Vec<String> {
        let mut flags: Vec<String> = self
            .cpppath
            .iter()
            .map(|p| format!("-I{}", p.display()))
            .collect();
        flags.extend(self.cppdefines.iter().map(|d| format!("-D{}", d)));
        flags
    }

    /// Linker flags implied by this environment.
    pub fn link_flags(&self) -> Vec<String> {
        let mut flags: Vec<String> = self
            .libpath
            .iter()
            .map(|p| format!("-L{}", p.display()))
            .collect();
        flags.extend(self.rpath.iter().map(|p| rpath_flag(p)));
        flags.extend(self.libs.iter().map(|l| format!("-l{}", l)));
        flags.extend(self.linkflags.iter().cloned());
        flags
    }
}

/// Format a runtime search path as a GCC-style linker flag.
pub fn rpath_flag(path: &Path) -> String {
    format!("-Wl,-rpath,{}", path.display())
}

/// Append the items of `new` that `list` does not already contain.
pub fn append_unique<T: PartialEq>(list: &mut Vec<T>, new: impl IntoIterator<Item = T>) {
    for item in new {
        if !list.contains(&item) {
            list.push(item);
        }
    }
}
