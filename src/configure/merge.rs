//! Folding discovered flags and install prefixes into the environment.

use std::path::{Path, PathBuf};

use crate::configure::environment::{BuildEnvironment, PATH_VAR, PKG_CONFIG_PATH_VAR};
use crate::configure::flags::FlagSet;
use crate::util::fs::existing_joins;

/// Side effects of [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Also append `LIBS`. Probes usually leave this off and let the link
    /// check append the libraries once they are known to link.
    pub libs: bool,
    /// Also add library paths to `RPATH`.
    pub rpath: bool,
    /// Prepend `<prefix>/lib/pkgconfig` and `<prefix>/share/pkgconfig` of
    /// every library path to `PKG_CONFIG_PATH`.
    pub pkg_config_path: bool,
    /// Prepend `<prefix>/bin` of every library path to `PATH`.
    pub bin_path: bool,
}

/// Append a flag set to the environment without duplicates.
///
/// The prefix of a library path is its parent directory
/// (`/opt/hdf5/lib` belongs to `/opt/hdf5`). Derived paths are only used if
/// they exist.
pub fn merge(env: &mut BuildEnvironment, flags: &FlagSet, options: MergeOptions) {
    let libpath: Vec<PathBuf> = flags.libpath().iter().map(PathBuf::from).collect();

    env.append_cpppath(flags.cpppath().iter().map(PathBuf::from));
    env.append_cppdefines(flags.cppdefines().iter().cloned());
    env.append_libpath(libpath.iter().cloned());
    if options.libs {
        env.append_libs(flags.libs().iter().cloned());
    }
    if options.rpath {
        env.append_rpath(libpath.iter().cloned());
    }

    if !options.pkg_config_path && !options.bin_path {
        return;
    }

    let prefixes: Vec<&Path> = libpath
        .iter()
        .map(|p| p.parent().unwrap_or(p.as_path()))
        .collect();

    if options.pkg_config_path {
        env.prepend_env_path(PKG_CONFIG_PATH_VAR, pkg_config_dirs(&prefixes));
    }
    if options.bin_path {
        env.prepend_env_path(PATH_VAR, existing_joins(&prefixes, "bin"));
    }
}

/// Side effects of [`apply_prefix_paths`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixOptions {
    pub bin_path: bool,
    pub rpath: bool,
    pub pkg_config_path: bool,
}

impl Default for PrefixOptions {
    fn default() -> Self {
        PrefixOptions {
            bin_path: false,
            rpath: true,
            pkg_config_path: true,
        }
    }
}

/// Configure search paths from a list of install prefixes.
///
/// Existing `include` and `lib` directories are appended to `CPPPATH` and
/// `LIBPATH`; `bin`, `lib/pkgconfig` and `share/pkgconfig` are prepended to
/// the process search paths as enabled by `options`.
pub fn apply_prefix_paths<P: AsRef<Path>>(
    env: &mut BuildEnvironment,
    prefixes: &[P],
    options: PrefixOptions,
) {
    if prefixes.is_empty() {
        return;
    }

    let lib_dirs = existing_joins(prefixes, "lib");
    env.append_cpppath(existing_joins(prefixes, "include"));
    env.append_libpath(lib_dirs.iter().cloned());

    if options.bin_path {
        env.prepend_env_path(PATH_VAR, existing_joins(prefixes, "bin"));
    }
    if options.rpath {
        env.append_rpath(lib_dirs);
    }
    if options.pkg_config_path {
        env.prepend_env_path(PKG_CONFIG_PATH_VAR, pkg_config_dirs(prefixes));
    }
}

/// Existing `lib/pkgconfig` dirs of all prefixes, then `share/pkgconfig`.
fn pkg_config_dirs<P: AsRef<Path>>(prefixes: &[P]) -> Vec<PathBuf> {
    let mut dirs = existing_joins(prefixes, Path::new("lib").join("pkgconfig"));
    dirs.extend(existing_joins(prefixes, Path::new("share").join("pkgconfig")));
    dirs
}
