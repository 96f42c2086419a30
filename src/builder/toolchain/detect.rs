//! Toolchain detection functions.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::configure::environment::{BuildEnvironment, PATH_VAR};
use crate::util::process::find_executable_in;

use super::{GccToolchain, Toolchain};

/// Detect the toolchain used for check programs.
///
/// Priority:
/// 1. `cc`/`cxx` overrides recorded in the build environment
/// 2. Environment variables (CC, CXX)
/// 3. `cc`, `gcc` or `clang` on the environment's PATH
pub fn detect_toolchain(env: &BuildEnvironment) -> Result<Box<dyn Toolchain>> {
    let search_path = env
        .env_var(PATH_VAR)
        .or_else(|| std::env::var_os(PATH_VAR))
        .unwrap_or_default();
    let which = |name: &str| find_executable_in(name, &search_path);

    let cc = env
        .cc
        .clone()
        .or_else(|| std::env::var_os("CC").map(PathBuf::from))
        .or_else(|| which("cc"))
        .or_else(|| which("gcc"))
        .or_else(|| which("clang"));

    let Some(cc) = cc else {
        bail!(
            "no C compiler found\n\
             \n\
             Set the CC environment variable, pass `cc=/path/to/compiler`,\n\
             or install a compiler."
        );
    };

    let cxx = env
        .cxx
        .clone()
        .or_else(|| std::env::var_os("CXX").map(PathBuf::from))
        .or_else(|| which("c++"))
        .or_else(|| which("g++"))
        .or_else(|| which("clang++"))
        .unwrap_or_else(|| GccToolchain::infer_cxx(&cc));

    tracing::debug!("Using toolchain: cc={}, cxx={}", cc.display(), cxx.display());

    Ok(Box::new(GccToolchain::new(cc, cxx)))
}
