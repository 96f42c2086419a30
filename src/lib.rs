//! buildprobe - build-configuration probes for scientific C/C++ libraries
//!
//! This crate detects libraries such as HDF5, METIS, OpenMP, APF, ASAGI and
//! SimModSuite, folds the flags they need into a build environment, and
//! drives external CMake builds.

pub mod builder;
pub mod configure;
pub mod libs;
pub mod util;

/// Test utilities and fakes for buildprobe unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a fake configuration checker and install
/// prefix fixtures.
#[cfg(test)]
pub mod test_support;

pub use configure::{BuildEnvironment, Checker, ConfigureError, FlagSet, ProbeResult, ToolchainChecker};
pub use util::config::BuildVariables;
