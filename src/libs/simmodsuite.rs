//! SimModSuite, the Simmetrix meshing SDK.
//!
//! The SDK installs its libraries in ABI-tagged subdirectories of its `lib`
//! directory. Each tag is tried in turn against every configured library
//! path; the first tag under which the whole library set links wins.

use std::path::PathBuf;

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;
use crate::configure::error::{not_found, ProbeResult};
use crate::configure::probe::{check_libraries, run_trial, CapabilityDescriptor, LibrarySpec};
use crate::util::fs::existing_joins;

const NAME: &str = "SimModSuite";

/// ABI-tagged library directories, newest first.
pub const LIB_SUFFIXES: &[&str] = &["x64_rhel7_gcc48", "x64_rhel6_gcc44", "x64_rhel5_gcc41"];

/// Parasolid kernel directory inside a library directory.
const PARASOLID_DIR: &str = "psKrnl";

/// SimModSuite probe options.
#[derive(Debug, Clone)]
pub struct Options {
    /// MPI flavor of the partition wrapper library.
    pub mpi_lib: String,
    /// Add the Parasolid kernel directories to `RPATH`.
    pub modify_rpath: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            mpi_lib: "mpich2".to_string(),
            modify_rpath: true,
        }
    }
}

/// The libraries every SimModSuite install must provide, in link order.
pub fn descriptor(options: &Options) -> CapabilityDescriptor {
    CapabilityDescriptor::new(NAME, Language::Cxx)
        .library(LibrarySpec::with_header("SimAdvMeshing", "SimAdvMeshing.h"))
        .library(LibrarySpec::with_header("SimMeshing", "MeshSim.h"))
        .library(LibrarySpec::with_header("SimField", "SimField.h"))
        .library(LibrarySpec::with_header("SimDiscrete", "SimDiscrete.h"))
        .library(LibrarySpec::with_header("SimMeshTools", "SimMeshTools.h"))
        .library(LibrarySpec::alternatives([
            "SimParasolid260",
            "SimParasolid270",
            "SimParasolid280",
            "SimParasolid300",
        ]))
        .library(LibrarySpec::with_header(
            "SimPartitionedMesh-mpi",
            "SimPartitionedMesh.h",
        ))
        .library(LibrarySpec::new(format!(
            "SimPartitionWrapper-{}",
            options.mpi_lib
        )))
        .library(LibrarySpec::with_header("SimModel", "SimModel.h"))
        .library(LibrarySpec::new("pskernel"))
}

/// Find SimModSuite under one of the ABI-tagged library directories.
///
/// A tag with no existing directory is skipped without running any check.
/// A tag whose libraries do not all link leaves `env` untouched.
pub fn find(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    options: &Options,
    required: bool,
) -> ProbeResult {
    let descriptor = descriptor(options);

    for suffix in LIB_SUFFIXES {
        let lib_dirs = existing_joins(&env.libpath, suffix);
        if lib_dirs.is_empty() {
            tracing::debug!("no {} library directory, skipping", suffix);
            continue;
        }

        tracing::info!("checking for simmodeler libraries in {} ...", suffix);
        if try_lib_dirs(env, checker, &descriptor, lib_dirs, options)? {
            return Ok(true);
        }
    }

    not_found(required, NAME, "Could not find SimModSuite")
}

fn try_lib_dirs(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    descriptor: &CapabilityDescriptor,
    lib_dirs: Vec<PathBuf>,
    options: &Options,
) -> ProbeResult {
    run_trial(env, checker, |session| {
        let parasolid_dirs = existing_joins(&lib_dirs, PARASOLID_DIR);

        let trial = session.env_mut();
        trial.append_libpath(lib_dirs);
        trial.append_libpath(parasolid_dirs.iter().cloned());
        if options.modify_rpath {
            trial.append_rpath(parasolid_dirs);
        }

        Ok(check_libraries(session, descriptor).is_ok())
    })
}
