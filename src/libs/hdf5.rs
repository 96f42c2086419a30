//! HDF5, located through its compiler wrapper.
//!
//! `h5cc -show -shlib` prints the full compiler command line the wrapper
//! would run. Its include paths, defines and library paths are merged into
//! the environment, then `hdf5.h` is link-tested with the first library the
//! wrapper names and the rest as extras.

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;
use crate::configure::error::{not_found, ProbeResult};
use crate::configure::flags::parse_wrapper_output;
use crate::configure::merge::{merge, MergeOptions};
use crate::configure::probe::{run_trial, LibrarySpec};

const NAME: &str = "hdf5";

const NO_WRAPPER: &str =
    "Cannot find h5cc or h5pcc: Make sure the path to the HDF5 library is correct";
const NO_LIBRARY: &str = "Could not find the HDF5 library";

/// HDF5 probe options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Prefer the parallel wrapper `h5pcc` over `h5cc`.
    pub parallel: bool,
}

/// Wrapper programs in the order they are tried.
pub fn wrappers(parallel: bool) -> [&'static str; 2] {
    if parallel {
        ["h5pcc", "h5cc"]
    } else {
        ["h5cc", "h5pcc"]
    }
}

/// Find HDF5 and add its flags to `env`.
pub fn find(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    options: &Options,
    required: bool,
) -> ProbeResult {
    let mut failure = NO_LIBRARY;

    let found = run_trial(env, checker, |session| {
        let Some(wrapper) = wrappers(options.parallel)
            .into_iter()
            .find_map(|name| session.check_prog(name))
        else {
            failure = NO_WRAPPER;
            return Ok(false);
        };

        let args = ["-show".to_string(), "-shlib".to_string()];
        let Some(output) = session.read_output(&wrapper, &args) else {
            tracing::debug!("{} -show -shlib failed", wrapper.display());
            return Ok(false);
        };

        let flags = parse_wrapper_output(&output);
        merge(session.env_mut(), &flags, MergeOptions::default());

        let Some((first, extras)) = flags.libs().split_first() else {
            tracing::debug!("{} names no libraries", wrapper.display());
            return Ok(false);
        };

        let spec = LibrarySpec::with_header(first.as_str(), "hdf5.h").extra_libs(extras.iter().cloned());
        Ok(session.check_lib(&spec, Language::C))
    })?;

    if found {
        Ok(true)
    } else {
        not_found(required, NAME, failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::configure::error::ConfigureError;
    use crate::test_support::FakeChecker;

    const H5CC_OUTPUT: &str =
        "gcc -O2 -I/opt/hdf5/include -DH5_USE_110_API -L/opt/hdf5/lib -lhdf5_hl -lhdf5 -lz -lm\n";

    #[test]
    fn test_h5pcc_used_when_h5cc_missing() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new()
            .with_program("h5pcc", "/opt/hdf5/bin/h5pcc")
            .with_output("/opt/hdf5/bin/h5pcc -show -shlib", H5CC_OUTPUT)
            .with_lib("hdf5_hl");

        assert!(find(&mut env, &mut checker, &Options::default(), true).unwrap());
        assert_eq!(env.cpppath, vec![PathBuf::from("/opt/hdf5/include")]);
        assert_eq!(env.cppdefines, vec!["H5_USE_110_API"]);
        assert_eq!(env.libpath, vec![PathBuf::from("/opt/hdf5/lib")]);
        assert_eq!(env.libs, vec!["hdf5_hl", "hdf5", "z", "m"]);

        let attempt = &checker.attempts()[0];
        assert_eq!(attempt.libs, vec!["hdf5_hl", "hdf5", "z", "m"]);
        assert_eq!(attempt.language, Language::C);
        assert!(checker.last_source().unwrap().contains("#include \"hdf5.h\""));
    }

    #[test]
    fn test_parallel_prefers_h5pcc() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new()
            .with_program("h5cc", "/usr/bin/h5cc")
            .with_program("h5pcc", "/opt/mpi/bin/h5pcc")
            .with_output("/usr/bin/h5cc -show -shlib", "gcc -I/usr/include/hdf5 -lhdf5")
            .with_output("/opt/mpi/bin/h5pcc -show -shlib", "mpicc -I/opt/mpi/include -lhdf5")
            .with_lib("hdf5");

        let options = Options { parallel: true };
        assert!(find(&mut env, &mut checker, &options, true).unwrap());
        assert_eq!(env.cpppath, vec![PathBuf::from("/opt/mpi/include")]);
    }

    #[test]
    fn test_missing_wrapper_required() {
        let mut env = BuildEnvironment::new();
        let before = env.clone();
        let mut checker = FakeChecker::new();

        let err = find(&mut env, &mut checker, &Options::default(), true).unwrap_err();
        assert!(matches!(err, ConfigureError::MissingCapability { .. }));
        assert!(err.to_string().contains("h5cc"));
        assert_eq!(env, before);
        assert_eq!(checker.cleanups(), 1);
    }

    #[test]
    fn test_missing_wrapper_optional() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new();

        assert!(!find(&mut env, &mut checker, &Options::default(), false).unwrap());
        assert_eq!(env, BuildEnvironment::new());
    }

    #[test]
    fn test_library_that_does_not_link() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new()
            .with_program("h5cc", "/usr/bin/h5cc")
            .with_output("/usr/bin/h5cc -show -shlib", H5CC_OUTPUT);

        let err = find(&mut env, &mut checker, &Options::default(), true).unwrap_err();
        assert_eq!(err.to_string(), "Could not find the HDF5 library");
        // The merged include path belonged to the discarded trial
        assert!(env.cpppath.is_empty());
    }

    #[test]
    fn test_second_probe_is_memoized() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new()
            .with_program("h5cc", "/usr/bin/h5cc")
            .with_output("/usr/bin/h5cc -show -shlib", H5CC_OUTPUT)
            .with_lib("hdf5_hl");

        assert!(find(&mut env, &mut checker, &Options::default(), true).unwrap());
        assert!(find(&mut env, &mut checker, &Options::default(), true).unwrap());

        assert_eq!(checker.link_tests(), 1);
        assert_eq!(env.libs, vec!["hdf5_hl", "hdf5", "z", "m"]);
    }
}
