//! METIS, and ParMETIS for parallel builds.

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;
use crate::configure::error::ProbeResult;
use crate::configure::probe::{probe, CapabilityDescriptor, LibrarySpec};

/// METIS probe options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Also require ParMETIS, which links ahead of METIS.
    pub parallel: bool,
}

/// What the METIS probe checks for.
pub fn descriptor(options: &Options) -> CapabilityDescriptor {
    let mut descriptor = CapabilityDescriptor::new("metis", Language::C);
    if options.parallel {
        descriptor = descriptor.library(LibrarySpec::with_header("parmetis", "parmetis.h"));
    }
    descriptor.library(LibrarySpec::with_header("metis", "metis.h"))
}

/// Find METIS and add it to `env`.
pub fn find(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    options: &Options,
    required: bool,
) -> ProbeResult {
    probe(env, checker, &descriptor(options), required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeChecker;

    #[test]
    fn test_serial_checks_only_metis() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new().with_lib("metis");

        assert!(find(&mut env, &mut checker, &Options::default(), true).unwrap());
        assert_eq!(env.libs, vec!["metis"]);
        assert_eq!(checker.link_tests(), 1);
    }

    #[test]
    fn test_parallel_needs_parmetis() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new().with_lib("metis");
        let options = Options { parallel: true };

        let err = find(&mut env, &mut checker, &options, true).unwrap_err();
        assert_eq!(err.to_string(), "Could not find parmetis");
        // parmetis failed first, so metis was never tried
        assert_eq!(checker.link_tests(), 1);
        assert!(env.libs.is_empty());
    }

    #[test]
    fn test_parallel_link_order() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new().with_lib("parmetis").with_lib("metis");
        let options = Options { parallel: true };

        assert!(find(&mut env, &mut checker, &options, false).unwrap());
        assert_eq!(env.libs, vec!["parmetis", "metis"]);
    }
}
