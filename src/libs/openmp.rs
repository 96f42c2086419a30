//! OpenMP, gated on a minimum specification version.
//!
//! `_OPENMP` expands to the release date of the newest specification the
//! compiler implements. The check program only has a `main` when that date
//! is at least the requested version's date, so it compiles exactly when the
//! version is supported.

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::{append_unique, BuildEnvironment};
use crate::configure::error::{not_found, ProbeResult};
use crate::configure::probe::{run_trial, unknown_version};

const NAME: &str = "OpenMP";

/// Compiler and linker flag enabling OpenMP.
pub const OPENMP_FLAG: &str = "-fopenmp";

/// Specification versions and their `_OPENMP` release dates.
pub const VERSIONS: &[(&str, u32)] = &[
    ("1.0", 199810),
    ("2.0", 200211),
    ("2.5", 200505),
    ("3.0", 200803),
    ("3.1", 201107),
    ("4.0", 201307),
    ("4.5", 201511),
];

/// OpenMP probe options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Minimum required specification version.
    pub version: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            version: "1.0".to_string(),
        }
    }
}

/// `_OPENMP` date of a specification version.
pub fn version_date(version: &str) -> Option<u32> {
    VERSIONS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, date)| *date)
}

/// Check program that compiles only if `_OPENMP >= date`.
pub fn version_check_source(date: u32) -> String {
    format!(
        "#if _OPENMP >= {}\nint main(int argc, char** argv) {{\n#endif\n\treturn 0;\n}}\n",
        date
    )
}

/// Find OpenMP support of at least `options.version`.
///
/// An unknown version is an error even for optional probes.
pub fn find(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    options: &Options,
    required: bool,
) -> ProbeResult {
    let date =
        version_date(&options.version).ok_or_else(|| unknown_version(NAME, &options.version))?;

    let found = run_trial(env, checker, |session| {
        append_unique(&mut session.env_mut().cflags, [OPENMP_FLAG.to_string()]);

        let label = format!("OpenMP v{}", options.version);
        if !session.try_compile(&label, &version_check_source(date), Language::C) {
            return Ok(false);
        }

        let env = session.env_mut();
        append_unique(&mut env.cxxflags, [OPENMP_FLAG.to_string()]);
        append_unique(&mut env.linkflags, [OPENMP_FLAG.to_string()]);
        Ok(true)
    })?;

    if found {
        Ok(true)
    } else {
        not_found(
            required,
            NAME,
            format!("OpenMP version {} not supported", options.version),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure::error::ConfigureError;
    use crate::test_support::FakeChecker;

    /// A compiler implementing the given `_OPENMP` date when `-fopenmp` is set.
    fn compiler(supported: u32) -> FakeChecker {
        FakeChecker::new().with_compile(move |env, source| {
            let enabled = env.cflags.iter().any(|f| f == OPENMP_FLAG);
            let wanted: u32 = source
                .lines()
                .next()
                .and_then(|line| line.strip_prefix("#if _OPENMP >= "))
                .and_then(|date| date.trim().parse().ok())
                .unwrap_or(0);
            enabled && supported >= wanted
        })
    }

    #[test]
    fn test_version_table() {
        assert_eq!(version_date("1.0"), Some(199810));
        assert_eq!(version_date("4.5"), Some(201511));
        assert_eq!(version_date("5.0"), None);
    }

    #[test]
    fn test_source_guards_main() {
        let source = version_check_source(201107);
        assert!(source.starts_with("#if _OPENMP >= 201107\nint main("));
        assert!(source.contains("#endif"));
    }

    #[test]
    fn test_supported_version_commits_flags() {
        let mut env = BuildEnvironment::new();
        let mut checker = compiler(201511);
        let options = Options {
            version: "3.1".to_string(),
        };

        assert!(find(&mut env, &mut checker, &options, true).unwrap());
        assert_eq!(env.cflags, vec!["-fopenmp"]);
        assert_eq!(env.cxxflags, vec!["-fopenmp"]);
        assert_eq!(env.linkflags, vec!["-fopenmp"]);
        assert_eq!(checker.compile_tests(), 1);
    }

    #[test]
    fn test_repeated_find_keeps_flags_unique() {
        let mut env = BuildEnvironment::new();
        let mut checker = compiler(201511);

        assert!(find(&mut env, &mut checker, &Options::default(), true).unwrap());
        assert!(find(&mut env, &mut checker, &Options::default(), true).unwrap());
        assert_eq!(env.cflags, vec!["-fopenmp"]);
        assert_eq!(env.cxxflags, vec!["-fopenmp"]);
        assert_eq!(env.linkflags, vec!["-fopenmp"]);
    }

    #[test]
    fn test_too_old_version_optional() {
        let mut env = BuildEnvironment::new();
        let mut checker = compiler(200805);
        let options = Options {
            version: "4.0".to_string(),
        };

        assert!(!find(&mut env, &mut checker, &options, false).unwrap());
        assert!(env.cflags.is_empty());

        let err = find(&mut env, &mut checker, &options, true).unwrap_err();
        assert_eq!(err.to_string(), "OpenMP version 4.0 not supported");
    }

    #[test]
    fn test_unknown_version_is_fatal_even_when_optional() {
        let mut env = BuildEnvironment::new();
        let mut checker = compiler(201511);
        let options = Options {
            version: "9.9".to_string(),
        };

        let err = find(&mut env, &mut checker, &options, false).unwrap_err();
        assert!(matches!(err, ConfigureError::UnknownVersion { .. }));
        assert_eq!(err.to_string(), "Unknown OpenMP version 9.9");
        assert_eq!(checker.compile_tests(), 0);
    }
}
