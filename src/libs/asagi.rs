//! ASAGI, located through pkg-config.

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;
use crate::configure::error::{not_found, ProbeResult};
use crate::configure::merge::{merge, MergeOptions};
use crate::configure::pkgconfig;
use crate::configure::probe::{run_trial, LibrarySpec};

const NAME: &str = "asagi";

const PKG_CONFIG_OPTIONS: &[&str] = &["--libs", "--static", "--cflags"];

const NO_PACKAGE: &str = "Could not find ASAGI with pkg-config: Make sure pkg-config is installed and PKG_CONFIG_PATH contains asagi.pc";
const NO_LIBRARY: &str = "Could not find ASAGI";

/// Define required by the serial ASAGI headers.
pub const NOMPI_DEFINE: &str = "ASAGI_NOMPI";

/// ASAGI probe options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Use the MPI build of ASAGI instead of `asagi_nompi`.
    pub parallel: bool,
}

/// pkg-config package name.
pub fn package(parallel: bool) -> &'static str {
    if parallel {
        "asagi"
    } else {
        "asagi_nompi"
    }
}

/// Find ASAGI and add its flags to `env`.
pub fn find(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    options: &Options,
    required: bool,
) -> ProbeResult {
    let mut failure = NO_LIBRARY;

    let found = run_trial(env, checker, |session| {
        let package = package(options.parallel);
        if !options.parallel {
            session
                .env_mut()
                .append_cppdefines([NOMPI_DEFINE.to_string()]);
        }

        let Some(flags) = pkgconfig::query(session, package, PKG_CONFIG_OPTIONS) else {
            failure = NO_PACKAGE;
            return Ok(false);
        };
        merge(session.env_mut(), &flags, MergeOptions::default());

        let Some((first, extras)) = flags.libs().split_first() else {
            tracing::debug!("pkg-config names no libraries for {}", package);
            return Ok(false);
        };

        let spec =
            LibrarySpec::with_header(first.as_str(), "asagi.h").extra_libs(extras.iter().cloned());
        Ok(session.check_lib(&spec, Language::Cxx))
    })?;

    if found {
        Ok(true)
    } else {
        not_found(required, NAME, failure)
    }
}
