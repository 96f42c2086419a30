//! pkg-config queries.

use std::path::PathBuf;

use crate::configure::flags::{parse_flags, FlagSet};
use crate::configure::session::{report, ConfigureSession};

/// Name of the pkg-config program.
pub const PKG_CONFIG: &str = "pkg-config";

/// Locate pkg-config, at most once per environment.
///
/// The result (including "not found") is cached on the session's
/// environment, so later queries skip the lookup.
pub fn locate(session: &mut ConfigureSession<'_>) -> Option<PathBuf> {
    if let Some(cached) = &session.env().pkg_config {
        return cached.clone();
    }

    let found = session.check_prog(PKG_CONFIG);
    session.env_mut().pkg_config = Some(found.clone());
    found
}

/// Query pkg-config for `package`.
///
/// Runs `pkg-config --silence-errors <opts...> <package>` with the
/// environment's `PKG_CONFIG_PATH`. A missing pkg-config, a spawn failure or
/// a non-zero exit all give `None`.
pub fn query(session: &mut ConfigureSession<'_>, package: &str, opts: &[&str]) -> Option<FlagSet> {
    let program = locate(session)?;

    let mut args = Vec::with_capacity(opts.len() + 2);
    args.push("--silence-errors".to_string());
    args.extend(opts.iter().map(|opt| opt.to_string()));
    args.push(package.to_string());

    let output = session.read_output(&program, &args);
    report(
        &format!("Checking for pkg-config package {}...", package),
        output.is_some(),
    );

    let flags = parse_flags(&output?);
    tracing::debug!("pkg-config {}: {:?}", package, flags.to_args());
    Some(flags)
}
