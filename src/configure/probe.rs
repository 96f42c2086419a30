//! The capability-probe protocol.
//!
//! Every probe runs its checks on a trial clone of the build environment and
//! commits the clone only when the capability is found. A failed probe
//! therefore never leaks flags into the real environment.

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;
use crate::configure::error::{not_found, ConfigureError, ProbeResult};
use crate::configure::session::ConfigureSession;

/// One library requirement of a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySpec {
    /// Alternative library names, tried in order. Empty means "link without
    /// an extra library".
    pub candidates: Vec<String>,
    /// Header to include in the check program; `None` is a link-only check.
    pub header: Option<String>,
    /// Libraries linked after the candidate (link-order dependent).
    pub extra_libs: Vec<String>,
}

impl LibrarySpec {
    /// A single library without a header check.
    pub fn new(name: impl Into<String>) -> Self {
        LibrarySpec {
            candidates: vec![name.into()],
            header: None,
            extra_libs: Vec::new(),
        }
    }

    /// A single library checked together with its header.
    pub fn with_header(name: impl Into<String>, header: impl Into<String>) -> Self {
        LibrarySpec::new(name).header(header)
    }

    /// Alternative library names, first match wins.
    pub fn alternatives<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LibrarySpec {
            candidates: names.into_iter().map(Into::into).collect(),
            header: None,
            extra_libs: Vec::new(),
        }
    }

    /// Set the header.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Set the extra libraries.
    pub fn extra_libs<I, S>(mut self, libs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_libs = libs.into_iter().map(Into::into).collect();
        self
    }

    /// Name used in messages: the first candidate.
    pub fn display_name(&self) -> &str {
        self.candidates.first().map(String::as_str).unwrap_or("")
    }
}

/// How the library specs of a descriptor combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateMode {
    /// Every spec must link.
    #[default]
    AllRequired,
    /// The first spec that links wins; the rest are skipped.
    Alternatives,
}

/// What a probe is looking for.
#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    /// Capability name for messages
    pub name: String,
    /// Language of the check programs
    pub language: Language,
    /// Library requirements, in check order
    pub libraries: Vec<LibrarySpec>,
    /// How `libraries` combine
    pub mode: CandidateMode,
    /// Error message when the capability is missing; defaults to
    /// `Could not find <library>`.
    pub message: Option<String>,
}

impl CapabilityDescriptor {
    /// Create a descriptor with no library requirements.
    pub fn new(name: impl Into<String>, language: Language) -> Self {
        CapabilityDescriptor {
            name: name.into(),
            language,
            libraries: Vec::new(),
            mode: CandidateMode::AllRequired,
            message: None,
        }
    }

    /// Add a library requirement.
    pub fn library(mut self, spec: LibrarySpec) -> Self {
        self.libraries.push(spec);
        self
    }

    /// Set the combination mode.
    pub fn mode(mut self, mode: CandidateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the failure message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Run `checks` in a session on a trial clone of `env`.
///
/// The clone replaces `env` only if `checks` returns `Ok(true)`. The session
/// is closed on every path, including errors.
pub fn run_trial<F>(env: &mut BuildEnvironment, checker: &mut dyn Checker, checks: F) -> ProbeResult
where
    F: FnOnce(&mut ConfigureSession<'_>) -> ProbeResult,
{
    let mut trial = env.clone();
    let found = {
        let mut session = ConfigureSession::open(&mut trial, checker);
        let found = checks(&mut session);
        session.finish();
        found
    }?;

    if found {
        *env = trial;
    }
    Ok(found)
}

/// Run the library checks of a descriptor in an open session.
///
/// On failure returns the name of the library that was missing.
pub fn check_libraries(
    session: &mut ConfigureSession<'_>,
    descriptor: &CapabilityDescriptor,
) -> Result<(), String> {
    match descriptor.mode {
        CandidateMode::AllRequired => {
            for spec in &descriptor.libraries {
                if !session.check_lib(spec, descriptor.language) {
                    return Err(spec.display_name().to_string());
                }
            }
            Ok(())
        }
        CandidateMode::Alternatives => {
            if descriptor.libraries.is_empty() {
                return Ok(());
            }
            for spec in &descriptor.libraries {
                if session.check_lib(spec, descriptor.language) {
                    return Ok(());
                }
            }
            Err(descriptor.name.clone())
        }
    }
}

/// Probe a capability described purely by its libraries.
///
/// `Ok(true)`: found, and `env` now carries its flags. `Ok(false)`: missing
/// and optional, `env` untouched. `Err(MissingCapability)`: missing and
/// required, `env` untouched.
pub fn probe(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    descriptor: &CapabilityDescriptor,
    required: bool,
) -> ProbeResult {
    let mut missing = None;
    let found = run_trial(env, checker, |session| {
        match check_libraries(session, descriptor) {
            Ok(()) => Ok(true),
            Err(lib) => {
                missing = Some(lib);
                Ok(false)
            }
        }
    })?;

    if found {
        return Ok(true);
    }

    let message = descriptor.message.clone().unwrap_or_else(|| {
        format!(
            "Could not find {}",
            missing.as_deref().unwrap_or(descriptor.name.as_str())
        )
    });
    not_found(required, descriptor.name.clone(), message)
}

/// Fail a probe with an unknown-version error.
pub fn unknown_version(capability: &str, version: &str) -> ConfigureError {
    ConfigureError::UnknownVersion {
        capability: capability.to_string(),
        version: version.to_string(),
    }
}
