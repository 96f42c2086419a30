//! Scoped configuration-check sessions.
//!
//! A session borrows a build environment and a checker for the duration of
//! one probe. It must be closed exactly once: either explicitly with
//! [`ConfigureSession::finish`] or implicitly when dropped. Closing releases
//! the checker's temporary artifacts.

use std::path::{Path, PathBuf};

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;
use crate::configure::probe::LibrarySpec;

/// An open configuration-check session.
pub struct ConfigureSession<'a> {
    env: &'a mut BuildEnvironment,
    checker: &'a mut dyn Checker,
    closed: bool,
}

impl<'a> ConfigureSession<'a> {
    /// Open a session on `env`.
    pub fn open(env: &'a mut BuildEnvironment, checker: &'a mut dyn Checker) -> Self {
        tracing::trace!("opening configure session");
        ConfigureSession {
            env,
            checker,
            closed: false,
        }
    }

    /// The environment this session configures.
    pub fn env(&self) -> &BuildEnvironment {
        self.env
    }

    /// Mutable access to the environment this session configures.
    pub fn env_mut(&mut self) -> &mut BuildEnvironment {
        self.env
    }

    /// Check whether a program exists; returns its path.
    pub fn check_prog(&mut self, name: &str) -> Option<PathBuf> {
        let path = self.checker.find_program(self.env, name);
        report(
            &format!("Checking whether {} program exists...", name),
            path.is_some(),
        );
        path
    }

    /// Link-test a library, with its header if the spec names one.
    ///
    /// Candidates are tried in order and the first that links is appended to
    /// `LIBS` together with the spec's extra libraries. A candidate already
    /// in `LIBS` counts as found without running a test; this assumes no two
    /// capabilities share a library name.
    pub fn check_lib(&mut self, spec: &LibrarySpec, lang: Language) -> bool {
        if let Some(found) = self.env.linked_candidate(&spec.candidates) {
            report(&format!("Checking for {} library {}...", lang, found), true);
            return true;
        }

        let source = check_program_source(spec.header.as_deref(), lang);

        if spec.candidates.is_empty() {
            let found = self.link(&source, &spec.extra_libs, lang);
            report(&format!("Checking for {} program linking...", lang), found);
            if found {
                self.env.append_libs(spec.extra_libs.iter().cloned());
            }
            return found;
        }

        for candidate in &spec.candidates {
            let mut libs = Vec::with_capacity(spec.extra_libs.len() + 1);
            libs.push(candidate.clone());
            libs.extend(spec.extra_libs.iter().cloned());

            let found = self.link(&source, &libs, lang);
            report(
                &format!("Checking for {} library {}...", lang, candidate),
                found,
            );
            if found {
                self.env.append_libs(libs);
                return true;
            }
        }

        false
    }

    /// Compile a custom test program.
    pub fn try_compile(&mut self, label: &str, source: &str, lang: Language) -> bool {
        let found = match self.checker.try_compile(self.env, source, lang) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::debug!("compile check failed to run: {:#}", e);
                false
            }
        };
        report(&format!("Checking for {}...", label), found);
        found
    }

    /// Run an external tool and return its stdout.
    ///
    /// Spawn failures and failure exit statuses both yield `None`.
    pub fn read_output(&mut self, program: &Path, args: &[String]) -> Option<String> {
        match self.checker.capture_output(self.env, program, args) {
            Ok(out) => out,
            Err(e) => {
                tracing::debug!("{:#}", e);
                None
            }
        }
    }

    /// Close the session.
    pub fn finish(mut self) {
        self.close();
    }

    fn link(&mut self, source: &str, libs: &[String], lang: Language) -> bool {
        match self.checker.try_link(self.env, source, libs, lang) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::debug!("link check failed to run: {:#}", e);
                false
            }
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.checker.cleanup();
            self.closed = true;
            tracing::trace!("configure session closed");
        }
    }
}

impl Drop for ConfigureSession<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Source of a link-check program including an optional header.
pub fn check_program_source(header: Option<&str>, lang: Language) -> String {
    let mut source = String::new();
    if let Some(header) = header {
        source.push_str(&format!("#include \"{}\"\n", header));
    }
    match lang {
        Language::C => source.push_str("\nint main(void) {\n\treturn 0;\n}\n"),
        Language::Cxx => source.push_str("\nint main() {\n\treturn 0;\n}\n"),
    }
    source
}

/// Print a `Checking ... yes/no` status line.
pub(crate) fn report(message: &str, found: bool) {
    tracing::info!("{} {}", message, if found { "yes" } else { "no" });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeChecker;

    #[test]
    fn test_check_lib_memoized_when_already_linked() {
        let mut env = BuildEnvironment::new();
        env.append_libs(["metis".to_string()]);
        let mut checker = FakeChecker::new();

        let mut session = ConfigureSession::open(&mut env, &mut checker);
        assert!(session.check_lib(&LibrarySpec::with_header("metis", "metis.h"), Language::C));
        session.finish();

        assert_eq!(checker.link_tests(), 0);
        assert_eq!(env.libs, vec!["metis"]);
    }

    #[test]
    fn test_check_lib_first_alternative_wins() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new().with_lib("SimParasolid270").with_lib("SimParasolid280");

        let spec = LibrarySpec::alternatives([
            "SimParasolid260",
            "SimParasolid270",
            "SimParasolid280",
        ]);
        let mut session = ConfigureSession::open(&mut env, &mut checker);
        assert!(session.check_lib(&spec, Language::Cxx));
        session.finish();

        assert_eq!(env.libs, vec!["SimParasolid270"]);
        assert_eq!(checker.link_tests(), 2);
    }

    #[test]
    fn test_check_lib_appends_extras_in_order() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new().with_lib("hdf5");

        let spec = LibrarySpec::with_header("hdf5", "hdf5.h").extra_libs(["z", "m"]);
        let mut session = ConfigureSession::open(&mut env, &mut checker);
        assert!(session.check_lib(&spec, Language::C));
        drop(session);

        assert_eq!(env.libs, vec!["hdf5", "z", "m"]);
        assert!(checker.last_source().unwrap().contains("#include \"hdf5.h\""));
    }

    #[test]
    fn test_session_closed_exactly_once() {
        let mut env = BuildEnvironment::new();
        let mut checker = FakeChecker::new();

        let session = ConfigureSession::open(&mut env, &mut checker);
        session.finish();
        assert_eq!(checker.cleanups(), 1);

        {
            let _session = ConfigureSession::open(&mut env, &mut checker);
        }
        assert_eq!(checker.cleanups(), 2);
    }

    #[test]
    fn test_check_program_source() {
        let c = check_program_source(Some("metis.h"), Language::C);
        assert!(c.starts_with("#include \"metis.h\"\n"));
        assert!(c.contains("int main(void)"));

        let cxx = check_program_source(None, Language::Cxx);
        assert!(!cxx.contains("#include"));
        assert!(cxx.contains("int main()"));
    }
}
