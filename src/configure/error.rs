//! Fatal configuration errors.

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// A configuration failure that makes the rest of the build meaningless.
///
/// Probes return this instead of terminating the process. The caller that
/// owns the process turns it into an exit status.
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("{message}")]
    MissingCapability { capability: String, message: String },

    #[error("Unknown {capability} version {version}")]
    UnknownVersion { capability: String, version: String },

    #[error("The following build variables are unknown: {}", .names.join(", "))]
    UnknownVariables { names: Vec<String> },

    #[error("invalid value for build variable `{name}`: {reason}")]
    InvalidVariable { name: String, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigureError {
    /// Shorthand for a missing required capability.
    pub fn missing(capability: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigureError::MissingCapability {
            capability: capability.into(),
            message: message.into(),
        }
    }

    /// Name of the capability this error is about, if any.
    pub fn capability(&self) -> Option<&str> {
        match self {
            ConfigureError::MissingCapability { capability, .. }
            | ConfigureError::UnknownVersion { capability, .. } => Some(capability),
            _ => None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ConfigureError::MissingCapability { message, .. } if message.contains("pkg-config") => {
                diag.with_suggestion(suggestions::PKG_CONFIG_PATH)
            }
            ConfigureError::MissingCapability { .. } => {
                diag.with_suggestion(suggestions::PREFIX_PATH)
            }
            ConfigureError::UnknownVariables { .. } | ConfigureError::InvalidVariable { .. } => {
                diag.with_suggestion(suggestions::LIST_VARIABLES)
            }
            _ => diag,
        }
    }
}

/// Outcome of a probe: `Ok(true)` found and configured, `Ok(false)` absent
/// but optional.
pub type ProbeResult = Result<bool, ConfigureError>;

/// Resolve a failed probe according to `required`.
pub fn not_found(
    required: bool,
    capability: impl Into<String>,
    message: impl Into<String>,
) -> ProbeResult {
    if required {
        Err(ConfigureError::missing(capability, message))
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_optional() {
        assert!(!not_found(false, "metis", "Could not find metis").unwrap());
    }

    #[test]
    fn test_not_found_required() {
        let err = not_found(true, "metis", "Could not find metis").unwrap_err();
        assert_eq!(err.capability(), Some("metis"));
        assert_eq!(err.to_string(), "Could not find metis");
    }

    #[test]
    fn test_unknown_variables_message() {
        let err = ConfigureError::UnknownVariables {
            names: vec!["foo".to_string(), "bar".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "The following build variables are unknown: foo, bar"
        );
        assert!(err.to_diagnostic().format(false).contains("vars --help-vars"));
    }
}
