//! Configuration checks and the capability-probe protocol.
//!
//! A probe clones the [`BuildEnvironment`] into a trial, opens a
//! [`ConfigureSession`] on it, runs checks through a [`Checker`], folds the
//! flags it discovers into the trial with [`merge`], and commits the trial
//! only on success.

pub mod checker;
pub mod environment;
pub mod error;
pub mod flags;
pub mod merge;
pub mod pkgconfig;
pub mod probe;
pub mod session;

pub use checker::{Checker, ToolchainChecker};
pub use environment::BuildEnvironment;
pub use error::{ConfigureError, ProbeResult};
pub use flags::{parse_flags, parse_wrapper_output, FlagCategory, FlagSet};
pub use merge::{apply_prefix_paths, merge, MergeOptions, PrefixOptions};
pub use probe::{probe, CandidateMode, CapabilityDescriptor, LibrarySpec};
pub use session::ConfigureSession;
