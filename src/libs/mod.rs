//! Library probes.
//!
//! Every probe has the same entry point:
//!
//! ```rust,ignore
//! pub fn find(env: &mut BuildEnvironment, checker: &mut dyn Checker, options: &Options, required: bool) -> ProbeResult
//! ```
//!
//! `Ok(true)` means the library was found and `env` now carries its flags.

pub mod apf;
pub mod asagi;
pub mod hdf5;
pub mod metis;
pub mod openmp;
pub mod simmodsuite;
