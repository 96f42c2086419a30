//! External build drivers.
//!
//! The toolchain compiles and links check programs; the CMake adapter
//! builds external projects.

pub mod cmake;
pub mod toolchain;

pub use cmake::CMakeBuilder;
pub use toolchain::{detect_toolchain, CommandSpec, GccToolchain, Language, Toolchain};
