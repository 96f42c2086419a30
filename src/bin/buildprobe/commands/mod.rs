//! Command implementations

pub mod cmake;
pub mod flags;
pub mod probe;
pub mod vars;
