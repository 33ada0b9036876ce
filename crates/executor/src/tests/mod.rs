//! Test modules for the executor crate.

pub mod access_mode;
pub mod persistence;
pub mod session;
