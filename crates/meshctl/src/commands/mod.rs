//! Command implementations

pub mod uninstall;
pub mod version;
