//! Command implementations

pub mod init;
pub mod package;
pub mod validate;
