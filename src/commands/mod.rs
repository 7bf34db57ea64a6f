//! CLI commands

pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod reset;
pub mod set;
pub mod show;
