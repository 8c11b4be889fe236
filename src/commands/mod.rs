//! Subcommand handlers for the `tsr` binary.

pub mod config;
pub mod convert;
pub mod info;
pub mod play;
pub mod state;
