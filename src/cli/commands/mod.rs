//! Subcommands of the `smartcab` binary

pub mod train;
