//! CLI subcommands

pub mod simulate;
