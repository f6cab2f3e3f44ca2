//! CLI commands

pub mod asset;
