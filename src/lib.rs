//! chipsec-build: conditional build pipeline for the chipsec package.
//!
//! Decides per platform what gets compiled and shipped, builds the linux
//! kernel driver out of tree, and composes the package manifest.

pub mod build;
pub mod clean;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod install;
pub mod layout;
pub mod manifest;
pub mod platform;
pub mod preflight;
pub mod process;
pub mod timing;
