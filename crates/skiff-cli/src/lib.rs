//! Library surface of the Skiff CLI.
//!
//! Commands are thin: preset resolution lives in `skiff-preset`, adapters in
//! `skiff-runtime`. This crate wires them to argument parsing, configuration
//! loading, and the development server.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;
