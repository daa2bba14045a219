//! CLI module for the tab-notify demo binary.
//!
//! This module contains:
//! - `commands`: clap argument definitions and config building
//! - `display`: formatted terminal output
//! - `demo`: the interactive demo session with its simulated page

pub mod commands;
pub mod demo;
pub mod display;

pub use commands::{Cli, Commands, RenderArgs, RunArgs};
pub use demo::{DemoCommand, TerminalPage};
pub use display::Display;
