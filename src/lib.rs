//! Tab Notification Library
//!
//! This library provides the core functionality for the tab-notify demo CLI.
//! It includes:
//! - A notification controller that cycles the page title and icon between
//!   a normal state and an attention state, restoring the original exactly
//! - A page chrome abstraction with an in-memory mock for tests
//! - Glyph-to-icon rasterization (resvg) with a best-effort contract
//! - A visibility signal for automatic, tab-switch-driven activation
//! - CLI command parsing and display utilities for the interactive demo

pub mod cli;
pub mod controller;
pub mod page;
pub mod render;
pub mod types;
pub mod visibility;

// Re-export commonly used types for convenience
pub use controller::NotificationController;
pub use page::{IconLink, MockPage, PageChrome, GENERIC_ICON_REL, TOUCH_ICON_REL};
pub use render::{IconRenderer, MockIconRenderer, RasterGlyphRenderer};
pub use types::{
    ConfigError, GlyphIcon, IconDescriptor, NotificationConfig, TitleSpec, TriggerMode,
};
pub use visibility::{Visibility, VisibilitySignal};
