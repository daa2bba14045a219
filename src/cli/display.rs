//! Display utilities for the tab-notify demo CLI.
//!
//! This module provides formatted output for:
//! - The startup banner with the effective configuration
//! - Simulated page mutations (title and icon changes)
//! - Status and error messages

use crate::types::NotificationConfig;

/// Longest icon reference printed before truncation. Data URLs run to
/// kilobytes; the prefix is enough to identify a frame.
const MAX_HREF_DISPLAY: usize = 48;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the startup banner with the effective configuration as JSON.
    pub fn show_banner(config: &NotificationConfig) {
        println!("tab-notify demo");
        println!("───────────────");
        match serde_json::to_string_pretty(config) {
            Ok(json) => {
                println!("configuration:");
                println!("{json}");
            }
            Err(_) => println!("configuration: <unprintable>"),
        }
        println!();
        Self::show_help();
    }

    /// Shows the command reference.
    pub fn show_help() {
        println!("commands:");
        println!("  start   - start the notification");
        println!("  stop    - stop and restore the page");
        println!("  toggle  - start or stop, whichever applies");
        println!("  hide    - simulate the tab going to the background");
        println!("  show    - simulate the tab returning to the foreground");
        println!("  status  - print the current state");
        println!("  help    - show this reference");
        println!("  quit    - restore the page and exit");
    }

    /// Shows the controller and tab state.
    pub fn show_status(active: bool, hidden: bool) {
        println!(
            "status: {}",
            if active {
                "active (notification running)"
            } else {
                "inactive (ready to start)"
            }
        );
        println!("tab:    {}", if hidden { "hidden" } else { "visible" });
    }

    /// Shows a simulated title change.
    pub fn show_title_change(title: &str) {
        println!("[tab] title -> {title:?}");
    }

    /// Shows a simulated icon change.
    pub fn show_icon_change(rel: &str, href: Option<&str>) {
        match href {
            Some(href) => println!("[tab] {rel} -> {}", Self::truncate_href(href)),
            None => println!("[tab] {rel} -> (none)"),
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {message}");
    }

    /// Truncates a long icon reference for display.
    fn truncate_href(href: &str) -> String {
        if href.chars().count() <= MAX_HREF_DISPLAY {
            return href.to_string();
        }
        let prefix: String = href.chars().take(MAX_HREF_DISPLAY).collect();
        format!("{prefix}… ({} bytes)", href.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
