//! Command definitions for the tab-notify demo CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::types::{
    GlyphIcon, IconDescriptor, NotificationConfig, TitleSpec, TriggerMode,
    DEFAULT_GLYPH_SIZE, DEFAULT_ICON_INTERVAL_MS, DEFAULT_TITLE_INTERVAL_MS,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// Tab notification demo CLI
#[derive(Parser, Debug)]
#[command(
    name = "tab-notify",
    version,
    about = "Cycle a page title and favicon to call attention to a backgrounded tab",
    long_about = "Interactive demo of the tab notification controller.\n\
                  A simulated page runs in your terminal; configure the attention\n\
                  title, icon cycle, and trigger mode, then drive it with start/stop\n\
                  commands or simulated visibility changes.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive demo session
    Run(RunArgs),

    /// Render a single glyph icon and print its data URL
    Render(RenderArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Attention title; repeat the flag to cycle through several titles
    #[arg(short, long)]
    pub title: Vec<String>,

    /// Comma-separated glyphs rendered as generated icons (e.g. "🔔,📬")
    #[arg(short, long)]
    pub glyphs: Option<String>,

    /// Background color for generated glyph icons (CSS color)
    #[arg(short, long)]
    pub background: Option<String>,

    /// Canvas size in pixels for generated glyph icons
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_GLYPH_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=512)
    )]
    pub size: u32,

    /// Comma-separated icon URLs, used instead of generated glyphs
    #[arg(long, conflicts_with = "glyphs")]
    pub icon_urls: Option<String>,

    /// Milliseconds between icon frames
    #[arg(long, default_value_t = DEFAULT_ICON_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub icon_interval: u64,

    /// Milliseconds between title frames (multi-title runs only)
    #[arg(long, default_value_t = DEFAULT_TITLE_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub title_interval: u64,

    /// Trigger mode: automatic, manual, or split:<title>,<icon>
    /// where each part is `manual` or `auto`
    #[arg(short, long, default_value = "manual", value_parser = parse_trigger_mode)]
    pub mode: TriggerMode,

    /// Load the full configuration from a JSON file instead of flags
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Original title of the simulated page
    #[arg(long, default_value = "My Application")]
    pub page_title: String,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            title: Vec::new(),
            glyphs: None,
            background: None,
            size: DEFAULT_GLYPH_SIZE,
            icon_urls: None,
            icon_interval: DEFAULT_ICON_INTERVAL_MS,
            title_interval: DEFAULT_TITLE_INTERVAL_MS,
            mode: TriggerMode::Manual,
            config: None,
            page_title: "My Application".to_string(),
        }
    }
}

impl RunArgs {
    /// Builds the notification configuration from the parsed flags, or loads
    /// it from the JSON file when `--config` is given.
    pub fn build_config(&self) -> anyhow::Result<NotificationConfig> {
        if let Some(path) = &self.config {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config: NotificationConfig = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            config.validate()?;
            return Ok(config);
        }

        let title = match self.title.len() {
            0 => None,
            1 => Some(TitleSpec::Single(self.title[0].clone())),
            _ => Some(TitleSpec::Sequence(self.title.clone())),
        };

        let icons: Vec<IconDescriptor> = if let Some(urls) = &self.icon_urls {
            parse_list(urls).map(IconDescriptor::Url).collect()
        } else if let Some(glyphs) = &self.glyphs {
            parse_list(glyphs)
                .map(|glyph| {
                    let mut icon = GlyphIcon::new(glyph).with_size(self.size);
                    if let Some(color) = &self.background {
                        icon = icon.with_background(color.clone());
                    }
                    IconDescriptor::Glyph(icon)
                })
                .collect()
        } else {
            Vec::new()
        };

        let config = NotificationConfig {
            title,
            icons,
            icon_interval_ms: self.icon_interval,
            title_interval_ms: self.title_interval,
            trigger_mode: self.mode,
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Render Command Arguments
// ============================================================================

/// Arguments for the render command
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Glyph to render (usually an emoji)
    pub glyph: String,

    /// Background color (CSS color; omitted means transparent)
    #[arg(short, long)]
    pub background: Option<String>,

    /// Canvas size in pixels
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_GLYPH_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=512)
    )]
    pub size: u32,
}

impl RenderArgs {
    /// Builds the glyph descriptor for this invocation.
    pub fn glyph_icon(&self) -> GlyphIcon {
        let mut icon = GlyphIcon::new(self.glyph.clone()).with_size(self.size);
        if let Some(color) = &self.background {
            icon = icon.with_background(color.clone());
        }
        icon
    }
}

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parses a trigger mode flag value.
///
/// Accepts `automatic`, `auto`, `manual`, or `split:<title>,<icon>` with
/// each part being `manual` or `auto`.
fn parse_trigger_mode(value: &str) -> Result<TriggerMode, String> {
    match value {
        "automatic" | "auto" => return Ok(TriggerMode::Automatic),
        "manual" => return Ok(TriggerMode::Manual),
        _ => {}
    }

    if let Some(rest) = value.strip_prefix("split:") {
        let parts: Vec<&str> = rest.split(',').collect();
        if parts.len() == 2 {
            return Ok(TriggerMode::Split {
                title_manual: parse_split_part(parts[0])?,
                icon_manual: parse_split_part(parts[1])?,
            });
        }
        return Err("split mode takes exactly two parts, e.g. split:manual,auto".to_string());
    }

    Err(format!(
        "expected `automatic`, `manual`, or `split:<title>,<icon>`, got `{value}`"
    ))
}

fn parse_split_part(part: &str) -> Result<bool, String> {
    match part.trim() {
        "manual" => Ok(true),
        "auto" | "automatic" => Ok(false),
        other => Err(format!("expected `manual` or `auto`, got `{other}`")),
    }
}

/// Splits a comma-separated flag value, trimming and dropping empty entries.
fn parse_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
}

// ============================================================================
// Tests
// ============================================================================
