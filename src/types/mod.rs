//! Core data types for the tab notification controller.
//!
//! This module defines the data structures used for:
//! - Notification configuration with validation
//! - Title and icon descriptors
//! - Trigger mode selection (automatic / manual / split)

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};

/// Default interval between icon frames in milliseconds.
pub const DEFAULT_ICON_INTERVAL_MS: u64 = 1000;

/// Default interval between title frames in milliseconds.
///
/// Deliberately slower than the icon default so multi-title flipping
/// stays readable.
pub const DEFAULT_TITLE_INTERVAL_MS: u64 = 1500;

/// Default canvas size in pixels for generated glyph icons.
pub const DEFAULT_GLYPH_SIZE: u32 = 32;

// ============================================================================
// TitleSpec
// ============================================================================

/// The title (or titles) displayed while a notification is active.
///
/// Serializes untagged: a single string or a list of strings, matching the
/// host-facing configuration shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleSpec {
    /// One title, applied once on activation.
    Single(String),
    /// An ordered sequence of titles, cycled on a timer.
    Sequence(Vec<String>),
}

impl TitleSpec {
    /// Returns the number of configured titles.
    pub fn len(&self) -> usize {
        match self {
            TitleSpec::Single(_) => 1,
            TitleSpec::Sequence(titles) => titles.len(),
        }
    }

    /// Returns true if no titles are configured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the first title, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            TitleSpec::Single(title) => Some(title),
            TitleSpec::Sequence(titles) => titles.first().map(String::as_str),
        }
    }

    /// Returns the title at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            TitleSpec::Single(title) => (index == 0).then_some(title.as_str()),
            TitleSpec::Sequence(titles) => titles.get(index).map(String::as_str),
        }
    }
}

impl From<&str> for TitleSpec {
    fn from(title: &str) -> Self {
        TitleSpec::Single(title.to_string())
    }
}

impl From<Vec<String>> for TitleSpec {
    fn from(titles: Vec<String>) -> Self {
        TitleSpec::Sequence(titles)
    }
}

// ============================================================================
// IconDescriptor
// ============================================================================

/// A single entry in the icon cycle.
///
/// Serializes untagged: a plain string is a direct image reference, an
/// object is a generated-glyph descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconDescriptor {
    /// A direct image reference (URL or path), applied verbatim.
    Url(String),
    /// A glyph rendered onto an offscreen raster surface.
    Glyph(GlyphIcon),
}

/// Instructions for synthesizing an icon from a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphIcon {
    /// The glyph (usually an emoji) drawn centered on the canvas.
    pub glyph: String,
    /// Background fill color (CSS color). `None` means transparent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Canvas size in pixels. `None` means [`DEFAULT_GLYPH_SIZE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl GlyphIcon {
    /// Creates a glyph descriptor with default background and size.
    pub fn new(glyph: impl Into<String>) -> Self {
        Self {
            glyph: glyph.into(),
            background_color: None,
            size: None,
        }
    }

    /// Sets the background color.
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Sets the canvas size in pixels.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Returns the effective canvas size.
    pub fn effective_size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_GLYPH_SIZE)
    }
}

impl From<GlyphIcon> for IconDescriptor {
    fn from(glyph: GlyphIcon) -> Self {
        IconDescriptor::Glyph(glyph)
    }
}

impl From<&str> for IconDescriptor {
    fn from(url: &str) -> Self {
        IconDescriptor::Url(url.to_string())
    }
}

// ============================================================================
// TriggerMode
// ============================================================================

/// Policy governing whether activation follows page visibility or only
/// explicit calls.
///
/// Serializes as the string `"automatic"` or `"manual"`, or as an object
/// `{"title": bool, "icon": bool}` of per-part manual flags for split mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TriggerModeRepr", into = "TriggerModeRepr")]
pub enum TriggerMode {
    /// Both title and icon react to visibility changes.
    Automatic,
    /// Both title and icon are driven only by explicit calls.
    Manual,
    /// Title and icon each follow their own manual flag.
    Split {
        /// When true, the title cycle ignores visibility changes.
        title_manual: bool,
        /// When true, the icon cycle ignores visibility changes.
        icon_manual: bool,
    },
}

impl TriggerMode {
    /// Returns true if the title cycle follows the visibility signal.
    pub fn title_is_automatic(&self) -> bool {
        match self {
            TriggerMode::Automatic => true,
            TriggerMode::Manual => false,
            TriggerMode::Split { title_manual, .. } => !title_manual,
        }
    }

    /// Returns true if the icon cycle follows the visibility signal.
    pub fn icon_is_automatic(&self) -> bool {
        match self {
            TriggerMode::Automatic => true,
            TriggerMode::Manual => false,
            TriggerMode::Split { icon_manual, .. } => !icon_manual,
        }
    }

    /// Returns true if at least one cycle follows the visibility signal.
    pub fn any_automatic(&self) -> bool {
        self.title_is_automatic() || self.icon_is_automatic()
    }
}

impl Default for TriggerMode {
    fn default() -> Self {
        TriggerMode::Automatic
    }
}

/// Serde surface for [`TriggerMode`]: a preset name or per-part flags.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TriggerModeRepr {
    Preset(String),
    Flags { title: bool, icon: bool },
}

impl TryFrom<TriggerModeRepr> for TriggerMode {
    type Error = ConfigError;

    fn try_from(repr: TriggerModeRepr) -> Result<Self, Self::Error> {
        match repr {
            TriggerModeRepr::Preset(name) => match name.as_str() {
                "automatic" => Ok(TriggerMode::Automatic),
                "manual" => Ok(TriggerMode::Manual),
                other => Err(ConfigError::UnknownTriggerMode(other.to_string())),
            },
            TriggerModeRepr::Flags { title, icon } => Ok(TriggerMode::Split {
                title_manual: title,
                icon_manual: icon,
            }),
        }
    }
}

impl From<TriggerMode> for TriggerModeRepr {
    fn from(mode: TriggerMode) -> Self {
        match mode {
            TriggerMode::Automatic => TriggerModeRepr::Preset("automatic".to_string()),
            TriggerMode::Manual => TriggerModeRepr::Preset("manual".to_string()),
            TriggerMode::Split {
                title_manual,
                icon_manual,
            } => TriggerModeRepr::Flags {
                title: title_manual,
                icon: icon_manual,
            },
        }
    }
}

// ============================================================================
// NotificationConfig
// ============================================================================

/// Configuration for one notification controller, immutable per activation
/// cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    /// Title(s) shown while the notification is active. `None` leaves the
    /// page title untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSpec>,
    /// Ordered icon cycle. Empty means the icon is left untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<IconDescriptor>,
    /// Milliseconds between icon frames.
    #[serde(rename = "iconInterval", default = "default_icon_interval")]
    pub icon_interval_ms: u64,
    /// Milliseconds between title frames (sequence titles only).
    #[serde(rename = "titleInterval", default = "default_title_interval")]
    pub title_interval_ms: u64,
    /// Activation policy.
    #[serde(rename = "triggerMode", default)]
    pub trigger_mode: TriggerMode,
}

fn default_icon_interval() -> u64 {
    DEFAULT_ICON_INTERVAL_MS
}

fn default_title_interval() -> u64 {
    DEFAULT_TITLE_INTERVAL_MS
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: None,
            icons: Vec::new(),
            icon_interval_ms: DEFAULT_ICON_INTERVAL_MS,
            title_interval_ms: DEFAULT_TITLE_INTERVAL_MS,
            trigger_mode: TriggerMode::default(),
        }
    }
}

impl NotificationConfig {
    /// Sets the title spec.
    pub fn with_title(mut self, title: impl Into<TitleSpec>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the icon cycle.
    pub fn with_icons(mut self, icons: Vec<IconDescriptor>) -> Self {
        self.icons = icons;
        self
    }

    /// Sets the icon interval in milliseconds.
    pub fn with_icon_interval(mut self, millis: u64) -> Self {
        self.icon_interval_ms = millis;
        self
    }

    /// Sets the title interval in milliseconds.
    pub fn with_title_interval(mut self, millis: u64) -> Self {
        self.title_interval_ms = millis;
        self
    }

    /// Sets the trigger mode.
    pub fn with_trigger_mode(mut self, mode: TriggerMode) -> Self {
        self.trigger_mode = mode;
        self
    }

    /// Returns the number of titles configured.
    pub fn title_count(&self) -> usize {
        self.title.as_ref().map_or(0, TitleSpec::len)
    }

    /// Validates the configuration.
    ///
    /// An entirely empty configuration (no title, no icons) is valid; it
    /// activates without any visible mutation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.icon_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("icon"));
        }
        if self.title_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("title"));
        }
        if let Some(TitleSpec::Sequence(titles)) = &self.title {
            if titles.is_empty() {
                return Err(ConfigError::EmptyTitleSequence);
            }
        }
        for icon in &self.icons {
            if let IconDescriptor::Glyph(glyph) = icon {
                if glyph.glyph.is_empty() {
                    return Err(ConfigError::EmptyGlyph);
                }
                if glyph.size == Some(0) {
                    return Err(ConfigError::ZeroGlyphSize);
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
