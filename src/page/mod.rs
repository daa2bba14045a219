//! Page chrome abstraction.
//!
//! The controller never touches a document directly; it goes through the
//! [`PageChrome`] trait, which covers the two pieces of page-global state a
//! tab notification mutates:
//! - the page title
//! - the set of icon-reference elements in the page's metadata section
//!
//! Implementations take `&self` and handle their own interior mutability, so
//! a page can be shared between the controller and its timer tasks.
//! [`MockPage`] is an in-memory implementation that records every write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Relation name for the generic icon reference.
pub const GENERIC_ICON_REL: &str = "icon";

/// Relation name for the platform touch-icon reference.
pub const TOUCH_ICON_REL: &str = "apple-touch-icon";

// ============================================================================
// IconLink
// ============================================================================

/// One icon-reference element in the page's metadata section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLink {
    /// Relation name, e.g. `"icon"` or `"apple-touch-icon"`.
    pub rel: String,
    /// Target reference. `None` means no explicit reference is set.
    pub href: Option<String>,
}

impl IconLink {
    /// Creates a link with no explicit reference.
    pub fn new(rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: None,
        }
    }

    /// Creates a link with an explicit reference.
    pub fn with_href(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: Some(href.into()),
        }
    }
}

// ============================================================================
// PageChrome
// ============================================================================

/// Read/write access to the mutable page chrome.
pub trait PageChrome: Send + Sync {
    /// Returns true if a page context exists. When false, the controller
    /// treats every operation as a no-op.
    fn is_available(&self) -> bool {
        true
    }

    /// Returns the current page title.
    fn title(&self) -> String;

    /// Replaces the page title.
    fn set_title(&self, title: &str);

    /// Enumerates the icon-reference elements, in document order.
    fn icon_links(&self) -> Vec<IconLink>;

    /// Appends a new icon-reference element.
    fn append_icon_link(&self, link: IconLink);

    /// Sets (or clears, with `None`) the reference of the link at `index`.
    /// Out-of-range indices are ignored.
    fn set_icon_href(&self, index: usize, href: Option<&str>);
}

// ============================================================================
// MockPage
// ============================================================================

/// In-memory [`PageChrome`] that records every mutation, for tests and
/// simulations.
#[derive(Debug)]
pub struct MockPage {
    state: Mutex<MockPageState>,
    available: AtomicBool,
}

#[derive(Debug, Default)]
struct MockPageState {
    title: String,
    links: Vec<IconLink>,
    title_writes: Vec<String>,
    href_writes: Vec<(usize, Option<String>)>,
}

impl MockPage {
    /// Creates an available page with an empty title and no icon links.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockPageState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Creates an available page with the given title.
    #[must_use]
    pub fn with_title(title: impl Into<String>) -> Self {
        let page = Self::new();
        page.state.lock().unwrap().title = title.into();
        page
    }

    /// Adds a pre-existing icon link, as a real page head would carry.
    pub fn add_link(&self, link: IconLink) {
        self.state.lock().unwrap().links.push(link);
    }

    /// Toggles page availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns every title ever written through `set_title`.
    #[must_use]
    pub fn title_writes(&self) -> Vec<String> {
        self.state.lock().unwrap().title_writes.clone()
    }

    /// Returns every href write, in order, as `(link index, value)`.
    #[must_use]
    pub fn href_writes(&self) -> Vec<(usize, Option<String>)> {
        self.state.lock().unwrap().href_writes.clone()
    }

    /// Returns the number of href writes recorded so far.
    #[must_use]
    pub fn href_write_count(&self) -> usize {
        self.state.lock().unwrap().href_writes.len()
    }

    /// Forgets recorded writes without touching the page state.
    pub fn clear_recorded(&self) {
        let mut state = self.state.lock().unwrap();
        state.title_writes.clear();
        state.href_writes.clear();
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageChrome for MockPage {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn title(&self) -> String {
        self.state.lock().unwrap().title.clone()
    }

    fn set_title(&self, title: &str) {
        let mut state = self.state.lock().unwrap();
        state.title = title.to_string();
        state.title_writes.push(title.to_string());
    }

    fn icon_links(&self) -> Vec<IconLink> {
        self.state.lock().unwrap().links.clone()
    }

    fn append_icon_link(&self, link: IconLink) {
        self.state.lock().unwrap().links.push(link);
    }

    fn set_icon_href(&self, index: usize, href: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        if let Some(link) = state.links.get_mut(index) {
            link.href = href.map(String::from);
            state.href_writes.push((index, href.map(String::from)));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
