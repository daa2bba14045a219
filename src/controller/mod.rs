//! Tab notification controller.
//!
//! This module provides the core controller functionality:
//! - Activation state per sub-cycle (title and icon)
//! - Original-state snapshot capture and exact restoration
//! - Recurring icon/title cycle timers with tokio::time::interval
//! - Visibility-driven activation for automatic trigger modes
//!
//! All operations are idempotent and best-effort: an unavailable page, a
//! missing timer runtime, or a failed glyph render degrades to a no-op or a
//! skipped frame, never an error.

mod cycle;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::page::{IconLink, PageChrome, GENERIC_ICON_REL, TOUCH_ICON_REL};
use crate::render::{IconRenderer, RasterGlyphRenderer};
use crate::types::{ConfigError, IconDescriptor, NotificationConfig, TitleSpec};
use crate::visibility::{Visibility, VisibilitySignal};

use cycle::CycleState;

// ============================================================================
// PageSnapshot
// ============================================================================

/// The original page state, captured once before the first mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PageSnapshot {
    /// Original page title.
    title: String,
    /// Original icon link references, by position. `None` entries belong to
    /// links the controller created itself.
    icon_hrefs: Vec<Option<String>>,
}

// ============================================================================
// CycleRuntime
// ============================================================================

/// Which sub-cycle a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleKind {
    Title,
    Icon,
}

/// Live state of one sub-cycle: position, activation flag, timer handle.
#[derive(Debug)]
struct CycleRuntime {
    running: bool,
    state: CycleState,
    timer: Option<JoinHandle<()>>,
}

impl CycleRuntime {
    fn new(len: usize) -> Self {
        Self {
            running: false,
            state: CycleState::new(len),
            timer: None,
        }
    }

    /// Aborts the cycle timer, if any. Aborting an already-finished task is
    /// safe.
    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// NotificationController
// ============================================================================

/// Alternates the page title and icon between their normal state and an
/// attention state.
///
/// The controller is a cheaply cloneable handle; clones share the same
/// state. Timer tasks hold only weak references, so dropping every handle
/// tears the timers down, and [`NotificationController::dispose`] does so
/// deterministically while also restoring the page.
///
/// Timers and the visibility subscription are spawned onto the ambient tokio
/// runtime; without one, scheduled updates are skipped (the first frame is
/// still applied synchronously).
#[derive(Clone)]
pub struct NotificationController {
    inner: Arc<Inner>,
}

struct Inner {
    config: NotificationConfig,
    page: Arc<dyn PageChrome>,
    renderer: Arc<dyn IconRenderer>,
    snapshot: Mutex<Option<PageSnapshot>>,
    title_cycle: Mutex<CycleRuntime>,
    icon_cycle: Mutex<CycleRuntime>,
    active_tx: watch::Sender<bool>,
    visibility_task: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl NotificationController {
    /// Creates a controller with the default glyph renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(
        config: NotificationConfig,
        page: Arc<dyn PageChrome>,
    ) -> Result<Self, ConfigError> {
        Self::with_renderer(config, page, Arc::new(RasterGlyphRenderer::new()))
    }

    /// Creates a controller with a custom icon renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn with_renderer(
        config: NotificationConfig,
        page: Arc<dyn PageChrome>,
        renderer: Arc<dyn IconRenderer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (active_tx, _) = watch::channel(false);
        let title_len = config.title_count();
        let icon_len = config.icons.len();

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                page,
                renderer,
                snapshot: Mutex::new(None),
                title_cycle: Mutex::new(CycleRuntime::new(title_len)),
                icon_cycle: Mutex::new(CycleRuntime::new(icon_len)),
                active_tx,
                visibility_task: Mutex::new(None),
                disposed: AtomicBool::new(false),
            }),
        })
    }

    /// Returns the configuration this controller was built with.
    pub fn config(&self) -> &NotificationConfig {
        &self.inner.config
    }

    /// Returns true while the notification is displayed/cycling.
    ///
    /// In split mode this is true whenever at least one of the title or icon
    /// sub-cycles is running.
    pub fn is_active(&self) -> bool {
        *self.inner.active_tx.borrow()
    }

    /// Subscribes to changes of the active flag.
    pub fn subscribe_active(&self) -> watch::Receiver<bool> {
        self.inner.active_tx.subscribe()
    }

    /// Captures the original page state and, unless every sub-cycle is
    /// manual, subscribes to the visibility signal.
    ///
    /// The subscription is established at most once per controller lifetime
    /// and reacts only to subsequent changes, not to the state at
    /// subscription time. No-op when the page is unavailable.
    pub fn initialize(&self, signal: &VisibilitySignal) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return;
        }
        if !self.inner.page.is_available() {
            tracing::debug!("page unavailable, skipping initialization");
            return;
        }

        Inner::ensure_snapshot(&self.inner);

        let mode = self.inner.config.trigger_mode;
        if !mode.any_automatic() {
            return;
        }

        let mut slot = self.inner.visibility_task.lock().unwrap();
        if slot.is_some() {
            return;
        }

        let mut rx = signal.subscribe();
        let weak = Arc::downgrade(&self.inner);
        *slot = Inner::spawn(async move {
            while rx.changed().await.is_ok() {
                let visibility = *rx.borrow_and_update();
                let Some(inner) = weak.upgrade() else { break };
                match visibility {
                    Visibility::Hidden => Inner::start_parts(
                        &inner,
                        mode.title_is_automatic(),
                        mode.icon_is_automatic(),
                    ),
                    Visibility::Visible => Inner::stop_parts(
                        &inner,
                        mode.title_is_automatic(),
                        mode.icon_is_automatic(),
                    ),
                }
            }
        });
    }

    /// Starts the notification. Idempotent; no-op if already active or the
    /// page is unavailable.
    ///
    /// Within one call, the title is applied (or its timer armed) before the
    /// first icon frame, which happens before the active flag flips.
    pub fn start(&self) {
        Inner::start_parts(&self.inner, true, true);
    }

    /// Stops the notification and restores the captured page state.
    /// Idempotent; no-op if not active or the page is unavailable.
    pub fn stop(&self) {
        Inner::stop_parts(&self.inner, true, true);
    }

    /// Stops if active, starts otherwise.
    pub fn toggle(&self) {
        if self.is_active() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Tears the controller down: stops and restores the page, cancels every
    /// timer, removes the visibility subscription, and turns all further
    /// operations into no-ops.
    pub fn dispose(&self) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return;
        }

        Inner::stop_parts(&self.inner, true, true);
        self.inner.disposed.store(true, Ordering::SeqCst);

        // stop() cannot run against an unavailable page, but timers must not
        // outlive the controller either way.
        {
            let mut cycle = self.inner.title_cycle.lock().unwrap();
            cycle.cancel_timer();
            cycle.running = false;
        }
        {
            let mut cycle = self.inner.icon_cycle.lock().unwrap();
            cycle.cancel_timer();
            cycle.running = false;
        }
        Inner::update_active(&self.inner);

        if let Some(handle) = self.inner.visibility_task.lock().unwrap().take() {
            handle.abort();
        }

        tracing::debug!("notification controller disposed");
    }
}

impl std::fmt::Debug for NotificationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationController")
            .field("active", &self.is_active())
            .field("disposed", &self.inner.disposed.load(Ordering::SeqCst))
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Inner {
    /// Spawns a task onto the ambient runtime, or skips it (logged) when no
    /// runtime is available.
    fn spawn(
        future: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Option<JoinHandle<()>> {
        match Handle::try_current() {
            Ok(handle) => Some(handle.spawn(future)),
            Err(_) => {
                tracing::warn!("no timer runtime available, skipping scheduled updates");
                None
            }
        }
    }

    /// Captures the original page state, once. Creates the default icon
    /// links first when none exist, so their pre-creation state (no explicit
    /// reference) is what restoration writes back.
    fn ensure_snapshot(inner: &Arc<Inner>) {
        let mut snapshot = inner.snapshot.lock().unwrap();
        if snapshot.is_some() {
            return;
        }

        Self::ensure_icon_links(inner);
        *snapshot = Some(PageSnapshot {
            title: inner.page.title(),
            icon_hrefs: inner
                .page
                .icon_links()
                .into_iter()
                .map(|link| link.href)
                .collect(),
        });
    }

    /// Makes sure the page has at least one icon link to update, creating
    /// the default pair when none exist. Returns the link count.
    fn ensure_icon_links(inner: &Inner) -> usize {
        let links = inner.page.icon_links();
        if !links.is_empty() {
            return links.len();
        }
        inner.page.append_icon_link(IconLink::new(GENERIC_ICON_REL));
        inner.page.append_icon_link(IconLink::new(TOUCH_ICON_REL));
        2
    }

    fn start_parts(inner: &Arc<Inner>, title: bool, icon: bool) {
        if inner.disposed.load(Ordering::SeqCst) {
            return;
        }
        if !inner.page.is_available() {
            tracing::debug!("page unavailable, ignoring start");
            return;
        }

        Self::ensure_snapshot(inner);
        if title {
            Self::start_title(inner);
        }
        if icon {
            Self::start_icons(inner);
        }
        Self::update_active(inner);
    }

    fn stop_parts(inner: &Arc<Inner>, title: bool, icon: bool) {
        if !inner.page.is_available() {
            tracing::debug!("page unavailable, ignoring stop");
            return;
        }

        if title {
            Self::stop_title(inner);
        }
        if icon {
            Self::stop_icons(inner);
        }
        Self::update_active(inner);
    }

    fn start_title(inner: &Arc<Inner>) {
        {
            let mut cycle = inner.title_cycle.lock().unwrap();
            if cycle.running {
                return;
            }
            cycle.running = true;
            cycle.state.reset();
        }

        if let Some(first) = inner.config.title.as_ref().and_then(TitleSpec::first) {
            inner.page.set_title(first);
            tracing::debug!(title = %first, "notification title applied");
        }

        let mut cycle = inner.title_cycle.lock().unwrap();
        if cycle.running && cycle.state.needs_timer() && cycle.timer.is_none() {
            cycle.timer =
                Self::spawn_cycle_timer(inner, CycleKind::Title, inner.config.title_interval_ms);
        }
    }

    fn start_icons(inner: &Arc<Inner>) {
        {
            let mut cycle = inner.icon_cycle.lock().unwrap();
            if cycle.running {
                return;
            }
            cycle.running = true;
            cycle.state.reset();
        }

        if let Some(first) = inner.config.icons.first().cloned() {
            Self::apply_icon(inner, &first);
        }

        let mut cycle = inner.icon_cycle.lock().unwrap();
        if cycle.running && cycle.state.needs_timer() && cycle.timer.is_none() {
            cycle.timer =
                Self::spawn_cycle_timer(inner, CycleKind::Icon, inner.config.icon_interval_ms);
        }
    }

    fn stop_title(inner: &Inner) {
        {
            let mut cycle = inner.title_cycle.lock().unwrap();
            if !cycle.running {
                return;
            }
            cycle.cancel_timer();
            cycle.running = false;
            cycle.state.reset();
        }

        if let Some(snapshot) = inner.snapshot.lock().unwrap().as_ref() {
            inner.page.set_title(&snapshot.title);
        }
    }

    fn stop_icons(inner: &Inner) {
        {
            let mut cycle = inner.icon_cycle.lock().unwrap();
            if !cycle.running {
                return;
            }
            cycle.cancel_timer();
            cycle.running = false;
            cycle.state.reset();
        }

        if let Some(snapshot) = inner.snapshot.lock().unwrap().as_ref() {
            for (index, href) in snapshot.icon_hrefs.iter().enumerate() {
                inner.page.set_icon_href(index, href.as_deref());
            }
        }
    }

    /// Arms the recurring timer for one sub-cycle. The first frame was
    /// already applied synchronously, so the interval's immediate first tick
    /// is consumed before the loop.
    fn spawn_cycle_timer(
        inner: &Arc<Inner>,
        kind: CycleKind,
        interval_ms: u64,
    ) -> Option<JoinHandle<()>> {
        let weak = Arc::downgrade(inner);
        Self::spawn(async move {
            let mut ticker = interval(Duration::from_millis(interval_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                match kind {
                    CycleKind::Title => Self::advance_title(&inner),
                    CycleKind::Icon => Self::advance_icon(&inner),
                }
            }
        })
    }

    fn advance_title(inner: &Arc<Inner>) {
        let text = {
            let mut cycle = inner.title_cycle.lock().unwrap();
            if !cycle.running {
                return;
            }
            let Some(index) = cycle.state.advance() else {
                return;
            };
            match inner.config.title.as_ref().and_then(|t| t.get(index)) {
                Some(text) => text.to_string(),
                None => return,
            }
        };
        inner.page.set_title(&text);
    }

    fn advance_icon(inner: &Arc<Inner>) {
        let descriptor = {
            let mut cycle = inner.icon_cycle.lock().unwrap();
            if !cycle.running {
                return;
            }
            let Some(index) = cycle.state.advance() else {
                return;
            };
            match inner.config.icons.get(index) {
                Some(descriptor) => descriptor.clone(),
                None => return,
            }
        };
        Self::apply_icon(inner, &descriptor);
    }

    /// Resolves one icon descriptor and writes it to every icon link.
    /// A failed glyph render skips this frame without stopping the cycle.
    fn apply_icon(inner: &Arc<Inner>, descriptor: &IconDescriptor) {
        let href = match descriptor {
            IconDescriptor::Url(url) => url.clone(),
            IconDescriptor::Glyph(glyph) => match inner.renderer.render_glyph(glyph) {
                Some(data_url) => data_url,
                None => {
                    tracing::debug!(glyph = %glyph.glyph, "glyph render unavailable, skipping icon frame");
                    return;
                }
            },
        };

        let count = Self::ensure_icon_links(inner);
        for index in 0..count {
            inner.page.set_icon_href(index, Some(href.as_str()));
        }
    }

    fn update_active(inner: &Inner) {
        let title_running = inner.title_cycle.lock().unwrap().running;
        let icon_running = inner.icon_cycle.lock().unwrap().running;
        inner.active_tx.send_replace(title_running || icon_running);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Timer tasks only hold weak references, but abort them anyway so no
        // scheduled callback outlives the last controller handle.
        if let Ok(cycle) = self.title_cycle.get_mut() {
            cycle.cancel_timer();
        }
        if let Ok(cycle) = self.icon_cycle.get_mut() {
            cycle.cancel_timer();
        }
        if let Ok(slot) = self.visibility_task.get_mut() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
