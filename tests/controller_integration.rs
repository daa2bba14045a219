//! Integration tests for the notification controller on real timers.
//!
//! These tests drive the controller against the in-memory mock page and
//! renderer with short cycle intervals. Timing assertions are tolerant:
//! they check cyclic order exactly but frame counts only within ranges.

use std::sync::Arc;
use std::time::Duration;

use tab_notify::{
    GlyphIcon, IconLink, MockIconRenderer, MockPage, NotificationConfig, NotificationController,
    PageChrome, TriggerMode, VisibilitySignal, GENERIC_ICON_REL,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Cycle interval used by the timing tests.
const FAST_INTERVAL_MS: u64 = 50;

/// Glyphs used for the three-frame icon cycle.
const GLYPHS: [&str; 3] = ["🔔", "📬", "📢"];

/// Creates a manual-trigger config with a three-glyph icon cycle.
fn fast_icon_config() -> NotificationConfig {
    NotificationConfig::default()
        .with_icons(GLYPHS.iter().map(|g| GlyphIcon::new(*g).into()).collect())
        .with_icon_interval(FAST_INTERVAL_MS)
        .with_trigger_mode(TriggerMode::Manual)
}

/// Creates a controller over a mock page and recording renderer.
fn create_controller(
    config: NotificationConfig,
) -> (NotificationController, Arc<MockPage>, Arc<MockIconRenderer>) {
    let page = Arc::new(MockPage::with_title("Original Title"));
    let renderer = Arc::new(MockIconRenderer::new());
    let controller =
        NotificationController::with_renderer(config, page.clone(), renderer.clone()).unwrap();
    (controller, page, renderer)
}

// ============================================================================
// Icon Cycle Tests
// ============================================================================

#[tokio::test]
async fn test_icon_cycle_advances_in_order_and_wraps() {
    let (controller, _page, renderer) = create_controller(fast_icon_config());

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 5 + 25)).await;
    controller.stop();

    let rendered = renderer.rendered();
    // First frame is applied synchronously, later frames on the timer.
    assert!(
        rendered.len() >= 3 && rendered.len() <= 8,
        "expected ~6 frames, got {}",
        rendered.len()
    );
    // Frame k shows icon k mod N.
    for (k, icon) in rendered.iter().enumerate() {
        assert_eq!(
            icon.glyph,
            GLYPHS[k % GLYPHS.len()],
            "frame {} out of cycle order",
            k
        );
    }
}

#[tokio::test]
async fn test_single_icon_applies_once_without_timer() {
    let config = NotificationConfig::default()
        .with_icons(vec![GlyphIcon::new("🔔").into()])
        .with_icon_interval(FAST_INTERVAL_MS)
        .with_trigger_mode(TriggerMode::Manual);
    let (controller, _page, renderer) = create_controller(config);

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 4)).await;

    assert_eq!(renderer.render_count(), 1);
    controller.stop();
}

#[tokio::test]
async fn test_stop_cancels_the_icon_timer() {
    let (controller, _page, renderer) = create_controller(fast_icon_config());

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 2 + 25)).await;
    controller.stop();

    let frames_at_stop = renderer.render_count();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 4)).await;

    assert_eq!(renderer.render_count(), frames_at_stop);
}

#[tokio::test]
async fn test_restart_begins_again_at_the_first_icon() {
    let (controller, _page, renderer) = create_controller(fast_icon_config());

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS + 25)).await;
    controller.stop();

    let frames_before = renderer.render_count();
    controller.start();
    controller.stop();

    let rendered = renderer.rendered();
    assert_eq!(rendered.len(), frames_before + 1);
    assert_eq!(rendered[frames_before].glyph, GLYPHS[0]);
}

#[tokio::test]
async fn test_failed_renders_skip_frames_but_cycle_continues() {
    let (controller, page, renderer) = create_controller(fast_icon_config());
    renderer.set_should_fail(true);

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 2 + 25)).await;

    // Nothing was written while the renderer was failing.
    assert_eq!(page.href_write_count(), 0);

    renderer.set_should_fail(false);
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 2 + 25)).await;

    // The cycle kept running and produced frames once rendering recovered.
    assert!(page.href_write_count() > 0);
    controller.stop();
}

// ============================================================================
// Title Cycle Tests
// ============================================================================

#[tokio::test]
async fn test_title_sequence_cycles_in_order() {
    let config = NotificationConfig::default()
        .with_title(vec!["New mail".to_string(), "(1) New mail".to_string()])
        .with_title_interval(FAST_INTERVAL_MS)
        .with_trigger_mode(TriggerMode::Manual);
    let (controller, page, _renderer) = create_controller(config);

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 4 + 25)).await;
    controller.stop();

    let writes = page.title_writes();
    // At least the immediate frame plus a few timer frames, then the restore.
    assert!(writes.len() >= 3, "expected several title frames, got {writes:?}");
    assert_eq!(writes.last().unwrap(), "Original Title");

    let cycle = &writes[..writes.len() - 1];
    for (k, title) in cycle.iter().enumerate() {
        let expected = if k % 2 == 0 { "New mail" } else { "(1) New mail" };
        assert_eq!(title, expected, "title frame {} out of cycle order", k);
    }
}

#[tokio::test]
async fn test_single_title_is_applied_without_timer() {
    let config = NotificationConfig::default()
        .with_title("Come back!")
        .with_title_interval(FAST_INTERVAL_MS)
        .with_trigger_mode(TriggerMode::Manual);
    let (controller, page, _renderer) = create_controller(config);

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 4)).await;

    assert_eq!(page.title_writes(), vec!["Come back!".to_string()]);
    controller.stop();
}

// ============================================================================
// Restoration Tests
// ============================================================================

#[tokio::test]
async fn test_full_cycle_restores_page_exactly() {
    let config = fast_icon_config().with_title("Alert");
    let page = Arc::new(MockPage::with_title("Original Title"));
    page.add_link(IconLink::with_href(GENERIC_ICON_REL, "/favicon.ico"));
    let renderer = Arc::new(MockIconRenderer::new());
    let controller =
        NotificationController::with_renderer(config, page.clone(), renderer).unwrap();

    let title_before = page.title();
    let links_before = page.icon_links();

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 3 + 25)).await;
    controller.stop();

    assert_eq!(page.title(), title_before);
    assert_eq!(page.icon_links(), links_before);

    // Restoration is idempotent across repeated cycles.
    controller.start();
    controller.stop();
    assert_eq!(page.title(), title_before);
    assert_eq!(page.icon_links(), links_before);
}

#[tokio::test]
async fn test_dispose_mid_cycle_restores_and_silences_timers() {
    let (controller, page, renderer) = create_controller(fast_icon_config());

    controller.start();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS + 25)).await;
    controller.dispose();

    assert_eq!(page.title(), "Original Title");
    assert!(page.icon_links().iter().all(|link| link.href.is_none()));

    let frames_at_dispose = renderer.render_count();
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 4)).await;
    assert_eq!(renderer.render_count(), frames_at_dispose);
}

// ============================================================================
// Visibility-Driven Tests
// ============================================================================

#[tokio::test]
async fn test_automatic_mode_cycles_while_hidden_and_restores_on_visible() {
    let config = NotificationConfig::default()
        .with_title("Come back!")
        .with_icons(GLYPHS.iter().map(|g| GlyphIcon::new(*g).into()).collect())
        .with_icon_interval(FAST_INTERVAL_MS)
        .with_trigger_mode(TriggerMode::Automatic);
    let (controller, page, renderer) = create_controller(config);

    let signal = VisibilitySignal::new();
    controller.initialize(&signal);

    let title_before = page.title();
    let links_after_init = page.icon_links();

    signal.set_hidden(true);
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 3 + 25)).await;

    assert!(controller.is_active());
    assert_eq!(page.title(), "Come back!");
    assert!(renderer.render_count() >= 2);

    signal.set_hidden(false);
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS)).await;

    assert!(!controller.is_active());
    assert_eq!(page.title(), title_before);
    assert_eq!(page.icon_links(), links_after_init);

    controller.dispose();
}

#[tokio::test]
async fn test_split_mode_icon_follows_visibility_title_stays_manual() {
    let config = NotificationConfig::default()
        .with_title("Alert")
        .with_icons(vec![GlyphIcon::new("🔔").into(), GlyphIcon::new("📬").into()])
        .with_icon_interval(FAST_INTERVAL_MS)
        .with_trigger_mode(TriggerMode::Split {
            title_manual: true,
            icon_manual: false,
        });
    let (controller, page, renderer) = create_controller(config);

    let signal = VisibilitySignal::new();
    controller.initialize(&signal);

    signal.set_hidden(true);
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS * 2 + 25)).await;

    assert!(controller.is_active());
    assert!(renderer.render_count() >= 1);
    assert!(page.title_writes().is_empty());

    signal.set_hidden(false);
    tokio::time::sleep(Duration::from_millis(FAST_INTERVAL_MS)).await;
    assert!(!controller.is_active());

    controller.dispose();
}

#[tokio::test]
async fn test_toggle_matches_explicit_start_stop_sequencing() {
    let (controller, page, _renderer) = create_controller(fast_icon_config().with_title("Alert"));

    controller.toggle();
    assert!(controller.is_active());
    assert_eq!(page.title(), "Alert");

    controller.toggle();
    assert!(!controller.is_active());
    assert_eq!(page.title(), "Original Title");
}
