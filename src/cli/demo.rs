//! Interactive demo session.
//!
//! The demo stands in for a real page: [`TerminalPage`] implements
//! [`PageChrome`] over in-memory state and prints every mutation, while the
//! session loop reads line commands from stdin and forwards them to the
//! controller or the visibility signal.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::commands::RunArgs;
use crate::cli::display::Display;
use crate::controller::NotificationController;
use crate::page::{IconLink, PageChrome};
use crate::visibility::VisibilitySignal;

// ============================================================================
// TerminalPage
// ============================================================================

/// Simulated page chrome that prints every title and icon mutation.
#[derive(Debug)]
pub struct TerminalPage {
    state: Mutex<TerminalPageState>,
}

#[derive(Debug)]
struct TerminalPageState {
    title: String,
    links: Vec<IconLink>,
}

impl TerminalPage {
    /// Creates a simulated page with the given original title and no icon
    /// links (the controller will create its default pair).
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(TerminalPageState {
                title: title.into(),
                links: Vec::new(),
            }),
        }
    }
}

impl PageChrome for TerminalPage {
    fn title(&self) -> String {
        self.state.lock().unwrap().title.clone()
    }

    fn set_title(&self, title: &str) {
        let mut state = self.state.lock().unwrap();
        if state.title != title {
            state.title = title.to_string();
            Display::show_title_change(title);
        }
    }

    fn icon_links(&self) -> Vec<IconLink> {
        self.state.lock().unwrap().links.clone()
    }

    fn append_icon_link(&self, link: IconLink) {
        self.state.lock().unwrap().links.push(link);
    }

    fn set_icon_href(&self, index: usize, href: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        let Some(link) = state.links.get_mut(index) else {
            return;
        };
        let changed = link.href.as_deref() != href;
        link.href = href.map(String::from);
        // Both links receive every frame; print the generic one only.
        if changed && index == 0 {
            Display::show_icon_change(&link.rel, href);
        }
    }
}

// ============================================================================
// DemoCommand
// ============================================================================

/// One line of demo input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    Start,
    Stop,
    Toggle,
    Hide,
    Show,
    Status,
    Help,
    Quit,
}

impl DemoCommand {
    /// Parses a line of input. Returns `None` for anything unrecognized.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "start" => Some(DemoCommand::Start),
            "stop" => Some(DemoCommand::Stop),
            "toggle" => Some(DemoCommand::Toggle),
            "hide" => Some(DemoCommand::Hide),
            "show" => Some(DemoCommand::Show),
            "status" => Some(DemoCommand::Status),
            "help" | "?" => Some(DemoCommand::Help),
            "quit" | "exit" | "q" => Some(DemoCommand::Quit),
            _ => None,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Runs the interactive demo until `quit` or end of input.
pub async fn run(args: &RunArgs) -> Result<()> {
    let config = args.build_config()?;
    Display::show_banner(&config);

    let page = Arc::new(TerminalPage::new(&args.page_title));
    let controller = NotificationController::new(config, page)?;
    let signal = VisibilitySignal::new();
    controller.initialize(&signal);

    println!();
    Display::show_status(controller.is_active(), signal.is_hidden());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match DemoCommand::parse(&line) {
            Some(DemoCommand::Start) => controller.start(),
            Some(DemoCommand::Stop) => controller.stop(),
            Some(DemoCommand::Toggle) => controller.toggle(),
            Some(DemoCommand::Hide) => {
                signal.set_hidden(true);
                // Let the subscription task observe the change before the
                // next command is read.
                tokio::task::yield_now().await;
            }
            Some(DemoCommand::Show) => {
                signal.set_hidden(false);
                tokio::task::yield_now().await;
            }
            Some(DemoCommand::Status) => {
                Display::show_status(controller.is_active(), signal.is_hidden())
            }
            Some(DemoCommand::Help) => Display::show_help(),
            Some(DemoCommand::Quit) => break,
            None => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    Display::show_error(&format!("unknown command `{trimmed}`"));
                }
            }
        }
    }

    controller.dispose();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
