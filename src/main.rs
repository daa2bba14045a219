//! Tab Notify CLI - interactive tab notification demo
//!
//! This tool simulates a page in your terminal and drives the notification
//! controller against it:
//! - start/stop/toggle the attention title and icon cycle
//! - simulate tab visibility changes in automatic trigger modes
//! - render glyph icons to data URLs

use anyhow::Result;
use clap::{CommandFactory, Parser};

use tab_notify::cli::{demo, Cli, Commands, Display, RenderArgs};
use tab_notify::render::{IconRenderer, RasterGlyphRenderer};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => {
            demo::run(&args).await?;
        }
        Some(Commands::Render(args)) => {
            render_glyph(&args)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Renders one glyph icon and prints its data URL.
fn render_glyph(args: &RenderArgs) -> Result<()> {
    let renderer = RasterGlyphRenderer::new();
    match renderer.render_glyph(&args.glyph_icon()) {
        Some(data_url) => {
            println!("{data_url}");
            Ok(())
        }
        None => anyhow::bail!("glyph rendering is unavailable on this system"),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
