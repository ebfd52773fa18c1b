//! Chefify - find recipe ideas from the terminal
//!
//! Builds a search query from the facets given on the command line, searches
//! recipe images (answering repeated queries from the local cache) and shows
//! the results in a terminal UI or as plain text.

use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use chefify::app::App;
use chefify::cache::ImageCache;
use chefify::cli::{format_facet_options, Cli, RunMode, StartupConfig};
use chefify::data::recipe_count;
use chefify::fetch::{FetchOrchestrator, FetchPhase};
use chefify::logging;
use chefify::search::SearchClient;
use chefify::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_results(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Opens the image cache in the configured or default directory
fn open_cache(cache_dir: Option<PathBuf>) -> Result<ImageCache, Box<dyn std::error::Error>> {
    match cache_dir {
        Some(dir) => Ok(ImageCache::open(dir)),
        None => ImageCache::open_default()
            .ok_or_else(|| "Could not determine a cache directory; pass --cache-dir".into()),
    }
}

/// Runs the search and prints the outcome to stdout
async fn run_plain(mut fetch: FetchOrchestrator, query: &str) -> ExitCode {
    fetch.fetch_images(query);
    fetch.settle().await;

    let state = fetch.state();
    if state.phase() == FetchPhase::Failure {
        eprintln!("{}", state.error_message().unwrap_or("Error: search failed"));
        return ExitCode::FAILURE;
    }

    let images = state.images();
    println!("{} for \"{}\"", recipe_count(images.len()), query);
    for image in images {
        println!();
        println!("{}", image.title);
        println!("  Source: {}", image.source_url());
        println!("  Image:  {}", image.image_url);
        println!("  Link:   {}", image.link);
    }
    ExitCode::SUCCESS
}

/// Runs the interactive result screen until the user quits
async fn run_tui(fetch: FetchOrchestrator, query: String) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(query, fetch);
    app.start();

    // Main event loop
    loop {
        app.tick();

        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    if let RunMode::ListOptions = config.mode {
        println!("{}", format_facet_options());
        return Ok(ExitCode::SUCCESS);
    }

    let log_dir = config
        .cache_dir
        .as_ref()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(logging::default_log_dir);
    let _log_guard = match logging::init_logging(&log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    let query = config.query();
    let mut cache = open_cache(config.cache_dir.clone())?;

    match config.mode {
        RunMode::ListOptions => Ok(ExitCode::SUCCESS),
        RunMode::ClearCacheOnly => {
            let removed = cache.clear();
            tracing::info!(removed, "Cleared search cache");
            println!("Cleared {} cached searches", removed);
            Ok(ExitCode::SUCCESS)
        }
        RunMode::Search {
            config: search_config,
            clear_cache,
            plain,
        } => {
            tracing::info!(query = %query, config = ?search_config, "Starting search");
            let client = SearchClient::new(&search_config)?;
            let mut fetch = FetchOrchestrator::new(cache, client);
            if clear_cache {
                fetch.clear_cache();
            }

            if plain {
                Ok(run_plain(fetch, &query).await)
            } else {
                run_tui(fetch, query).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
