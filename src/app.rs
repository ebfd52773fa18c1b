//! Application state management for Chefify
//!
//! This module contains the interactive application state: the fetch
//! orchestrator driving the current search, the selected result card and the
//! keyboard handling of the result screen.

use crossterm::event::{KeyCode, KeyEvent};

use crate::data::ImageResult;
use crate::fetch::{FetchOrchestrator, FetchState};

/// Number of result cards per grid row
pub const GRID_COLUMNS: usize = 2;

/// Main application struct managing state and data
pub struct App {
    /// Query the result screen is showing
    pub query: String,
    /// Index of the selected result card
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// One-line feedback shown in the footer, e.g. after clearing the cache
    pub status: Option<String>,
    /// Owner of the fetch state
    fetch: FetchOrchestrator,
}

impl App {
    /// Creates a new App for `query`; nothing is fetched until [`App::start`]
    pub fn new(query: String, fetch: FetchOrchestrator) -> Self {
        Self {
            query,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            status: None,
            fetch,
        }
    }

    /// Submits the query
    pub fn start(&mut self) {
        self.selected_index = 0;
        self.status = None;
        self.fetch.fetch_images(&self.query);
    }

    /// Applies finished background searches; returns true if the state changed
    pub fn tick(&mut self) -> bool {
        let changed = self.fetch.poll_completions();
        if changed {
            self.clamp_selection();
        }
        changed
    }

    /// Current fetch state
    pub fn state(&self) -> &FetchState {
        self.fetch.state()
    }

    /// Number of result cards
    pub fn result_count(&self) -> usize {
        self.state().images().len()
    }

    /// Returns the currently selected result, if any
    pub fn selected_result(&self) -> Option<&ImageResult> {
        self.state().images().get(self.selected_index)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `Left`/`h`, `Right`/`l`: Move selection within a row
    /// - `Up`/`k`, `Down`/`j`: Move selection between rows
    /// - `r`: Run the query again (served from cache when available)
    /// - `c`: Clear cached searches
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_selection(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected_index >= GRID_COLUMNS {
                    self.selected_index -= GRID_COLUMNS;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(GRID_COLUMNS);
            }
            KeyCode::Char('r') => {
                if !self.state().is_loading() {
                    self.start();
                }
            }
            KeyCode::Char('c') => {
                self.fetch.clear_cache();
                self.status = Some("Cache cleared".to_string());
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, step: usize) {
        let target = self.selected_index + step;
        if target < self.result_count() {
            self.selected_index = target;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.result_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }
}
