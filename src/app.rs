//! Application state management for the user table
//!
//! This module contains the main application state, handling keyboard input
//! and running loads requested from the keyboard between frames.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cache::CacheStore;
use crate::cli::StartupConfig;
use crate::controller::{CachedFetchController, LoadOutcome};
use crate::data::{User, UserSource, UsersClient};

/// Main application struct wrapping the controller with view state
pub struct App<S = Box<dyn CacheStore>, R = UsersClient> {
    /// Cache-aside controller owning the users list
    pub controller: CachedFetchController<S, R>,
    /// Index of the highlighted row in the table
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// How the most recent load was resolved
    pub last_outcome: Option<LoadOutcome>,
    /// When the most recent load finished
    pub last_load: Option<DateTime<Local>>,
}

impl App {
    /// Creates the production App from the startup configuration
    pub fn from_config(config: &StartupConfig) -> Self {
        let store = config.build_store();
        let client = UsersClient::with_endpoint(config.endpoint.clone());
        let mut app = App::with_controller(CachedFetchController::new(store, client));
        if config.load_on_start {
            app.request_load();
        }
        app
    }
}

impl<S: CacheStore, R: UserSource> App<S, R> {
    /// Creates a new App around an existing controller
    pub fn with_controller(controller: CachedFetchController<S, R>) -> Self {
        Self {
            controller,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            last_outcome: None,
            last_load: None,
        }
    }

    /// Users currently shown in the table
    pub fn users(&self) -> &[User] {
        self.controller.users()
    }

    /// True only while a cache miss waits on the remote source
    pub fn is_busy(&self) -> bool {
        self.controller.is_loading()
    }

    /// Returns the currently selected user, if any
    pub fn selected_user(&self) -> Option<&User> {
        self.users().get(self.selected_index)
    }

    /// Starts a load: a fresh cache entry is applied at once, a miss leaves
    /// a remote fetch pending for `run_pending_fetch`
    pub fn request_load(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Some(outcome) = self.controller.try_cache() {
            self.finish_load(outcome);
        }
    }

    /// Completes the remote fetch left pending by a cache miss
    pub async fn run_pending_fetch(&mut self) {
        if !self.is_busy() {
            return;
        }
        let outcome = self.controller.fetch_remote().await;
        self.finish_load(outcome);
    }

    fn finish_load(&mut self, outcome: LoadOutcome) {
        let count = self.users().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
        self.last_outcome = Some(outcome);
        self.last_load = Some(Local::now());
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `l`/`Enter`: Load users (ignored while a load is pending)
    /// - `c`: Clear the users cache
    /// - `Up`/`k`, `Down`/`j`: Move row selection
    /// - `?`: Toggle help
    /// - `q`/`Esc`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('l') | KeyCode::Enter => {
                self.request_load();
            }
            KeyCode::Char('c') => {
                self.controller.clear();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn move_selection_up(&mut self) {
        let count = self.users().len();
        if count == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            count - 1
        } else {
            self.selected_index - 1
        };
    }

    fn move_selection_down(&mut self) {
        let count = self.users().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }
}
