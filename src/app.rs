// The central application controller and event loop.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{Terminal, backend::Backend, widgets::ListState};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod model;
pub mod snapshot;
pub mod ui;

use model::{Models, Service};

pub struct App {
    snapshot_path: PathBuf,
    models: Models,
    list_state: ListState,
    tick_rate: Duration,
    last_error: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(snapshot_path: PathBuf, tick_rate: Duration) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0)); // Start with first service selected

        Self {
            snapshot_path,
            models: Models::new(),
            list_state,
            tick_rate,
            last_error: None,
            should_quit: false,
        }
    }

    pub fn models(&self) -> &Models {
        &self.models
    }

    pub fn selected_service(&self) -> Option<&Service> {
        self.list_state
            .selected()
            .and_then(|i| self.models.services.get(i))
    }

    /// Selects the service with `id`, if it is listed.
    pub fn select_service(&mut self, id: &str) -> bool {
        match self.models.services.iter().position(|s| s.id() == id) {
            Some(index) => {
                self.list_state.select(Some(index));
                true
            }
            None => false,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|f| {
                ui::render(
                    f,
                    &self.models,
                    &mut self.list_state,
                    self.last_error.as_deref(),
                )
            })?;

            let timeout = self
                .tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.refresh();
                last_tick = Instant::now();
            }

            if self.should_quit {
                info!("Quitting");
                return Ok(());
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.previous(),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Reloads the snapshot. On failure the current models are kept.
    pub fn refresh(&mut self) {
        match snapshot::load_models(&self.snapshot_path) {
            Ok(models) => {
                debug!(
                    services = models.services.len(),
                    units = models.units.len(),
                    "Models refreshed"
                );
                self.set_models(models);
                self.last_error = None;
            }
            Err(err) => {
                let message = format!("{err:#}");
                // Only log when the failure changes, not on every tick.
                if self.last_error.as_deref() != Some(message.as_str()) {
                    warn!("Reload failed: {message}");
                }
                self.last_error = Some(message);
            }
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replaces the models, keeping the same service selected if it still
    /// exists.
    pub fn set_models(&mut self, models: Models) {
        let selected = self.selected_service().map(|s| s.id().to_owned());
        self.models = models;

        let index = selected
            .and_then(|id| self.models.services.iter().position(|s| s.id() == id))
            .or_else(|| self.list_state.selected())
            .map(|i| i.min(self.models.services.len().saturating_sub(1)));
        self.list_state.select(index.or(Some(0)));
    }

    fn next(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.models.services.len().saturating_sub(1) {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.models.services.len().saturating_sub(1)
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::ServiceUnit;
    use std::io::Write;

    fn models(services: &[&str]) -> Models {
        let mut models = Models::new();
        models
            .services
            .add(services.iter().map(|id| Service::with_id(*id)));
        models
            .units
            .add(services.iter().map(|id| ServiceUnit::with_id(format!("{id}/0"))));
        models
    }

    fn app() -> App {
        App::new(PathBuf::from("does-not-exist.json"), Duration::from_secs(2))
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.set_models(models(&["mysql", "wordpress"]));
        assert_eq!(app.selected_service().map(Service::id), Some("mysql"));

        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.selected_service().map(Service::id), Some("wordpress"));
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.selected_service().map(Service::id), Some("mysql"));
        app.handle_key(KeyCode::Char('k'));
        assert_eq!(app.selected_service().map(Service::id), Some("wordpress"));
    }

    #[test]
    fn test_set_models_keeps_selected_service() {
        let mut app = app();
        app.set_models(models(&["mysql", "wordpress"]));
        assert!(app.select_service("wordpress"));

        app.set_models(models(&["haproxy", "mysql", "wordpress"]));
        assert_eq!(app.selected_service().map(Service::id), Some("wordpress"));

        app.set_models(models(&["mysql"]));
        assert_eq!(app.selected_service().map(Service::id), Some("mysql"));
        assert!(!app.select_service("wordpress"));
    }

    #[test]
    fn test_failed_refresh_keeps_models() {
        let mut app = app();
        app.set_models(models(&["mysql"]));

        app.refresh();
        assert!(app.last_error().is_some());
        assert_eq!(app.models().services.len(), 1);
    }

    #[test]
    fn test_repeated_failure_keeps_same_error() {
        let mut app = app();
        app.refresh();
        let first = app.last_error().map(str::to_owned);

        app.refresh();
        assert!(first.is_some());
        assert_eq!(app.last_error(), first.as_deref());
    }

    #[test]
    fn test_refresh_loads_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"units": [{"id": "mysql/0"}, {"id": "mysql/1"}]}"#)
            .unwrap();

        let mut app = App::new(file.path().to_path_buf(), Duration::from_secs(2));
        app.refresh();

        assert_eq!(app.last_error(), None);
        assert_eq!(app.models().services.ids(), vec!["mysql"]);
        assert_eq!(app.models().units.len(), 2);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(!app.should_quit());
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit());
    }
}
