use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use habit_core::{
    repository::{DEFAULT_HISTORY_DAYS, DEFAULT_STORAGE_KEY},
    streak::MAX_ACTIVITY_DAYS,
    DayKey, FileStore, HabitError, HabitRepository, HabitSelector, KeyValueStore,
};
use tracing::{debug, info};

use crate::render::{BoardRenderer, TextRenderer};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) data_dir: PathBuf,
    pub(crate) storage_key: String,
    pub(crate) history_days: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("HABIT_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(key) = std::env::var("HABIT_STORAGE_KEY") {
            let key = key.trim();
            if !key.is_empty() {
                config.storage_key = key.to_string();
            }
        }
        if let Ok(days) = std::env::var("HABIT_HISTORY_DAYS") {
            if let Some(value) = parse_history_days(&days) {
                config.history_days = value;
            }
        }
        Ok(config)
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn history_days(&self) -> usize {
        self.history_days
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

/// Positive day counts, capped at [`MAX_ACTIVITY_DAYS`].
fn parse_history_days(raw: &str) -> Option<usize> {
    let value = raw.trim().parse::<usize>().ok()?;
    (value > 0).then(|| value.min(MAX_ACTIVITY_DAYS))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("habit-data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

type Clock = Box<dyn Fn() -> NaiveDate>;

/// Turns UI events into repository mutations and re-renders.
///
/// Each handler persists through the repository before it asks the renderer
/// to redraw.
pub struct HabitBoard<S, R> {
    repository: HabitRepository<S>,
    renderer: R,
    clock: Clock,
}

impl<S: KeyValueStore, R: BoardRenderer> HabitBoard<S, R> {
    pub fn new(repository: HabitRepository<S>, renderer: R) -> Self {
        Self {
            repository,
            renderer,
            clock: Box::new(|| Local::now().date_naive()),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn repository(&self) -> &HabitRepository<S> {
        &self.repository
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn refresh(&mut self) {
        let today = DayKey::from_date(self.today());
        let rows = self.repository.rows(&today);
        self.renderer.render_list(&rows);
    }

    pub fn submit_habit(&mut self, title: &str, category: &str) -> Result<()> {
        match self.repository.add_habit(title, category) {
            Ok(habit) => {
                info!(id = %habit.id, title = %habit.title, "habit submitted");
                self.refresh();
                Ok(())
            }
            Err(HabitError::EmptyTitle) => {
                debug!("rejected habit without title");
                self.renderer.alert("Habit title is required.");
                Ok(())
            }
            Err(err) => Err(err).context("failed to save new habit"),
        }
    }

    /// Checkbox handler. Only today's entry changes, so the list is not redrawn.
    pub fn set_done_today(&mut self, selector: impl Into<HabitSelector>, done: bool) -> Result<()> {
        let today = DayKey::from_date(self.today());
        self.repository
            .toggle_completion(selector, today, done)
            .context("failed to save completion")?;
        Ok(())
    }

    pub fn delete(&mut self, selector: impl Into<HabitSelector>) -> Result<()> {
        let removed = self
            .repository
            .delete_habit(selector)
            .context("failed to save after delete")?;
        if removed {
            self.refresh();
        }
        Ok(())
    }

    pub fn show_details(&mut self, selector: impl Into<HabitSelector>) {
        let today = self.today();
        if let Some(details) = self.repository.details(selector, today) {
            self.renderer.render_details(&details);
        }
    }
}

/// Loads the board from `config` and prints the list followed by each habit's details.
pub fn run(config: AppConfig) -> Result<()> {
    info!(
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "opening habit board"
    );
    let store = FileStore::new(&config.data_dir);
    let repository = HabitRepository::builder(store)
        .storage_key(config.storage_key.clone())
        .history_days(config.history_days)
        .build();
    let mut board = HabitBoard::new(repository, TextRenderer::new(io::stdout().lock()));
    board.refresh();
    for index in 0..board.repository().len() {
        board.show_details(index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_habits_key() {
        let config = AppConfig::default();
        assert_eq!(config.storage_key(), "habits");
        assert_eq!(config.history_days(), 21);
        assert_eq!(config.data_dir(), &PathBuf::from("habit-data"));
    }

    #[test]
    fn history_days_from_env_are_bounded() {
        assert_eq!(parse_history_days(" 30 "), Some(30));
        assert_eq!(parse_history_days("0"), None);
        assert_eq!(parse_history_days("-4"), None);
        assert_eq!(parse_history_days("lots"), None);
        assert_eq!(parse_history_days("1000000000"), Some(MAX_ACTIVITY_DAYS));
        assert_eq!(
            parse_history_days(&usize::MAX.to_string()),
            Some(MAX_ACTIVITY_DAYS)
        );
    }
}
