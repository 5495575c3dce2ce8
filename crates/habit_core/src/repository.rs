use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::{
    day_key::DayKey,
    error::{HabitError, Result},
    habit::{Habit, HabitDetails, HabitId, HabitRow},
    storage::KeyValueStore,
    streak::MAX_ACTIVITY_DAYS,
};

pub const DEFAULT_STORAGE_KEY: &str = "habits";
pub const DEFAULT_HISTORY_DAYS: usize = 21;

/// Addresses a habit either by list position or by its stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitSelector {
    Index(usize),
    Id(HabitId),
}

impl From<usize> for HabitSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<HabitId> for HabitSelector {
    fn from(id: HabitId) -> Self {
        Self::Id(id)
    }
}

/// Ordered habit list backed by a [`KeyValueStore`].
///
/// Every mutation writes the whole list back under the storage key before it
/// returns. When that write fails the mutation is undone, so memory never holds
/// state the store did not accept.
pub struct HabitRepository<S> {
    store: S,
    storage_key: String,
    history_days: usize,
    habits: Vec<Habit>,
}

pub struct HabitRepositoryBuilder<S> {
    store: S,
    storage_key: String,
    history_days: usize,
}

impl<S: KeyValueStore> HabitRepositoryBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Number of days included in [`HabitDetails::activity`], at most [`MAX_ACTIVITY_DAYS`].
    pub fn history_days(mut self, days: usize) -> Self {
        self.history_days = days.min(MAX_ACTIVITY_DAYS);
        self
    }

    pub fn build(self) -> HabitRepository<S> {
        let mut repository = HabitRepository {
            store: self.store,
            storage_key: self.storage_key,
            history_days: self.history_days,
            habits: Vec::new(),
        };
        repository.reload();
        repository
    }
}

impl<S: KeyValueStore> HabitRepository<S> {
    pub fn builder(store: S) -> HabitRepositoryBuilder<S> {
        HabitRepositoryBuilder::new(store)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn position(&self, id: HabitId) -> Option<usize> {
        self.habits.iter().position(|habit| habit.id == id)
    }

    pub fn get(&self, selector: impl Into<HabitSelector>) -> Option<&Habit> {
        let index = self.resolve(selector.into())?;
        self.habits.get(index)
    }

    /// Reads the persisted list. Missing, unreadable, or corrupt content yields an empty list.
    pub fn load(&self) -> Vec<Habit> {
        let raw = match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key = %self.storage_key, %err, "unable to read stored habits, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Habit>>(&raw) {
            Ok(habits) => habits,
            Err(err) => {
                warn!(key = %self.storage_key, %err, "discarding unreadable habit data");
                Vec::new()
            }
        }
    }

    /// Replaces the in-memory list with the persisted one.
    pub fn reload(&mut self) {
        self.habits = self.load();
        info!(habit_count = self.habits.len(), key = %self.storage_key, "habits loaded");
    }

    /// Writes the full list, overwriting whatever the store held.
    pub fn persist(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.habits)?;
        self.store.set(&self.storage_key, &payload)?;
        debug!(habit_count = self.habits.len(), bytes = payload.len(), "habits persisted");
        Ok(())
    }

    /// Swaps in a whole list, e.g. an import, and persists it.
    pub fn replace_all(&mut self, habits: Vec<Habit>) -> Result<()> {
        let previous = std::mem::replace(&mut self.habits, habits);
        if let Err(err) = self.persist() {
            self.habits = previous;
            return Err(err);
        }
        info!(habit_count = self.habits.len(), "habit list replaced");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn add_habit(&mut self, title: &str, category: &str) -> Result<Habit> {
        let title = title.trim();
        if title.is_empty() {
            return Err(HabitError::EmptyTitle);
        }
        let category = Some(category.trim())
            .filter(|category| !category.is_empty())
            .map(str::to_string);
        let habit = Habit::new(title, category);
        self.habits.push(habit.clone());
        if let Err(err) = self.persist() {
            self.habits.pop();
            return Err(err);
        }
        info!(id = %habit.id, "habit added");
        Ok(habit)
    }

    /// Removes the habit. Returns `Ok(false)` when the selector matches nothing.
    pub fn delete_habit(&mut self, selector: impl Into<HabitSelector>) -> Result<bool> {
        let selector = selector.into();
        let Some(index) = self.resolve(selector) else {
            debug!(?selector, "delete ignored, no matching habit");
            return Ok(false);
        };
        let removed = self.habits.remove(index);
        if let Err(err) = self.persist() {
            self.habits.insert(index, removed);
            return Err(err);
        }
        info!(id = %removed.id, index, "habit deleted");
        Ok(true)
    }

    /// Sets the completion flag for `day`. Returns `Ok(false)` when the selector matches nothing.
    pub fn toggle_completion(
        &mut self,
        selector: impl Into<HabitSelector>,
        day: impl Into<DayKey>,
        completed: bool,
    ) -> Result<bool> {
        let selector = selector.into();
        let day = day.into();
        let Some(index) = self.resolve(selector) else {
            debug!(?selector, %day, "toggle ignored, no matching habit");
            return Ok(false);
        };
        let habit = &mut self.habits[index];
        let previous = habit.completion_history.get_completion(&day);
        habit.completion_history.set_completion(day.clone(), completed);
        let id = habit.id;
        if let Err(err) = self.persist() {
            self.habits[index]
                .completion_history
                .restore(day, previous);
            return Err(err);
        }
        info!(%id, %day, completed, "completion updated");
        Ok(true)
    }

    /// List view rows with the "done today" flag resolved against `today`.
    pub fn rows(&self, today: &DayKey) -> Vec<HabitRow> {
        self.habits
            .iter()
            .enumerate()
            .map(|(position, habit)| HabitRow {
                id: habit.id,
                position,
                title: habit.title.clone(),
                label: habit.label(),
                done_today: habit.is_done_on(today),
            })
            .collect()
    }

    pub fn details(
        &self,
        selector: impl Into<HabitSelector>,
        today: NaiveDate,
    ) -> Option<HabitDetails> {
        self.get(selector)
            .map(|habit| HabitDetails::build(habit, today, self.history_days))
    }

    fn resolve(&self, selector: HabitSelector) -> Option<usize> {
        match selector {
            HabitSelector::Index(index) => (index < self.habits.len()).then_some(index),
            HabitSelector::Id(id) => self.position(id),
        }
    }
}
