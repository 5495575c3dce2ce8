use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    day_key::DayKey,
    history::CompletionHistory,
    streak::{self, DayActivity, HabitStats},
};

/// Stable identifier assigned when a habit is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(Uuid);

impl HabitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Records stored before ids existed get a fresh one on load.
    #[serde(default)]
    pub id: HabitId,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "history_or_empty")]
    pub completion_history: CompletionHistory,
}

/// Stored `null` histories load as empty instead of failing the whole list.
fn history_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<CompletionHistory, D::Error> {
    Ok(Option::<CompletionHistory>::deserialize(deserializer)?.unwrap_or_default())
}

impl Habit {
    pub fn new(title: impl Into<String>, category: Option<String>) -> Self {
        Self {
            id: HabitId::new(),
            title: title.into(),
            category,
            completion_history: CompletionHistory::new(),
        }
    }

    /// Category for display; empty strings from older data count as no category.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|category| !category.trim().is_empty())
    }

    /// `title (category)`, or just the title.
    pub fn label(&self) -> String {
        match self.category() {
            Some(category) => format!("{} ({})", self.title, category),
            None => self.title.clone(),
        }
    }

    pub fn is_done_on(&self, day: &DayKey) -> bool {
        self.completion_history.is_complete(day)
    }

    pub fn stats(&self, reference_day: NaiveDate) -> HabitStats {
        streak::stats(&self.completion_history, reference_day)
    }
}

/// One line of the habit list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitRow {
    pub id: HabitId,
    pub position: usize,
    pub title: String,
    pub label: String,
    pub done_today: bool,
}

/// Everything the details view shows for a single habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitDetails {
    pub id: HabitId,
    pub title: String,
    pub category: Option<String>,
    pub total_completions: usize,
    pub current_streak: usize,
    pub activity: Vec<DayActivity>,
}

impl HabitDetails {
    pub fn build(habit: &Habit, reference_day: NaiveDate, history_days: usize) -> Self {
        let stats = habit.stats(reference_day);
        Self {
            id: habit.id,
            title: habit.title.clone(),
            category: habit.category().map(str::to_string),
            total_completions: stats.total_completions,
            current_streak: stats.current_streak,
            activity: streak::recent_activity(
                &habit.completion_history,
                history_days,
                reference_day,
            ),
        }
    }

    pub fn activity_graph(&self) -> String {
        streak::activity_graph(&self.activity)
    }
}
