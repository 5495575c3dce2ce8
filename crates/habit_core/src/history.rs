use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::day_key::DayKey;

/// Per-habit record of which days were marked, keyed by [`DayKey`].
///
/// An absent day is "not marked", which is different from a stored `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionHistory {
    entries: BTreeMap<DayKey, bool>,
}

impl CompletionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry for `day`. Storing `false` keeps the key.
    pub fn set_completion(&mut self, day: impl Into<DayKey>, completed: bool) {
        self.entries.insert(day.into(), completed);
    }

    pub fn get_completion(&self, day: &DayKey) -> Option<bool> {
        self.entries.get(day).copied()
    }

    /// Puts `day` back to an earlier [`Self::get_completion`] result, removing it when unset.
    pub(crate) fn restore(&mut self, day: DayKey, previous: Option<bool>) {
        match previous {
            Some(completed) => {
                self.entries.insert(day, completed);
            }
            None => {
                self.entries.remove(&day);
            }
        }
    }

    /// True only for an explicit `true` entry.
    pub fn is_complete(&self, day: &DayKey) -> bool {
        self.get_completion(day).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DayKey, bool)> {
        self.entries.iter().map(|(day, done)| (day, *done))
    }
}

impl<K: Into<DayKey>> FromIterator<(K, bool)> for CompletionHistory {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(day, done)| (day.into(), done))
                .collect(),
        }
    }
}
