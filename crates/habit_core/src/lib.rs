pub mod day_key;
pub mod error;
pub mod habit;
pub mod history;
pub mod repository;
pub mod storage;
pub mod streak;

pub use crate::day_key::{format_day_key, DayKey};
pub use crate::error::{HabitError, Result};
pub use crate::habit::{Habit, HabitDetails, HabitId, HabitRow};
pub use crate::history::CompletionHistory;
pub use crate::repository::{HabitRepository, HabitRepositoryBuilder, HabitSelector};
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
