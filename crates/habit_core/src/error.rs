use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum HabitError {
    #[error("habit title is required")]
    EmptyTitle,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode habits: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HabitError>;
