pub mod app;
pub mod render;

pub use crate::app::{run, AppConfig, HabitBoard};
pub use crate::render::{BoardRenderer, TextRenderer};
