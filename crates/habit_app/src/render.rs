use std::io::Write;

use habit_core::{HabitDetails, HabitRow};
use tracing::warn;

/// Rendering collaborator driven by [`crate::app::HabitBoard`].
pub trait BoardRenderer {
    fn render_list(&mut self, rows: &[HabitRow]);
    fn render_details(&mut self, details: &HabitDetails);
    fn alert(&mut self, message: &str);
}

/// Plain-text renderer used by the `habit_board` binary.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(%err, "unable to write board output");
        }
    }
}

impl<W: Write> BoardRenderer for TextRenderer<W> {
    fn render_list(&mut self, rows: &[HabitRow]) {
        if rows.is_empty() {
            self.emit("No habits yet.");
            return;
        }
        for row in rows {
            let mark = if row.done_today { 'x' } else { ' ' };
            self.emit(&format!("{:>3}. [{}] {}", row.position + 1, mark, row.label));
        }
    }

    fn render_details(&mut self, details: &HabitDetails) {
        self.emit(&format!("== {}", details.title));
        self.emit(&format!("   total completions: {}", details.total_completions));
        self.emit(&format!("   current streak:    {}", details.current_streak));
        if !details.activity.is_empty() {
            self.emit(&format!("   recent:            {}", details.activity_graph()));
        }
    }

    fn alert(&mut self, message: &str) {
        self.emit(&format!("! {message}"));
    }
}
