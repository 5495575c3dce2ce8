use std::fs;

use chrono::NaiveDate;
use habit_core::{
    CompletionHistory, FileStore, Habit, HabitRepository, KeyValueStore, MemoryStore,
};
use tempfile::tempdir;

fn sample_habits() -> Vec<Habit> {
    let mut read = Habit::new("Read", Some("Learning".into()));
    read.completion_history = [
        ("2024-01-01", true),
        ("2024-01-02", false),
        ("2024-01-03", true),
    ]
    .into_iter()
    .collect();

    let mut legacy = Habit::new("Walk", Some(String::new()));
    legacy.completion_history = [("not-a-date", true), ("2024-2-9", false)]
        .into_iter()
        .collect();

    let mut long_history = Habit::new("Water plants", None);
    let start = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
    long_history.completion_history = start
        .iter_days()
        .take(90)
        .enumerate()
        .map(|(i, day)| (day, i % 3 != 0))
        .collect();

    vec![
        read,
        legacy,
        Habit::new("Stretch", None),
        long_history,
        Habit::new("Journal", Some("Evening".into())),
    ]
}

#[test]
fn file_backed_list_round_trips() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::new(temp.path());
    let habits = sample_habits();

    let mut repo = HabitRepository::builder(store.clone()).build();
    repo.replace_all(habits.clone()).expect("persist habits");

    let reopened = HabitRepository::builder(store).build();
    assert_eq!(reopened.habits(), habits.as_slice());
}

#[test]
fn empty_list_round_trips() {
    let store = MemoryStore::new();
    let mut repo = HabitRepository::builder(store.clone()).build();
    repo.replace_all(Vec::new()).expect("persist");

    assert_eq!(store.get("habits").unwrap().as_deref(), Some("[]"));
    assert!(HabitRepository::builder(store).build().is_empty());
}

#[test]
fn loads_records_written_without_ids() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::new(temp.path());
    fs::write(
        store.path_for("habits").expect("valid key"),
        r#"[{"title":"Read","category":"","completionHistory":{"2024-03-01":true,"2024-03-02":false}},
            {"title":"Run","category":"Health","completionHistory":{}}]"#,
    )
    .expect("write legacy data");

    let repo = HabitRepository::builder(store).build();
    assert_eq!(repo.len(), 2);
    assert_ne!(repo.habits()[0].id, repo.habits()[1].id);
    assert_eq!(repo.habits()[0].label(), "Read");
    assert_eq!(repo.habits()[1].label(), "Run (Health)");
    assert_eq!(
        repo.habits()[0]
            .completion_history
            .get_completion(&"2024-03-02".into()),
        Some(false)
    );
}

#[test]
fn corrupt_file_is_treated_as_first_run() {
    let temp = tempdir().expect("tempdir");
    let store = FileStore::new(temp.path());
    let path = store.path_for("habits").expect("valid key");
    fs::write(&path, "[{\"title\": ").expect("write junk");

    let mut repo = HabitRepository::builder(store.clone()).build();
    assert!(repo.is_empty());

    repo.add_habit("Read", "").expect("add");
    let raw = fs::read_to_string(&path).expect("read back");
    assert!(raw.contains("\"title\":\"Read\""));
}

#[test]
fn streak_and_totals_after_a_week_of_toggles() {
    let store = MemoryStore::new();
    let mut repo = HabitRepository::builder(store).build();
    let habit = repo.add_habit("Meditate", "Mind").expect("add");

    let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    for (offset, done) in [(6, true), (5, true), (4, false), (3, true), (2, true), (1, true), (0, true)] {
        let day = today - chrono::Duration::days(offset);
        repo.toggle_completion(habit.id, day, done).expect("toggle");
    }

    let details = repo.details(habit.id, today).expect("details");
    assert_eq!(details.total_completions, 6);
    assert_eq!(details.current_streak, 4);

    let mut history = CompletionHistory::new();
    history.set_completion(today, true);
    assert_eq!(habit_core::streak::current_streak(&history, today), 1);
}
