use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{day_key::DayKey, history::CompletionHistory};

/// Derived statistics shown in the details view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStats {
    pub total_completions: usize,
    pub current_streak: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayMark {
    Done,
    Missed,
    Unmarked,
}

impl DayMark {
    pub fn glyph(self) -> char {
        match self {
            DayMark::Done => 'X',
            DayMark::Missed => '.',
            DayMark::Unmarked => '_',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub day: NaiveDate,
    pub mark: DayMark,
}

/// Number of days marked `true`.
pub fn total_completions(history: &CompletionHistory) -> usize {
    history.iter().filter(|(_, done)| *done).count()
}

/// Consecutive days marked `true`, walking back from and including `reference_day`.
///
/// The walk stops at the first day that is `false` or unmarked, so an unmarked
/// `reference_day` gives 0 whatever came before it.
pub fn current_streak(history: &CompletionHistory, reference_day: NaiveDate) -> usize {
    let mut streak = 0;
    let mut cursor = Some(reference_day);
    while let Some(day) = cursor {
        if !history.is_complete(&DayKey::from_date(day)) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

pub fn stats(history: &CompletionHistory, reference_day: NaiveDate) -> HabitStats {
    HabitStats {
        total_completions: total_completions(history),
        current_streak: current_streak(history, reference_day),
    }
}

/// Longest window [`recent_activity`] will produce.
pub const MAX_ACTIVITY_DAYS: usize = 366;

/// The `days` days ending at `reference_day`, oldest first.
///
/// `days` is capped at [`MAX_ACTIVITY_DAYS`]; the window also ends early at the
/// first representable date.
pub fn recent_activity(
    history: &CompletionHistory,
    days: usize,
    reference_day: NaiveDate,
) -> Vec<DayActivity> {
    let mut activity: Vec<DayActivity> = (0..days.min(MAX_ACTIVITY_DAYS))
        .map_while(|offset| reference_day.checked_sub_days(Days::new(offset as u64)))
        .map(|day| {
            let mark = match history.get_completion(&DayKey::from_date(day)) {
                Some(true) => DayMark::Done,
                Some(false) => DayMark::Missed,
                None => DayMark::Unmarked,
            };
            DayActivity { day, mark }
        })
        .collect();
    activity.reverse();
    activity
}

pub fn activity_graph(activity: &[DayActivity]) -> String {
    activity.iter().map(|entry| entry.mark.glyph()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
    }

    fn back(days: i64) -> DayKey {
        DayKey::from_date(day0() - Duration::days(days))
    }

    fn history(entries: &[(i64, bool)]) -> CompletionHistory {
        entries
            .iter()
            .map(|(offset, done)| (back(*offset), *done))
            .collect()
    }

    #[test]
    fn empty_history_has_no_completions_or_streak() {
        let empty = CompletionHistory::new();
        assert_eq!(total_completions(&empty), 0);
        assert_eq!(current_streak(&empty, day0()), 0);
    }

    #[test]
    fn total_counts_only_true_entries() {
        let h = history(&[(0, true), (1, false), (5, true), (9, true)]);
        assert_eq!(total_completions(&h), 3);
    }

    #[test]
    fn three_consecutive_days_give_streak_of_three() {
        let h = history(&[(0, true), (1, true), (2, true)]);
        assert_eq!(current_streak(&h, day0()), 3);
    }

    #[test]
    fn false_or_missing_yesterday_caps_streak_at_one() {
        let with_false = history(&[(0, true), (1, false), (2, true)]);
        let with_gap = history(&[(0, true), (2, true)]);
        assert_eq!(current_streak(&with_false, day0()), 1);
        assert_eq!(current_streak(&with_gap, day0()), 1);
    }

    #[test]
    fn unmarked_reference_day_means_zero() {
        let yesterday_only = history(&[(1, true), (2, true)]);
        let false_today = history(&[(0, false), (1, true)]);
        assert_eq!(current_streak(&yesterday_only, day0()), 0);
        assert_eq!(current_streak(&false_today, day0()), 0);
    }

    #[test]
    fn single_true_entry_on_reference_day() {
        let h = history(&[(0, true)]);
        assert_eq!(current_streak(&h, day0()), 1);
    }

    #[test]
    fn streak_crosses_leap_day() {
        // day0 is 2024-03-02, so the walk passes 03-01 and 02-29.
        let h = history(&[(0, true), (1, true), (2, true), (3, true), (4, false)]);
        assert_eq!(back(2).as_str(), "2024-02-29");
        assert_eq!(current_streak(&h, day0()), 4);
    }

    #[test]
    fn malformed_keys_never_count_toward_streak() {
        let h: CompletionHistory = [("garbage", true), ("2024-3-2", true)].into_iter().collect();
        assert_eq!(current_streak(&h, day0()), 0);
        assert_eq!(total_completions(&h), 2);
    }

    #[test]
    fn recent_activity_is_oldest_first() {
        let h = history(&[(0, true), (1, false), (3, true)]);
        let activity = recent_activity(&h, 5, day0());
        assert_eq!(activity.len(), 5);
        assert_eq!(activity.first().map(|a| a.day), Some(day0() - Duration::days(4)));
        assert_eq!(activity.last().map(|a| a.day), Some(day0()));
        assert_eq!(activity_graph(&activity), "_X_.X");
    }

    #[test]
    fn oversized_window_is_capped() {
        let h = history(&[(0, true)]);
        let activity = recent_activity(&h, usize::MAX, day0());
        assert_eq!(activity.len(), MAX_ACTIVITY_DAYS);
        assert_eq!(activity.last().map(|a| a.mark), Some(DayMark::Done));
    }

    #[test]
    fn window_stops_at_earliest_date() {
        let reference = NaiveDate::MIN + Days::new(2);
        let activity = recent_activity(&CompletionHistory::new(), 10, reference);
        assert_eq!(activity.len(), 3);
        assert_eq!(activity.first().map(|a| a.day), Some(NaiveDate::MIN));
    }

    #[test]
    fn stats_combines_both_figures() {
        let h = history(&[(0, true), (1, true), (4, true)]);
        assert_eq!(
            stats(&h, day0()),
            HabitStats {
                total_completions: 3,
                current_streak: 2,
            }
        );
    }
}
