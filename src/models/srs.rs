//! Spaced repetition review policy.
//!
//! Every vocabulary entry carries a mastery level between 0 and [`MAX_LEVEL`].
//! A review outcome moves the level up or down and the new level picks the
//! number of days until the entry is due again:
//! - Again: one level down (never below 0)
//! - Hard: level unchanged
//! - Good: one level up
//! - Easy: two levels up
//!
//! Levels never move past the end of [`INTERVAL_DAYS`].

use super::VocabularyEntry;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

/// Days until the next review, indexed by mastery level.
pub const INTERVAL_DAYS: [u32; 8] = [0, 1, 3, 7, 14, 30, 60, 90];

pub const MAX_LEVEL: u8 = (INTERVAL_DAYS.len() - 1) as u8;

/// How well the learner recalled a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Again,
    Hard,
    Good,
    Easy,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [Outcome::Again, Outcome::Hard, Outcome::Good, Outcome::Easy];

    /// Two-grade form: a correct answer counts as Good, a miss as Again.
    pub fn from_correct(correct: bool) -> Self {
        if correct { Outcome::Good } else { Outcome::Again }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Again => "again",
            Outcome::Hard => "hard",
            Outcome::Good => "good",
            Outcome::Easy => "easy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Again => "Again",
            Outcome::Hard => "Hard",
            Outcome::Good => "Good",
            Outcome::Easy => "Easy",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(Outcome::Again),
            "hard" => Ok(Outcome::Hard),
            "good" => Ok(Outcome::Good),
            "easy" => Ok(Outcome::Easy),
            other => Err(AppError::InvalidArgument(format!(
                "unknown review outcome '{}'",
                other
            ))),
        }
    }
}

/// New scheduling state for an entry after one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub srs_level: u8,
    pub next_review: DateTime<Utc>,
    pub last_reviewed: DateTime<Utc>,
}

/// Clamps a stored level into the range covered by the interval table.
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(0, MAX_LEVEL as i64) as u8
}

pub fn interval_days(level: u8) -> u32 {
    INTERVAL_DAYS[level.min(MAX_LEVEL) as usize]
}

pub fn next_level(current_level: u8, outcome: Outcome) -> u8 {
    let level = current_level.min(MAX_LEVEL);
    match outcome {
        Outcome::Again => level.saturating_sub(1),
        Outcome::Hard => level,
        Outcome::Good => level.saturating_add(1).min(MAX_LEVEL),
        Outcome::Easy => level.saturating_add(2).min(MAX_LEVEL),
    }
}

/// Computes the level and due date that follow a review at `now`.
pub fn transition(current_level: u8, outcome: Outcome, now: DateTime<Utc>) -> ReviewUpdate {
    let srs_level = next_level(current_level, outcome);
    ReviewUpdate {
        srs_level,
        next_review: now + Duration::days(interval_days(srs_level) as i64),
        last_reviewed: now,
    }
}

/// Interval in days each outcome would give, in [`Outcome::ALL`] order.
pub fn preview_intervals(current_level: u8) -> [u32; 4] {
    Outcome::ALL.map(|outcome| interval_days(next_level(current_level, outcome)))
}

/// Unscheduled entries are always due.
pub fn is_due(entry: &VocabularyEntry, now: DateTime<Utc>) -> bool {
    entry.next_review.is_none_or(|next| next <= now)
}

/// Returns the due entries, weakest first, then the longest overdue.
pub fn due_entries(entries: &[VocabularyEntry], now: DateTime<Utc>) -> Vec<VocabularyEntry> {
    let mut due: Vec<VocabularyEntry> = entries
        .iter()
        .filter(|entry| is_due(entry, now))
        .cloned()
        .collect();
    sort_for_review(&mut due);
    due
}

/// Stable sort by level, then by next review date (unscheduled first).
pub fn sort_for_review(entries: &mut [VocabularyEntry]) {
    entries.sort_by(|a, b| {
        a.srs_level
            .cmp(&b.srs_level)
            .then_with(|| a.next_review.cmp(&b.next_review))
    });
}

/// Format an interval in days to a short label
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn entry(id: i64, level: u8, next_review: Option<DateTime<Utc>>) -> VocabularyEntry {
        VocabularyEntry {
            id,
            user_id: 1,
            french: format!("mot {}", id),
            english: format!("word {}", id),
            example: None,
            notes: None,
            category: "Uncategorized".to_string(),
            srs_level: level,
            last_reviewed: None,
            next_review,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_again_never_drops_below_zero() {
        for level in 0..=MAX_LEVEL {
            let update = transition(level, Outcome::Again, now());
            assert_eq!(update.srs_level, level.saturating_sub(1));
        }
        assert_eq!(transition(0, Outcome::Again, now()).srs_level, 0);
    }

    #[test]
    fn test_hard_keeps_level() {
        for level in 0..=MAX_LEVEL {
            assert_eq!(transition(level, Outcome::Hard, now()).srs_level, level);
        }
    }

    #[test]
    fn test_good_and_easy_clamp_to_max() {
        for level in 0..=MAX_LEVEL {
            assert_eq!(
                transition(level, Outcome::Good, now()).srs_level,
                (level + 1).min(MAX_LEVEL)
            );
            assert_eq!(
                transition(level, Outcome::Easy, now()).srs_level,
                (level + 2).min(MAX_LEVEL)
            );
        }
    }

    #[test]
    fn test_next_review_follows_interval_table() {
        for level in 0..=MAX_LEVEL {
            for outcome in Outcome::ALL {
                let update = transition(level, outcome, now());
                let expected = now() + Duration::days(INTERVAL_DAYS[update.srs_level as usize] as i64);
                assert_eq!(update.next_review, expected);
                assert!(update.next_review >= now());
                assert_eq!(update.last_reviewed, now());
            }
        }
    }

    #[test]
    fn test_new_card_good_is_due_tomorrow() {
        let update = transition(0, Outcome::Good, now());
        assert_eq!(update.srs_level, 1);
        assert_eq!(update.next_review, now() + Duration::days(1));
    }

    #[test]
    fn test_max_level_easy_stays_at_max() {
        let update = transition(7, Outcome::Easy, now());
        assert_eq!(update.srs_level, 7);
        assert_eq!(update.next_review, now() + Duration::days(90));
    }

    #[test]
    fn test_out_of_range_level_is_clamped() {
        assert_eq!(transition(42, Outcome::Hard, now()).srs_level, MAX_LEVEL);
        assert_eq!(clamp_level(-3), 0);
        assert_eq!(clamp_level(12), MAX_LEVEL);
        assert_eq!(clamp_level(4), 4);
    }

    #[test]
    fn test_transition_is_deterministic() {
        let first = transition(3, Outcome::Good, now());
        let second = transition(3, Outcome::Good, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_outcome_parsing() {
        assert_eq!("again".parse::<Outcome>().unwrap(), Outcome::Again);
        assert_eq!(" Easy ".parse::<Outcome>().unwrap(), Outcome::Easy);
        assert!(matches!(
            "perfect".parse::<Outcome>(),
            Err(AppError::InvalidArgument(_))
        ));
        assert_eq!(Outcome::from_correct(true), Outcome::Good);
        assert_eq!(Outcome::from_correct(false), Outcome::Again);
    }

    #[test]
    fn test_due_filter() {
        let unscheduled = entry(1, 0, None);
        let overdue = entry(2, 1, Some(now() - Duration::hours(2)));
        let exactly_now = entry(3, 1, Some(now()));
        let future = entry(4, 1, Some(now() + Duration::days(1)));

        assert!(is_due(&unscheduled, now()));
        assert!(is_due(&overdue, now()));
        assert!(is_due(&exactly_now, now()));
        assert!(!is_due(&future, now()));
    }

    #[test]
    fn test_due_entries_sorted_by_level() {
        let when = Some(now() - Duration::days(1));
        let entries = vec![entry(1, 3, when), entry(2, 1, when), entry(3, 2, when)];

        let levels: Vec<u8> = due_entries(&entries, now()).iter().map(|e| e.srs_level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_due_entries_tie_break_on_next_review() {
        let entries = vec![
            entry(1, 2, Some(now() - Duration::days(1))),
            entry(2, 2, Some(now() - Duration::days(5))),
            entry(3, 2, None),
            entry(4, 0, Some(now() + Duration::days(3))),
        ];

        let ids: Vec<i64> = due_entries(&entries, now()).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(preview_intervals(0), [0, 0, 1, 3]);
        assert_eq!(preview_intervals(3), [3, 7, 14, 30]);
        assert_eq!(preview_intervals(7), [60, 90, 90, 90]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(3), "3d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(400), "1y");
    }
}
