//! Deadline phrase extraction and date resolution.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use duely_core::{Deadline, DeadlineType};
use regex::Captures;

use crate::patterns::{PatternLibrary, default_library};

/// The Friday of `today`'s week. From Friday through Sunday the working
/// week is already over, so the deadline is `today` itself.
#[must_use]
pub fn end_of_week(today: NaiveDate) -> NaiveDate {
    let offset = today.weekday().num_days_from_monday();
    let friday = Weekday::Fri.num_days_from_monday();
    if offset >= friday {
        return today;
    }
    today
        .checked_add_days(Days::new(u64::from(friday - offset)))
        .unwrap_or(today)
}

/// Next occurrence of `weekday` strictly after `today`, one to seven days
/// ahead. Naming today's weekday means the same day next week.
#[must_use]
pub fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday();
    let target = weekday.num_days_from_monday();
    let ahead = match (target + 7 - current) % 7 {
        0 => 7,
        n => n,
    };
    today
        .checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(today)
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    let prefix: String = word.chars().take(3).flat_map(char::to_lowercase).collect();
    match prefix.as_str() {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Weekday named by a `day_of_week` match: the first capture group that
/// reads as one, else the first word of the whole match that does.
fn weekday_from(caps: &Captures<'_>) -> Option<Weekday> {
    caps.iter()
        .skip(1)
        .flatten()
        .find_map(|m| parse_weekday(m.as_str()))
        .or_else(|| {
            caps.get(0).and_then(|m| {
                m.as_str()
                    .split(|c: char| !c.is_alphabetic())
                    .filter(|w| w.len() >= 3)
                    .find_map(parse_weekday)
            })
        })
}

impl PatternLibrary {
    /// Find the highest-priority deadline phrase in `text` and resolve it
    /// to a date relative to `today`.
    #[must_use]
    pub fn resolve_deadline(&self, text: &str, today: NaiveDate) -> Option<Deadline> {
        for rule in self.deadline() {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            let date = match rule.label {
                DeadlineType::Today | DeadlineType::Urgent => Some(today),
                DeadlineType::Tomorrow => today.checked_add_days(Days::new(1)),
                DeadlineType::ThisWeek => Some(end_of_week(today)),
                DeadlineType::DayOfWeek => weekday_from(&caps).map(|wd| next_weekday(today, wd)),
            };
            if let Some(date) = date {
                return Some(Deadline::new(date, rule.label));
            }
        }
        None
    }
}

/// Resolve a deadline in `text` with the built-in rules.
#[must_use]
pub fn extract_deadline(text: &str, today: NaiveDate) -> Option<Deadline> {
    default_library().resolve_deadline(text, today)
}
