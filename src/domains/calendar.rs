//! Shared calendar: dates, anniversaries, birthdays and reminders

use crate::client::RecordForm;
use crate::domains::{
    datetime_input, join_tags, non_empty, optional_date, required_date, split_tags,
};
use crate::presentation::{CategoryKey, CategoryTable, Presentation};
use crate::traits::JourneyRecord;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Date,
    Anniversary,
    Birthday,
    Travel,
    Reminder,
    Special,
    #[default]
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Kinds that repeat every year on the same day by default
    pub fn recurs_yearly(&self) -> bool {
        matches!(self, Self::Anniversary | Self::Birthday)
    }
}

impl CategoryTable for EventKind {
    const FALLBACK: Self = Self::Other;

    fn all() -> &'static [Self] {
        &[
            Self::Date,
            Self::Anniversary,
            Self::Birthday,
            Self::Travel,
            Self::Reminder,
            Self::Special,
            Self::Other,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Anniversary => "anniversary",
            Self::Birthday => "birthday",
            Self::Travel => "travel",
            Self::Reminder => "reminder",
            Self::Special => "special",
            Self::Other => "other",
        }
    }

    fn presentation(&self) -> Presentation {
        match self {
            Self::Date => Presentation::new("heart", "rose-500", "Date"),
            Self::Anniversary => Presentation::new("gem", "fuchsia-500", "Anniversary"),
            Self::Birthday => Presentation::new("cake", "amber-500", "Birthday"),
            Self::Travel => Presentation::new("plane", "sky-500", "Travel"),
            Self::Reminder => Presentation::new("bell", "indigo-400", "Reminder"),
            Self::Special => Presentation::new("star", "yellow-400", "Special"),
            Self::Other => Presentation::new("calendar", "slate-400", "Other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: CategoryKey<EventKind>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    #[serde(default, with = "crate::dates::iso_opt")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    /// Repeats every year on the same month and day
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CalendarEvent {
    /// Next day on or after `today` this event falls on.
    ///
    /// One-off events always answer their own day, even when it has passed.
    /// Yearly events landing on Feb 29 fall back to Feb 28 in other years.
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let day = self.date.date_naive();
        if !self.recurring || day >= today {
            return day;
        }
        let this_year = same_day_in(day, today.year());
        if this_year >= today {
            this_year
        } else {
            same_day_in(day, today.year() + 1)
        }
    }

    /// Whole days from `now` to the next occurrence; negative for past one-off events
    pub fn days_until(&self, now: DateTime<Utc>) -> i64 {
        let today = now.date_naive();
        (self.next_occurrence(today) - today).num_days()
    }

    /// Whether the event covers `day`, counting multi-day spans and yearly repeats.
    ///
    /// Nothing occurs before the first occurrence. A yearly span that crosses
    /// New Year is anchored in the previous year for its January days.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        let first = self.date.date_naive();
        if day < first {
            return false;
        }
        let span = self
            .end_date
            .map(|end| end.date_naive() - first)
            .filter(|span| *span > Duration::zero())
            .unwrap_or_else(Duration::zero);
        if !self.recurring {
            return day <= first + span;
        }
        [day.year(), day.year() - 1].into_iter().any(|year| {
            let start = same_day_in(first, year);
            start >= first && day >= start && day <= start + span
        })
    }
}

fn same_day_in(day: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, day.month(), day.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, day.month(), 28))
        .unwrap_or(day)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventDraft {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: CategoryKey<EventKind>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    #[serde(with = "crate::dates::iso_opt")]
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub all_day: bool,
    pub recurring: bool,
    pub tags: Vec<String>,
}

impl JourneyRecord for CalendarEvent {
    type Draft = CalendarEventDraft;
    type Category = EventKind;

    fn collection() -> &'static str {
        "events"
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn category(&self) -> EventKind {
        self.kind.resolve()
    }

    fn category_key(&self) -> &str {
        self.kind.as_str()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn from_draft(id: String, draft: CalendarEventDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            date: draft.date,
            end_date: draft.end_date,
            location: draft.location,
            all_day: draft.all_day,
            recurring: draft.recurring,
            tags: draft.tags,
        }
    }
}

/// Event dialog input. `recurring` of `None` follows the kind's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarEventForm {
    pub title: String,
    pub description: String,
    pub kind: CategoryKey<EventKind>,
    pub date: String,
    pub end_date: String,
    pub location: String,
    pub all_day: bool,
    pub recurring: Option<bool>,
    pub tags: String,
}

impl RecordForm<CalendarEvent> for CalendarEventForm {
    fn from_record(record: &CalendarEvent) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            kind: record.kind.clone(),
            date: datetime_input(record.date),
            end_date: record.end_date.map(datetime_input).unwrap_or_default(),
            location: record.location.clone().unwrap_or_default(),
            all_day: record.all_day,
            recurring: Some(record.recurring),
            tags: join_tags(&record.tags),
        }
    }

    fn validate(&self) -> Result<CalendarEventDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 120);
        let date = required_date(&mut errors, "date", &self.date);
        let end_date = optional_date(&mut errors, "end_date", &self.end_date);

        if let (Some(start), Some(end)) = (date, end_date) {
            if end < start {
                errors.add("end_date", "end_date must not be before date");
            }
        }

        let kind = self.kind.resolve();
        match date {
            Some(date) if errors.is_empty() => Ok(CalendarEventDraft {
                title: self.title.trim().to_string(),
                description: non_empty(&self.description),
                kind: self.kind.clone(),
                date,
                end_date,
                location: non_empty(&self.location),
                all_day: self.all_day,
                recurring: self.recurring.unwrap_or_else(|| kind.recurs_yearly()),
                tags: split_tags(&self.tags),
            }),
            _ => Err(errors),
        }
    }
}

/// Events whose next occurrence is within `days` days of `now`, soonest first
pub fn upcoming<'a>(
    events: &[&'a CalendarEvent],
    now: DateTime<Utc>,
    days: i64,
) -> Vec<&'a CalendarEvent> {
    let mut upcoming: Vec<(i64, &CalendarEvent)> = events
        .iter()
        .map(|e| (e.days_until(now), *e))
        .filter(|(until, _)| (0..=days).contains(until))
        .collect();
    upcoming.sort_by(|(a, ea), (b, eb)| {
        a.cmp(b).then_with(|| ea.date.time().cmp(&eb.date.time()))
    });
    upcoming.into_iter().map(|(_, e)| e).collect()
}

/// Events falling on a calendar day, in input order
pub fn events_on<'a>(events: &[&'a CalendarEvent], day: NaiveDate) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .copied()
        .filter(|e| e.occurs_on(day))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_iso;

    fn event(id: &str, kind: EventKind, date: &str, recurring: bool) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            title: format!("Event {}", id),
            description: None,
            kind: kind.into(),
            date: parse_iso(date).unwrap(),
            end_date: None,
            location: None,
            all_day: true,
            recurring,
            tags: vec![],
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_minimal_event_json() {
        let e: CalendarEvent = serde_json::from_str(
            r#"{"id": "e1", "title": "Dinner", "type": "date", "date": "2025-02-14T19:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(e.kind, EventKind::Date);
        assert_eq!(e.end_date, None);
        assert!(!e.recurring);
    }

    #[test]
    fn test_days_until_one_off_and_yearly() {
        let now = parse_iso("2025-06-10T12:00:00Z").unwrap();

        let trip = event("t", EventKind::Travel, "2025-06-15", false);
        assert_eq!(trip.days_until(now), 5);

        let past = event("p", EventKind::Date, "2025-06-01", false);
        assert_eq!(past.days_until(now), -9);

        let anniversary = event("a", EventKind::Anniversary, "2019-06-08", true);
        assert_eq!(anniversary.next_occurrence(now.date_naive()), day("2026-06-08"));

        let birthday = event("b", EventKind::Birthday, "1994-06-12", true);
        assert_eq!(birthday.days_until(now), 2);
    }

    #[test]
    fn test_leap_day_falls_back_to_feb_28() {
        let e = event("l", EventKind::Birthday, "2000-02-29", true);
        assert_eq!(e.next_occurrence(day("2025-01-01")), day("2025-02-28"));
        assert!(e.occurs_on(day("2025-02-28")));
    }

    #[test]
    fn test_upcoming_window_sorted() {
        let now = parse_iso("2025-06-10").unwrap();
        let a = event("a", EventKind::Travel, "2025-07-01", false);
        let b = event("b", EventKind::Birthday, "1990-06-12", true);
        let c = event("c", EventKind::Date, "2025-06-01", false);
        let d = event("d", EventKind::Reminder, "2025-08-30", false);

        let ids: Vec<&str> = upcoming(&[&a, &b, &c, &d], now, 30)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_events_on_multi_day() {
        let mut trip = event("t", EventKind::Travel, "2025-07-01", false);
        trip.end_date = parse_iso("2025-07-04");
        let dinner = event("d", EventKind::Date, "2025-07-03T19:30:00Z", false);

        assert_eq!(events_on(&[&trip, &dinner], day("2025-07-03")).len(), 2);
        assert_eq!(events_on(&[&trip, &dinner], day("2025-07-04")).len(), 1);
        assert!(events_on(&[&trip, &dinner], day("2025-07-05")).is_empty());
    }

    #[test]
    fn test_yearly_span_across_new_year() {
        let mut holidays = event("h", EventKind::Travel, "2024-12-30", true);
        holidays.end_date = parse_iso("2025-01-02");

        assert!(holidays.occurs_on(day("2024-12-31")));
        assert!(holidays.occurs_on(day("2025-01-01")));
        assert!(holidays.occurs_on(day("2026-01-01")));
        assert!(holidays.occurs_on(day("2025-12-30")));
        assert!(!holidays.occurs_on(day("2025-01-03")));
        assert!(!holidays.occurs_on(day("2025-12-29")));
    }

    #[test]
    fn test_yearly_event_not_before_first_occurrence() {
        let anniversary = event("a", EventKind::Anniversary, "2024-06-08", true);
        assert!(!anniversary.occurs_on(day("2019-06-08")));
        assert!(!anniversary.occurs_on(day("2024-06-07")));
        assert!(anniversary.occurs_on(day("2024-06-08")));
        assert!(anniversary.occurs_on(day("2031-06-08")));

        let mut holidays = event("h", EventKind::Travel, "2024-12-30", true);
        holidays.end_date = parse_iso("2025-01-02");
        assert!(!holidays.occurs_on(day("2019-12-31")));
        assert!(events_on(&[&holidays, &anniversary], day("2024-01-01")).is_empty());
    }

    #[test]
    fn test_form_recurrence_defaults_and_end_check() {
        let draft = CalendarEventForm {
            title: "Our anniversary".into(),
            kind: EventKind::Anniversary.into(),
            date: "2025-09-20T18:00".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(draft.recurring);

        let errors = CalendarEventForm {
            title: "Trip".into(),
            date: "2025-09-20".into(),
            end_date: "2025-09-18".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("end_date"), Some("end_date must not be before date"));
    }
}
