//! Time capsules: messages sealed until an unlock date

use crate::client::RecordForm;
use crate::domains::{datetime_input, join_tags, required_date, split_tags};
use crate::presentation::{CategoryKey, CategoryTable, Presentation};
use crate::traits::JourneyRecord;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsuleOccasion {
    Anniversary,
    Birthday,
    Holiday,
    NewYear,
    FutureUs,
    #[default]
    #[serde(other)]
    Other,
}

impl CategoryTable for CapsuleOccasion {
    const FALLBACK: Self = Self::Other;

    fn all() -> &'static [Self] {
        &[
            Self::Anniversary,
            Self::Birthday,
            Self::Holiday,
            Self::NewYear,
            Self::FutureUs,
            Self::Other,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Anniversary => "anniversary",
            Self::Birthday => "birthday",
            Self::Holiday => "holiday",
            Self::NewYear => "new_year",
            Self::FutureUs => "future_us",
            Self::Other => "other",
        }
    }

    fn presentation(&self) -> Presentation {
        match self {
            Self::Anniversary => Presentation::new("gem", "fuchsia-500", "Anniversary"),
            Self::Birthday => Presentation::new("cake", "amber-500", "Birthday"),
            Self::Holiday => Presentation::new("gift", "emerald-500", "Holiday"),
            Self::NewYear => Presentation::new("party-popper", "yellow-400", "New Year"),
            Self::FutureUs => Presentation::new("hourglass", "violet-500", "Future Us"),
            Self::Other => Presentation::new("mail", "slate-400", "Other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCapsule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub occasion: CategoryKey<CapsuleOccasion>,
    #[serde(with = "crate::dates::iso")]
    pub unlock_date: DateTime<Utc>,
    #[serde(default, with = "crate::dates::iso_opt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Set once the capsule has been opened after unlocking
    #[serde(default)]
    pub is_opened: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Time remaining until a capsule unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d {}h {}m {}s", self.days, self.hours, self.minutes, self.seconds)
    }
}

impl TimeCapsule {
    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        now >= self.unlock_date
    }

    /// Remaining time, zero once unlocked
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        let remaining = (self.unlock_date - now).num_seconds().max(0);
        Countdown {
            days: remaining / 86_400,
            hours: remaining % 86_400 / 3_600,
            minutes: remaining % 3_600 / 60,
            seconds: remaining % 60,
        }
    }

    /// The message, only once the unlock date has passed
    pub fn revealed_message(&self, now: DateTime<Utc>) -> Option<&str> {
        self.is_unlocked(now).then_some(self.message.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCapsuleDraft {
    pub title: String,
    pub message: String,
    pub occasion: CategoryKey<CapsuleOccasion>,
    #[serde(with = "crate::dates::iso")]
    pub unlock_date: DateTime<Utc>,
    pub is_opened: bool,
    pub tags: Vec<String>,
}

impl JourneyRecord for TimeCapsule {
    type Draft = TimeCapsuleDraft;
    type Category = CapsuleOccasion;

    fn collection() -> &'static str {
        "capsules"
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> DateTime<Utc> {
        self.unlock_date
    }

    fn category(&self) -> CapsuleOccasion {
        self.occasion.resolve()
    }

    fn category_key(&self) -> &str {
        self.occasion.as_str()
    }

    // Sealed messages stay out of search
    fn description(&self) -> Option<&str> {
        self.is_opened.then_some(self.message.as_str())
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn status_key(&self) -> Option<&str> {
        Some(if self.is_opened { "opened" } else { "sealed" })
    }

    fn from_draft(id: String, draft: TimeCapsuleDraft) -> Self {
        Self {
            id,
            title: draft.title,
            message: draft.message,
            occasion: draft.occasion,
            unlock_date: draft.unlock_date,
            created_at: None,
            is_opened: draft.is_opened,
            tags: draft.tags,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeCapsuleForm {
    pub title: String,
    pub message: String,
    pub occasion: CategoryKey<CapsuleOccasion>,
    pub unlock_date: String,
    pub is_opened: bool,
    pub tags: String,
}

impl RecordForm<TimeCapsule> for TimeCapsuleForm {
    fn from_record(record: &TimeCapsule) -> Self {
        Self {
            title: record.title.clone(),
            message: record.message.clone(),
            occasion: record.occasion.clone(),
            unlock_date: datetime_input(record.unlock_date),
            is_opened: record.is_opened,
            tags: join_tags(&record.tags),
        }
    }

    fn validate(&self) -> Result<TimeCapsuleDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 120);
        errors.require("message", &self.message);
        let unlock_date = required_date(&mut errors, "unlock_date", &self.unlock_date);

        match unlock_date {
            Some(unlock_date) if errors.is_empty() => Ok(TimeCapsuleDraft {
                title: self.title.trim().to_string(),
                message: self.message.trim().to_string(),
                occasion: self.occasion.clone(),
                unlock_date,
                is_opened: self.is_opened,
                tags: split_tags(&self.tags),
            }),
            _ => Err(errors),
        }
    }
}

/// Sealed capsules whose unlock date has passed
pub fn ready_to_open<'a>(capsules: &[&'a TimeCapsule], now: DateTime<Utc>) -> Vec<&'a TimeCapsule> {
    capsules
        .iter()
        .copied()
        .filter(|c| !c.is_opened && c.is_unlocked(now))
        .collect()
}
