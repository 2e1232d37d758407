//! Relationship timeline milestones

use crate::client::RecordForm;
use crate::domains::{date_input, join_tags, non_empty, required_date, split_tags};
use crate::presentation::{CategoryKey, CategoryTable, Presentation};
use crate::traits::JourneyRecord;
use crate::validation::ValidationErrors;
use crate::view::{group_by_year, sort_records, Section, SortField, SortOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    FirstMeeting,
    FirstDate,
    Anniversary,
    MovedIn,
    Engagement,
    Wedding,
    Travel,
    Adventure,
    Achievement,
    #[default]
    #[serde(other)]
    Other,
}

impl CategoryTable for MilestoneKind {
    const FALLBACK: Self = Self::Other;

    fn all() -> &'static [Self] {
        &[
            Self::FirstMeeting,
            Self::FirstDate,
            Self::Anniversary,
            Self::MovedIn,
            Self::Engagement,
            Self::Wedding,
            Self::Travel,
            Self::Adventure,
            Self::Achievement,
            Self::Other,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::FirstMeeting => "first_meeting",
            Self::FirstDate => "first_date",
            Self::Anniversary => "anniversary",
            Self::MovedIn => "moved_in",
            Self::Engagement => "engagement",
            Self::Wedding => "wedding",
            Self::Travel => "travel",
            Self::Adventure => "adventure",
            Self::Achievement => "achievement",
            Self::Other => "other",
        }
    }

    fn presentation(&self) -> Presentation {
        match self {
            Self::FirstMeeting => Presentation::new("sparkles", "pink-400", "First Meeting"),
            Self::FirstDate => Presentation::new("coffee", "rose-400", "First Date"),
            Self::Anniversary => Presentation::new("gem", "fuchsia-500", "Anniversary"),
            Self::MovedIn => Presentation::new("home", "amber-600", "Moved In"),
            Self::Engagement => Presentation::new("ring", "violet-500", "Engagement"),
            Self::Wedding => Presentation::new("church", "rose-600", "Wedding"),
            Self::Travel => Presentation::new("plane", "sky-500", "Travel"),
            Self::Adventure => Presentation::new("mountain", "orange-500", "Adventure"),
            Self::Achievement => Presentation::new("trophy", "yellow-500", "Achievement"),
            Self::Other => Presentation::new("flag", "slate-400", "Other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: CategoryKey<MilestoneKind>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDraft {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: CategoryKey<MilestoneKind>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub photo_url: Option<String>,
}

impl JourneyRecord for Milestone {
    type Draft = MilestoneDraft;
    type Category = MilestoneKind;

    fn collection() -> &'static str {
        "milestones"
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

    fn category(&self) -> MilestoneKind {
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

    fn from_draft(id: String, draft: MilestoneDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            date: draft.date,
            location: draft.location,
            tags: draft.tags,
            photo_url: draft.photo_url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneForm {
    pub title: String,
    pub description: String,
    pub kind: CategoryKey<MilestoneKind>,
    pub date: String,
    pub location: String,
    pub tags: String,
    pub photo_url: String,
}

impl RecordForm<Milestone> for MilestoneForm {
    fn from_record(record: &Milestone) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            kind: record.kind.clone(),
            date: date_input(record.date),
            location: record.location.clone().unwrap_or_default(),
            tags: join_tags(&record.tags),
            photo_url: record.photo_url.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<MilestoneDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 120);
        let date = required_date(&mut errors, "date", &self.date);

        match date {
            Some(date) if errors.is_empty() => Ok(MilestoneDraft {
                title: self.title.trim().to_string(),
                description: non_empty(&self.description),
                kind: self.kind.clone(),
                date,
                location: non_empty(&self.location),
                tags: split_tags(&self.tags),
                photo_url: non_empty(&self.photo_url),
            }),
            _ => Err(errors),
        }
    }
}

/// Timeline sections, one per year, oldest first
pub fn timeline<'a>(milestones: &[&'a Milestone]) -> Vec<Section<'a, Milestone>> {
    let mut ordered = milestones.to_vec();
    sort_records(&mut ordered, SortField::Date, SortOrder::Asc);
    group_by_year(&ordered)
}

/// Days since the earliest milestone; `None` without milestones
pub fn days_together(milestones: &[&Milestone], now: DateTime<Utc>) -> Option<i64> {
    milestones
        .iter()
        .map(|m| m.date)
        .min()
        .map(|first| (now.date_naive() - first.date_naive()).num_days().max(0))
}
