//! Shared goals with progress tracking and optional savings targets

use crate::client::RecordForm;
use crate::domains::{date_input, non_empty, optional_amount, required_date};
use crate::presentation::{CategoryKey, CategoryTable, Presentation};
use crate::traits::JourneyRecord;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Travel,
    Financial,
    Home,
    Relationship,
    Health,
    Career,
    Adventure,
    #[default]
    #[serde(other)]
    Other,
}

impl CategoryTable for GoalCategory {
    const FALLBACK: Self = Self::Other;

    fn all() -> &'static [Self] {
        &[
            Self::Travel,
            Self::Financial,
            Self::Home,
            Self::Relationship,
            Self::Health,
            Self::Career,
            Self::Adventure,
            Self::Other,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Financial => "financial",
            Self::Home => "home",
            Self::Relationship => "relationship",
            Self::Health => "health",
            Self::Career => "career",
            Self::Adventure => "adventure",
            Self::Other => "other",
        }
    }

    fn presentation(&self) -> Presentation {
        match self {
            Self::Travel => Presentation::new("plane", "sky-500", "Travel"),
            Self::Financial => Presentation::new("piggy-bank", "emerald-500", "Financial"),
            Self::Home => Presentation::new("home", "amber-600", "Home"),
            Self::Relationship => Presentation::new("heart", "rose-500", "Relationship"),
            Self::Health => Presentation::new("activity", "lime-500", "Health"),
            Self::Career => Presentation::new("briefcase", "indigo-500", "Career"),
            Self::Adventure => Presentation::new("compass", "orange-500", "Adventure"),
            Self::Other => Presentation::new("target", "slate-400", "Other"),
        }
    }
}

/// Lifecycle of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    InProgress,
    Completed,
    Paused,
    #[default]
    #[serde(other)]
    NotStarted,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    /// Status implied by a progress percentage
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => Self::NotStarted,
            p if p >= 100 => Self::Completed,
            _ => Self::InProgress,
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: CategoryKey<GoalCategory>,
    #[serde(default)]
    pub status: GoalStatus,
    /// Percentage 0-100
    #[serde(default)]
    pub progress: u8,
    #[serde(with = "crate::dates::iso")]
    pub target_date: DateTime<Utc>,
    #[serde(default)]
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub saved_amount: Option<f64>,
}

impl Goal {
    /// Share of the savings target reached (0-100), if the goal has one
    pub fn savings_progress(&self) -> Option<f64> {
        match (self.target_amount, self.saved_amount) {
            (Some(target), saved) if target > 0.0 => {
                Some((saved.unwrap_or(0.0) / target * 100.0).min(100.0))
            }
            _ => None,
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != GoalStatus::Completed && self.target_date < now
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: CategoryKey<GoalCategory>,
    pub status: GoalStatus,
    pub progress: u8,
    #[serde(with = "crate::dates::iso")]
    pub target_date: DateTime<Utc>,
    pub target_amount: Option<f64>,
    pub saved_amount: Option<f64>,
}

impl JourneyRecord for Goal {
    type Draft = GoalDraft;
    type Category = GoalCategory;

    const METRICS: &'static [&'static str] = &["progress", "saved_amount"];

    fn collection() -> &'static str {
        "goals"
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> DateTime<Utc> {
        self.target_date
    }

    fn category(&self) -> GoalCategory {
        self.category.resolve()
    }

    fn category_key(&self) -> &str {
        self.category.as_str()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn status_key(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn metric(&self, name: &str) -> Option<f64> {
        match name {
            "progress" => Some(self.progress as f64),
            "saved_amount" => self.saved_amount,
            _ => None,
        }
    }

    fn from_draft(id: String, draft: GoalDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            status: draft.status,
            progress: draft.progress,
            target_date: draft.target_date,
            target_amount: draft.target_amount,
            saved_amount: draft.saved_amount,
        }
    }
}

/// Goal dialog input. `status` of `None` derives the status from progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalForm {
    pub title: String,
    pub description: String,
    pub category: CategoryKey<GoalCategory>,
    pub status: Option<GoalStatus>,
    pub progress: String,
    pub target_date: String,
    pub target_amount: String,
    pub saved_amount: String,
}

impl RecordForm<Goal> for GoalForm {
    fn from_record(record: &Goal) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            category: record.category.clone(),
            status: Some(record.status),
            progress: record.progress.to_string(),
            target_date: date_input(record.target_date),
            target_amount: amount_input(record.target_amount),
            saved_amount: amount_input(record.saved_amount),
        }
    }

    fn validate(&self) -> Result<GoalDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 120);
        let target_date = required_date(&mut errors, "target_date", &self.target_date);
        let progress = parse_progress(&mut errors, &self.progress);
        let target_amount = optional_amount(&mut errors, "target_amount", &self.target_amount);
        let saved_amount = optional_amount(&mut errors, "saved_amount", &self.saved_amount);

        match (target_date, progress) {
            (Some(target_date), Some(progress)) if errors.is_empty() => Ok(GoalDraft {
                title: self.title.trim().to_string(),
                description: non_empty(&self.description),
                category: self.category.clone(),
                status: self.status.unwrap_or_else(|| GoalStatus::from_progress(progress)),
                progress,
                target_date,
                target_amount,
                saved_amount,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_progress(errors: &mut ValidationErrors, value: &str) -> Option<u8> {
    let value = value.trim().trim_end_matches('%');
    if value.is_empty() {
        return Some(0);
    }
    match value.parse::<u8>() {
        Ok(progress) if progress <= 100 => Some(progress),
        _ => {
            errors.add("progress", "progress must be between 0 and 100");
            None
        }
    }
}

fn amount_input(amount: Option<f64>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

/// Percentage of goals marked completed (0-100)
pub fn completion_rate(goals: &[&Goal]) -> f64 {
    let completed = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count();
    crate::view::percentage(completed, goals.len())
}

/// Total saved across goals with a savings amount
pub fn total_saved(goals: &[&Goal]) -> f64 {
    goals.iter().filter_map(|g| g.saved_amount).sum()
}
