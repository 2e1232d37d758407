//! Journal entries

use crate::client::RecordForm;
use crate::domains::checkin::Mood;
use crate::domains::{date_input, join_tags, required_date, split_tags};
use crate::presentation::{CategoryKey, CategoryTable};
use crate::traits::JourneyRecord;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_CONTENT_LEN: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: CategoryKey<Mood>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Hidden from the shared feed; still listed on the author's journal page
    #[serde(default)]
    pub is_private: bool,
}

impl JournalEntry {
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// First `max_chars` characters of the content, cut at a word boundary
    pub fn excerpt(&self, max_chars: usize) -> String {
        let content = self.content.trim();
        if content.chars().count() <= max_chars {
            return content.to_string();
        }
        let cut: String = content.chars().take(max_chars).collect();
        let cut = match cut.rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => &cut[..idx],
            _ => cut.as_str(),
        };
        format!("{}…", cut.trim_end())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalDraft {
    pub title: String,
    pub content: String,
    pub mood: CategoryKey<Mood>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub is_private: bool,
}

impl JourneyRecord for JournalEntry {
    type Draft = JournalDraft;
    type Category = Mood;

    const METRICS: &'static [&'static str] = &["word_count"];

    fn collection() -> &'static str {
        "journal"
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

    fn category(&self) -> Mood {
        self.mood.resolve()
    }

    fn category_key(&self) -> &str {
        self.mood.as_str()
    }

    fn description(&self) -> Option<&str> {
        Some(&self.content)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn status_key(&self) -> Option<&str> {
        Some(if self.is_private { "private" } else { "shared" })
    }

    fn metric(&self, name: &str) -> Option<f64> {
        match name {
            "word_count" => Some(self.word_count() as f64),
            _ => None,
        }
    }

    fn from_draft(id: String, draft: JournalDraft) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            mood: draft.mood,
            date: draft.date,
            tags: draft.tags,
            is_private: draft.is_private,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalForm {
    pub title: String,
    pub content: String,
    pub mood: CategoryKey<Mood>,
    pub date: String,
    pub tags: String,
    pub is_private: bool,
}

impl RecordForm<JournalEntry> for JournalForm {
    fn from_record(record: &JournalEntry) -> Self {
        Self {
            title: record.title.clone(),
            content: record.content.clone(),
            mood: record.mood.clone(),
            date: date_input(record.date),
            tags: join_tags(&record.tags),
            is_private: record.is_private,
        }
    }

    fn validate(&self) -> Result<JournalDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 120);
        errors.require("content", &self.content);
        errors.max_len("content", &self.content, MAX_CONTENT_LEN);
        let date = required_date(&mut errors, "date", &self.date);

        match date {
            Some(date) if errors.is_empty() => Ok(JournalDraft {
                title: self.title.trim().to_string(),
                content: self.content.trim().to_string(),
                mood: self.mood.clone(),
                date,
                tags: split_tags(&self.tags),
                is_private: self.is_private,
            }),
            _ => Err(errors),
        }
    }
}

/// Entry count per known mood, every mood present. Unknown moods count as neutral.
pub fn mood_breakdown(entries: &[&JournalEntry]) -> BTreeMap<&'static str, usize> {
    let mut breakdown: BTreeMap<&'static str, usize> =
        Mood::all().iter().map(|m| (m.key(), 0)).collect();
    for entry in entries {
        *breakdown.entry(entry.category().key()).or_default() += 1;
    }
    breakdown
}
