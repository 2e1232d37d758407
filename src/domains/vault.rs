//! Private vault items
//!
//! Access control is enforced by the backend for authenticated requests; the
//! client holds no password or unlock state of its own.

use crate::client::RecordForm;
use crate::domains::{date_input, join_tags, non_empty, required_date, split_tags};
use crate::presentation::{CategoryKey, CategoryTable, Presentation};
use crate::traits::JourneyRecord;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultItemKind {
    Photo,
    Video,
    Letter,
    Note,
    Document,
    #[default]
    #[serde(other)]
    Other,
}

impl CategoryTable for VaultItemKind {
    const FALLBACK: Self = Self::Other;

    fn all() -> &'static [Self] {
        &[
            Self::Photo,
            Self::Video,
            Self::Letter,
            Self::Note,
            Self::Document,
            Self::Other,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Letter => "letter",
            Self::Note => "note",
            Self::Document => "document",
            Self::Other => "other",
        }
    }

    fn presentation(&self) -> Presentation {
        match self {
            Self::Photo => Presentation::new("image", "sky-500", "Photo"),
            Self::Video => Presentation::new("video", "violet-500", "Video"),
            Self::Letter => Presentation::new("mail", "rose-500", "Letter"),
            Self::Note => Presentation::new("sticky-note", "amber-400", "Note"),
            Self::Document => Presentation::new("file-text", "slate-500", "Document"),
            Self::Other => Presentation::new("lock", "slate-400", "Other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: CategoryKey<VaultItemKind>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItemDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: CategoryKey<VaultItemKind>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    #[serde(with = "crate::dates::iso")]
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl JourneyRecord for VaultItem {
    type Draft = VaultItemDraft;
    type Category = VaultItemKind;

    fn collection() -> &'static str {
        "vault"
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

    fn category(&self) -> VaultItemKind {
        self.kind.resolve()
    }

    fn category_key(&self) -> &str {
        self.kind.as_str()
    }

    fn description(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn from_draft(id: String, draft: VaultItemDraft) -> Self {
        Self {
            id,
            title: draft.title,
            kind: draft.kind,
            content: draft.content,
            file_url: draft.file_url,
            date: draft.date,
            tags: draft.tags,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaultItemForm {
    pub title: String,
    pub kind: CategoryKey<VaultItemKind>,
    pub content: String,
    pub file_url: String,
    pub date: String,
    pub tags: String,
}

impl RecordForm<VaultItem> for VaultItemForm {
    fn from_record(record: &VaultItem) -> Self {
        Self {
            title: record.title.clone(),
            kind: record.kind.clone(),
            content: record.content.clone().unwrap_or_default(),
            file_url: record.file_url.clone().unwrap_or_default(),
            date: date_input(record.date),
            tags: join_tags(&record.tags),
        }
    }

    fn validate(&self) -> Result<VaultItemDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 120);
        let date = required_date(&mut errors, "date", &self.date);

        let content = non_empty(&self.content);
        let file_url = non_empty(&self.file_url);
        if content.is_none() && file_url.is_none() {
            errors.add("content", "content or file_url is required");
        }

        match date {
            Some(date) if errors.is_empty() => Ok(VaultItemDraft {
                title: self.title.trim().to_string(),
                kind: self.kind.clone(),
                content,
                file_url,
                date,
                tags: split_tags(&self.tags),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_needs_content_or_file() {
        let mut form = VaultItemForm {
            title: "Love letter".into(),
            kind: VaultItemKind::Letter.into(),
            date: "2025-02-14".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("content"), Some("content or file_url is required"));

        form.file_url = "https://cdn.example.com/letter.pdf".into();
        let draft = form.validate().unwrap();
        assert_eq!(draft.content, None);
        assert_eq!(draft.kind, VaultItemKind::Letter);
    }

    #[test]
    fn test_kind_serialized_as_type() {
        let item: VaultItem = serde_json::from_str(
            r#"{
                "id": "v1",
                "title": "Scan",
                "type": "document",
                "fileUrl": "f.pdf",
                "date": "2024-11-01"
            }"#,
        )
        .unwrap();
        assert_eq!(item.kind, VaultItemKind::Document);

        let draft = VaultItemForm::from_record(&item).validate().unwrap();
        let json = serde_json::to_value(draft).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["fileUrl"], "f.pdf");
    }
}
