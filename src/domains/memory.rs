//! Memory vault: photos, videos and notes from shared moments

use crate::client::RecordForm;
use crate::domains::{join_tags, non_empty, required_date, split_tags};
use crate::presentation::{CategoryKey, CategoryTable, Presentation};
use crate::traits::JourneyRecord;
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    Travel,
    Date,
    Milestone,
    Celebration,
    Everyday,
    Family,
    Adventure,
    #[default]
    #[serde(other)]
    Other,
}

impl CategoryTable for MemoryCategory {
    const FALLBACK: Self = Self::Other;

    fn all() -> &'static [Self] {
        &[
            Self::Travel,
            Self::Date,
            Self::Milestone,
            Self::Celebration,
            Self::Everyday,
            Self::Family,
            Self::Adventure,
            Self::Other,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Date => "date",
            Self::Milestone => "milestone",
            Self::Celebration => "celebration",
            Self::Everyday => "everyday",
            Self::Family => "family",
            Self::Adventure => "adventure",
            Self::Other => "other",
        }
    }

    fn presentation(&self) -> Presentation {
        match self {
            Self::Travel => Presentation::new("plane", "sky-500", "Travel"),
            Self::Date => Presentation::new("heart", "rose-500", "Date Night"),
            Self::Milestone => Presentation::new("flag", "violet-500", "Milestone"),
            Self::Celebration => Presentation::new("party-popper", "amber-500", "Celebration"),
            Self::Everyday => Presentation::new("sun", "yellow-400", "Everyday"),
            Self::Family => Presentation::new("users", "emerald-500", "Family"),
            Self::Adventure => Presentation::new("mountain", "orange-500", "Adventure"),
            Self::Other => Presentation::new("image", "slate-400", "Other"),
        }
    }
}

/// Secondary discriminator used by the "type" filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    Photo,
    Video,
    Note,
    Audio,
    #[serde(other)]
    Other,
}

impl MediaKind {
    /// Kinds whose content lives behind a media URL
    pub fn needs_url(&self) -> bool {
        matches!(self, Self::Photo | Self::Video | Self::Audio)
    }
}

impl CategoryTable for MediaKind {
    const FALLBACK: Self = Self::Other;

    fn all() -> &'static [Self] {
        &[Self::Photo, Self::Video, Self::Note, Self::Audio, Self::Other]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Note => "note",
            Self::Audio => "audio",
            Self::Other => "other",
        }
    }

    fn presentation(&self) -> Presentation {
        match self {
            Self::Photo => Presentation::new("camera", "sky-500", "Photo"),
            Self::Video => Presentation::new("video", "violet-500", "Video"),
            Self::Note => Presentation::new("sticky-note", "amber-400", "Note"),
            Self::Audio => Presentation::new("mic", "emerald-500", "Audio"),
            Self::Other => Presentation::new("file", "slate-400", "Other"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: CategoryKey<MemoryCategory>,
    #[serde(rename = "type", default)]
    pub media: CategoryKey<MediaKind>,
    #[serde(with = "crate::dates::iso")]
    pub date_taken: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: CategoryKey<MemoryCategory>,
    #[serde(rename = "type")]
    pub media: CategoryKey<MediaKind>,
    #[serde(with = "crate::dates::iso")]
    pub date_taken: DateTime<Utc>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub media_url: Option<String>,
}

impl JourneyRecord for Memory {
    type Draft = MemoryDraft;
    type Category = MemoryCategory;

    fn collection() -> &'static str {
        "memories"
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> DateTime<Utc> {
        self.date_taken
    }

    fn category(&self) -> MemoryCategory {
        self.category.resolve()
    }

    fn category_key(&self) -> &str {
        self.category.as_str()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn type_key(&self) -> Option<&str> {
        Some(self.media.as_str())
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn status_key(&self) -> Option<&str> {
        self.is_favorite.then_some("favorite")
    }

    fn from_draft(id: String, draft: MemoryDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            media: draft.media,
            date_taken: draft.date_taken,
            location: draft.location,
            tags: draft.tags,
            is_favorite: draft.is_favorite,
            media_url: draft.media_url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryForm {
    pub title: String,
    pub description: String,
    pub category: CategoryKey<MemoryCategory>,
    pub media: CategoryKey<MediaKind>,
    pub date_taken: String,
    pub location: String,
    pub tags: String,
    pub is_favorite: bool,
    pub media_url: String,
}

impl RecordForm<Memory> for MemoryForm {
    fn from_record(record: &Memory) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone().unwrap_or_default(),
            category: record.category.clone(),
            media: record.media.clone(),
            date_taken: crate::domains::date_input(record.date_taken),
            location: record.location.clone().unwrap_or_default(),
            tags: join_tags(&record.tags),
            is_favorite: record.is_favorite,
            media_url: record.media_url.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<MemoryDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.max_len("title", &self.title, 120);
        let date_taken = required_date(&mut errors, "date_taken", &self.date_taken);

        // Recorded media needs a URL to load from
        if self.media.resolve().needs_url() && self.media_url.trim().is_empty() {
            errors.add(
                "media_url",
                format!("media_url is required for {}", self.media.as_str()),
            );
        }

        match date_taken {
            Some(date_taken) if errors.is_empty() => Ok(MemoryDraft {
                title: self.title.trim().to_string(),
                description: non_empty(&self.description),
                category: self.category.clone(),
                media: self.media.clone(),
                date_taken,
                location: non_empty(&self.location),
                tags: split_tags(&self.tags),
                is_favorite: self.is_favorite,
                media_url: non_empty(&self.media_url),
            }),
            _ => Err(errors),
        }
    }
}

/// Favorite memories, in input order
pub fn favorites<'a>(records: &[&'a Memory]) -> Vec<&'a Memory> {
    records.iter().copied().filter(|m| m.is_favorite).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{derive_view, FilterState};

    #[test]
    fn test_deserializes_backend_shape() {
        let memory: Memory = serde_json::from_str(
            r#"{
                "id": "m1",
                "title": "Lisbon trams",
                "category": "travel",
                "type": "video",
                "dateTaken": "2024-09-12T10:30:00Z",
                "isFavorite": true,
                "mediaUrl": "https://cdn.example.com/m1.mp4"
            }"#,
        )
        .unwrap();

        assert_eq!(memory.category, MemoryCategory::Travel);
        assert_eq!(memory.media, MediaKind::Video);
        assert_eq!(memory.type_key(), Some("video"));
        assert_eq!(memory.status_key(), Some("favorite"));
        assert!(memory.tags.is_empty());
    }

    #[test]
    fn test_unknown_category_presents_as_fallback() {
        let memory: Memory = serde_json::from_str(
            r#"{
                "id": "m1",
                "title": "x",
                "category": "space",
                "type": "hologram",
                "dateTaken": "2024-01-01"
            }"#,
        )
        .unwrap();
        assert_eq!(memory.category(), MemoryCategory::Other);
        assert_eq!(memory.category_key(), "space");
        assert_eq!(memory.media.resolve(), MediaKind::Other);
        assert_eq!(memory.type_key(), Some("hologram"));
    }

    #[test]
    fn test_edit_keeps_unknown_category() {
        let memory: Memory = serde_json::from_str(
            r#"{
                "id": "m1",
                "title": "Bali",
                "category": "honeymoon",
                "type": "photo",
                "dateTaken": "2024-05-02",
                "mediaUrl": "https://cdn.example.com/bali.jpg"
            }"#,
        )
        .unwrap();

        let mut form = MemoryForm::from_record(&memory);
        form.title = "Bali sunsets".into();
        let draft = form.validate().unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["category"], "honeymoon");
        assert_eq!(json["type"], "photo");

        let records = vec![memory];
        let view = derive_view(&records, &FilterState::new().with_category("honeymoon"));
        assert_eq!(view.stats.visible, 1);
        assert_eq!(view.stats.count_for_category("honeymoon"), 1);
        let view = derive_view(&records, &FilterState::new().with_category("other"));
        assert_eq!(view.stats.visible, 0);
    }

    #[test]
    fn test_form_requires_media_url_for_photos() {
        let form = MemoryForm {
            title: "Picnic".into(),
            date_taken: "2025-06-01".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("media_url"), Some("media_url is required for photo"));

        let audio = MemoryForm {
            media: MediaKind::Audio.into(),
            ..form.clone()
        };
        let errors = audio.validate().unwrap_err();
        assert_eq!(errors.get("media_url"), Some("media_url is required for audio"));

        let form = MemoryForm {
            media: MediaKind::Note.into(),
            ..form
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.title, "Picnic");
        assert_eq!(draft.media_url, None);
    }

    #[test]
    fn test_type_filter_and_favorites() {
        let draft = MemoryForm {
            title: "Sunset".into(),
            date_taken: "2025-06-01".into(),
            media_url: "https://cdn.example.com/s.jpg".into(),
            is_favorite: true,
            ..Default::default()
        }
        .validate()
        .unwrap();
        let photo = Memory::from_draft("a".into(), draft.clone());
        let note = Memory::from_draft(
            "b".into(),
            MemoryDraft {
                media: MediaKind::Note.into(),
                is_favorite: false,
                ..draft
            },
        );
        let records = vec![photo, note];

        let view = derive_view(&records, &FilterState::new().with_type("note"));
        assert_eq!(view.visible.len(), 1);
        assert_eq!(view.visible[0].id, "b");

        let all = derive_view(&records, &FilterState::new());
        let favs = favorites(&all.visible);
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].id, "a");
        assert_eq!(all.stats.count_for_status("favorite"), 1);
    }
}
