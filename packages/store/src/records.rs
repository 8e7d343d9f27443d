use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on project images per pattern
pub const MAX_PROJECT_IMAGES: usize = 9;

/// Fixed pattern categories. Serialized through the display labels so the
/// stored records match the catalog's filter strings exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Wearables")]
    Wearables,
    #[serde(rename = "Functional Items")]
    FunctionalItems,
    #[serde(rename = "Toys & Gifts")]
    ToysAndGifts,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Wearables,
        Category::FunctionalItems,
        Category::ToysAndGifts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Wearables => "Wearables",
            Category::FunctionalItems => "Functional Items",
            Category::ToysAndGifts => "Toys & Gifts",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A user-authored crochet pattern record.
///
/// `id` is the creation timestamp in milliseconds, assigned once by the
/// editor on first save and immutable afterwards. Field names follow the
/// stored camelCase shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: i64,
    pub title: String,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub materials: String,
    /// Serialized content model (see yarnbook-markup)
    #[serde(default)]
    pub instructions: String,
    /// Snapshot of the stitches available to this pattern at save time
    #[serde(default)]
    pub stitches: Vec<Stitch>,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_username: Option<String>,
}

/// A user-defined glossary entry referenced from pattern instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stitch {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Signed-in identity exposed by the session provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub username: String,
}

/// Unsaved pattern-editor form state, persisted for recovery across reloads
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub materials: String,
    /// Serialized instructions markup
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub public: bool,
}

impl PatternDraft {
    /// A draft exists only once the user has typed something
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.category.is_none()
            && self.images.is_empty()
            && self.materials.trim().is_empty()
            && self.html.trim().is_empty()
    }
}

/// Unsaved stitch-manager form state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StitchDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_file_name: Option<String>,
}

impl StitchDraft {
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.description.trim().is_empty() && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_round_trip_through_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }

    #[test]
    fn test_pattern_serializes_camel_case() {
        let pattern = Pattern {
            id: 1,
            title: "Granny Square".into(),
            category: Category::Wearables,
            images: vec![],
            materials: String::new(),
            instructions: String::new(),
            stitches: vec![],
            public: true,
            creator_uid: Some("u1".into()),
            creator_username: Some("ada".into()),
        };
        let value = serde_json::to_value(&pattern).unwrap();
        assert_eq!(value["creatorUid"], "u1");
        assert_eq!(value["creatorUsername"], "ada");
        assert_eq!(value["category"], "Wearables");
    }

    #[test]
    fn test_pattern_tolerates_missing_optional_fields() {
        let value = serde_json::json!({
            "id": 5,
            "title": "Plain Scarf",
            "category": "Functional Items",
        });
        let pattern: Pattern = serde_json::from_value(value).unwrap();
        assert_eq!(pattern.creator_uid, None);
        assert!(pattern.images.is_empty());
        assert!(!pattern.public);
    }
}
