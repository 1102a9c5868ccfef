//! Page metadata carried alongside converted documents.

use super::PageId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed front-matter block: keys in document order, values unquoted.
pub type FrontMatter = IndexMap<String, String>;

/// Metadata record describing a page.
///
/// Supplied by the calling integration when decoding, and recovered from
/// front matter when a Markdown document is loaded for upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub id: Option<PageId>,
    pub space_key: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub author: Option<String>,
}

impl PageMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: PageId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_space_key(mut self, key: impl Into<String>) -> Self {
        self.space_key = Some(key.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_timestamps(
        mut self,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        self.created_at = Some(created_at.into());
        self.updated_at = Some(updated_at.into());
        self
    }

    /// Reads the page record shape returned by the REST collaborator.
    ///
    /// `updatedAt` and `author` come from the record's `version` object; the
    /// space key falls back from `spaceId` to `space.key`.
    pub fn from_page_json(page: &Value) -> Self {
        let text = |value: Option<&Value>| -> Option<String> {
            match value? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        let id = match page.get("id") {
            Some(Value::Number(n)) => n.as_u64().map(PageId::new),
            Some(Value::String(s)) => PageId::parse(s).ok(),
            _ => None,
        };

        Self {
            title: text(page.get("title")).unwrap_or_default(),
            id,
            space_key: text(page.get("spaceId"))
                .or_else(|| text(page.pointer("/space/key"))),
            created_at: text(page.get("createdAt")),
            updated_at: text(page.pointer("/version/createdAt")),
            author: text(page.pointer("/version/createdBy/displayName")),
        }
    }

    /// Rebuilds a metadata record from a parsed front-matter block.
    pub fn from_front_matter(front_matter: &FrontMatter) -> Self {
        let field = |key: &str| {
            front_matter
                .get(key)
                .filter(|value| !value.is_empty())
                .cloned()
        };

        Self {
            title: field("title").unwrap_or_default(),
            id: field("id").and_then(|raw| PageId::parse(&raw).ok()),
            space_key: field("spaceKey"),
            created_at: field("createdAt"),
            updated_at: field("updatedAt"),
            author: field("author"),
        }
    }
}
