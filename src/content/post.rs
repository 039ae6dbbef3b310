//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::highlight::SafeHtml;

/// A tag attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Post as returned by the item endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub id: String,
    pub title: String,
    /// Rich-text body (HTML fragment)
    pub body: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revised_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub featured: bool,

    /// Fields the page does not use; dropped when shaping
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawPost {
    /// Reshape into the page record, keeping only the known fields
    pub fn into_blog_post(self, body: SafeHtml) -> BlogPost {
        if !self.extra.is_empty() {
            let dropped: Vec<&str> = self.extra.keys().map(String::as_str).collect();
            tracing::debug!("Post {}: dropping fields {:?}", self.id, dropped);
        }

        BlogPost {
            id: self.id,
            title: self.title,
            body,
            tags: self.tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
            published_at: self.published_at,
            revised_at: self.revised_at,
            featured: self.featured,
        }
    }
}

/// A blog post ready to render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    /// Highlighted body markup
    pub body: SafeHtml,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub revised_at: Option<DateTime<Utc>>,
    pub featured: bool,
}

/// Entry of the collection endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PostSummary {
    pub id: String,
}

/// Response of the collection endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCollection {
    pub contents: Vec<PostSummary>,
    #[serde(default)]
    pub total_count: Option<usize>,
}

/// Site-wide values handed to every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub title: String,
}

/// Everything the page renderer needs for one post
#[derive(Debug, Clone, Serialize)]
pub struct PageProps {
    pub blog: BlogPost,
    pub title: String,
}

impl PageProps {
    pub fn new(blog: BlogPost, context: &PageContext) -> Self {
        Self {
            blog,
            title: context.title.clone(),
        }
    }
}
