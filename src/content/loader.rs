//! Load a single post from the content API

use std::sync::Arc;

use super::post::{BlogPost, RawPost};
use crate::api::ApiClient;
use crate::error::BuildError;
use crate::helpers::encode_segment;
use crate::highlight::CodeHighlighter;

/// Fetches posts and turns their bodies into highlighted markup
#[derive(Clone)]
pub struct ContentLoader {
    client: ApiClient,
    highlighter: Arc<CodeHighlighter>,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(client: ApiClient, highlighter: Arc<CodeHighlighter>) -> Self {
        Self {
            client,
            highlighter,
        }
    }

    /// Fetch one post by id and shape it for rendering
    pub async fn load(&self, id: &str) -> Result<BlogPost, BuildError> {
        let path = format!("blogs/{}", encode_segment(id));
        let raw: RawPost = self.client.get_json(&path, &[]).await?;

        if raw.id != id {
            return Err(BuildError::IdMismatch {
                requested: id.to_string(),
                returned: raw.id,
            });
        }

        let body = self.highlighter.highlight_body(&raw.body)?;
        tracing::debug!("Loaded post {}: {}", raw.id, raw.title);

        Ok(raw.into_blog_post(body))
    }
}
