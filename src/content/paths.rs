//! Route enumeration for post pages

use serde::Serialize;
use std::collections::HashSet;

use super::post::PostCollection;
use crate::api::ApiClient;
use crate::error::BuildError;
use crate::helpers::post_path;

/// Routes to pre-render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticPaths {
    pub paths: Vec<String>,
    /// Whether ids outside `paths` may be rendered on demand; always false
    pub fallback: bool,
}

/// Ordered post ids plus their routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRoutes {
    pub ids: Vec<String>,
    pub paths: StaticPaths,
}

/// Fetch the post collection and build one route per post
pub async fn enumerate_paths(client: &ApiClient, limit: Option<u32>) -> Result<PostRoutes, BuildError> {
    let query: Vec<(&str, String)> = limit.map(|l| ("limit", l.to_string())).into_iter().collect();
    let collection: PostCollection = client.get_json("blogs", &query).await?;
    let routes = routes_from_collection(collection)?;
    tracing::info!("Found {} post route(s)", routes.ids.len());
    Ok(routes)
}

/// Map a collection response to routes, rejecting ids unusable as a path
pub fn routes_from_collection(collection: PostCollection) -> Result<PostRoutes, BuildError> {
    if let Some(total) = collection.total_count {
        if total > collection.contents.len() {
            tracing::warn!(
                "Collection reports {} posts but returned {}; set api.collection_limit to fetch more",
                total,
                collection.contents.len()
            );
        }
    }

    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(collection.contents.len());
    for summary in collection.contents {
        validate_id(&summary.id)?;
        if !seen.insert(summary.id.clone()) {
            return Err(BuildError::MalformedCollection(format!(
                "duplicate post id `{}`",
                summary.id
            )));
        }
        ids.push(summary.id);
    }

    let paths = ids.iter().map(|id| post_path(id)).collect();
    Ok(PostRoutes {
        ids,
        paths: StaticPaths {
            paths,
            fallback: false,
        },
    })
}

/// An id becomes a directory name and a route, so it must be one plain
/// path segment that needs no URL escaping
pub fn validate_id(id: &str) -> Result<(), BuildError> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '?', '#', '%']) {
        return Err(BuildError::InvalidId(id.to_string()));
    }
    Ok(())
}
