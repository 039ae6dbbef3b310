//! Generator module - builds every post page of the site
//!
//! A build is all or nothing: pages are only written once every post has
//! been loaded and rendered.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::api::ApiClient;
use crate::content::{enumerate_paths, BlogPost, ContentLoader, PageProps, StaticPaths};
use crate::highlight::CodeHighlighter;
use crate::templates::PageRenderer;
use crate::Site;

/// Directory below the public dir holding post pages
pub const BLOGS_DIR: &str = "blogs";

/// Stylesheet path below the public dir
pub const STYLESHEET_PATH: &str = "css/highlight.css";

/// Summary of a finished build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub paths: StaticPaths,
    pub pages_written: usize,
    pub elapsed: Duration,
}

/// One rendered page waiting to be written
struct RenderedPage {
    id: String,
    html: String,
    data: Option<String>,
}

/// Static page generator for `/blogs/{id}`
pub struct Generator {
    site: Site,
    client: ApiClient,
    loader: ContentLoader,
    renderer: PageRenderer,
    highlighter: Arc<CodeHighlighter>,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let client = ApiClient::new(&site.config.api)?;
        let highlighter = Arc::new(CodeHighlighter::from_config(&site.config.highlight));
        let loader = ContentLoader::new(client.clone(), highlighter.clone());
        let renderer = PageRenderer::new(&site.config)?;

        Ok(Self {
            site: site.clone(),
            client,
            loader,
            renderer,
            highlighter,
        })
    }

    /// Enumerate the routes that a build would generate
    pub async fn paths(&self) -> Result<StaticPaths> {
        let routes = enumerate_paths(&self.client, self.site.config.api.collection_limit)
            .await
            .context("failed to enumerate post routes")?;
        Ok(routes.paths)
    }

    /// Load and render a single post page
    pub async fn render_one(&self, id: &str) -> Result<String> {
        let post = self
            .loader
            .load(id)
            .await
            .with_context(|| format!("failed to load post {}", id))?;
        let props = PageProps::new(post, &self.site.page_context());
        Ok(self.renderer.render(&props))
    }

    /// Generate every post page
    pub async fn generate(&self) -> Result<BuildReport> {
        let start = Instant::now();

        let routes = enumerate_paths(&self.client, self.site.config.api.collection_limit)
            .await
            .context("failed to enumerate post routes")?;

        let posts = self.load_all(&routes.ids).await?;
        tracing::info!("Loaded {} posts", posts.len());

        let context = self.site.page_context();
        let mut pages = Vec::with_capacity(posts.len());
        for (id, post) in routes.ids.iter().zip(posts) {
            let props = PageProps::new(post, &context);
            let html = self.renderer.render(&props);
            let data = if self.site.config.build.emit_data {
                Some(serde_json::to_string(&props)?)
            } else {
                None
            };
            // Output paths come from validated route ids only
            pages.push(RenderedPage {
                id: id.clone(),
                html,
                data,
            });
        }

        let stylesheet = self.highlighter.stylesheet()?;
        self.write(&pages, &stylesheet)?;

        let report = BuildReport {
            paths: routes.paths,
            pages_written: pages.len(),
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Generated {} pages in {:.2}s",
            report.pages_written,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    /// Load posts with bounded parallelism, keeping the route order
    ///
    /// The first failure aborts every load still in flight.
    async fn load_all(&self, ids: &[String]) -> Result<Vec<BlogPost>> {
        let semaphore = Arc::new(Semaphore::new(self.site.config.build.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, id) in ids.iter().cloned().enumerate() {
            let loader = self.loader.clone();
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let post = loader
                    .load(&id)
                    .await
                    .with_context(|| format!("failed to load post {}", id))?;
                Ok::<_, anyhow::Error>((index, post))
            });
        }

        let mut posts: Vec<Option<BlogPost>> = (0..ids.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, post) = joined??;
            posts[index] = Some(post);
        }

        Ok(posts.into_iter().flatten().collect())
    }

    /// Replace the previous output with the rendered pages
    fn write(&self, pages: &[RenderedPage], stylesheet: &str) -> Result<()> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)?;

        // Stale pages would keep serving ids the API no longer lists
        let blogs_dir = public_dir.join(BLOGS_DIR);
        if blogs_dir.exists() {
            fs::remove_dir_all(&blogs_dir)
                .with_context(|| format!("failed to remove {:?}", blogs_dir))?;
        }

        for page in pages {
            let output_path = page_output_path(public_dir, &page.id);
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {:?}", parent))?;
            }
            fs::write(&output_path, &page.html)
                .with_context(|| format!("failed to write {:?}", output_path))?;
            tracing::debug!("Wrote {:?}", output_path);

            if let Some(data) = &page.data {
                let data_path = blogs_dir.join(format!("{}.json", page.id));
                fs::write(&data_path, data)
                    .with_context(|| format!("failed to write {:?}", data_path))?;
            }
        }

        let css_path = public_dir.join(STYLESHEET_PATH);
        if let Some(parent) = css_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&css_path, stylesheet)?;

        Ok(())
    }
}

/// Output file of a post page
pub fn page_output_path(public_dir: &Path, id: &str) -> PathBuf {
    public_dir.join(BLOGS_DIR).join(id).join("index.html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_output_path() {
        assert_eq!(
            page_output_path(Path::new("public"), "a1"),
            Path::new("public/blogs/a1/index.html")
        );
    }

    #[test]
    fn test_new_requires_api_config() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path(), crate::config::SiteConfig::default());
        assert!(Generator::new(&site).is_err());
    }
}
