//! Post page template
//!
//! Pages are assembled from small string builders in `helpers`; the body is
//! inserted verbatim because it is a [`SafeHtml`](crate::highlight::SafeHtml).

use anyhow::Result;
use chrono_tz::Tz;

use crate::config::SiteConfig;
use crate::content::{PageProps, Tag};
use crate::helpers::{css, html_escape, js_string, time_tag};

/// Google tag loader
const GTAG_SRC: &str = "https://www.googletagmanager.com/gtag/js?id=";

/// Renderer for `/blogs/{id}` pages
pub struct PageRenderer {
    language: String,
    date_format: String,
    tz: Tz,
    tracking_id: Option<String>,
    stylesheet: String,
}

impl PageRenderer {
    /// Create a new renderer from the site configuration
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            language: config.language.clone(),
            date_format: config.date_format.clone(),
            tz: config.tz()?,
            tracking_id: config
                .analytics
                .tracking_id
                .clone()
                .filter(|id| !id.is_empty()),
            stylesheet: css(config, "highlight"),
        })
    }

    /// Render a full page
    pub fn render(&self, props: &PageProps) -> String {
        let blog = &props.blog;

        let mut html = String::with_capacity(blog.body.as_str().len() + 2048);
        html.push_str("<!DOCTYPE html>\n");
        html.push_str(&format!(r#"<html lang="{}">"#, html_escape(&self.language)));
        html.push('\n');

        // Head
        html.push_str("<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        html.push_str(&format!(
            "<title>{} | {}</title>\n",
            html_escape(&blog.title),
            html_escape(&props.title)
        ));
        html.push_str(&self.stylesheet);
        html.push('\n');
        if let Some(id) = &self.tracking_id {
            html.push_str(&analytics(id));
        }
        html.push_str("</head>\n");

        // Body
        html.push_str("<body>\n");
        html.push_str("<div class=\"bg-gray-100 py-4 px-2 md:px-14\">\n");
        html.push_str(&format!(
            "<p class=\"text-2xl font-semibold\">{}</p>\n",
            html_escape(&blog.title)
        ));
        html.push_str("<div class=\"text-sm py-1.5\">\n");
        html.push_str(&time_tag(
            &blog.created_at,
            self.tz,
            &self.date_format,
            "text-gray-700 pr-3 font-semibold",
        ));
        html.push('\n');
        for tag in &blog.tags {
            html.push_str(&tag_chip(tag));
            html.push('\n');
        }
        html.push_str("</div>\n");
        html.push_str("<div class=\"blog-content\">");
        html.push_str(blog.body.as_str());
        html.push_str("</div>\n");
        html.push_str("</div>\n");
        html.push_str("</body>\n</html>\n");

        html
    }
}

/// Tag chip keyed by the tag id
fn tag_chip(tag: &Tag) -> String {
    format!(
        r#"<div class="inline-flex bg-white mr-2 px-1.5 rounded-md" data-key="{}"><a class="flex-1 text-gray-700 font-semibold">{}</a></div>"#,
        html_escape(&tag.id),
        html_escape(&tag.name)
    )
}

/// gtag loader and bootstrap
fn analytics(tracking_id: &str) -> String {
    format!(
        r#"<script async src="{src}{id_attr}"></script>
<script>
  window.dataLayer = window.dataLayer || [];
  function gtag(){{dataLayer.push(arguments);}}
  gtag('js', new Date());
  gtag('config', {id_js}, {{
    page_path: window.location.pathname,
  }});
</script>
"#,
        src = GTAG_SRC,
        id_attr = html_escape(tracking_id),
        id_js = js_string(tracking_id),
    )
}
