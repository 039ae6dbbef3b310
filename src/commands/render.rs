//! Render a single post page

use anyhow::Result;

use crate::content::paths::validate_id;
use crate::generator::Generator;
use crate::Site;

/// Load one post and return its page
pub async fn run(site: &Site, id: &str) -> Result<String> {
    validate_id(id)?;
    let generator = Generator::new(site)?;
    generator.render_one(id).await
}
