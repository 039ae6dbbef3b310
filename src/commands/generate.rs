//! Generate static files

use anyhow::Result;

use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Generate every post page
pub async fn run(site: &Site) -> Result<BuildReport> {
    let generator = Generator::new(site)?;
    generator.generate().await
}
