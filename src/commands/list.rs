//! List post routes

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Print the routes a build would generate
pub async fn run(site: &Site) -> Result<()> {
    let generator = Generator::new(site)?;
    let paths = generator.paths().await?;

    println!("Routes ({}):", paths.paths.len());
    for path in &paths.paths {
        println!("  {}", path);
    }
    println!("Fallback: {}", paths.fallback);

    Ok(())
}
