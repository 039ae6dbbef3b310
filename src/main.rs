//! CLI entry point for cms-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cms-blog")]
#[command(version)]
#[command(about = "Generate static blog post pages from a headless content API", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a page for every post
    #[command(alias = "g")]
    Generate,

    /// List the routes a build would generate
    List,

    /// Render one post page to stdout
    Render {
        /// Post id
        id: String,
    },

    /// Serve the public folder
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Generate before serving
        #[arg(short, long)]
        generate: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "cms_blog=debug,info"
    } else {
        "cms_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let load_site = || -> Result<cms_blog::Site> {
        let mut site = cms_blog::Site::new(&base_dir)?;
        site.config
            .apply_env_overrides(|key| std::env::var(key).ok());
        Ok(site)
    };

    match cli.command {
        Commands::Generate => {
            let site = load_site()?;
            tracing::info!("Generating static files...");
            let report = site.generate().await?;
            println!(
                "Generated {} pages in {:.2}s",
                report.pages_written,
                report.elapsed.as_secs_f64()
            );
        }

        Commands::List => {
            let site = load_site()?;
            cms_blog::commands::list::run(&site).await?;
        }

        Commands::Render { id } => {
            let site = load_site()?;
            let html = cms_blog::commands::render::run(&site, &id).await?;
            print!("{}", html);
        }

        Commands::Server { port, ip, generate } => {
            let site = load_site()?;

            if generate {
                tracing::info!("Generating static files...");
                site.generate().await?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            cms_blog::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = load_site()?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("cms-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
