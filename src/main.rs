use botshield::{build, config, verify};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // One leak per process; clap wants a 'static version string.
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "botshield")]
#[command(about = "Bot-aware prerendering pipeline for single-page apps")]
#[command(long_about = "\
Bot-aware prerendering pipeline for single-page apps

Markdown files become fully formed, SEO-complete HTML pages, plus a
sitemap, robots.txt, and an edge worker.js that serves the prerendered
pages to crawlers while humans keep getting the SPA.

Expected layout (paths come from botshield.config.json):

  botshield.config.json            # Site, content, output, worker settings
  content/
  └── blog/                        # One directory per collection
      ├── hello-world.md           # Frontmatter + markdown body
      └── 2024/
          └── deep-dive.md         # Patterns like blog/**/*.md nest freely

Each markdown file needs frontmatter with title, excerpt, datePublished,
coverImage, and slug. A post with slug 'hello-world' under routeBase
'/blog' becomes dist/blog/hello-world/index.html.

Every generated page must pass the SEO gate (title, meta description,
canonical URL, Open Graph tags, JSON-LD, non-trivial article body) or
the build fails.

Run 'botshield gen-config' to generate a documented starting config.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing botshield.config.json
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: collect → render → validate → emit
    Build,
    /// Print curl smoke tests for an existing output tree
    Verify,
    /// Print a stock botshield.config.json with all options present
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let summary = build::build(&cli.dir)?;
            let mut artifacts = Vec::new();
            if summary.sitemap {
                artifacts.push("sitemap.xml");
            }
            if summary.robots {
                artifacts.push("robots.txt");
            }
            if summary.worker {
                artifacts.push("worker.js");
            }
            if artifacts.is_empty() {
                println!("==> Build complete: {} pages", summary.pages);
            } else {
                println!(
                    "==> Build complete: {} pages + {}",
                    summary.pages,
                    artifacts.join(", ")
                );
            }
        }
        Command::Verify => {
            verify::verify(&cli.dir)?;
        }
        Command::GenConfig => {
            let json = serde_json::to_string_pretty(&config::stock_config())?;
            println!("{json}");
        }
    }

    Ok(())
}
