use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use folio_feed::parser::{self, markup, table};
use folio_feed::{FeedConfig, FeedLoader, Project, SourceKind};

#[derive(Parser)]
#[command(name = "folio_feed", about = "Portfolio content feed loader")]
struct Cli {
    /// Static projects file used when both sheet exports fail
    #[arg(long, global = true)]
    static_projects: Option<PathBuf>,
    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load projects through the fallback chain
    Projects {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Only featured projects
        #[arg(long)]
        featured: bool,
    },
    /// Load the site copy
    Content {
        #[arg(long)]
        json: bool,
    },
    /// Load footer copy and links
    Footer {
        #[arg(long)]
        json: bool,
    },
    /// Load every feed concurrently
    All,
    /// Convert a markup file (or stdin) to HTML
    Render {
        file: Option<PathBuf>,
    },
    /// Parse a local CSV export
    ParseCsv {
        file: PathBuf,
        /// Build projects instead of printing raw rows
        #[arg(long)]
        projects: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut config = FeedConfig::from_env().context("Invalid FOLIO_* configuration")?;
    if let Some(path) = cli.static_projects {
        config.static_projects = path;
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }

    let result = match cli.command {
        Commands::Projects { json, featured } => {
            let loader = FeedLoader::new(config)?;
            let projects: Vec<Project> = loader
                .load_projects()
                .await
                .into_iter()
                .filter(|p| !featured || p.featured)
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&projects)?);
            } else {
                print_projects(&projects);
            }
            Ok(())
        }
        Commands::Content { json } => {
            let loader = FeedLoader::new(config)?;
            let content = loader.load_site_content().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&content)?);
            } else {
                for (key, value) in content.iter() {
                    println!("{:<24} {}", key, truncate(value, 80));
                }
            }
            Ok(())
        }
        Commands::Footer { json } => {
            let loader = FeedLoader::new(config)?;
            let footer = loader.load_footer().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&footer)?);
            } else {
                for (key, value) in &footer.content {
                    println!("{:<24} {}", key, value);
                }
                for (section, links) in [("work", &footer.links.work), ("connect", &footer.links.connect)] {
                    println!("\n--- {} ---", section);
                    for l in links {
                        println!("  {:<20} {}", l.text, l.url);
                    }
                }
                if footer.cta_disabled() {
                    println!("\n(call to action disabled)");
                }
            }
            Ok(())
        }
        Commands::All => {
            let loader = FeedLoader::new(config)?;
            let data = loader.load_all().await;
            println!(
                "{} projects ({} featured), {} content keys, {} footer links",
                data.projects.len(),
                data.projects.iter().filter(|p| p.featured).count(),
                data.content.len(),
                data.footer.links.work.len() + data.footer.links.connect.len(),
            );
            Ok(())
        }
        Commands::Render { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            println!("{}", markup::to_html(&text));
            Ok(())
        }
        Commands::ParseCsv { file, projects } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let rows = table::parse_csv(&text);
            if projects {
                let built = parser::build_projects(&rows, SourceKind::Csv);
                println!("{}", serde_json::to_string_pretty(&built)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects.");
        return;
    }

    println!(
        "{:>3} | {:<28} | {:<18} | {:<6} | {:<10} | {:>3} | {:<24}",
        "#", "Title", "Category", "Year", "Status", "Img", "Tags"
    );
    println!("{}", "-".repeat(108));

    for p in projects {
        let star = if p.featured { "*" } else { "" };
        println!(
            "{:>3} | {:<28} | {:<18} | {:<6} | {:<10} | {:>3} | {:<24}",
            p.id,
            truncate(&format!("{}{}", p.title, star), 28),
            truncate(&p.category, 18),
            p.year,
            truncate(&p.status, 10),
            p.detail_images.len(),
            truncate(&p.tags.join(", "), 24),
        );
    }

    let with_metrics: Vec<_> = projects.iter().filter(|p| !p.metrics.is_empty()).collect();
    if !with_metrics.is_empty() {
        println!("\n--- Metrics ---");
        for p in &with_metrics {
            let m: Vec<String> = p
                .metrics
                .iter()
                .map(|m| format!("{} {}", m.value, m.label))
                .collect();
            println!("  {}: {}", truncate(&p.title, 28), m.join(" | "));
        }
    }

    println!("\n{} projects | * featured", projects.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
