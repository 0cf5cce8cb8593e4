use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use hn_core::{Article, ArticleDraft, Result, Rewrite, Summary};
use hn_inference::curator::Curator;
use hn_inference::summarizer::Summarizer;
use hn_inference::{create_client, InferenceConfig};
use hn_storage::DEFAULT_STATE_FILE;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod logging;

#[derive(Debug, Clone, PartialEq)]
struct HumanDuration(Duration);

/// Seconds in one `unit`, for the suffixes a timeout may carry.
fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3600),
        _ => None,
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    /// Parses `30s`, `2m`, `1h15m` or a bare number of seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let too_long = || format!("Duration is too long: {}", s);
        let mut total = 0u64;
        let mut digits = String::new();
        let mut seen_number = false;

        let mut add = |digits: &mut String, per_unit: u64| -> std::result::Result<(), String> {
            let value: u64 = digits.parse().map_err(|_| too_long())?;
            total = value
                .checked_mul(per_unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(too_long)?;
            digits.clear();
            Ok(())
        };

        for c in s.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if c.is_whitespace() {
                continue;
            } else if digits.is_empty() {
                return Err(format!("Invalid character in duration: {}", c));
            } else {
                let per_unit = unit_seconds(c).ok_or_else(|| format!("Invalid duration unit: {}", c))?;
                add(&mut digits, per_unit)?;
                seen_number = true;
            }
        }

        if !digits.is_empty() {
            add(&mut digits, 1)?;
            seen_number = true;
        }
        if !seen_number {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

/// Accepts a plain date (`2025-11-20`) or a full RFC 3339 timestamp.
fn parse_published_at(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("Invalid date: {}", s));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp {}: {}", s, e))
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Health news curator: import articles, summarize and rewrite them", long_about = None)]
pub struct Cli {
    /// Where state is kept between runs: memory or file
    #[arg(long, env = "HN_STORAGE", default_value = "file")]
    storage: String,
    /// State file used by the file storage
    #[arg(long, env = "HN_STATE", default_value = DEFAULT_STATE_FILE)]
    state: String,
    /// Base URL of the generation service (default http://localhost:11434, or HN_MODEL_URL)
    #[arg(long)]
    model_url: Option<String>,
    /// Model name sent with every request (default llama3.2, or HN_MODEL)
    #[arg(long)]
    model: Option<String>,
    #[arg(long, help = "Generation backend. Available backends: ollama (default), offline")]
    backend: Option<String>,
    /// Per-request timeout (e.g. 30s, 2m)
    #[arg(long)]
    timeout: Option<HumanDuration>,
    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Load the built-in sample articles
    LoadSamples,
    /// Replace the article list with a JSON array of articles
    Import { path: PathBuf },
    /// Add a pasted article
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        /// Article text; use --content-file to read it from disk
        #[arg(long, required_unless_present = "content_file")]
        content: Option<String>,
        #[arg(long, conflicts_with = "content")]
        content_file: Option<PathBuf>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_published_at)]
        published_at: Option<DateTime<Utc>>,
        /// Summarize right after adding
        #[arg(long)]
        summarize: bool,
    },
    /// List loaded articles
    List,
    /// Show one article with its summary and rewrite
    Show { id: String },
    /// Summarize one article, or every article with --all
    Summarize {
        #[arg(required_unless_present = "all")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
    /// Produce a friendlier, shorter rewrite of an article
    Rewrite { id: String },
    /// Page through summarized articles
    Feed {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

impl Cli {
    fn inference_config(&self) -> InferenceConfig {
        let mut config = InferenceConfig::default().with_env_overrides();
        if let Some(url) = &self.model_url {
            config.model_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.model_name = model.clone();
        }
        if let Some(backend) = &self.backend {
            config.backend = backend.to_lowercase();
        }
        config.timeout = self.timeout.as_ref().map(|t| t.0);
        config
    }
}

fn print_summary(summary: &Summary) {
    println!("  TL;DR: {}", summary.tldr);
    for takeaway in &summary.takeaways {
        println!("   • {}", takeaway);
    }
    println!("  (generated {})", summary.generated_at.to_rfc3339());
}

fn print_rewrite(rewrite: &Rewrite) {
    println!("{}", rewrite.text);
    println!("  (generated {})", rewrite.generated_at.to_rfc3339());
}

fn print_article_line(article: &Article) {
    println!(
        "{}  {} - {} ({})",
        article.id,
        article.published_at.format("%Y-%m-%d"),
        article.title,
        article.source
    );
}

async fn run(cli: Cli, curator: Curator) -> Result<()> {
    match cli.command {
        Commands::LoadSamples => {
            let count = curator.load_samples().await?;
            println!("📚 Loaded {} sample articles", count);
        }
        Commands::Import { path } => {
            let count = curator
                .load_articles(async move {
                    let raw = tokio::fs::read_to_string(&path).await?;
                    let articles: Vec<Article> = serde_json::from_str(&raw)?;
                    Ok::<_, hn_core::Error>(articles)
                })
                .await?;
            println!("📚 Imported {} articles", count);
        }
        Commands::Add {
            title,
            url,
            content,
            content_file,
            source,
            author,
            description,
            published_at,
            summarize,
        } => {
            let content = match (content, content_file) {
                (Some(content), _) => content,
                (None, Some(path)) => tokio::fs::read_to_string(path).await?,
                (None, None) => String::new(),
            };
            let article = curator
                .add_article(ArticleDraft {
                    title,
                    source,
                    author,
                    url,
                    published_at,
                    description,
                    content,
                    auto_summarize: summarize,
                })
                .await?;
            println!("🆕 Added {}", article.id);
            if let Some(summary) = curator.article(&article.id).await?.summary {
                print_summary(&summary);
            }
        }
        Commands::List => {
            let articles = curator.articles().await;
            if articles.is_empty() {
                println!("No articles yet. Run `hn load-samples` or `hn add`.");
            }
            for article in &articles {
                print_article_line(article);
            }
        }
        Commands::Show { id } => {
            let detail = curator.article(&id).await?;
            print_article_line(&detail.article);
            println!("{}", detail.article.url);
            println!();
            println!("{}", detail.article.content);
            if let Some(summary) = &detail.summary {
                println!();
                print_summary(summary);
            }
            if let Some(rewrite) = &detail.rewrite {
                println!();
                print_rewrite(rewrite);
            }
        }
        Commands::Summarize { id, all } => {
            if all {
                for (id, summary) in curator.summarize_all().await {
                    println!("{}", id);
                    print_summary(&summary);
                }
            } else if let Some(id) = id {
                let summary = curator.summarize_one(&id).await?;
                print_summary(&summary);
            }
        }
        Commands::Rewrite { id } => {
            let rewrite = curator.rewrite_one(&id).await?;
            print_rewrite(&rewrite);
        }
        Commands::Feed { page } => {
            let feed = curator.feed(page).await;
            println!("Page {}/{}", feed.page, feed.total_pages);
            for item in &feed.items {
                print_article_line(&item.article);
                print_summary(&item.summary);
            }
        }
        Commands::Serve { addr } => {
            hn_web::serve(addr, hn_web::AppState { curator: Arc::new(curator) }).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let persistence = hn_storage::create_persistence(&cli.storage, Some(&cli.state))?;
    info!("💾 Using {} storage", persistence.name());

    let client = create_client(&cli.inference_config())?;
    let curator = Curator::restore(Summarizer::new(client), persistence).await;

    run(cli, curator).await
}
