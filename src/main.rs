//! diary-index CLI
//!
//! Command-line interface over a JSON record store and its index:
//! - Add and remove entries
//! - List recent entries, days, and date ranges
//! - Substring search

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use diary_index::config::generate_default_config;
use diary_index::{Config, DiaryRecord, DiaryService, JsonStore, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "diary-index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Date-ordered index and search over a diary entry store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Record store file, overrides the configured path
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add an entry
    Add {
        /// Entry title
        title: String,
        /// Entry body
        #[arg(long, default_value = "")]
        content: String,
        /// Date (default: now). Supports YYYY-MM-DD and YYYY-MM-DDTHH:MM[:SS]
        #[arg(short, long)]
        date: Option<String>,
        /// Tags (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Location
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Remove an entry by id
    Remove {
        id: String,
    },

    /// List the most recent entries
    List {
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// List days that have entries
    Days,

    /// List entries between two dates (inclusive)
    Range {
        start: String,
        end: String,
    },

    /// Search entry text
    Search {
        query: String,
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show index statistics
    Stats,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, source, failures) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, Some(path.clone()), Vec::new()),
        None => {
            let loaded = Config::load_default();
            (loaded.config, loaded.source, loaded.failures)
        }
    };
    if let Some(store) = &cli.store {
        config.store.path = store.clone();
    }

    init_logging(&config.logging);
    for failure in &failures {
        tracing::warn!("Skipping config file: {}", failure);
    }
    match &source {
        Some(path) => tracing::debug!("Loaded config from {:?}", path),
        None => tracing::debug!("Using default config with environment overrides"),
    }

    let json = cli.format.eq_ignore_ascii_case("json");

    match cli.command {
        Commands::Config { output } => write_config(output.as_deref())?,

        Commands::Add {
            title,
            content,
            date,
            tag,
            location,
        } => {
            let date = match date.as_deref() {
                None | Some("now") => Local::now().naive_local(),
                Some(s) => parse_date(s, NaiveTime::MIN)?,
            };

            let mut record = DiaryRecord::new(title, content, date);
            if !tag.is_empty() {
                record = record.tags(tag);
            }
            if let Some(location) = location {
                record = record.location(location);
            }

            let id = record.id.clone();
            let mut service = open_service(&config).await?;
            service.save(record).await?;
            println!("{}", id);
        }

        Commands::Remove { id } => {
            let mut service = open_service(&config).await?;
            match service.delete(&id).await? {
                Some(_) => println!("Removed {}", id),
                None => bail!("No entry with id {}", id),
            }
        }

        Commands::List { limit } => {
            let mut service = open_service(&config).await?;
            let records = service.recent(limit).await?;
            print_records(&records, json)?;
        }

        Commands::Days => {
            let mut service = open_service(&config).await?;
            let days = service.days().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                for day in days {
                    println!("{}", day);
                }
            }
        }

        Commands::Range { start, end } => {
            let start = parse_date(&start, NaiveTime::MIN)?;
            let end = parse_date(&end, end_of_day())?;
            let mut service = open_service(&config).await?;
            let records = service.entries_between(start, end).await?;
            print_records(&records, json)?;
        }

        Commands::Search { query, limit } => {
            let mut service = open_service(&config).await?;
            let records = service.search(&query, limit).await?;
            print_records(&records, json)?;
        }

        Commands::Stats => {
            let stats = open_service(&config).await?.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats);
            }
        }
    }

    Ok(())
}

async fn open_service(config: &Config) -> anyhow::Result<DiaryService<JsonStore>> {
    tracing::debug!("Record store: {:?}", config.store.path);

    let store = JsonStore::open(&config.store.path)
        .with_context(|| format!("opening record store {}", config.store.path.display()))?;
    Ok(if config.index.build_on_open {
        DiaryService::open(store).await
    } else {
        DiaryService::new(store)
    })
}

/// Write the config template to `output`, or stdout
fn write_config(output: Option<&Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing config to {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("diary_index={}", config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Parse `YYYY-MM-DD` (at `day_time`) or `YYYY-MM-DDTHH:MM[:SS]`
fn parse_date(s: &str, day_time: NaiveTime) -> anyhow::Result<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(day_time));
    }
    bail!("Invalid date format: {}", s)
}

/// Last representable instant of a day; wraps around midnight
fn end_of_day() -> NaiveTime {
    NaiveTime::MIN - chrono::Duration::nanoseconds(1)
}

fn print_records(records: &[DiaryRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No entries");
        return Ok(());
    }

    for record in records {
        let tags = record.effective_tags();
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        println!(
            "{}  {}  {}{}",
            record.date.format("%Y-%m-%d %H:%M"),
            record.id,
            record.title,
            tags
        );
    }
    Ok(())
}
