//! # Aira Context CLI (`aira-ctx`)
//!
//! Command-line front end for the context retriever: build the corpus
//! index, inspect what context a query would receive, and manage company
//! records.
//!
//! ## Usage
//!
//! ```bash
//! aira-ctx --config ./config/aira.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `aira-ctx index` | Build the chunk index and print counts |
//! | `aira-ctx ask "<query>"` | Print the context a query would receive |
//! | `aira-ctx check "<query>"` | Show fuzzy corrections and the domain verdict |
//! | `aira-ctx records list` | List company records |
//! | `aira-ctx records get <id>` | Print one record as JSON |
//! | `aira-ctx records put ...` | Create or update a record |
//!
//! Logs go to stderr (`RUST_LOG` controls verbosity); command output goes to
//! stdout.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use aira_context::aira_context_core::prompt::compose_prompt;
use aira_context::aira_context_core::query::QueryProfile;
use aira_context::aira_context_core::safety::{is_inappropriate_query, refusal_message};
use aira_context::config::{load_or_default, Config};
use aira_context::records::RecordStore;
use aira_context::{ContextRetriever, Record};

/// Aira Context CLI: context retrieval for the Aira voice assistant.
#[derive(Parser)]
#[command(
    name = "aira-ctx",
    about = "Aira Context: corpus chunking, fuzzy domain gating, and keyword-ranked context retrieval",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Defaults apply when it is absent.
    #[arg(long, global = true, env = "AIRA_CONFIG", default_value = "./config/aira.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the corpus and print document and chunk counts.
    Index,

    /// Print the context string a query would receive.
    ///
    /// Prints nothing when the query is out of domain and no record is given.
    Ask {
        query: String,

        /// Inject this record regardless of the query's domain.
        #[arg(long)]
        record: Option<String>,

        /// Show the gating decision, corrections and chunk scores.
        #[arg(long)]
        explain: bool,

        /// Print the full prompt sent to the language model.
        #[arg(long)]
        prompt: bool,

        /// Print the retrieval breakdown and context as JSON.
        #[arg(long, conflicts_with_all = ["explain", "prompt"])]
        json: bool,
    },

    /// Show fuzzy corrections, query keywords and the domain verdict.
    Check { query: String },

    /// Manage company records.
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
}

#[derive(Subcommand)]
enum RecordsAction {
    /// List record summaries.
    List {
        /// Print summaries as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Print a record as JSON.
    Get { id: String },

    /// Create or update a record from a JSON file or from flags.
    Put {
        /// JSON file with the full record.
        #[arg(long, conflicts_with_all = ["id", "name", "content"])]
        file: Option<PathBuf>,

        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        website: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aira_context=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_or_default(&cli.config)?;

    match cli.command {
        Commands::Index => {
            let retriever = ContextRetriever::from_config(&config)?;
            let stats = retriever.reindex().await;
            println!("indexed documents: {}", stats.documents);
            println!("indexed chunks: {}", stats.chunks);
        }
        Commands::Ask {
            query,
            record,
            explain,
            prompt,
            json,
        } => {
            let output = AskOutput {
                explain,
                prompt,
                json,
            };
            run_ask(&config, &query, record.as_deref(), output).await?
        }
        Commands::Check { query } => {
            let matcher = config.domain.build_matcher()?;
            let profile = QueryProfile::build(&matcher, &query);
            println!("in domain: {}", profile.in_domain);
            println!("corrected: {}", join(&profile.corrected));
            println!("keywords: {}", join(&profile.keywords));
            println!("leadership: {}", profile.asks_leadership);
        }
        Commands::Records { action } => run_records(&config, action).await?,
    }

    Ok(())
}

/// How `ask` renders its result.
struct AskOutput {
    explain: bool,
    prompt: bool,
    json: bool,
}

async fn run_ask(
    config: &Config,
    query: &str,
    record: Option<&str>,
    output: AskOutput,
) -> Result<()> {
    if is_inappropriate_query(query) {
        if output.json {
            let refused = serde_json::json!({ "refused": true, "message": refusal_message() });
            println!("{}", serde_json::to_string_pretty(&refused)?);
        } else {
            println!("{}", refusal_message());
        }
        return Ok(());
    }

    let retriever = ContextRetriever::open(config).await?;
    let retrieval = retriever.plan(query, record);
    let context = retrieval.render();

    if output.json {
        let mut value = serde_json::to_value(&retrieval)?;
        value["context"] = serde_json::Value::String(context);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if output.explain {
        println!(
            "in domain: {}{}",
            retrieval.in_domain,
            if retrieval.gated { " (gated)" } else { "" }
        );
        println!("corrected: {}", retrieval.corrected.join(" "));
        println!("keywords: {}", retrieval.keywords.join(" "));
        for r in &retrieval.records {
            println!("record: {} ({})", r.name, r.id);
        }
        for (i, c) in retrieval.chunks.iter().enumerate() {
            println!("{}. [{:.1}] {} / {}", i + 1, c.score, c.source, c.section);
        }
        println!();
    }

    if output.prompt {
        println!("{}", compose_prompt(&context, query));
    } else if !context.is_empty() {
        println!("{}", context);
    }
    Ok(())
}

async fn run_records(config: &Config, action: RecordsAction) -> Result<()> {
    let store = RecordStore::new(config.records_dir());
    store.load().await;

    match action {
        RecordsAction::List { json } => {
            let summaries = store.summaries();
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }
            if summaries.is_empty() {
                println!("No records.");
            }
            for s in summaries {
                println!(
                    "{}\t{}\t{}\t{}",
                    s.id,
                    s.name,
                    s.industry.as_deref().unwrap_or("-"),
                    s.website.as_deref().unwrap_or("-")
                );
            }
        }
        RecordsAction::Get { id } => match store.get_by_id(&id) {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => bail!("Record not found: {}", id),
        },
        RecordsAction::Put {
            file,
            id,
            name,
            content,
            industry,
            website,
        } => {
            let mut record = match file {
                Some(path) => {
                    let body = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_str::<Record>(&body)
                        .with_context(|| format!("Failed to parse {}", path.display()))?
                }
                None => Record::new(
                    id.unwrap_or_default(),
                    name.unwrap_or_default(),
                    content.unwrap_or_default(),
                ),
            };
            if industry.is_some() {
                record.metadata.industry = industry;
            }
            if website.is_some() {
                record.metadata.website = website;
            }
            record.touch();

            let id = record.id.clone();
            store.upsert(record).await?;
            println!("saved record: {}", id);
        }
    }
    Ok(())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
