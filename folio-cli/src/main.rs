use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use folio_core::{LogStore, Shortener, ShortenerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod shell;
mod table;

const DEFAULT_DATA_PATH: &str = ".data/links.log";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Table format (default)
    Table,
    /// Pretty JSON
    Json,
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio short links and desktop shell", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// URL to shorten (http:// or https://)
        url: String,
        /// Link log path
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,
        /// Print the full short URL under this origin
        #[arg(long, env = "FOLIO_PUBLIC_URL")]
        base_url: Option<String>,
        /// Fresh ids tried before giving up on collisions
        #[arg(long, default_value = "5")]
        max_id_attempts: usize,
    },
    /// Look up the URL stored under an id
    Resolve {
        /// Short id
        id: String,
        /// Link log path
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,
    },
    /// List stored links
    List {
        /// Link log path
        #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,
        /// Output format (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Start the interactive desktop shell
    Shell,
}

fn open_shortener(path: &Path, config: ShortenerConfig) -> Result<Shortener> {
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid shortener configuration")?;
    let store = LogStore::open_or_create(path)
        .with_context(|| format!("Failed to open link log at {}", path.display()))?;
    Ok(Shortener::with_config(Arc::new(store), config))
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Shorten {
            url,
            data,
            base_url,
            max_id_attempts,
        } => {
            let shortener = open_shortener(
                &data,
                ShortenerConfig::new().with_max_id_attempts(max_id_attempts),
            )?;
            let link = shortener.create(&url).context("Failed to shorten")?;
            match base_url {
                Some(base) => println!("{}/shorten/{}", base.trim_end_matches('/'), link.id),
                None => println!("{}", link.id),
            }
        }

        Commands::Resolve { id, data } => {
            let shortener = open_shortener(&data, ShortenerConfig::default())?;
            match shortener.resolve(&id).context("Failed to resolve")? {
                Some(url) => println!("{}", url),
                None => println!("Not found"),
            }
        }

        Commands::List { data, output } => {
            let shortener = open_shortener(&data, ShortenerConfig::default())?;
            let links = shortener.list().context("Failed to list links")?;
            match output {
                OutputFormat::Table => println!("{}", table::format_links_table(&links)),
                OutputFormat::Json => {
                    let rows: Vec<serde_json::Value> = links
                        .iter()
                        .map(|link| {
                            serde_json::json!({
                                "id": link.id.as_str(),
                                "url": link.url,
                                "createdAt": link.created_at,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                }
            }
        }

        Commands::Shell => {
            let mut shell = shell::Shell::new()?;
            shell.run()?;
        }
    }

    Ok(())
}
