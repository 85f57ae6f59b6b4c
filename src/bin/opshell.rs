use clap::{Parser, Subcommand};
use log::LevelFilter;
use opshell::config::StoreConfig;
use opshell::errors::ShellError;
use opshell::exec::{Engine, SqlExecutor};
use opshell::memstore::MemStore;
use opshell::{describe, logger, parse};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "opshell", about = "Run document-store operation strings against an in-memory store")]
struct Cli {
    /// Target engine: mysql, postgres, or mongo
    #[arg(long, default_value = "mongo")]
    engine: String,

    /// Optional TOML config file with connection settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed a collection from an NDJSON file, repeatable: --seed users=users.ndjson
    #[arg(long, value_name = "COLLECTION=FILE")]
    seed: Vec<String>,

    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute one operation string and print the report
    Run { query: String },
    /// Print the sampled structure of a collection
    Describe { collection: String },
    /// List seeded collections
    Collections,
}

/// The demo binary carries no live SQL connection; relational passthrough is
/// wired in by embedding applications.
struct UnconfiguredSql;

impl SqlExecutor for UnconfiguredSql {
    fn execute_sql(&self, _sql: &str) -> Result<String, ShellError> {
        Err(ShellError::Store("no SQL endpoint configured".to_string()))
    }
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let _ = logger::init_console(level);

    match run(&cli) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let engine = Engine::from_str(&cli.engine)?;
    let config = StoreConfig::load(cli.config.as_deref())?;
    let store = MemStore::new();
    for spec in &cli.seed {
        let (collection, file) = spec
            .split_once('=')
            .ok_or_else(|| ShellError::Config(format!("bad seed spec '{spec}', expected COLLECTION=FILE")))?;
        seed_collection(&store, collection, file)?;
    }

    Ok(match &cli.command {
        Command::Run { query } => opshell::run_query(engine, &store, &UnconfiguredSql, query),
        Command::Describe { collection } => describe::render_collection(
            collection,
            store.count(collection),
            store.sample(collection).as_ref(),
        ),
        Command::Collections => {
            describe::render_collection_list(&config.database, &store.collection_names())
        }
    })
}

fn seed_collection(
    store: &MemStore,
    collection: &str,
    file: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(file)?;
    let mut seeded = 0usize;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let value: serde_json::Value = serde_json::from_str(line)?;
        match parse::coerce(parse::json_to_bson(&value)) {
            bson::Bson::Document(doc) => {
                store.seed(collection, doc);
                seeded += 1;
            }
            _ => {
                return Err(Box::new(ShellError::Config(format!(
                    "seed file {file} must contain one JSON object per line"
                ))));
            }
        }
    }
    log::info!("seeded {seeded} document(s) into {collection}");
    Ok(())
}
