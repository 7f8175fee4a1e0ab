//! oxide-predicate CLI
//!
//! Compiles JSON filters into SQL conditions, and optionally runs them
//! against a SQLite database.

mod output;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_predicate::dialect::by_name;
use oxide_predicate::json::to_sql_value;
use oxide_predicate::{CompileOptions, Compiler, Dialect, LikeBinding};
use oxide_predicate_store::{SqliteStore, Store};

/// Compile declarative filters into parameterized SQL.
#[derive(Parser)]
#[command(name = "oxide-predicate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target dialect: generic, postgres, sqlite or mysql.
    #[arg(short, long, env = "OXIDE_PREDICATE_DIALECT", default_value = "generic")]
    dialect: String,

    /// Compile options as JSON (strictness, max_depth, like_binding).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reject unknown operators and malformed operands.
    #[arg(long)]
    strict: bool,

    /// Deepest allowed nesting of condition groups.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Bind LIKE operands instead of inlining them.
    #[arg(long)]
    bound_like: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON filter and print the condition, params and ordering.
    Compile {
        /// JSON file to read (stdin if not specified).
        file: Option<PathBuf>,

        /// Rewrite placeholders into the dialect's positional syntax.
        #[arg(short, long)]
        native: bool,
    },

    /// Split a literal condition from its trailing ORDER BY.
    Split {
        /// The literal condition.
        sql: String,

        /// Arguments, each parsed as JSON (bare words are taken as text).
        params: Vec<String>,
    },

    /// Run a JSON filter against a SQLite table.
    Query {
        /// Database URL.
        #[arg(long, env = "DATABASE_URL")]
        database: String,

        /// Table to query.
        #[arg(short, long)]
        table: String,

        /// JSON file to read (stdin if not specified).
        file: Option<PathBuf>,

        /// Print the number of matching rows instead of the rows.
        #[arg(long, conflicts_with = "delete")]
        count: bool,

        /// Delete the matching rows.
        #[arg(long)]
        delete: bool,
    },
}

impl Cli {
    fn compile_options(&self) -> anyhow::Result<CompileOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => CompileOptions::new(),
        };
        if self.strict {
            options = options.strict();
        }
        if let Some(depth) = self.max_depth {
            options = options.max_depth(depth);
        }
        if self.bound_like {
            options = options.like_binding(LikeBinding::Bound);
        }
        Ok(options)
    }
}

/// Reads the filter inputs: a JSON array of positional inputs, or a single
/// condition group object.
fn read_inputs(file: Option<&Path>) -> anyhow::Result<Vec<Value>> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    match serde_json::from_str(&text).context("parsing filter JSON")? {
        Value::Array(inputs) => Ok(inputs),
        object @ Value::Object(_) => Ok(vec![object]),
        other => bail!("expected a JSON array or object, got {other}"),
    }
}

fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = cli.compile_options()?;
    debug!(?options, "Compile options");

    match &cli.command {
        Commands::Compile { file, native } => {
            let dialect =
                by_name(&cli.dialect).ok_or_else(|| anyhow!("unknown dialect: {}", cli.dialect))?;
            let style = dialect.placeholder_style();
            let compiler = Compiler::with_dialect(dialect).options(options);

            let mut compiled = compiler.compile_json(&read_inputs(file.as_deref())?)?;
            if *native {
                compiled.condition = compiled.condition_for(style);
            }
            println!("{}", serde_json::to_string_pretty(&compiled)?);
        }

        Commands::Split { sql, params } => {
            let params = params.iter().map(|p| to_sql_value(&parse_param(p))).collect();
            let compiled = Compiler::new().options(options).compile_raw(sql, params)?;
            println!("{}", serde_json::to_string_pretty(&compiled)?);
        }

        Commands::Query {
            database,
            table,
            file,
            count,
            delete,
        } => {
            let store = SqliteStore::connect(database).await?;
            if cli.dialect != "generic" && cli.dialect != store.dialect().name() {
                info!(
                    "Ignoring --dialect {}; the store compiles for {}",
                    cli.dialect,
                    store.dialect().name()
                );
            }
            let compiled = store
                .compiler(options)
                .compile_json(&read_inputs(file.as_deref())?)?;

            if *delete {
                let removed = store.delete(table, &compiled).await?;
                info!("Deleted {} rows from {}", removed, table);
            } else if *count {
                println!("{}", store.count(table, &compiled).await?);
            } else {
                let rows = store.fetch_all(table, &compiled).await?;
                let rows: Vec<Value> = rows.iter().map(output::row_to_json).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("1"), Value::from(1));
        assert_eq!(parse_param("\"x\""), Value::from("x"));
        assert_eq!(parse_param("ann"), Value::from("ann"));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "oxide-predicate",
            "--strict",
            "--max-depth",
            "4",
            "--bound-like",
            "compile",
        ]);
        let options = cli.compile_options().unwrap();
        assert!(options.is_strict());
        assert_eq!(options.max_depth, 4);
        assert_eq!(options.like_binding, LikeBinding::Bound);
    }

    #[test]
    fn test_split_args() {
        let cli = Cli::parse_from(["oxide-predicate", "split", "a = ? order by b", "1", "x"]);
        match cli.command {
            Commands::Split { sql, params } => {
                assert_eq!(sql, "a = ? order by b");
                assert_eq!(params, ["1", "x"]);
            }
            _ => panic!("expected split"),
        }
    }
}
