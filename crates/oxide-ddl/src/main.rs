//! oxide-ddl CLI
//!
//! Command-line tool that renders migration plans as dialect-specific DDL.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::commands;
use oxide_ddl::load_plan;
use oxide_ddl_core::registry::{DialectRegistry, RegisteredDialect};

/// Render migration plans as dialect-specific DDL.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target dialect (invariant name, see `oxide-ddl dialects`).
    #[arg(short, long, global = true, env = "OXIDE_DDL_DIALECT")]
    dialect: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in dialects.
    Dialects,

    /// Show the capability table of a dialect.
    Capabilities,

    /// Print the statements of a plan file.
    Sql {
        /// Path to the JSON plan.
        plan: PathBuf,
    },

    /// Print the query that checks whether a table exists.
    ExistsTable {
        /// Database (catalog) name.
        #[arg(long)]
        database: String,

        /// Table name.
        #[arg(long)]
        table: String,
    },
}

fn dialect<'a>(
    registry: &'a DialectRegistry,
    name: Option<&str>,
) -> anyhow::Result<&'a RegisteredDialect> {
    let name = name.context("no dialect given; use --dialect or OXIDE_DDL_DIALECT")?;
    Ok(registry.get(name)?)
}

fn main() -> anyhow::Result<()> {
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

    let registry = DialectRegistry::global();
    let dialect_name = cli.dialect.as_deref();

    match cli.command {
        Commands::Dialects => {
            print!("{}", commands::list_dialects(registry));
        }

        Commands::Capabilities => {
            let dialect = dialect(registry, dialect_name)?;
            print!("{}", commands::capabilities(dialect));
        }

        Commands::Sql { plan } => {
            let dialect = dialect(registry, dialect_name)?;
            let plan = load_plan(&plan)?;
            match plan.render(dialect.provider.as_ref(), &dialect.capabilities) {
                Ok(script) => {
                    print!("{}", script.to_sql());
                    info!(
                        version = script.version,
                        statements = script.statements.len(),
                        "plan rendered"
                    );
                }
                Err((script, err)) => {
                    print!("{}", script.to_sql());
                    return Err(err.into());
                }
            }
        }

        Commands::ExistsTable { database, table } => {
            let dialect = dialect(registry, dialect_name)?;
            println!("{}", dialect.provider.exists_table(&database, &table));
        }
    }

    Ok(())
}
