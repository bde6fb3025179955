//! CLI entry point for `schema_design`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use schema_design::config::{self, Config};
use schema_design::schema::patterns::detect_design_patterns;
use schema_design::schema::samples::sample_ecommerce_schema;
use schema_design::utils::logging::init_logging;
use schema_design::{
    check_normalization_level, export_schema_to_sql, extract_schema, generate_er_diagram_dot,
    generate_normalized_schema, DatabaseSchema, Dialect, DocumentationWriter,
};

#[derive(Parser, Debug)]
#[command(name = "schema_design")]
#[command(version, about = "Analyze relational schemas for normalization and export DDL")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Introspect the configured database and print its schema as JSON
    Extract {
        /// Write the schema here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a schema against the 1NF/2NF/3NF heuristics
    Analyze {
        /// Schema file (.json, .yaml or .yml); defaults to the configured database
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },

    /// Derive a schema with enum-like columns moved into lookup tables
    Normalize {
        #[arg(short, long)]
        schema: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print SQL DDL for one dialect
    Export {
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// mysql, postgresql or sqlite
        #[arg(short, long)]
        dialect: String,
    },

    /// Print a Graphviz ER diagram
    Diagram {
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },

    /// Write the documentation bundle
    Document {
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Defaults to the configured output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also document the normalized schema
        #[arg(long)]
        normalized: bool,
    },

    /// List the domain design patterns the schema resembles
    Patterns {
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },

    /// Print the built-in e-commerce sample schema
    Sample,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            config::load_from_file(&path)
                .with_context(|| format!("Failed to load configuration from {}", path))?
        }
        None => Config::default(),
    };
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Extract { output } => {
            let schema = load_schema(&config, None).await?;
            emit(&serde_json::to_string_pretty(&schema)?, output.as_deref())?;
        }
        Commands::Analyze { schema } => {
            let schema = load_schema(&config, schema.as_deref()).await?;
            let report = check_normalization_level(&schema)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Normalize { schema, output } => {
            let schema = load_schema(&config, schema.as_deref()).await?;
            let normalized = generate_normalized_schema(&schema)?;
            emit(&serde_json::to_string_pretty(&normalized)?, output.as_deref())?;
        }
        Commands::Export { schema, dialect } => {
            let dialect: Dialect = dialect.parse()?;
            let schema = load_schema(&config, schema.as_deref()).await?;
            println!("{}", export_schema_to_sql(&schema, dialect)?);
        }
        Commands::Diagram { schema } => {
            let schema = load_schema(&config, schema.as_deref()).await?;
            print!("{}", generate_er_diagram_dot(&schema));
        }
        Commands::Document {
            schema,
            output_dir,
            normalized,
        } => {
            let schema = load_schema(&config, schema.as_deref()).await?;
            let directory =
                output_dir.unwrap_or_else(|| PathBuf::from(&config.output.directory));
            let writer = DocumentationWriter::new(directory);

            let mut written = writer.write(&schema)?.files().len();
            if normalized || config.output.include_normalized {
                written += writer.write(&generate_normalized_schema(&schema)?)?.files().len();
            }
            println!("Wrote {} files to {}", written, writer.directory().display());
        }
        Commands::Patterns { schema } => {
            let schema = load_schema(&config, schema.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&detect_design_patterns(&schema))?);
        }
        Commands::Sample => {
            println!("{}", serde_json::to_string_pretty(&sample_ecommerce_schema())?);
        }
    }

    Ok(())
}

/// Read a schema file, or extract from the configured database when none is given
async fn load_schema(config: &Config, path: Option<&Path>) -> anyhow::Result<DatabaseSchema> {
    let path = match path {
        Some(path) => path,
        None => {
            let database = match &config.database {
                Some(database) => database,
                None => bail!("No --schema file given and no [database] section configured"),
            };
            return Ok(extract_schema(database).await?);
        }
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file {}", path.display()))?;
    let schema: DatabaseSchema = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
        Some("json") => serde_json::from_str(&contents)?,
        _ => bail!("Unsupported schema file extension: {}", path.display()),
    };
    schema.validate()?;

    tracing::info!(schema = %schema.name, tables = schema.tables.len(), "Loaded schema file");
    Ok(schema)
}

fn emit(contents: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", contents),
    }
    Ok(())
}
