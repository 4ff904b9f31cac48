use clap::{Parser, Subcommand};

mod commands;
mod output;

#[derive(Parser)]
#[command(
    name = "pgscope",
    about = "Infer the schema of PostgreSQL JSONB columns: per-path type distribution, coverage, and per-document occurrence counts."
)]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all jsonb columns in the database
    Discover {
        /// DB connection URL
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: output::OutputFormat,
    },

    /// Infer the schema of a jsonb column
    Schema {
        /// DB connection URL
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: String,

        /// Table name (schema.table, schema defaults to public)
        table: String,

        /// Column name
        column: String,

        /// Number of documents to sample (0 = all)
        #[arg(short, long, default_value = "5000")]
        limit: u64,

        /// Wildcard pattern, e.g. 'name.$'; repeat to add more (order matters)
        #[arg(short, long = "wildcard")]
        wildcards: Vec<String>,

        /// Keep array indices as distinct paths instead of folding them into '$'
        #[arg(long)]
        expand_arrays: bool,

        /// Only report this exact path; repeatable
        #[arg(long = "include")]
        include: Vec<String>,

        /// Drop this exact path from the report; repeatable (ignored when --include is used)
        #[arg(long = "exclude")]
        exclude: Vec<String>,

        /// Root field treated as an opaque identifier
        #[arg(long, default_value = "_id")]
        id_field: String,

        /// Persist the report into this table instead of printing rows
        #[arg(short, long)]
        out: Option<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: output::OutputFormat,
    },

    /// Count distinct value combinations at one or more paths
    Distinct {
        /// DB connection URL
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: String,

        /// Table name (schema.table, schema defaults to public)
        table: String,

        /// Column name
        column: String,

        /// Dot-delimited key path; repeat for tuples
        #[arg(short, long = "key", required = true)]
        keys: Vec<String>,

        /// Number of documents to sample (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: u64,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: output::OutputFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Discover {
            database_url,
            format,
        } => {
            commands::discover::run(&database_url, format).await?;
        }
        Commands::Schema {
            database_url,
            table,
            column,
            limit,
            wildcards,
            expand_arrays,
            include,
            exclude,
            id_field,
            out,
            format,
        } => {
            let options = commands::schema::build_options(
                limit,
                wildcards,
                expand_arrays,
                &include,
                &exclude,
                id_field,
                out,
            );
            commands::schema::run(&database_url, &table, &column, options, format).await?;
        }
        Commands::Distinct {
            database_url,
            table,
            column,
            keys,
            limit,
            format,
        } => {
            commands::distinct::run(&database_url, &table, &column, keys, limit, format).await?;
        }
    }
    Ok(())
}
