// crates/emodict/src/main.rs

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use emodict_core::config::{DbConfig, DictVariant};
use emodict_core::dimensions::DimensionMaps;
use emodict_core::{dataset, db, ingest, schema};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Speech-emotion dictionary loaders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the NRC-encoded CSV dataset into the base_dict database
    BaseDict(LoadArgs),
    /// Load the ParlaMint EmoLex export into the emolex_dict database
    EmolexDict(LoadArgs),
}

#[derive(Args, Debug, Default)]
struct LoadArgs {
    /// Override the default input file for this variant
    #[arg(long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let (variant, args) = match cli.command {
        Command::BaseDict(args) => (DictVariant::BaseDict, args),
        Command::EmolexDict(args) => (DictVariant::EmolexDict, args),
    };
    run_load(variant, args).await
}

async fn run_load(variant: DictVariant, args: LoadArgs) -> Result<()> {
    let config = DbConfig::from_env()?;
    let input = args.input.unwrap_or_else(|| variant.default_input());

    db::ensure_database(&config, variant.db_name()).await?;
    let pool = db::connect(&config, variant.db_name()).await?;
    schema::create_tables(&pool).await?;

    let records = match variant {
        DictVariant::BaseDict => dataset::load_csv(&input)?,
        DictVariant::EmolexDict => dataset::load_parquet(&input)?,
    };

    let maps = DimensionMaps::resolve(&pool, &records).await?;
    let summary = ingest::load_speeches(&pool, &records, &maps, variant.normalization()).await?;

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        db = variant.db_name(),
        "load complete"
    );
    Ok(())
}
