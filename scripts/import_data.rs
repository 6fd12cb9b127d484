//! Load the embeddings CSV into the `product_info` table.

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use runtime_pipeline::Pipeline;
use serde_json::json;

use common::CommonArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Import product embeddings into PostgreSQL")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Run `CREATE EXTENSION IF NOT EXISTS vector` first.
    #[arg(long)]
    create_extension: bool,

    /// Milliseconds between inserts.
    #[arg(long, value_name = "MS")]
    pace_ms: Option<u64>,
}

async fn run(args: Args) -> Result<()> {
    let mut config = args.common.load()?;
    if args.create_extension {
        config.import.create_extension = true;
    }
    if let Some(pace_ms) = args.pace_ms {
        config.import.pace_ms = pace_ms;
    }
    let pipeline = Pipeline::connect(config).await;
    let report = pipeline.import().await.context("importing products")?;
    println!(
        "{}",
        json!({
            "run_id": report.run_id,
            "rows_inserted": report.rows_inserted,
            "statements_issued": report.statements_issued,
            "retries": report.retries,
        })
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Args::parse()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
