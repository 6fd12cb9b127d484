//! Embed every product name in the input catalog and write the catalog, with
//! an `embedding` column, to the embeddings bucket.

mod common;

use anyhow::{Context, Result};
use clap::Parser;
use runtime_pipeline::Pipeline;
use serde_json::json;

use common::CommonArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Generate product embeddings")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Embedding requests kept in flight.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Column to embed.
    #[arg(long, value_name = "COLUMN")]
    text_column: Option<String>,
}

async fn run(args: Args) -> Result<()> {
    let mut config = args.common.load()?;
    if let Some(concurrency) = args.concurrency {
        config.embedding.concurrency = concurrency;
    }
    if let Some(column) = args.text_column {
        config.embedding.text_column = column;
    }
    let pipeline = Pipeline::connect(config).await;
    let report = pipeline.generate().await.context("generating embeddings")?;
    println!(
        "{}",
        json!({
            "rows": report.rows,
            "model_id": report.model_id,
            "dimensions": report.dimensions,
            "output": report.output.to_string(),
            "fingerprint": report.fingerprint,
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
