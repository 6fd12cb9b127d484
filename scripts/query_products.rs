//! Similarity search over imported products.

mod common;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use runtime_pipeline::Pipeline;
use serde_json::Value;

use common::CommonArgs;

#[derive(Debug, Parser)]
#[command(author, version, about = "Find products similar to a text query")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Free-text query.
    query: Option<String>,

    /// Maximum products returned.
    #[arg(long, default_value_t = 5)]
    limit: usize,

    /// Look up one product and its related products instead of searching.
    #[arg(long, conflicts_with = "query")]
    product_id: Option<String>,

    /// Answer a resolver event read from FILE (`-` for stdin).
    #[arg(long, value_name = "FILE", conflicts_with_all = ["query", "product_id"])]
    event: Option<PathBuf>,
}

fn read_event(path: &Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading event from stdin")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("reading event {}", path.display()))?
    };
    serde_json::from_str(&text).context("parsing event json")
}

async fn run(args: Args) -> Result<()> {
    let config = args.common.load()?;
    let pipeline = Pipeline::connect(config).await;
    let response = if let Some(path) = &args.event {
        pipeline.handle_query_event(read_event(path)?).await?
    } else if let Some(product_id) = &args.product_id {
        serde_json::to_value(pipeline.get_product(product_id).await?)?
    } else if let Some(query) = &args.query {
        serde_json::to_value(pipeline.search(query, args.limit).await?)?
    } else {
        bail!("provide a query, --product-id or --event");
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Args::parse()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
