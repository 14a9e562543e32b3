// ABOUTME: CLI for running the extraction core against saved article pages.
// ABOUTME: Reads page bytes from a file or stdin, runs a bridge action, prints JSON.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use newsclip_extract::{handle, BridgeRequest, Page, Registry};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Action {
    /// Only report which platform owns the URL.
    Detect,
    /// Extract the full article and its comments.
    Crawl,
}

/// Extract an article from a saved news page and output JSON.
#[derive(Parser, Debug)]
#[command(name = "newsclip-cli")]
#[command(about = "Extract articles from saved news pages and print JSON", long_about = None)]
struct Args {
    /// Local HTML file path. Use "-" to read the page from stdin.
    target: String,

    /// The URL the page was saved from; platform detection keys off it.
    #[arg(long)]
    url: String,

    /// What to run against the page.
    #[arg(long, value_enum, default_value_t = Action::Crawl)]
    action: Action,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let bytes = load_bytes(&args.target)?;
    let page = Page::from_bytes(&bytes, &args.url);
    let registry = Registry::builtin();

    let request = match args.action {
        Action::Detect => BridgeRequest::DetectPlatform,
        Action::Crawl => BridgeRequest::CrawlArticle,
    };
    let response = handle(&registry, &page, request);
    let output = serde_json::to_value(&response)?;

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if output.get("success").and_then(|v| v.as_bool()) == Some(false) {
        std::process::exit(1);
    }
    Ok(())
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
