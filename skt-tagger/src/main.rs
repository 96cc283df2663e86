use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use skt_tagger_lib::output::{describe, segment_to_bracketed, Description};
use skt_tagger_lib::{Lexicon, Tagger, TaggerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skt-tagger", about = "Sandhi-aware Sanskrit tagger for SLP1 text")]
struct Cli {
    /// SLP1 text to tag. If omitted, reads one segment per line from stdin.
    input: Option<String>,

    /// Lexicon JSON file.
    #[arg(long, short = 'd')]
    data: PathBuf,

    /// Tagger configuration TOML file. Defaults are used if omitted.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output in bracketed {surface:kind:base:tags} format.
    #[arg(long)]
    bracketed: bool,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct SegmentOutput<'a> {
    segment_id: u64,
    text: &'a str,
    items: Vec<Description>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skt_tagger=info,skt_tagger_lib=warn")),
        )
        .init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => TaggerConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => TaggerConfig::default(),
    };
    info!(path = %cli.data.display(), "reading lexicon");
    let lexicon = Lexicon::from_path(&cli.data)
        .with_context(|| format!("Failed to load lexicon: {}", cli.data.display()))?;
    let tagger = Tagger::new(&lexicon, config);

    match &cli.input {
        Some(text) => process_segment(0, text, &tagger, &lexicon, cli)?,
        None => {
            let stdin = io::stdin();
            for (n, line) in stdin.lock().lines().enumerate() {
                let line = line.context("Failed to read stdin")?;
                if !line.trim().is_empty() {
                    process_segment(n as u64, &line, &tagger, &lexicon, cli)?;
                }
            }
        }
    }
    Ok(())
}

fn process_segment(
    segment_id: u64,
    text: &str,
    tagger: &Tagger,
    lexicon: &Lexicon,
    cli: &Cli,
) -> Result<()> {
    let items = tagger.tag(text, Some(segment_id));

    if cli.bracketed {
        println!("{}", segment_to_bracketed(&items, lexicon));
        return Ok(());
    }

    let output = SegmentOutput {
        segment_id,
        text,
        items: items.iter().map(|item| describe(item, lexicon)).collect(),
    };
    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}
