use anyhow::{Context, Result};
use clap::Parser;
use roadwrangler::{pipeline, Config};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Scrape the road safety table, write road_safety.csv and render the charts.
#[derive(Parser, Debug)]
#[command(name = "roadwrangler", version)]
struct Args {
    /// YAML file replacing the built-in configuration.
    #[arg(long, env = "ROADWRANGLER_CONFIG")]
    config: Option<PathBuf>,

    /// Root directory for the CSV, charts/ and the run summary.
    #[arg(long, env = "ROADWRANGLER_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Page to scrape.
    #[arg(long, env = "ROADWRANGLER_URL")]
    url: Option<String>,

    /// Draw charts without captions or axis text.
    #[arg(long)]
    no_labels: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(dir) = args.output_dir {
        cfg.output.dir = dir;
    }
    if let Some(url) = args.url {
        cfg.source.url = url;
    }
    if args.no_labels {
        cfg.output.annotate = false;
    }
    cfg.validate().context("validating configuration")?;

    // ─── 3) run ──────────────────────────────────────────────────────
    let summary = match pipeline::run(&cfg) {
        Ok(s) => s,
        Err(e) => {
            let stage = e.stage();
            error!(stage, error = %e, "run halted");
            return Err(anyhow::Error::new(e).context(format!("{} stage failed", stage)));
        }
    };

    if summary.is_complete() {
        info!(charts = summary.produced.len(), "all done");
    } else {
        warn!(
            produced = summary.produced.len(),
            skipped = summary.skipped.len(),
            "done with skipped charts; see {}",
            cfg.output.summary_path().display()
        );
    }
    Ok(())
}
