use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use qr_driver::tools::{dataset_iter, load_luma_fitted, scan_files_parallel, scan_luma_with};
use qr_driver::{DecoderContext, ScanDriver, ScanOutcome, ScannerConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "qrscan", version, about = "Single-shot QR scanning over a fixed frame buffer")]
struct Cli {
    /// Enable verbose logging and per-scan diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum horizontal resolution of the frame buffer
    #[arg(long, global = true)]
    max_width: Option<usize>,

    /// Maximum vertical resolution of the frame buffer
    #[arg(long, global = true)]
    max_height: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a single image
    Scan {
        #[arg(long)]
        image: PathBuf,
    },
    /// Scan every image under a directory in parallel and report the reading rate
    Batch {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ScannerConfig::from_env();
    if cli.max_width.is_some() || cli.max_height.is_some() {
        config = config.with_max_resolution(
            cli.max_width.unwrap_or(config.max_hor_res),
            cli.max_height.unwrap_or(config.max_ver_res),
        );
    }
    let config = config.with_debug(config.debug || cli.verbose);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::new(log_filter(&config)))
        .init();

    match cli.command {
        Command::Scan { image } => scan_cmd(&image, config),
        Command::Batch { root, limit } => batch_cmd(&root, limit, config),
    }
}

/// `QR_DEBUG` and `--verbose` both need debug-level events to reach the output
fn log_filter(config: &ScannerConfig) -> &'static str {
    if config.debug { "debug" } else { "info" }
}

fn scan_cmd(path: &Path, config: ScannerConfig) -> Result<()> {
    let image = load_luma_fitted(path, &config)
        .with_context(|| format!("failed to load image {}", path.display()))?;

    let mut ctx = DecoderContext::with_config(config)?;
    let mut driver = ScanDriver::new();
    let start = Instant::now();
    let outcome = scan_luma_with(&mut ctx, &mut driver, &image)?;
    let elapsed = start.elapsed();

    print!("Image: {} ({}x{})", path.display(), image.width(), image.height());
    match ctx.frame().and_then(|frame| frame.luma_stats()) {
        Some(luma) => println!(
            ", luma {}-{} (contrast {}), mean {}",
            luma.darkest,
            luma.brightest,
            luma.contrast(),
            luma.mean
        ),
        None => println!(),
    }

    match outcome {
        ScanOutcome::Found(payload) => {
            println!(
                "Found: version={} ecc={} mask={} ({} bytes, {:.2?})",
                payload.version,
                payload.ecc_level,
                payload.mask,
                payload.len(),
                elapsed
            );
            println!("{}", payload.text());
        }
        ScanOutcome::DecodeFailed(err) => println!("No code ({err}, {elapsed:.2?})"),
        ScanOutcome::NotFound => println!("No code ({elapsed:.2?})"),
    }
    Ok(())
}

fn batch_cmd(root: &Path, limit: Option<usize>, config: ScannerConfig) -> Result<()> {
    let paths: Vec<PathBuf> = dataset_iter(root, limit).collect();
    if paths.is_empty() {
        bail!("no images found under {}", root.display());
    }

    let start = Instant::now();
    let results = scan_files_parallel(&paths, config);
    let elapsed = start.elapsed();

    let mut found = 0usize;
    let mut failed_loads = 0usize;
    for result in &results {
        match &result.outcome {
            Ok(ScanOutcome::Found(payload)) => {
                found += 1;
                println!("OK: {} -> {}", result.path.display(), payload.text());
            }
            Ok(ScanOutcome::DecodeFailed(err)) => {
                println!("FAIL: {} -> {}", result.path.display(), err);
            }
            Ok(ScanOutcome::NotFound) => println!("FAIL: {} -> no code", result.path.display()),
            Err(err) => {
                failed_loads += 1;
                tracing::warn!(path = %result.path.display(), error = %err, "skipped");
            }
        }
    }

    let scanned = results.len() - failed_loads;
    let rate = if scanned == 0 {
        0.0
    } else {
        100.0 * found as f64 / scanned as f64
    };
    println!("\nResult: {found}/{scanned} ({rate:.1}%) in {elapsed:.2?}");
    Ok(())
}
