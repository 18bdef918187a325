//! quote-cycle - Run one quote posting cycle
//!
//! The per-run entrypoint a cron job invokes: top up the quote inventory,
//! select unused quotes, render, caption, publish, mark consumed.

use clap::Parser;
use libquotecast::caption::gemini::GeminiCaptioner;
use libquotecast::config::read_credential_file;
use libquotecast::cycle::{CycleController, CycleOptions};
use libquotecast::publish::instagram::InstagramPublisher;
use libquotecast::render::template::TemplateRenderer;
use libquotecast::supplier::http::HttpQuoteSupplier;
use libquotecast::types::InventoryOutcome;
use libquotecast::{Config, CycleReport, QuoteStore, QuotecastError, Result};

#[derive(Parser, Debug)]
#[command(name = "quote-cycle")]
#[command(version)]
#[command(about = "Run one quote posting cycle")]
#[command(long_about = "\
quote-cycle - Run one quote posting cycle

DESCRIPTION:
    quote-cycle executes a single posting cycle: it tops up the quote
    inventory from the configured quote API, selects the oldest unused
    quotes, renders each onto the posting canvas, generates a caption,
    publishes, and marks the quote consumed.

    A publish failure aborts the run and leaves the selected quote
    unused, so the next invocation retries it. Scheduling is external:
    run this from cron or a systemd timer.

USAGE EXAMPLES:
    # Run one cycle with the configured post count
    quote-cycle

    # Publish three quotes this cycle
    quote-cycle --count 3

    # Only top up the inventory, publish nothing
    quote-cycle --fill-only

    # Machine-readable report
    quote-cycle --format json

CONFIGURATION:
    Configuration file: ~/.config/quotecast/config.toml
    Database location: ~/.local/share/quotecast/quotes.db

    Override with environment variables:
        QUOTECAST_CONFIG      - Path to config file
        QUOTECAST_LOG_FORMAT  - Log format (text, json, pretty)
        QUOTECAST_LOG_LEVEL   - Log level (error, warn, info, debug)

EXIT CODES:
    0 - Success (including a cycle with nothing to publish)
    1 - Operation failed
    2 - Authentication failed
    3 - Invalid input
")]
struct Cli {
    /// Override the number of quotes to publish this cycle
    #[arg(short, long)]
    count: Option<u32>,

    /// Top up the quote inventory without publishing anything
    #[arg(long)]
    fill_only: bool,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        libquotecast::logging::init_default();
    }

    // Run the main logic and handle errors
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.format != "text" && cli.format != "json" {
        return Err(QuotecastError::InvalidInput(format!(
            "Unknown format '{}'. Valid options: text, json",
            cli.format
        )));
    }

    // Fail fast before any work if a required credential is absent.
    let mut config = Config::load()?;
    config.validate_credentials()?;

    if let Some(count) = cli.count {
        if count == 0 {
            return Err(QuotecastError::InvalidInput(
                "--count must be at least 1".to_string(),
            ));
        }
        config.cycle.posts_per_cycle = count;
    }

    let store = QuoteStore::open(&config.store.path).await?;
    let supplier = HttpQuoteSupplier::new(&config.supplier)?;
    let renderer = TemplateRenderer::new(&config.render)?;
    let api_key = read_credential_file(&config.caption.api_key_file)?;
    let captioner =
        GeminiCaptioner::new(&config.caption.model, api_key, config.caption.timeout_secs)?;
    let publisher = InstagramPublisher::from_config(&config.publisher)?;

    let mut controller = CycleController::new(
        store,
        Box::new(supplier),
        Box::new(renderer),
        Box::new(captioner),
        Box::new(publisher),
        CycleOptions::from_config(&config.cycle),
    );

    if cli.fill_only {
        let outcome = controller.ensure_inventory().await?;
        print_inventory(&outcome, &cli.format);
        return Ok(());
    }

    let report = controller.run().await?;
    print_report(&report, &cli.format);

    Ok(())
}

fn print_inventory(outcome: &InventoryOutcome, format: &str) {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(outcome).unwrap());
        return;
    }

    match outcome {
        InventoryOutcome::Filled { added } => {
            println!("Inventory filled ({} quote(s) added)", added);
        }
        InventoryOutcome::Shortfall {
            available,
            target,
            attempts,
            ..
        } => {
            println!(
                "Inventory shortfall: {}/{} unused after {} attempt(s)",
                available, target, attempts
            );
        }
    }
}

fn print_report(report: &CycleReport, format: &str) {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(report).unwrap());
        return;
    }

    if report.posted.is_empty() {
        println!("Nothing to publish");
    } else {
        for posted in &report.posted {
            println!(
                "Posted [{}]: {} - {}",
                posted.platform_post_id, posted.text, posted.author
            );
        }
    }

    if let InventoryOutcome::Shortfall {
        available, target, ..
    } = &report.inventory
    {
        println!(
            "Warning: inventory could not be filled ({}/{} unused)",
            available, target
        );
    }
}
